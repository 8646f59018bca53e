//! Path template parsing.
//!
//! Extracts parameter names from URL path templates that use `{param}` syntax.

/// Extracts parameter names from a path template.
///
/// ## Examples
///
/// ```
/// use bindery_gen::parser::extract_path_params;
///
/// assert_eq!(extract_path_params("/pets"), vec![] as Vec<&str>);
/// assert_eq!(extract_path_params("/pets/{petId}"), vec!["petId"]);
/// assert_eq!(
///     extract_path_params("/owners/{ownerId}/pets/{petId}"),
///     vec!["ownerId", "petId"]
/// );
/// ```
pub fn extract_path_params(path: &str) -> Vec<&str> {
    let mut params = Vec::new();
    let mut pos = 0;

    for (idx, c) in path.char_indices() {
        if c == '{' {
            pos = idx + 1; // Start after '{'
        } else if c == '}' && pos > 0 {
            let param = &path[pos..idx];
            if !param.is_empty() {
                params.push(param);
            }
            pos = 0;
        }
    }

    params
}
