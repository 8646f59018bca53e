//! Naming discipline shared by the resolver and every emitter.
//!
//! All generated identifiers are derived through these functions so that a
//! type referenced from the contract, the models, the routes and the client
//! always resolves to the same Rust name.
//!
//! ## Examples
//!
//! ```
//! use bindery_define::naming::{decapitalize, pascal_case, simple_name, snake_case};
//!
//! assert_eq!(simple_name("#/components/schemas/Pets"), "Pets");
//! assert_eq!(pascal_case("listPets"), "ListPets");
//! assert_eq!(pascal_case("x-version"), "XVersion");
//! assert_eq!(snake_case("petId"), "pet_id");
//! assert_eq!(decapitalize("Pets"), "pets");
//! ```

/// Rust keywords that cannot be used as plain identifiers.
const RUST_KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move",
    "mut", "pub", "ref", "return", "self", "Self", "static", "struct", "super", "trait", "true",
    "type", "unsafe", "use", "where", "while", "abstract", "become", "box", "do", "final",
    "macro", "override", "priv", "try", "typeof", "unsized", "virtual", "yield", "gen",
];

/// Returns the last segment of a `$ref` pointer.
///
/// ```
/// use bindery_define::naming::simple_name;
///
/// assert_eq!(simple_name("#/components/schemas/Pet"), "Pet");
/// assert_eq!(simple_name("Pet"), "Pet");
/// ```
pub fn simple_name(pointer: &str) -> &str {
    pointer.rsplit('/').next().unwrap_or(pointer)
}

/// Splits an identifier into words on CamelCase boundaries and on every
/// character that is not an ASCII letter or digit.
///
/// - "listPets" -> ["list", "Pets"]
/// - "x-version" -> ["x", "version"]
/// - "HTTPClient" -> ["HTTP", "Client"]
/// - "get pet (v2)" -> ["get", "pet", "v2"]
pub fn split_words(s: &str) -> Vec<&str> {
    s.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .flat_map(split_camel_case)
        .collect()
}

fn split_camel_case(s: &str) -> Vec<&str> {
    let mut words = Vec::new();
    let mut word_start = 0;
    let chars: Vec<(usize, char)> = s.char_indices().collect();

    for i in 1..chars.len() {
        let (idx, current) = chars[i];
        let prev = chars[i - 1].1;

        // "petId" -> "pet", "Id"; "HTTPClient" -> "HTTP", "Client"
        let is_new_word = current.is_uppercase()
            && (prev.is_lowercase()
                || prev.is_ascii_digit()
                || (i + 1 < chars.len() && chars[i + 1].1.is_lowercase() && prev.is_uppercase()));

        if is_new_word {
            if idx > word_start {
                words.push(&s[word_start..idx]);
            }
            word_start = idx;
        }
    }

    if word_start < s.len() {
        words.push(&s[word_start..]);
    }

    words
}

/// Converts an identifier into PascalCase, used for type and variant names.
pub fn pascal_case(s: &str) -> String {
    split_words(s).into_iter().map(capitalize).collect()
}

/// Converts an identifier into snake_case, used for functions, fields and modules.
pub fn snake_case(s: &str) -> String {
    split_words(s)
        .into_iter()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

/// Uppercases the first character.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Lowercases the first character.
///
/// Named array wrappers use the decapitalized type name as their single
/// field's wire name (`Pets` serializes as `{"pets": [...]}`).
pub fn decapitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Returns `true` if `s` is a reserved Rust keyword.
pub fn is_keyword(s: &str) -> bool {
    RUST_KEYWORDS.contains(&s)
}

/// Converts a schema name or operationId into a PascalCase type name that is
/// a valid Rust identifier.
///
/// Names starting with a digit get a leading underscore and keywords a
/// trailing one. Returns `None` when nothing usable is left.
///
/// ```
/// use bindery_define::naming::type_name;
///
/// assert_eq!(type_name("3DModel").as_deref(), Some("_3DModel"));
/// assert_eq!(type_name("list pets!").as_deref(), Some("ListPets"));
/// assert_eq!(type_name("self").as_deref(), Some("Self_"));
/// assert_eq!(type_name("???"), None);
/// ```
pub fn type_name(s: &str) -> Option<String> {
    let name = pascal_case(s);
    if name.is_empty() {
        return None;
    }
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        return Some(format!("_{}", name));
    }
    if is_keyword(&name) {
        return Some(format!("{}_", name));
    }
    Some(name)
}

/// Returns `true` if `s` can be used verbatim as a generated type name.
pub fn is_type_ident(s: &str) -> bool {
    let mut chars = s.chars();
    let valid_start = match chars.next() {
        Some(first) => first.is_ascii_alphabetic() || (first == '_' && s.len() > 1),
        None => false,
    };
    valid_start && chars.all(|c| c.is_ascii_alphanumeric() || c == '_') && !is_keyword(s)
}

/// Converts any wire name into a valid snake_case Rust identifier.
///
/// Keywords get a trailing underscore and names starting with a digit get a
/// leading one.
///
/// ```
/// use bindery_define::naming::field_ident;
///
/// assert_eq!(field_ident("x-version"), "x_version");
/// assert_eq!(field_ident("type"), "type_");
/// assert_eq!(field_ident("2fa"), "_2fa");
/// ```
pub fn field_ident(s: &str) -> String {
    let ident = snake_case(s);
    if ident.is_empty() {
        return "value".to_string();
    }
    if is_keyword(&ident) {
        return format!("{}_", ident);
    }
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        return format!("_{}", ident);
    }
    ident
}
