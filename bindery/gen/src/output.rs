//! Output assembly and file writing for generated code.
//!
//! Emitters produce [`SourceFile`]s: token streams tagged with their module
//! path inside the target. This module adds the module declarations, checks
//! the code with `syn`, formats it with `prettyplease` and writes it.
//!
//! ## Output Structure
//!
//! A target is written as a module tree:
//! ```text
//! <output>/
//! ├── mod.rs          # module declarations and re-exports
//! ├── server.rs       # <Prefix>Spec
//! ├── models/
//! │   ├── mod.rs
//! │   └── pet.rs      # one file per type
//! ├── routes.rs       # <Prefix>Controller
//! └── client.rs       # <Prefix>Client (optional)
//! ```
//!
//! or, in bundle mode, as one file with inline modules that a build script
//! can write to `OUT_DIR` for `include!`.
//!
//! ## Safety Guarantees
//!
//! - **Validation**: All generated code is validated with `syn` before writing
//! - **Formatting**: Output is formatted with `prettyplease` for consistent style
//! - **Atomic writes**: Uses temp file + rename pattern to prevent partial writes
//! - **All or nothing**: Every file is rendered before the first one is written

use std::fs;
use std::path::{Path, PathBuf};

use bindery_define::{OpenApiDocument, SpecMetadata};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use crate::codegen::client::{CLIENT_MODULE, client_name};
use crate::codegen::routes::{ROUTES_MODULE, controller_name};
use crate::codegen::server::{SERVER_MODULE, spec_trait_name};
use crate::codegen::types::doc_attrs;
use crate::codegen::{ModelEmitter, emit_client, emit_routes, emit_server_interface};
use crate::config::TargetConfig;
use crate::errors::GeneratorError;
use crate::resolver::resolve;

/// One generated module.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Path from the target root, e.g. `["models", "pet"]`. Empty for the root.
    pub module_path: Vec<String>,
    /// Documentation attached to the module declaration.
    pub doc: Option<String>,
    pub tokens: TokenStream,
}

impl SourceFile {
    pub fn new(module_path: Vec<String>, tokens: TokenStream) -> Self {
        Self {
            module_path,
            doc: None,
            tokens,
        }
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    fn is_child_of(&self, parent: &[String]) -> bool {
        self.module_path.len() == parent.len() + 1 && self.module_path.starts_with(parent)
    }
}

/// All modules of one target, root first.
#[derive(Debug, Clone)]
pub struct GeneratedTarget {
    pub name: String,
    pub files: Vec<SourceFile>,
}

impl GeneratedTarget {
    fn children<'a>(&'a self, parent: &'a [String]) -> impl Iterator<Item = &'a SourceFile> + 'a {
        self.files.iter().filter(move |f| f.is_child_of(parent))
    }

    fn has_children(&self, parent: &[String]) -> bool {
        self.children(parent).next().is_some()
    }

    /// File path of a module relative to the target directory.
    pub fn relative_path(&self, file: &SourceFile) -> PathBuf {
        let path: PathBuf = file.module_path.iter().collect();
        if file.module_path.is_empty() || self.has_children(&file.module_path) {
            path.join("mod.rs")
        } else {
            path.with_extension("rs")
        }
    }

    /// `pub mod child;` declarations for the direct children of a module.
    fn declarations(&self, parent: &[String]) -> TokenStream {
        let decls = self.children(parent).map(|child| {
            let doc = child.doc.as_deref().map(doc_attrs);
            let name = child.module_path.last().map(|m| format_ident!("{}", m));
            quote! {
                #doc
                pub mod #name;
            }
        });
        quote! { #(#decls)* }
    }

    /// A module and its children as inline modules.
    fn inline(&self, file: &SourceFile) -> TokenStream {
        let tokens = &file.tokens;
        let children = self.children(&file.module_path).map(|child| {
            let doc = child.doc.as_deref().map(doc_attrs);
            let name = child.module_path.last().map(|m| format_ident!("{}", m));
            let body = self.inline(child);
            quote! {
                #doc
                pub mod #name {
                    #body
                }
            }
        });
        quote! {
            #(#children)*
            #tokens
        }
    }
}

/// Loads, resolves and emits one target.
///
/// ## Errors
///
/// Returns an error if the configuration is invalid, the document cannot be
/// read or resolved, or code generation fails.
pub fn generate_target(target: &TargetConfig) -> Result<GeneratedTarget, GeneratorError> {
    target.validate()?;
    tracing::info!(api = %target.name, spec = %target.spec.display(), "generating target");

    let doc = OpenApiDocument::from_path(&target.spec)?;
    let metadata = resolve(&doc, &target.prefix())?;
    assemble_target(&metadata, &target.name, target.client)
}

/// Runs every emitter and adds the target root module.
pub fn assemble_target(
    metadata: &SpecMetadata,
    name: &str,
    with_client: bool,
) -> Result<GeneratedTarget, GeneratorError> {
    let server = emit_server_interface(metadata)?;
    let models = ModelEmitter::new(metadata).emit()?;
    let routes = emit_routes(metadata)?;
    let client = with_client.then(|| emit_client(metadata)).transpose()?;

    let spec = spec_trait_name(metadata);
    let controller = controller_name(metadata);
    let server_module = format_ident!("{}", SERVER_MODULE);
    let routes_module = format_ident!("{}", ROUTES_MODULE);
    let client_export = client.as_ref().map(|_| {
        let module = format_ident!("{}", CLIENT_MODULE);
        let client = client_name(metadata);
        quote! { pub use self::#module::#client; }
    });
    let root = SourceFile::new(
        Vec::new(),
        quote! {
            pub use self::#server_module::#spec;
            pub use self::#routes_module::#controller;
            #client_export
        },
    );

    let mut files = vec![root, server];
    files.extend(models);
    files.push(routes);
    files.extend(client);

    tracing::debug!(api = name, files = files.len(), "assembled target");
    Ok(GeneratedTarget {
        name: name.to_string(),
        files,
    })
}

/// Validates generated code using syn.
///
/// ## Errors
///
/// Returns `GeneratorError::CodeGenError` if the code fails to parse.
pub fn validate_code(tokens: &TokenStream) -> Result<syn::File, GeneratorError> {
    syn::parse2(tokens.clone())
        .map_err(|e| GeneratorError::CodeGenError(format!("Generated code is invalid: {}", e)))
}

/// Formats generated code using prettyplease, prepending the
/// generated-code notice.
pub fn format_code(file: &syn::File) -> String {
    let formatted = prettyplease::unparse(file);
    format!(
        "// This code was automatically generated by bindery-gen. Do not edit manually.\n\n{}",
        formatted
    )
}

/// Renders every module of a target to `(relative path, contents)`.
pub fn render_files(target: &GeneratedTarget) -> Result<Vec<(PathBuf, String)>, GeneratorError> {
    target
        .files
        .iter()
        .map(|file| {
            let decls = target.declarations(&file.module_path);
            let tokens = &file.tokens;
            let parsed = validate_code(&quote! {
                #decls
                #tokens
            })?;
            Ok((target.relative_path(file), format_code(&parsed)))
        })
        .collect()
}

/// Renders a target as a single file of nested inline modules.
pub fn render_bundle(target: &GeneratedTarget) -> Result<String, GeneratorError> {
    let root = target
        .files
        .iter()
        .find(|f| f.module_path.is_empty())
        .ok_or_else(|| GeneratorError::CodeGenError("target has no root module".to_string()))?;
    let parsed = validate_code(&target.inline(root))?;
    Ok(format_code(&parsed))
}

/// Writes content to a file atomically using temp file + rename.
///
/// ## Errors
///
/// Returns `GeneratorError::WriteError` if:
/// - Parent directories cannot be created
/// - The temp file cannot be written
/// - The rename operation fails
pub fn write_atomic(path: &Path, content: &str) -> Result<(), GeneratorError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| GeneratorError::WriteError {
            path: parent.display().to_string(),
            source: e,
        })?;
    }

    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, content).map_err(|e| GeneratorError::WriteError {
        path: temp_path.display().to_string(),
        source: e,
    })?;

    fs::rename(&temp_path, path).map_err(|e| GeneratorError::WriteError {
        path: path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

fn ensure_parent_exists(path: &Path) -> Result<(), GeneratorError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.is_dir() => {
            Err(GeneratorError::OutputDirNotFound(parent.display().to_string()))
        }
        _ => Ok(()),
    }
}

/// Writes a target as a module tree under `dir`.
///
/// With `dry_run`, prints every file instead. Returns the written paths.
pub fn write_target(
    target: &GeneratedTarget,
    dir: &Path,
    dry_run: bool,
) -> Result<Vec<PathBuf>, GeneratorError> {
    let rendered = render_files(target)?;

    if dry_run {
        for (path, content) in &rendered {
            println!("=== {} ===\n{}\n", path.display(), content);
        }
        return Ok(Vec::new());
    }

    ensure_parent_exists(dir)?;
    let mut written = Vec::with_capacity(rendered.len());
    for (relative, content) in rendered {
        let path = dir.join(relative);
        write_atomic(&path, &content)?;
        tracing::debug!(path = %path.display(), "wrote file");
        written.push(path);
    }
    tracing::info!(api = %target.name, files = written.len(), dir = %dir.display(), "wrote target");
    Ok(written)
}

/// Writes a target as one bundle file.
pub fn write_bundle(target: &GeneratedTarget, path: &Path, dry_run: bool) -> Result<PathBuf, GeneratorError> {
    let content = render_bundle(target)?;
    if dry_run {
        println!("=== {} ===\n{}\n", path.display(), content);
        return Ok(path.to_path_buf());
    }
    ensure_parent_exists(path)?;
    write_atomic(path, &content)?;
    tracing::info!(api = %target.name, path = %path.display(), "wrote bundle");
    Ok(path.to_path_buf())
}

/// Generates a configured target and writes it to its output location.
///
/// Returns the written paths.
pub fn generate_and_write(target: &TargetConfig, dry_run: bool) -> Result<Vec<PathBuf>, GeneratorError> {
    let generated = generate_target(target)?;
    if target.bundle {
        write_bundle(&generated, &target.output, dry_run).map(|path| vec![path])
    } else {
        write_target(&generated, &target.output, dry_run)
    }
}
