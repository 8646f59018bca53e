//! bindery code generator library.
//!
//! This crate compiles an OpenAPI 3 document into Rust source code for an
//! axum server and, optionally, a reqwest client. The generated code
//! includes:
//!
//! - A `<Prefix>Spec` trait: one async method per operation
//! - A `models` module: one record or sum type per named schema, plus a
//!   request and a response sum type per operation
//! - A `<Prefix>Controller` that binds a `<Prefix>Spec` implementation to an
//!   [`axum::Router`](https://docs.rs/axum)
//! - A `<Prefix>Client` with the same methods as the contract
//!
//! ## Modules
//!
//! - [`resolver`] - OpenAPI document to [`SpecMetadata`](bindery_define::SpecMetadata)
//! - [`codegen`] - Code generation for each component
//! - [`output`] - Final assembly, validation, and file writing
//! - [`config`] - Generation targets and `bindery.toml`
//! - [`parser`] - Path parameter extraction utilities
//! - [`errors`] - Error types for the generator
//!
//! ## Example Usage
//!
//! ```no_run
//! use bindery_gen::config::TargetConfig;
//! use bindery_gen::output::generate_and_write;
//!
//! let target = TargetConfig::new("petstore", "openapi/petstore.yaml", "src/petstore")
//!     .with_client(true);
//!
//! // Generate code (dry_run=true prints instead of writing)
//! let files = generate_and_write(&target, true).unwrap();
//! println!("{} files", files.len());
//! ```
//!
//! ## Generated Code Structure
//!
//! For a document with a `listPets` operation and a `Pets` schema:
//!
//! ```text
//! pub trait PetstoreSpec: Send + Sync + 'static {
//!     fn list_pets(&self, limit: Option<i32>)
//!         -> impl Future<Output = Result<models::ListPetsResponse, ServiceError>> + Send;
//! }
//!
//! pub enum ListPetsResponse {
//!     Pets { pets: Pets, list_pets_response_pets_headers: ListPetsResponsePetsHeaders },
//!     Error { error: Error },
//! }
//!
//! let router = PetstoreController::new(MyServer).into_router();
//! ```
//!
//! ## Build Scripts
//!
//! [`output::render_bundle`] renders a target as one file of inline modules,
//! which a build script can write to `OUT_DIR` and the crate can pull in
//! with `include!`.

pub mod codegen;
pub mod config;
pub mod errors;
pub mod output;
pub mod parser;
pub mod resolver;

#[cfg(test)]
pub mod test_utils;
