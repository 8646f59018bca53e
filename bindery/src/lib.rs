//! Runtime support for code generated by `bindery-gen`.
//!
//! Generated bindings are thin: they declare which parameters and body
//! fields to read and which variant maps to which status. Everything that
//! actually touches the request, the disk or the response lives here.
//!
//! ## Features
//!
//! - **Structured rejections**: [`RequestError`] renders the closed set of
//!   400 responses (`noParamFound`, `badParamFormat`, `noBodyFound`,
//!   `illegalBody`)
//! - **Parameter parsing**: [`read_required_param`] / [`read_optional_param`]
//!   with strict scalar parsers
//! - **Body extraction**: JSON, url-encoded forms and buffered multipart
//!   with files materialized as temporary files
//! - **Scoped cleanup**: [`CleanupRegistry`] releases every temporary file
//!   on every exit path of a handler
//! - **Response dispatch**: [`ResponseWriter`] for status, headers, JSON and
//!   file bodies
//! - **Client helpers**: URL building, header decoding and file transfer for
//!   generated `reqwest` clients
//!
//! ## Example
//!
//! ```rust,ignore
//! async fn show_pet<S: PetstoreSpec>(
//!     State(server): State<Arc<S>>,
//!     Path(path): Path<HashMap<String, String>>,
//!     headers: HeaderMap,
//! ) -> Result<Response, bindery::HandlerError> {
//!     let mut cleanup = bindery::CleanupRegistry::new();
//!     let pet_id = bindery::read_required_param(
//!         "petId",
//!         path.get("petId").map(String::as_str),
//!         bindery::parse_string,
//!     )?;
//!     match server.show_pet_by_id(pet_id).await? {
//!         ShowPetByIdResponse::Pet { pet } => bindery::ResponseWriter::from_code(200)?.json(&pet),
//!     }
//! }
//! ```

pub mod body;
pub mod cleanup;
pub mod client;
pub mod error;
pub mod params;
pub mod response;

// Re-exports used directly by generated code
pub use body::{
    FormFields, MultipartForm, UploadedFile, primary_content_type, read_form, read_json,
    read_multipart, unsupported_media,
};
pub use cleanup::CleanupRegistry;
pub use error::{BadRequest, BodyError, ClientError, HandlerError, RequestError, ServiceError, valid_body};
pub use params::{
    header_value, parse_bool_strict, parse_float, parse_int, parse_long, parse_string,
    read_optional_param, read_required_param,
};
pub use response::ResponseWriter;
