//! Error types used by generated bindings and clients.
//!
//! - [`RequestError`] - the closed set of 400 responses a binding produces
//! - [`BodyError`] - internal body extraction failures, reported as `illegalBody`
//! - [`ServiceError`] - a contract implementation's failure
//! - [`HandlerError`] - everything a generated handler can return
//! - [`ClientError`] - failures of a generated client

mod body_error;
mod client_error;
mod handler_error;
mod request_error;
mod service_error;

pub use body_error::{BodyError, valid_body};
pub use client_error::ClientError;
pub use handler_error::HandlerError;
pub use request_error::{BadRequest, RequestError};
pub use service_error::ServiceError;
