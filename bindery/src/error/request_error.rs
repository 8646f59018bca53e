//! The structured 400 taxonomy.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a request was rejected before reaching the contract.
///
/// Serialized as the `details` object of a [`BadRequest`] body:
///
/// ```
/// use bindery::RequestError;
///
/// let err = RequestError::no_param_found("limit");
/// assert_eq!(
///     serde_json::to_value(&err).unwrap(),
///     serde_json::json!({ "type": "noParamFound", "paramName": "limit" })
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum RequestError {
    /// A required parameter is absent or empty.
    #[error("Required parameter '{param_name}' not found")]
    NoParamFound {
        /// Wire name of the parameter.
        param_name: String,
    },

    /// A parameter is present but cannot be parsed into its declared type.
    #[error("Parameter '{param_name}' has an invalid format")]
    BadParamFormat {
        /// Wire name of the parameter.
        param_name: String,
    },

    /// A required body is missing or sent with an unaccepted content type.
    #[error("Request body not found")]
    NoBodyFound,

    /// The body could not be decoded.
    #[error("Request body is malformed")]
    IllegalBody,
}

impl RequestError {
    pub fn no_param_found(param_name: impl Into<String>) -> Self {
        Self::NoParamFound {
            param_name: param_name.into(),
        }
    }

    pub fn bad_param_format(param_name: impl Into<String>) -> Self {
        Self::BadParamFormat {
            param_name: param_name.into(),
        }
    }

    /// The `details.type` tag.
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::NoParamFound { .. } => "noParamFound",
            Self::BadParamFormat { .. } => "badParamFormat",
            Self::NoBodyFound => "noBodyFound",
            Self::IllegalBody => "illegalBody",
        }
    }

    /// The offending parameter, for parameter errors.
    pub fn param_name(&self) -> Option<&str> {
        match self {
            Self::NoParamFound { param_name } | Self::BadParamFormat { param_name } => {
                Some(param_name)
            }
            _ => None,
        }
    }
}

/// Body of a 400 response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadRequest {
    pub title: String,
    pub status: u16,
    pub details: RequestError,
}

impl From<RequestError> for BadRequest {
    fn from(details: RequestError) -> Self {
        Self {
            title: "Bad Request".to_string(),
            status: StatusCode::BAD_REQUEST.as_u16(),
            details,
        }
    }
}

impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        tracing::debug!(error = %self, "rejecting request");
        (StatusCode::BAD_REQUEST, Json(BadRequest::from(self))).into_response()
    }
}
