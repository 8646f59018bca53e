//! Security schemes that turn into implicit operation parameters.

use serde::{Deserialize, Serialize};

/// Header carrying a bearer token.
pub const AUTHORIZATION_HEADER: &str = "Authorization";

/// How an operation authenticates its caller.
///
/// Each scheme is surfaced to the contract as one extra required header
/// parameter, placed before the operation's own parameters.
///
/// ## Examples
///
/// ```
/// use bindery_define::SecurityScheme;
///
/// assert_eq!(SecurityScheme::BearerToken.header_name(), "Authorization");
///
/// let api_key = SecurityScheme::SecurityHeader {
///     header_name: "X-Api-Key".to_string(),
/// };
/// assert_eq!(api_key.header_name(), "X-Api-Key");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SecurityScheme {
    /// `http` scheme with `bearer`: the raw `Authorization` header value.
    BearerToken,

    /// `apiKey` scheme located in a header.
    SecurityHeader {
        /// Header name carrying the key.
        header_name: String,
    },
}

impl SecurityScheme {
    /// Returns the header the implicit parameter is read from.
    pub fn header_name(&self) -> &str {
        match self {
            Self::BearerToken => AUTHORIZATION_HEADER,
            Self::SecurityHeader { header_name } => header_name,
        }
    }
}
