//! Response envelope shared by every operation.
//!
//! Transport frameworks are out of scope; this is the contract any adapter
//! (HTTP or otherwise) marshals: `{success, data?, message}` plus the
//! HTTP-style status a given error maps to.

use serde::{Deserialize, Serialize};

use vigil_core::error::VigilError;

/// Status code for a successful creation.
pub const STATUS_CREATED: u16 = 201;
/// Status code for an ordinary success.
pub const STATUS_OK: u16 = 200;

/// The shared response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub message: String,
}

impl<T> ApiResponse<T> {
    /// A successful response carrying data.
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: message.into(),
        }
    }

    /// A failed response; the message is surfaced verbatim to the caller.
    pub fn error(err: &VigilError) -> Self {
        Self {
            success: false,
            data: None,
            message: err.to_string(),
        }
    }
}

/// Maps an error to the HTTP-style status an adapter should respond with.
///
/// Bad input is the caller's fault (400), a missing session is 404, and
/// everything else is an internal failure (500).
pub fn http_status(err: &VigilError) -> u16 {
    match err {
        VigilError::Validation(_) => 400,
        VigilError::NotFound { .. } => 404,
        _ => 500,
    }
}
