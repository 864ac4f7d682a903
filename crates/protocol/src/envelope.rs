use serde::{Deserialize, Serialize};

use crate::constants::SUCCESS_CODE;

/// Errors produced while unwrapping a response envelope.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProtocolError {
    /// The service answered with a non-zero `code`.
    #[error("service error {code}: {message}")]
    Service { code: i32, message: String },

    /// The envelope reported success but carried no `data`.
    #[error("response carried no data")]
    MissingData,
}

/// Envelope for every storage service response.
///
/// `data` is absent (or `null`) for calls that only report success, and
/// `total` is only set by paginated listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub code: i32,
    #[serde(default)]
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<i64>,
}

impl<T> ApiResponse<T> {
    /// Creates a successful envelope around `data`.
    pub fn ok(data: T) -> Self {
        Self {
            code: SUCCESS_CODE,
            message: "success".into(),
            data: Some(data),
            total: None,
        }
    }

    /// Creates an error envelope.
    pub fn error(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
            total: None,
        }
    }

    /// Returns `true` when the service reported success.
    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }

    /// Unwraps the envelope, keeping an absent payload as `None`.
    pub fn into_result(self) -> Result<Option<T>, ProtocolError> {
        if self.is_success() {
            Ok(self.data)
        } else {
            Err(ProtocolError::Service {
                code: self.code,
                message: self.message,
            })
        }
    }

    /// Unwraps the envelope and requires a payload.
    pub fn into_data(self) -> Result<T, ProtocolError> {
        self.into_result()?.ok_or(ProtocolError::MissingData)
    }
}

impl<T> ApiResponse<Vec<T>> {
    /// Unwraps a paginated listing. A missing `total` falls back to the
    /// number of returned items.
    pub fn into_page(self) -> Result<Page<T>, ProtocolError> {
        let total = self.total;
        let items = self.into_result()?.unwrap_or_default();
        let total = total.unwrap_or(items.len() as i64);
        Ok(Page { items, total })
    }
}

/// One page of a listing together with the overall item count.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
}
