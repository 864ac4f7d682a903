use beicun_protocol::ProtocolError;

/// Errors from the storage client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("service error {code}: {message}")]
    Service { code: i32, message: String },

    #[error("response carried no data")]
    MissingData,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("not authenticated, please log in")]
    Unauthenticated,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ProtocolError> for ClientError {
    fn from(e: ProtocolError) -> Self {
        match e {
            ProtocolError::Service { code, message } => Self::Service { code, message },
            ProtocolError::MissingData => Self::MissingData,
        }
    }
}
