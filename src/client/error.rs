use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    /// Distinguished conflict signal: the target identity+type slot is
    /// occupied by a soft-deleted record
    #[error("{message}")]
    SoftDeleteConflict { message: String },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("{detail}")]
    Api { status: u16, detail: String },

    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid response body: {0}")]
    InvalidResponse(#[from] serde_json::Error),

    #[error("Invalid portal URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Failed to read file: {0}")]
    FileRead(#[from] std::io::Error),
}

impl ClientError {
    /// True when the error is the disambiguated soft-delete conflict that
    /// the edit submitter turns into a pending override
    pub fn is_soft_delete_conflict(&self) -> bool {
        matches!(self, ClientError::SoftDeleteConflict { .. })
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Unauthorized(_) => Some(401),
            ClientError::SoftDeleteConflict { .. } => Some(409),
            _ => None,
        }
    }
}
