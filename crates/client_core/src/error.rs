use reqwest::StatusCode;
use shared::error::ServiceErrorBody;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to reach service: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("service responded with {status}")]
    Status {
        status: StatusCode,
        body: Option<ServiceErrorBody>,
    },
    #[error("malformed service response: {0}")]
    Decode(String),
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn body(&self) -> Option<&ServiceErrorBody> {
        match self {
            Self::Status { body, .. } => body.as_ref(),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }

    /// The request never produced an HTTP response.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

/// Failure of a user-level action. Its notification has already been sent.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error(transparent)]
    Form(#[from] crate::forms::FormError),
    #[error(transparent)]
    Client(#[from] ClientError),
}
