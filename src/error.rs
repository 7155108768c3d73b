use jsonwebtoken::errors::Error as JwtError;
use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A caller-supplied value broke a precondition, e.g. a malformed
    /// timestamp or a negative vote count. `field` names the offender.
    #[error("Invalid input for `{field}`: {reason}")]
    InvalidInput { field: String, reason: String },
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("Malformed response: {0}")]
    Format(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Jwt(#[from] JwtError),
    #[error(transparent)]
    Config(#[from] Box<figment::Error>),
    #[error("Failed to initialise logging: {0}")]
    Logging(String),
}

impl Error {
    /// Shorthand for [`Error::InvalidInput`].
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Classify an unsuccessful HTTP response from the backend.
    pub fn from_status(status: StatusCode, body: String) -> Self {
        // The backend usually wraps its message in `{"message": ...}`.
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|json| json.get("message")?.as_str().map(str::to_string))
            .unwrap_or(body);
        let message = if message.trim().is_empty() {
            status
                .canonical_reason()
                .unwrap_or("no message")
                .to_string()
        } else {
            message
        };
        match status {
            StatusCode::BAD_REQUEST => Self::BadRequest(message),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Self::Unauthorized(message),
            StatusCode::NOT_FOUND => Self::NotFound(message),
            _ => Self::Server {
                status: status.as_u16(),
                message,
            },
        }
    }
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}
