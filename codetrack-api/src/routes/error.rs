use actix_web::ResponseError;
use actix_web::http::StatusCode;

/// Errors surfaced by the route handlers. The body is the display text;
/// clients only ever see the status code and message.
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    InvalidQuery(String),
    #[error("no users found in the leaderboard")]
    EmptyLeaderboard,
    #[error("no profile registered for user {0}")]
    UnknownUser(String),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            ApiError::EmptyLeaderboard | ApiError::UnknownUser(_) => StatusCode::NOT_FOUND,
            ApiError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
