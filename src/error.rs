use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;
use tracing::{error, warn};

/// Failures a page handler can surface. Rendered as inline HTML, never JSON.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Invalid username or password.")]
    AuthenticationFailed,

    #[error("database error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::AuthenticationFailed => StatusCode::UNAUTHORIZED,
            AppError::Storage(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text safe to show the visitor. Server faults stay generic.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Storage(_) | AppError::Internal(_) => {
                "Something went wrong. Please try again later.".to_string()
            }
            other => other.to_string(),
        }
    }

    /// Form-level failures the page re-renders inline.
    pub fn is_client_error(&self) -> bool {
        self.status().is_client_error()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        } else {
            warn!(error = %self, "request rejected");
        }
        let body = format!(
            "<!DOCTYPE html><html><head><meta charset=\"UTF-8\"><title>Error</title>\
             <link rel=\"stylesheet\" href=\"/static/style.css\"></head>\
             <body><p class=\"error\">{}</p><a href=\"/\">Back to home</a></body></html>",
            tera::escape_html(&self.public_message())
        );
        (status, Html(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
