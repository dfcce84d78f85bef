//! HTTP error responses.

use axum::extract::rejection::FormRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use tracing::{error, warn};

use crate::error::Error;
use crate::render::ErrorPage;

use super::AppState;

/// Error returned by route handlers.
#[derive(Debug)]
pub enum HttpError {
    /// Authoring route outside development mode.
    Forbidden(String),
    /// No such post or route.
    NotFound(String),
    /// Malformed form submission.
    BadRequest(String),
    /// Anything else. The message is logged, not shown.
    Internal(String),
}

impl HttpError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            Self::Forbidden(msg) | Self::NotFound(msg) | Self::BadRequest(msg) => msg,
            Self::Internal(msg) => {
                error!("internal error: {msg}");
                "Something went wrong".to_string()
            }
        };

        let page = ErrorPage {
            status: status.as_u16(),
            title: status.canonical_reason().unwrap_or("Error").to_string(),
            message: message.clone(),
        };

        // Plain text until `render_error_page` swaps in the HTML page
        let mut response = (status, message).into_response();
        response.extensions_mut().insert(page);
        response
    }
}

impl From<Error> for HttpError {
    fn from(err: Error) -> Self {
        match err {
            Error::PostNotFound { .. } => Self::NotFound("Post not found".to_string()),
            Error::ReadOnly { .. } => Self::Forbidden(err.to_string()),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<FormRejection> for HttpError {
    fn from(rejection: FormRejection) -> Self {
        warn!("Rejected form submission: {rejection}");
        Self::BadRequest(rejection.body_text())
    }
}

/// Response middleware: render error responses as HTML pages.
pub async fn render_error_page(State(state): State<AppState>, response: Response) -> Response {
    let Some(page) = response.extensions().get::<ErrorPage>().cloned() else {
        return response;
    };

    match state.views.error(&page) {
        Ok(html) => (response.status(), Html(html)).into_response(),
        Err(e) => {
            error!("failed to render error page: {e}");
            response
        }
    }
}
