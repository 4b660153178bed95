use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::middleware::session_guard::GuardRejection;
use crate::templates;

/// Failure of a call to the clinic backend.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The backend answered with a non-2xx status.
    #[error("backend rejected request ({status}): {}", detail.as_deref().unwrap_or("no detail"))]
    Rejected {
        status: u16,
        detail: Option<String>,
    },
    #[error("cannot reach backend: {0}")]
    Transport(String),
    #[error("unexpected backend response: {0}")]
    Decode(String),
}

impl ClientError {
    /// Text shown to the visitor: the server-provided detail when there is one,
    /// `fallback` otherwise.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ClientError::Rejected {
                detail: Some(detail),
                ..
            } => detail.clone(),
            _ => fallback.to_string(),
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Transport(_))
    }

    /// The backend no longer accepts the session's bearer token.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, ClientError::Rejected { status: 401 | 403, .. })
    }
}

/// A form submission that is missing something; no request is sent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please fill in all fields.")]
    MissingField(&'static str),
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("Unknown role: {0}")]
    UnknownRole(String),
}

/// Errors that end a page request before anything can be rendered.
#[derive(Debug)]
pub enum PageError {
    BadRequest(&'static str, String),
    NotFound(&'static str, String),
    Backend(ClientError),
    /// The session ended mid-request; answered with the guard's redirect.
    SignedOut(GuardRejection),
}

impl PageError {
    fn parts(&self) -> (StatusCode, &str, String) {
        match self {
            PageError::BadRequest(code, msg) => (StatusCode::BAD_REQUEST, code, msg.clone()),
            PageError::NotFound(code, msg) => (StatusCode::NOT_FOUND, code, msg.clone()),
            PageError::Backend(e) => (
                StatusCode::BAD_GATEWAY,
                "BACKEND_ERROR",
                e.user_message("Error loading data."),
            ),
            PageError::SignedOut(_) => (StatusCode::SEE_OTHER, "SIGNED_OUT", String::new()),
        }
    }
}

impl From<ClientError> for PageError {
    fn from(e: ClientError) -> Self {
        PageError::Backend(e)
    }
}

impl From<GuardRejection> for PageError {
    fn from(r: GuardRejection) -> Self {
        PageError::SignedOut(r)
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        if let PageError::SignedOut(rejection) = self {
            return rejection.into_response();
        }
        let (status, code, message) = self.parts();
        if status.is_server_error() {
            tracing::error!(code, %message, "page request failed");
        } else {
            tracing::warn!(code, %message, "page request rejected");
        }
        (status, Html(templates::error_page(status.as_u16(), &message))).into_response()
    }
}
