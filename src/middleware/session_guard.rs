use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar};

use crate::error::ClientError;
use crate::models::{AppState, Role};
use crate::session::{SessionData, SessionStore};

pub const SESSION_COOKIE: &str = "clinic_session";

/// Entry page unauthenticated visitors are sent to.
pub const ENTRY_PATH: &str = "/";

/// Which dashboard is being requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Student,
    Admin,
}

impl Page {
    pub fn allows(self, role: Role) -> bool {
        match self {
            Page::Student => role == Role::Student,
            Page::Admin => role.is_admin(),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum GuardRejection {
    NoSession,
    WrongRole(Role),
    /// The backend refused the session's token; the session has been destroyed.
    TokenRefused,
}

impl IntoResponse for GuardRejection {
    fn into_response(self) -> Response {
        match &self {
            GuardRejection::NoSession => tracing::debug!("no session, redirecting to entry page"),
            GuardRejection::WrongRole(role) => {
                tracing::warn!(role = role.as_str(), "wrong role for page, redirecting")
            }
            GuardRejection::TokenRefused => {
                tracing::warn!("backend refused session token, signing out");
                let jar = CookieJar::new().remove(Cookie::build(SESSION_COOKIE).path("/"));
                return (jar, Redirect::to(ENTRY_PATH)).into_response();
            }
        }
        Redirect::to(ENTRY_PATH).into_response()
    }
}

/// The signed-in visitor as seen by a dashboard handler.
#[derive(Debug, Clone)]
pub struct SessionContext {
    /// Session cookie value; key into the [`SessionStore`].
    pub session_id: String,
    pub data: SessionData,
}

impl SessionContext {
    /// Name written into the page header.
    pub fn display_name(&self) -> &str {
        if !self.data.full_name.trim().is_empty() {
            return &self.data.full_name;
        }
        if self.data.role.is_admin() { "Admin" } else { "Student" }
    }

    pub fn role_label(&self) -> &'static str {
        self.data.role.label()
    }

    pub fn token(&self) -> &str {
        &self.data.token
    }
}

/// Decide whether `session` may open `page`.
pub fn authorize(
    session: Option<SessionContext>,
    page: Page,
) -> Result<SessionContext, GuardRejection> {
    let ctx = session.ok_or(GuardRejection::NoSession)?;
    if !page.allows(ctx.data.role) {
        return Err(GuardRejection::WrongRole(ctx.data.role));
    }
    Ok(ctx)
}

/// Look up the session named by the request's cookie, if any.
pub async fn current_session(jar: &CookieJar, sessions: &SessionStore) -> Option<SessionContext> {
    let session_id = jar.get(SESSION_COOKIE)?.value().to_string();
    let data = sessions.get(&session_id).await?;
    Some(SessionContext { session_id, data })
}

/// Destroy the session when `err` says the backend no longer accepts its token.
/// Returns the rejection the handler should answer with.
pub async fn end_if_refused(
    state: &AppState,
    ctx: &SessionContext,
    err: &ClientError,
) -> Option<GuardRejection> {
    if !err.is_auth_failure() {
        return None;
    }
    state.sessions.destroy(&ctx.session_id).await;
    Some(GuardRejection::TokenRefused)
}

async fn guard(parts: &Parts, state: &AppState, page: Page) -> Result<SessionContext, GuardRejection> {
    let jar = CookieJar::from_headers(&parts.headers);
    authorize(current_session(&jar, &state.sessions).await, page)
}

/// A visitor allowed on the student dashboard.
#[derive(Debug, Clone)]
pub struct StudentSession(pub SessionContext);

/// A visitor allowed on the admin dashboard (admin or super admin).
#[derive(Debug, Clone)]
pub struct AdminSession(pub SessionContext);

impl FromRequestParts<AppState> for StudentSession {
    type Rejection = GuardRejection;

    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        async move { guard(parts, state, Page::Student).await.map(StudentSession) }
    }
}

impl FromRequestParts<AppState> for AdminSession {
    type Rejection = GuardRejection;

    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        async move { guard(parts, state, Page::Admin).await.map(AdminSession) }
    }
}
