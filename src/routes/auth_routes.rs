// src/routes/auth_routes.rs

use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::{info, warn};

use crate::{
    middleware::session_guard::{ENTRY_PATH, SESSION_COOKIE, current_session},
    models::{AppState, LoginForm, LoginRequest, RegisterForm, RegisterRequest},
    session::{Notice, SessionData},
    templates::auth::{login_page, register_page},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(show_login))
        .route("/login", post(login))
        .route("/register", get(show_register).post(register))
        .route("/logout", post(logout))
        .route("/health", get(health))
}

fn session_cookie(session_id: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, session_id))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .build()
}

/* ============================================================
   GET / (entry page)
   ============================================================ */

pub async fn show_login(State(state): State<AppState>, jar: CookieJar) -> Response {
    if let Some(ctx) = current_session(&jar, &state.sessions).await {
        return Redirect::to(ctx.data.role.home_path()).into_response();
    }
    Html(login_page(None)).into_response()
}

/* ============================================================
   POST /login
   ============================================================ */

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Response {
    let req = LoginRequest {
        email: form.email.trim().to_string(),
        password: form.password,
    };

    let resp = match state.backend.login(&req).await {
        Ok(resp) => resp,
        Err(e) if e.is_transport() => {
            return Html(login_page(Some("Cannot connect to the server."))).into_response();
        }
        Err(e) => {
            warn!(email = %req.email, "login rejected: {e}");
            return Html(login_page(Some(&e.user_message("Invalid email or password."))))
                .into_response();
        }
    };

    let role = resp.role;
    info!(user_id = resp.user_id, role = role.as_str(), "signed in");

    let full_name = resp
        .full_name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| "User".to_string());

    // A second login from the same browser replaces the earlier session.
    if let Some(old) = jar.get(SESSION_COOKIE) {
        state.sessions.destroy(old.value()).await;
    }
    let session_id = state
        .sessions
        .create(SessionData::new(resp.token, role, resp.user_id, full_name))
        .await;

    (
        jar.add(session_cookie(session_id, state.secure_cookies)),
        Redirect::to(role.home_path()),
    )
        .into_response()
}

/* ============================================================
   GET|POST /register
   ============================================================ */

pub async fn show_register(State(state): State<AppState>, jar: CookieJar) -> Response {
    if let Some(ctx) = current_session(&jar, &state.sessions).await {
        return Redirect::to(ctx.data.role.home_path()).into_response();
    }
    Html(register_page(None, false)).into_response()
}

pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Html<String> {
    let req = match RegisterRequest::from_form(&form) {
        Ok(req) => req,
        Err(e) => return Html(register_page(Some(&Notice::error(e.to_string())), false)),
    };

    match state.backend.register(&req).await {
        Ok(()) => {
            info!(email = %req.email, "registered student account");
            Html(register_page(
                Some(&Notice::success(
                    "Registration successful! Redirecting to login...",
                )),
                true,
            ))
        }
        Err(e) if e.is_transport() => Html(register_page(
            Some(&Notice::error("Connection error. Please try again.")),
            false,
        )),
        Err(e) => Html(register_page(
            Some(&Notice::error(e.user_message("Registration failed"))),
            false,
        )),
    }
}

/* ============================================================
   POST /logout
   ============================================================ */

pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> Response {
    let Some(cookie) = jar.get(SESSION_COOKIE) else {
        return Redirect::to(ENTRY_PATH).into_response();
    };
    state.sessions.destroy(cookie.value()).await;
    info!("signed out");
    (
        jar.remove(Cookie::build(SESSION_COOKIE).path("/")),
        Redirect::to(ENTRY_PATH),
    )
        .into_response()
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
