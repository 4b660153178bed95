use crate::models::AppState;
use axum::Router;

pub mod admin_routes;
pub mod auth_routes;
pub mod student_routes;

pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(auth_routes::router())
        .nest("/student", student_routes::router())
        .nest("/admin", admin_routes::router())
        .with_state(state)
}
