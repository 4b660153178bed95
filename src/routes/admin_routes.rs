// src/routes/admin_routes.rs

use axum::{
    extract::{Path, Query, State},
    response::{Html, Redirect},
    routing::{get, post},
    Form, Router,
};
use serde::Deserialize;
use tracing::{info, warn};

use crate::{
    error::PageError,
    filter::{AdminCriteria, UserRoleFilter, select, select_users},
    middleware::session_guard::{AdminSession, GuardRejection, SessionContext, end_if_refused},
    models::{AppState, AppointmentStatus, NewUser, NewUserForm, StatusUpdate},
    session::Notice,
    templates::admin::{AdminPage, appointment_detail_page, dashboard},
    views::{AdminAppointmentRow, AdminTab, AppointmentDetail, UserRow, can_manage_users},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(show_dashboard))
        .route("/appointments/{id}", get(show_appointment))
        .route("/appointments/{id}/status", post(update_status))
        .route("/appointments/{id}/delete", post(delete_appointment))
        .route("/users", post(create_user))
        .route("/users/{id}/delete", post(delete_user))
}

const APPOINTMENTS_TAB: &str = "/admin?tab=appointments";
const USERS_TAB: &str = "/admin?tab=users";

#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub tab: Option<String>,
    pub status: Option<String>,
    pub search: Option<String>,
    pub sort: Option<String>,
    pub role: Option<String>,
}

/// Everything one render of the admin dashboard needs. Only the open tab's list
/// is fetched; `None` means the fetch failed.
struct AdminDashboard {
    tab: AdminTab,
    criteria: AdminCriteria,
    user_filter: UserRoleFilter,
    appointments: Option<Vec<AdminAppointmentRow>>,
    users: Option<Vec<UserRow>>,
}

impl AdminDashboard {
    async fn load(
        state: &AppState,
        ctx: &SessionContext,
        query: &DashboardQuery,
    ) -> Result<Self, GuardRejection> {
        let mut view = Self {
            tab: AdminTab::parse(query.tab.as_deref(), ctx.data.role),
            criteria: AdminCriteria::from_query(
                query.status.as_deref(),
                query.search.as_deref(),
                query.sort.as_deref(),
            ),
            user_filter: query
                .role
                .as_deref()
                .map(UserRoleFilter::parse)
                .unwrap_or_default(),
            appointments: Some(Vec::new()),
            users: Some(Vec::new()),
        };

        match view.tab {
            AdminTab::Appointments => {
                view.appointments = match state.backend.list_appointments(ctx.token()).await {
                    Ok(all) => Some(
                        select(&all, &view.criteria)
                            .iter()
                            .map(AdminAppointmentRow::from_appointment)
                            .collect(),
                    ),
                    Err(e) => {
                        if let Some(rejection) = end_if_refused(state, ctx, &e).await {
                            return Err(rejection);
                        }
                        warn!("loading appointments failed: {e}");
                        None
                    }
                };
            }
            AdminTab::Users => {
                view.users = match state.backend.list_users(ctx.token()).await {
                    Ok(all) => Some(
                        select_users(&all, view.user_filter)
                            .iter()
                            .map(UserRow::from_user)
                            .collect(),
                    ),
                    Err(e) => {
                        if let Some(rejection) = end_if_refused(state, ctx, &e).await {
                            return Err(rejection);
                        }
                        warn!("loading users failed: {e}");
                        None
                    }
                };
            }
        }
        Ok(view)
    }
}

/* ============================================================
   GET /admin
   ============================================================ */

pub async fn show_dashboard(
    State(state): State<AppState>,
    AdminSession(ctx): AdminSession,
    Query(query): Query<DashboardQuery>,
) -> Result<Html<String>, GuardRejection> {
    let view = AdminDashboard::load(&state, &ctx, &query).await?;
    let notice = state.sessions.take_notice(&ctx.session_id).await;

    Ok(Html(dashboard(&AdminPage {
        name: ctx.display_name(),
        role_label: ctx.role_label(),
        tab: view.tab,
        can_manage_users: can_manage_users(ctx.data.role),
        criteria: &view.criteria,
        appointments: view.appointments.as_deref(),
        user_filter: view.user_filter,
        users: view.users.as_deref(),
        notice: notice.as_ref(),
    })))
}

/* ============================================================
   GET /admin/appointments/{id}
   ============================================================ */

pub async fn show_appointment(
    State(state): State<AppState>,
    AdminSession(ctx): AdminSession,
    Path(id): Path<i64>,
) -> Result<Html<String>, PageError> {
    let all = match state.backend.list_appointments(ctx.token()).await {
        Ok(all) => all,
        Err(e) => {
            if let Some(rejection) = end_if_refused(&state, &ctx, &e).await {
                return Err(rejection.into());
            }
            return Err(e.into());
        }
    };
    let apt = all
        .iter()
        .find(|a| a.id == id)
        .ok_or_else(|| PageError::NotFound("NOT_FOUND", format!("Appointment {id} not found")))?;

    let notice = state.sessions.take_notice(&ctx.session_id).await;
    Ok(Html(appointment_detail_page(
        ctx.display_name(),
        ctx.role_label(),
        &AppointmentDetail::from_appointment(apt),
        notice.as_ref(),
    )))
}

/* ============================================================
   POST /admin/appointments/{id}/status
   ============================================================ */

#[derive(Debug, Default, Deserialize)]
pub struct StatusForm {
    #[serde(default)]
    pub status: String,
    pub admin_note: Option<String>,
}

pub async fn update_status(
    State(state): State<AppState>,
    AdminSession(ctx): AdminSession,
    Path(id): Path<i64>,
    Form(form): Form<StatusForm>,
) -> Result<Redirect, PageError> {
    let status = AppointmentStatus::parse(&form.status).ok_or_else(|| {
        PageError::BadRequest("INVALID_STATUS", format!("Unknown status: {}", form.status))
    })?;
    let update = StatusUpdate {
        status,
        admin_note: form
            .admin_note
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty()),
    };

    match state.backend.update_appointment(ctx.token(), id, &update).await {
        Ok(()) => {
            info!(
                admin_id = ctx.data.user_id,
                appointment_id = id,
                status = update.status.as_str(),
                "appointment status updated"
            );
            let done = Notice::success(format!("Appointment {}.", update.status.as_str()));
            notify(&state, &ctx, done).await;
            Ok(Redirect::to(APPOINTMENTS_TAB))
        }
        Err(e) => {
            if let Some(rejection) = end_if_refused(&state, &ctx, &e).await {
                return Err(rejection.into());
            }
            warn!(appointment_id = id, "status update failed: {e}");
            notify(
                &state,
                &ctx,
                Notice::error(e.user_message("Failed to update appointment.")),
            )
            .await;
            Ok(Redirect::to(&format!("/admin/appointments/{id}")))
        }
    }
}

/* ============================================================
   POST /admin/appointments/{id}/delete
   ============================================================ */

pub async fn delete_appointment(
    State(state): State<AppState>,
    AdminSession(ctx): AdminSession,
    Path(id): Path<i64>,
) -> Result<Redirect, GuardRejection> {
    let notice = match state.backend.delete_appointment(ctx.token(), id).await {
        Ok(()) => {
            info!(admin_id = ctx.data.user_id, appointment_id = id, "appointment deleted");
            Notice::success("Record deleted.")
        }
        Err(e) => {
            if let Some(rejection) = end_if_refused(&state, &ctx, &e).await {
                return Err(rejection);
            }
            warn!(appointment_id = id, "delete failed: {e}");
            Notice::error("Failed to delete.")
        }
    };
    notify(&state, &ctx, notice).await;
    Ok(Redirect::to(APPOINTMENTS_TAB))
}

/* ============================================================
   User management (super admin only)
   ============================================================ */

fn user_management_denied(ctx: &SessionContext) -> Option<Notice> {
    if can_manage_users(ctx.data.role) {
        return None;
    }
    warn!(admin_id = ctx.data.user_id, "user management attempted without super admin role");
    Some(Notice::error("Only super admins can manage users."))
}

pub async fn create_user(
    State(state): State<AppState>,
    AdminSession(ctx): AdminSession,
    Form(form): Form<NewUserForm>,
) -> Redirect {
    if let Some(denied) = user_management_denied(&ctx) {
        notify(&state, &ctx, denied).await;
        return Redirect::to(APPOINTMENTS_TAB);
    }

    let notice = match NewUser::from_form(&form) {
        Err(e) => Notice::error(e.to_string()),
        Ok(user) => match state.backend.create_user(ctx.token(), &user).await {
            Ok(()) => {
                info!(
                    admin_id = ctx.data.user_id,
                    email = %user.email,
                    role = user.role.as_str(),
                    "user created"
                );
                Notice::success("User Created")
            }
            Err(e) => {
                warn!("create user failed: {e}");
                Notice::error(e.user_message("Failed"))
            }
        },
    };
    notify(&state, &ctx, notice).await;
    Redirect::to(USERS_TAB)
}

pub async fn delete_user(
    State(state): State<AppState>,
    AdminSession(ctx): AdminSession,
    Path(id): Path<i64>,
) -> Redirect {
    if let Some(denied) = user_management_denied(&ctx) {
        notify(&state, &ctx, denied).await;
        return Redirect::to(APPOINTMENTS_TAB);
    }

    let notice = match state.backend.delete_user(ctx.token(), id).await {
        Ok(()) => {
            info!(admin_id = ctx.data.user_id, user_id = id, "user deleted");
            Notice::success("User deleted.")
        }
        Err(e) => {
            warn!(user_id = id, "delete user failed: {e}");
            Notice::error(e.user_message("Failed to delete user."))
        }
    };
    notify(&state, &ctx, notice).await;
    Redirect::to(USERS_TAB)
}

async fn notify(state: &AppState, ctx: &SessionContext, notice: Notice) {
    state.sessions.set_notice(&ctx.session_id, notice).await;
}
