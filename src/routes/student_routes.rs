// src/routes/student_routes.rs

use axum::{
    extract::{Path, Query, State},
    response::{Html, Redirect},
    routing::{get, post},
    Form, Router,
};
use chrono::Local;
use serde::Deserialize;
use tracing::{info, warn};

use crate::{
    chat::ChatMessage,
    filter::{StatusFilter, StudentCriteria, select_for_student},
    middleware::session_guard::{GuardRejection, SessionContext, StudentSession, end_if_refused},
    models::{AppState, BookingForm, NewAppointment},
    session::Notice,
    templates::student::{StudentPage, dashboard},
    views::{StudentAppointmentCard, StudentTab},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(show_dashboard))
        .route("/appointments", post(book_appointment))
        .route("/appointments/{id}/delete", post(delete_appointment))
        .route("/chat", post(send_chat))
}

fn tab_path(tab: StudentTab) -> String {
    format!("/student?tab={}", tab.as_str())
}

#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub tab: Option<String>,
    pub status: Option<String>,
}

/// Everything one render of the student dashboard needs.
struct StudentDashboard {
    tab: StudentTab,
    criteria: StudentCriteria,
    /// `None` when the list could not be loaded.
    appointments: Option<Vec<StudentAppointmentCard>>,
    chat: Vec<ChatMessage>,
}

impl StudentDashboard {
    async fn load(
        state: &AppState,
        ctx: &SessionContext,
        query: &DashboardQuery,
    ) -> Result<Self, GuardRejection> {
        let tab = StudentTab::parse(query.tab.as_deref());
        let criteria = StudentCriteria {
            status: query
                .status
                .as_deref()
                .map(StatusFilter::parse)
                .unwrap_or_default(),
        };

        let mut view = Self {
            tab,
            criteria,
            appointments: Some(Vec::new()),
            chat: Vec::new(),
        };

        match tab {
            StudentTab::Book => {}
            StudentTab::Appointments => {
                view.appointments = match state.backend.list_appointments(ctx.token()).await {
                    Ok(all) => Some(
                        select_for_student(&all, &view.criteria)
                            .iter()
                            .map(StudentAppointmentCard::from_appointment)
                            .collect(),
                    ),
                    Err(e) => {
                        if let Some(rejection) = end_if_refused(state, ctx, &e).await {
                            return Err(rejection);
                        }
                        warn!(user_id = ctx.data.user_id, "loading appointments failed: {e}");
                        None
                    }
                };
            }
            StudentTab::Chatbot => {
                let chat = &mut view.chat;
                state
                    .sessions
                    .update(&ctx.session_id, |data| {
                        data.chat.ensure_greeting();
                        *chat = data.chat.transcript().to_vec();
                    })
                    .await;
            }
        }
        Ok(view)
    }
}

/* ============================================================
   GET /student
   ============================================================ */

pub async fn show_dashboard(
    State(state): State<AppState>,
    StudentSession(ctx): StudentSession,
    Query(query): Query<DashboardQuery>,
) -> Result<Html<String>, GuardRejection> {
    let view = StudentDashboard::load(&state, &ctx, &query).await?;
    let notice = state.sessions.take_notice(&ctx.session_id).await;

    Ok(Html(dashboard(&StudentPage {
        name: ctx.display_name(),
        role_label: ctx.role_label(),
        tab: view.tab,
        status: &view.criteria.status,
        appointments: view.appointments.as_deref(),
        chat: &view.chat,
        notice: notice.as_ref(),
        min_date: Local::now().date_naive(),
    })))
}

/* ============================================================
   POST /student/appointments
   ============================================================ */

pub async fn book_appointment(
    State(state): State<AppState>,
    StudentSession(ctx): StudentSession,
    Form(form): Form<BookingForm>,
) -> Result<Redirect, GuardRejection> {
    let (notice, tab) = match NewAppointment::from_form(&form) {
        Err(e) => (Notice::error(e.to_string()), StudentTab::Book),
        Ok(appointment) => {
            match state
                .backend
                .create_appointment(ctx.token(), &appointment)
                .await
            {
                Ok(()) => {
                    info!(
                        user_id = ctx.data.user_id,
                        date = %appointment.appointment_date,
                        "appointment booked"
                    );
                    (
                        Notice::success("Appointment booked successfully!"),
                        StudentTab::Appointments,
                    )
                }
                Err(e) if e.is_transport() => {
                    (Notice::error("Connection error."), StudentTab::Book)
                }
                Err(e) => {
                    if let Some(rejection) = end_if_refused(&state, &ctx, &e).await {
                        return Err(rejection);
                    }
                    (
                        Notice::error(e.user_message("Booking failed")),
                        StudentTab::Book,
                    )
                }
            }
        }
    };

    state.sessions.set_notice(&ctx.session_id, notice).await;
    Ok(Redirect::to(&tab_path(tab)))
}

/* ============================================================
   POST /student/appointments/{id}/delete
   ============================================================ */

/// Cancels a pending request or removes a finished one; the backend decides which.
pub async fn delete_appointment(
    State(state): State<AppState>,
    StudentSession(ctx): StudentSession,
    Path(id): Path<i64>,
) -> Result<Redirect, GuardRejection> {
    let notice = match state.backend.delete_appointment(ctx.token(), id).await {
        Ok(()) => {
            info!(user_id = ctx.data.user_id, appointment_id = id, "appointment removed");
            Notice::success("Success")
        }
        Err(e) => {
            if let Some(rejection) = end_if_refused(&state, &ctx, &e).await {
                return Err(rejection);
            }
            warn!(appointment_id = id, "delete failed: {e}");
            Notice::error("Failed to update.")
        }
    };
    state.sessions.set_notice(&ctx.session_id, notice).await;
    Ok(Redirect::to(&tab_path(StudentTab::Appointments)))
}

/* ============================================================
   POST /student/chat
   ============================================================ */

#[derive(Debug, Default, Deserialize)]
pub struct ChatForm {
    #[serde(default)]
    pub message: String,
}

pub async fn send_chat(
    State(state): State<AppState>,
    StudentSession(ctx): StudentSession,
    Form(form): Form<ChatForm>,
) -> Redirect {
    let mut chat = ctx.data.chat.clone();
    chat.ensure_greeting();
    if chat
        .send(state.backend.as_ref(), ctx.token(), &form.message)
        .await
    {
        state
            .sessions
            .update(&ctx.session_id, |data| data.chat = chat)
            .await;
    }
    Redirect::to(&tab_path(StudentTab::Chatbot))
}
