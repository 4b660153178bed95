use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::backend::ClinicBackend;
use crate::error::ValidationError;
use crate::session::SessionStore;

#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn ClinicBackend>,
    pub sessions: SessionStore,
    pub secure_cookies: bool,
}

/* -------------------------
   Domain types
--------------------------*/

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Student,
    Admin,
    SuperAdmin,
}

impl Role {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "student" => Some(Role::Student),
            "admin" => Some(Role::Admin),
            "super_admin" => Some(Role::SuperAdmin),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Admin => "admin",
            Role::SuperAdmin => "super_admin",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Role::Student => "Student",
            Role::Admin => "Admin",
            Role::SuperAdmin => "Super Admin",
        }
    }

    pub fn is_admin(self) -> bool {
        matches!(self, Role::Admin | Role::SuperAdmin)
    }

    /// Dashboard a freshly logged-in visitor lands on.
    pub fn home_path(self) -> &'static str {
        match self {
            Role::Student => "/student",
            Role::Admin | Role::SuperAdmin => "/admin",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Approved,
    Rejected,
    Completed,
    #[serde(alias = "cancelled")]
    Canceled,
    #[serde(other)]
    Unknown,
}

impl AppointmentStatus {
    pub const ALL: [AppointmentStatus; 5] = [
        AppointmentStatus::Pending,
        AppointmentStatus::Approved,
        AppointmentStatus::Rejected,
        AppointmentStatus::Completed,
        AppointmentStatus::Canceled,
    ];

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "pending" => Some(AppointmentStatus::Pending),
            "approved" => Some(AppointmentStatus::Approved),
            "rejected" => Some(AppointmentStatus::Rejected),
            "completed" => Some(AppointmentStatus::Completed),
            "canceled" | "cancelled" => Some(AppointmentStatus::Canceled),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Approved => "approved",
            AppointmentStatus::Rejected => "rejected",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Canceled => "canceled",
            AppointmentStatus::Unknown => "unknown",
        }
    }

    /// Title-cased form used on every status pill.
    pub fn label(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "Pending",
            AppointmentStatus::Approved => "Approved",
            AppointmentStatus::Rejected => "Rejected",
            AppointmentStatus::Completed => "Completed",
            AppointmentStatus::Canceled => "Canceled",
            AppointmentStatus::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingMode {
    #[default]
    Standard,
    AiChatbot,
}

impl BookingMode {
    pub fn label(self) -> &'static str {
        match self {
            BookingMode::Standard => "Standard",
            BookingMode::AiChatbot => "AI Chatbot",
        }
    }
}

/// One row of `GET /appointments`. The backend joins `student_email` only for
/// admin listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    #[serde(default)]
    pub student_name: String,
    #[serde(default)]
    pub student_email: Option<String>,
    #[serde(default)]
    pub service_type: Option<String>,
    #[serde(default)]
    pub urgency: Option<String>,
    pub appointment_date: NaiveDate,
    pub appointment_time: String,
    #[serde(default)]
    pub reason: Option<String>,
    pub status: AppointmentStatus,
    #[serde(default)]
    pub admin_note: Option<String>,
    #[serde(default)]
    pub booking_mode: BookingMode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub created_at: Option<String>,
}

/* -------------------------
   Backend DTOs
--------------------------*/

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub role: Role,
    pub user_id: i64,
    #[serde(default)]
    pub full_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAppointment {
    pub appointment_date: String,
    pub appointment_time: String,
    pub service_type: String,
    pub urgency: String,
    pub reason: String,
    pub booking_mode: BookingMode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: AppointmentStatus,
    pub admin_note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewUser {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// One prior exchange forwarded to the assistant, in the shape it expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryTurn {
    pub role: String,
    pub parts: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub history: Vec<HistoryTurn>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

/* -------------------------
   Form DTOs
--------------------------*/

#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct BookingForm {
    #[serde(default)]
    pub service_type: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub urgency: String,
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct NewUserForm {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub role: String,
}

/* -------------------------
   Validation
--------------------------*/

fn required(value: &str, field: &'static str) -> Result<String, ValidationError> {
    let v = value.trim();
    if v.is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(v.to_string())
}

/// `HH:MM` becomes `HH:MM:SS`; anything chrono cannot read is sent as typed.
pub fn normalize_time(raw: &str) -> String {
    let raw = raw.trim();
    if let Ok(t) = NaiveTime::parse_from_str(raw, "%H:%M:%S") {
        return t.format("%H:%M:%S").to_string();
    }
    if let Ok(t) = NaiveTime::parse_from_str(raw, "%H:%M") {
        return t.format("%H:%M:%S").to_string();
    }
    raw.to_string()
}

impl NewAppointment {
    pub fn from_form(form: &BookingForm) -> Result<Self, ValidationError> {
        let service_type = required(&form.service_type, "service_type")?;
        let appointment_date = required(&form.date, "date")?;
        let time = required(&form.time, "time")?;
        let urgency = required(&form.urgency, "urgency")?;
        let reason = required(&form.reason, "reason")?;

        Ok(Self {
            appointment_date,
            appointment_time: normalize_time(&time),
            service_type,
            urgency,
            reason,
            booking_mode: BookingMode::Standard,
        })
    }
}

impl NewUser {
    pub fn from_form(form: &NewUserForm) -> Result<Self, ValidationError> {
        let full_name = required(&form.full_name, "full_name")?;
        let email = required(&form.email, "email")?;
        if form.password.is_empty() {
            return Err(ValidationError::MissingField("password"));
        }
        let role_raw = required(&form.role, "role")?;
        let role = Role::parse(&role_raw).ok_or(ValidationError::UnknownRole(role_raw))?;

        Ok(Self {
            full_name,
            email,
            password: form.password.clone(),
            role,
        })
    }
}

impl RegisterRequest {
    pub fn from_form(form: &RegisterForm) -> Result<Self, ValidationError> {
        if form.password != form.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }
        let full_name = required(&form.full_name, "full_name")?;
        let email = required(&form.email, "email")?;
        if form.password.is_empty() {
            return Err(ValidationError::MissingField("password"));
        }

        Ok(Self {
            full_name,
            email,
            password: form.password.clone(),
        })
    }
}
