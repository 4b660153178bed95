//! Display-ready values derived from backend records.
//!
//! No markup here: these are the labels, flags and action choices the templates
//! print, kept separate so they can be checked without parsing HTML.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::models::{Appointment, AppointmentStatus, Role, User};

pub const DEFAULT_SERVICE: &str = "General";
pub const DEFAULT_URGENCY: &str = "Low";

/// `Jan 5, 2024`
pub fn format_date_short(d: NaiveDate) -> String {
    d.format("%b %-d, %Y").to_string()
}

/// `Fri Jan 05 2024`
pub fn format_date_long(d: NaiveDate) -> String {
    d.format("%a %b %d %Y").to_string()
}

fn parse_time(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .ok()
}

/// `09:30 AM`; unparseable input is shown as-is.
pub fn format_time_12h(raw: &str) -> String {
    parse_time(raw).map_or_else(|| raw.to_string(), |t| t.format("%I:%M %p").to_string())
}

/// `1/5/2024` from the backend's `2024-01-05 10:20:30`.
pub fn format_created(raw: Option<&str>) -> String {
    let Some(raw) = raw.map(str::trim) else {
        return String::new();
    };
    let date = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .map(|dt| dt.date())
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"));
    match date {
        Ok(d) => d.format("%-m/%-d/%Y").to_string(),
        Err(_) => raw.to_string(),
    }
}

fn is_urgent(urgency: &str) -> bool {
    matches!(urgency.to_lowercase().as_str(), "urgent" | "high")
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminAppointmentRow {
    pub id: i64,
    pub date: String,
    pub time: String,
    pub student_name: String,
    pub student_email: String,
    pub service: String,
    pub urgency: String,
    pub urgent: bool,
    pub status_class: &'static str,
    pub status_label: &'static str,
    pub show_delete: bool,
}

impl AdminAppointmentRow {
    pub fn from_appointment(apt: &Appointment) -> Self {
        let urgency = non_empty(apt.urgency.as_deref())
            .unwrap_or(DEFAULT_URGENCY)
            .to_string();
        Self {
            id: apt.id,
            date: format_date_short(apt.appointment_date),
            time: format_time_12h(&apt.appointment_time),
            student_name: apt.student_name.clone(),
            student_email: apt.student_email.clone().unwrap_or_default(),
            service: non_empty(apt.service_type.as_deref())
                .unwrap_or(DEFAULT_SERVICE)
                .to_string(),
            urgent: is_urgent(&urgency),
            urgency,
            status_class: apt.status.as_str(),
            status_label: apt.status.label(),
            // Admins may delete a record in any status.
            show_delete: true,
        }
    }
}

/// The one action a student has on an appointment card. Both go to the same
/// backend delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudentAction {
    Cancel,
    DeleteHistory,
}

impl StudentAction {
    pub fn for_status(status: &AppointmentStatus) -> Self {
        if *status == AppointmentStatus::Pending {
            StudentAction::Cancel
        } else {
            StudentAction::DeleteHistory
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StudentAction::Cancel => "Cancel Request",
            StudentAction::DeleteHistory => "Delete History",
        }
    }

    pub fn confirm_text(self) -> &'static str {
        match self {
            StudentAction::Cancel => "Cancel this appointment?",
            StudentAction::DeleteHistory => "Remove this record from history?",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentAppointmentCard {
    pub id: i64,
    pub date: String,
    pub time: String,
    pub service: String,
    pub urgency: String,
    pub reason: String,
    pub status_class: &'static str,
    pub status_label: &'static str,
    pub booking_mode: &'static str,
    /// Only for rejected appointments that carry a note.
    pub rejection_note: Option<String>,
    pub action: StudentAction,
}

impl StudentAppointmentCard {
    pub fn from_appointment(apt: &Appointment) -> Self {
        let rejection_note = if apt.status == AppointmentStatus::Rejected {
            non_empty(apt.admin_note.as_deref()).map(str::to_string)
        } else {
            None
        };
        Self {
            id: apt.id,
            date: format_date_long(apt.appointment_date),
            time: format_time_12h(&apt.appointment_time),
            service: non_empty(apt.service_type.as_deref())
                .unwrap_or(DEFAULT_SERVICE)
                .to_string(),
            urgency: non_empty(apt.urgency.as_deref())
                .unwrap_or(DEFAULT_URGENCY)
                .to_string(),
            reason: apt.reason.clone().unwrap_or_default(),
            status_class: apt.status.as_str(),
            status_label: apt.status.label(),
            booking_mode: apt.booking_mode.label(),
            rejection_note,
            action: StudentAction::for_status(&apt.status),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppointmentDetail {
    pub id: i64,
    pub student_name: String,
    pub service: String,
    pub urgency: String,
    pub reason: String,
    pub status_class: &'static str,
    pub status_label: &'static str,
    pub current_note: Option<String>,
}

impl AppointmentDetail {
    pub fn from_appointment(apt: &Appointment) -> Self {
        Self {
            id: apt.id,
            student_name: apt.student_name.clone(),
            service: non_empty(apt.service_type.as_deref())
                .unwrap_or(DEFAULT_SERVICE)
                .to_string(),
            urgency: non_empty(apt.urgency.as_deref())
                .unwrap_or(DEFAULT_URGENCY)
                .to_string(),
            reason: apt.reason.clone().unwrap_or_default(),
            status_class: apt.status.as_str(),
            status_label: apt.status.label(),
            current_note: non_empty(apt.admin_note.as_deref()).map(str::to_string),
        }
    }
}

pub fn role_color(role: Role) -> &'static str {
    match role {
        Role::Student => "green",
        Role::Admin => "blue",
        Role::SuperAdmin => "purple",
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRow {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub role_label: &'static str,
    pub role_color: &'static str,
    pub created: String,
}

impl UserRow {
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name.clone(),
            email: user.email.clone(),
            role_label: user.role.label(),
            role_color: role_color(user.role),
            created: format_created(user.created_at.as_deref()),
        }
    }
}

/// Student dashboard tab, carried in `?tab=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StudentTab {
    #[default]
    Book,
    Appointments,
    Chatbot,
}

impl StudentTab {
    pub const ALL: [StudentTab; 3] = [StudentTab::Book, StudentTab::Appointments, StudentTab::Chatbot];

    pub fn parse(s: Option<&str>) -> Self {
        match s.map(str::trim) {
            Some("appointments") => StudentTab::Appointments,
            Some("chatbot") => StudentTab::Chatbot,
            _ => StudentTab::Book,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StudentTab::Book => "book",
            StudentTab::Appointments => "appointments",
            StudentTab::Chatbot => "chatbot",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StudentTab::Book => "Book Appointment",
            StudentTab::Appointments => "My Appointments",
            StudentTab::Chatbot => "AI Assistant",
        }
    }
}

/// Admin dashboard tab, carried in `?tab=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdminTab {
    #[default]
    Appointments,
    Users,
}

impl AdminTab {
    /// The users tab exists only for super admins; anyone else asking for it gets
    /// the appointments tab.
    pub fn parse(s: Option<&str>, role: Role) -> Self {
        match s.map(str::trim) {
            Some("users") if can_manage_users(role) => AdminTab::Users,
            _ => AdminTab::Appointments,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AdminTab::Appointments => "appointments",
            AdminTab::Users => "users",
        }
    }
}

pub fn can_manage_users(role: Role) -> bool {
    role == Role::SuperAdmin
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::tests::apt;
    use crate::models::BookingMode;

    #[test]
    fn test_tabs_from_query() {
        assert_eq!(StudentTab::parse(Some("chatbot")), StudentTab::Chatbot);
        assert_eq!(StudentTab::parse(None), StudentTab::Book);
        assert_eq!(AdminTab::parse(Some("users"), Role::SuperAdmin), AdminTab::Users);
        assert_eq!(AdminTab::parse(Some("users"), Role::Admin), AdminTab::Appointments);
    }

    #[test]
    fn test_date_and_time_formats() {
        let d = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(format_date_short(d), "Jan 5, 2024");
        assert_eq!(format_date_long(d), "Fri Jan 05 2024");
        assert_eq!(format_time_12h("09:30:00"), "09:30 AM");
        assert_eq!(format_time_12h("9:30:00"), "09:30 AM");
        assert_eq!(format_time_12h("14:05"), "02:05 PM");
        assert_eq!(format_time_12h("later"), "later");
        assert_eq!(format_created(Some("2024-01-05 10:20:30")), "1/5/2024");
        assert_eq!(format_created(None), "");
    }

    #[test]
    fn test_admin_row_defaults_and_urgency_flag() {
        let mut a = apt(1, "Ana Cruz", "2024-01-05", AppointmentStatus::Pending);
        a.service_type = None;
        a.urgency = None;
        let row = AdminAppointmentRow::from_appointment(&a);
        assert_eq!(row.service, "General");
        assert_eq!(row.urgency, "Low");
        assert!(!row.urgent);
        assert_eq!(row.status_label, "Pending");

        a.urgency = Some("HIGH".into());
        assert!(AdminAppointmentRow::from_appointment(&a).urgent);
    }

    #[test]
    fn test_admin_delete_shown_for_every_status() {
        for status in AppointmentStatus::ALL {
            let a = apt(1, "Ana", "2024-01-05", status);
            assert!(AdminAppointmentRow::from_appointment(&a).show_delete);
        }
    }

    #[test]
    fn test_student_action_by_status() {
        let pending = apt(1, "Ana", "2024-01-05", AppointmentStatus::Pending);
        let card = StudentAppointmentCard::from_appointment(&pending);
        assert_eq!(card.action, StudentAction::Cancel);
        assert_eq!(card.action.label(), "Cancel Request");

        for status in [
            AppointmentStatus::Approved,
            AppointmentStatus::Rejected,
            AppointmentStatus::Completed,
            AppointmentStatus::Canceled,
        ] {
            let card = StudentAppointmentCard::from_appointment(&apt(2, "Ana", "2024-01-05", status));
            assert_eq!(card.action, StudentAction::DeleteHistory);
        }
    }

    #[test]
    fn test_rejection_note_only_when_rejected() {
        let mut a = apt(1, "Ana", "2024-01-05", AppointmentStatus::Rejected);
        a.admin_note = Some("Doctor unavailable".into());
        assert_eq!(
            StudentAppointmentCard::from_appointment(&a).rejection_note.as_deref(),
            Some("Doctor unavailable")
        );

        a.admin_note = Some("  ".into());
        assert_eq!(StudentAppointmentCard::from_appointment(&a).rejection_note, None);

        a.status = AppointmentStatus::Approved;
        a.admin_note = Some("See you".into());
        assert_eq!(StudentAppointmentCard::from_appointment(&a).rejection_note, None);
    }

    #[test]
    fn test_booking_mode_label() {
        let mut a = apt(1, "Ana", "2024-01-05", AppointmentStatus::Pending);
        a.booking_mode = BookingMode::AiChatbot;
        assert_eq!(StudentAppointmentCard::from_appointment(&a).booking_mode, "AI Chatbot");
    }

    #[test]
    fn test_user_row_labels() {
        let u = User {
            id: 1,
            full_name: "Super Admin".into(),
            email: "superadmin@clinic.com".into(),
            role: Role::SuperAdmin,
            created_at: Some("2024-06-01 08:00:00".into()),
        };
        let row = UserRow::from_user(&u);
        assert_eq!(row.role_label, "Super Admin");
        assert_eq!(row.role_color, "purple");
        assert_eq!(row.created, "6/1/2024");
    }
}
