//! Narrowing and ordering of the appointment and user lists before rendering.
//!
//! Everything here is pure: the dashboards fetch the full list from the backend on
//! every page load and pass it through [`select`] / [`select_for_student`] together
//! with the visitor's current selections.

use crate::models::{Appointment, AppointmentStatus, Role, User};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(AppointmentStatus),
}

impl StatusFilter {
    /// Anything other than a known status means `all`.
    pub fn parse(s: &str) -> Self {
        AppointmentStatus::parse(s).map_or(StatusFilter::All, StatusFilter::Only)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Only(s) => s.as_str(),
        }
    }

    pub fn matches(&self, status: &AppointmentStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(s) => s == status,
        }
    }
}

/// Urgency groups used by the combined category choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrgencyBucket {
    /// `urgent`, `high`
    Urgent,
    /// `normal`, `low`, `medium`
    Normal,
}

impl UrgencyBucket {
    /// Case-insensitive membership test on the raw urgency text.
    pub fn contains(self, urgency: &str) -> bool {
        let u = urgency.trim().to_lowercase();
        match self {
            UrgencyBucket::Urgent => matches!(u.as_str(), "urgent" | "high"),
            UrgencyBucket::Normal => matches!(u.as_str(), "normal" | "low" | "medium"),
        }
    }
}

/// The admin "sort/category" selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Category {
    #[default]
    All,
    ClearanceUrgent,
    ConsultationUrgent,
    ClearanceNormal,
    ConsultationNormal,
}

impl Category {
    pub const CHOICES: [Category; 5] = [
        Category::All,
        Category::ClearanceUrgent,
        Category::ConsultationUrgent,
        Category::ClearanceNormal,
        Category::ConsultationNormal,
    ];

    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "clearance-urgent" => Category::ClearanceUrgent,
            "consultation-urgent" => Category::ConsultationUrgent,
            "clearance-normal" => Category::ClearanceNormal,
            "consultation-normal" => Category::ConsultationNormal,
            _ => Category::All,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::All => "all",
            Category::ClearanceUrgent => "clearance-urgent",
            Category::ConsultationUrgent => "consultation-urgent",
            Category::ClearanceNormal => "clearance-normal",
            Category::ConsultationNormal => "consultation-normal",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::All => "Newest first (all types)",
            Category::ClearanceUrgent => "Clearance - Urgent",
            Category::ConsultationUrgent => "Consultation - Urgent",
            Category::ClearanceNormal => "Clearance - Normal",
            Category::ConsultationNormal => "Consultation - Normal",
        }
    }

    fn terms(self) -> Option<(&'static str, UrgencyBucket)> {
        match self {
            Category::All => None,
            Category::ClearanceUrgent => Some(("clearance", UrgencyBucket::Urgent)),
            Category::ConsultationUrgent => Some(("consultation", UrgencyBucket::Urgent)),
            Category::ClearanceNormal => Some(("clearance", UrgencyBucket::Normal)),
            Category::ConsultationNormal => Some(("consultation", UrgencyBucket::Normal)),
        }
    }

    /// Missing service type or urgency count as empty text here; the render-time
    /// defaults ("General", "Low") do not apply.
    pub fn matches(self, apt: &Appointment) -> bool {
        let Some((service_term, bucket)) = self.terms() else {
            return true;
        };
        let service = apt.service_type.as_deref().unwrap_or("").to_lowercase();
        let urgency = apt.urgency.as_deref().unwrap_or("");
        service.contains(service_term) && bucket.contains(urgency)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminCriteria {
    pub status: StatusFilter,
    pub search: String,
    pub category: Category,
}

impl AdminCriteria {
    pub fn from_query(status: Option<&str>, search: Option<&str>, sort: Option<&str>) -> Self {
        Self {
            status: status.map(StatusFilter::parse).unwrap_or_default(),
            search: search.unwrap_or("").to_string(),
            category: sort.map(Category::parse).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentCriteria {
    pub status: StatusFilter,
}

fn name_matches(name: &str, search: &str) -> bool {
    search.is_empty() || name.to_lowercase().contains(&search.to_lowercase())
}

/// Newest appointment date first. The sort is stable, so same-day records keep the
/// order the backend sent them in.
fn sort_newest_first(list: &mut [Appointment]) {
    list.sort_by(|a, b| b.appointment_date.cmp(&a.appointment_date));
}

/// Admin view: status, student-name search and category, newest first.
pub fn select(all: &[Appointment], criteria: &AdminCriteria) -> Vec<Appointment> {
    let mut out: Vec<Appointment> = all
        .iter()
        .filter(|apt| criteria.status.matches(&apt.status))
        .filter(|apt| name_matches(&apt.student_name, &criteria.search))
        .filter(|apt| criteria.category.matches(apt))
        .cloned()
        .collect();
    sort_newest_first(&mut out);
    out
}

/// Student view: status only, newest first.
pub fn select_for_student(all: &[Appointment], criteria: &StudentCriteria) -> Vec<Appointment> {
    let mut out: Vec<Appointment> = all
        .iter()
        .filter(|apt| criteria.status.matches(&apt.status))
        .cloned()
        .collect();
    sort_newest_first(&mut out);
    out
}

/// User tab role selector. `Admins` covers both admin roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UserRoleFilter {
    #[default]
    All,
    Students,
    Admins,
}

impl UserRoleFilter {
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "student" => UserRoleFilter::Students,
            "admin" => UserRoleFilter::Admins,
            _ => UserRoleFilter::All,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            UserRoleFilter::All => "all",
            UserRoleFilter::Students => "student",
            UserRoleFilter::Admins => "admin",
        }
    }

    fn matches(self, role: Role) -> bool {
        match self {
            UserRoleFilter::All => true,
            UserRoleFilter::Students => role == Role::Student,
            UserRoleFilter::Admins => role.is_admin(),
        }
    }
}

pub fn select_users(all: &[User], filter: UserRoleFilter) -> Vec<User> {
    all.iter()
        .filter(|u| filter.matches(u.role))
        .cloned()
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::models::BookingMode;

    pub(crate) fn apt(id: i64, name: &str, date: &str, status: AppointmentStatus) -> Appointment {
        Appointment {
            id,
            student_name: name.to_string(),
            student_email: Some(format!("{}@school.edu", name.to_lowercase().replace(' ', "."))),
            service_type: Some("Medical Clearance".to_string()),
            urgency: Some("Normal".to_string()),
            appointment_date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            appointment_time: "09:30:00".to_string(),
            reason: Some("Annual check".to_string()),
            status,
            admin_note: None,
            booking_mode: BookingMode::Standard,
        }
    }

    fn sample() -> Vec<Appointment> {
        let mut list = vec![
            apt(1, "Ana Cruz", "2024-01-01", AppointmentStatus::Pending),
            apt(2, "Ben Reyes", "2024-03-01", AppointmentStatus::Approved),
            apt(3, "Carla Anaya", "2024-02-01", AppointmentStatus::Rejected),
            apt(4, "Dan Lim", "2024-02-15", AppointmentStatus::Pending),
        ];
        list[1].service_type = Some("General Consultation".into());
        list[1].urgency = Some("HIGH".into());
        list[2].urgency = Some("urgent".into());
        list[3].service_type = None;
        list[3].urgency = None;
        list
    }

    fn ids(list: &[Appointment]) -> Vec<i64> {
        list.iter().map(|a| a.id).collect()
    }

    #[test]
    fn test_status_filter_exact_match() {
        let criteria = AdminCriteria {
            status: StatusFilter::Only(AppointmentStatus::Pending),
            ..Default::default()
        };
        let out = select(&sample(), &criteria);
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|a| a.status == AppointmentStatus::Pending));

        let all = select(&sample(), &AdminCriteria::default());
        assert_eq!(all.len(), sample().len());
    }

    #[test]
    fn test_search_is_case_insensitive_on_name_only() {
        let criteria = AdminCriteria {
            search: "ANA".into(),
            ..Default::default()
        };
        let out = select(&sample(), &criteria);
        assert_eq!(ids(&out), vec![3, 1]);
        assert!(
            out.iter()
                .all(|a| a.student_name.to_lowercase().contains("ana"))
        );

        // reason and email are not searched
        let by_reason = AdminCriteria {
            search: "annual".into(),
            ..Default::default()
        };
        assert!(select(&sample(), &by_reason).is_empty());
    }

    #[test]
    fn test_search_term_is_matched_as_typed() {
        let list = vec![
            apt(1, "Anacruz", "2024-01-01", AppointmentStatus::Pending),
            apt(2, "Ana Cruz", "2024-01-02", AppointmentStatus::Pending),
        ];
        let criteria = AdminCriteria::from_query(None, Some(" cruz"), None);
        assert_eq!(criteria.search, " cruz");
        let out = select(&list, &criteria);
        assert_eq!(ids(&out), vec![2]);
        assert!(
            out.iter()
                .all(|a| a.student_name.to_lowercase().contains(" cruz"))
        );

        // only the empty term matches everyone
        let blank = AdminCriteria::from_query(None, Some(""), None);
        assert_eq!(select(&list, &blank).len(), 2);
    }

    #[test]
    fn test_sorted_newest_first() {
        let list = vec![
            apt(1, "A", "2024-01-01", AppointmentStatus::Pending),
            apt(2, "B", "2024-03-01", AppointmentStatus::Pending),
            apt(3, "C", "2024-02-01", AppointmentStatus::Pending),
        ];
        let out = select(&list, &AdminCriteria::default());
        let dates: Vec<String> = out
            .iter()
            .map(|a| a.appointment_date.format("%m-%d").to_string())
            .collect();
        assert_eq!(dates, vec!["03-01", "02-01", "01-01"]);

        let student = select_for_student(&list, &StudentCriteria::default());
        assert_eq!(ids(&student), vec![2, 3, 1]);
    }

    #[test]
    fn test_same_day_keeps_backend_order() {
        let list = vec![
            apt(5, "A", "2024-01-01", AppointmentStatus::Pending),
            apt(6, "B", "2024-01-01", AppointmentStatus::Pending),
        ];
        assert_eq!(ids(&select(&list, &AdminCriteria::default())), vec![5, 6]);
    }

    #[test]
    fn test_missing_service_type_fails_category() {
        let criteria = AdminCriteria {
            category: Category::ClearanceUrgent,
            ..Default::default()
        };
        let mut list = sample();
        list[3].urgency = Some("urgent".into());
        let out = select(&list, &criteria);
        assert!(!ids(&out).contains(&4));
        assert_eq!(ids(&out), vec![3]);
    }

    #[test]
    fn test_category_matches_service_substring_and_bucket() {
        let criteria = AdminCriteria::from_query(None, None, Some("consultation-urgent"));
        assert_eq!(ids(&select(&sample(), &criteria)), vec![2]);

        let criteria = AdminCriteria::from_query(None, None, Some("clearance-normal"));
        assert_eq!(ids(&select(&sample(), &criteria)), vec![1]);
    }

    #[test]
    fn test_medium_urgency_is_normal() {
        assert!(UrgencyBucket::Normal.contains("Medium"));
        assert!(UrgencyBucket::Normal.contains("low"));
        assert!(!UrgencyBucket::Urgent.contains("medium"));
        assert!(UrgencyBucket::Urgent.contains("High"));
        assert!(!UrgencyBucket::Normal.contains(""));

        let mut list = sample();
        list[0].urgency = Some("medium".into());
        let criteria = AdminCriteria {
            category: Category::ClearanceNormal,
            ..Default::default()
        };
        assert_eq!(ids(&select(&list, &criteria)), vec![1]);
    }

    #[test]
    fn test_filters_combine() {
        let criteria = AdminCriteria::from_query(Some("pending"), Some("dan"), Some("all"));
        assert_eq!(ids(&select(&sample(), &criteria)), vec![4]);

        let none = AdminCriteria::from_query(Some("completed"), None, None);
        assert!(select(&sample(), &none).is_empty());
    }

    #[test]
    fn test_unknown_selector_values_mean_all() {
        let criteria = AdminCriteria::from_query(Some("bogus"), Some("  "), Some("urgent-first"));
        assert_eq!(criteria, AdminCriteria::default());
    }

    #[test]
    fn test_student_status_filter() {
        let criteria = StudentCriteria {
            status: StatusFilter::parse("rejected"),
        };
        assert_eq!(ids(&select_for_student(&sample(), &criteria)), vec![3]);
    }

    #[test]
    fn test_user_role_filter() {
        let user = |id, role| User {
            id,
            full_name: format!("User {id}"),
            email: format!("u{id}@clinic.com"),
            role,
            created_at: None,
        };
        let users = vec![
            user(1, Role::SuperAdmin),
            user(2, Role::Admin),
            user(3, Role::Student),
        ];
        let admins = select_users(&users, UserRoleFilter::parse("admin"));
        assert_eq!(admins.iter().map(|u| u.id).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(select_users(&users, UserRoleFilter::Students).len(), 1);
        assert_eq!(select_users(&users, UserRoleFilter::parse("")).len(), 3);
    }
}
