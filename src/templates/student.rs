use chrono::NaiveDate;

use super::{header, html_escape, layout, notice_html, options};
use crate::chat::ChatMessage;
use crate::filter::StatusFilter;
use crate::session::Notice;
use crate::views::{StudentAction, StudentAppointmentCard, StudentTab};

const SERVICE_TYPES: [&str; 4] = [
    "Medical Clearance",
    "Consultation",
    "Dental Check-up",
    "Physical Examination",
];
const URGENCIES: [&str; 4] = ["Low", "Normal", "High", "Urgent"];

pub struct StudentPage<'a> {
    pub name: &'a str,
    pub role_label: &'a str,
    pub tab: StudentTab,
    pub status: &'a StatusFilter,
    /// `None` when the list could not be loaded.
    pub appointments: Option<&'a [StudentAppointmentCard]>,
    pub chat: &'a [ChatMessage],
    pub notice: Option<&'a Notice>,
    /// Earliest bookable date.
    pub min_date: NaiveDate,
}

fn card(c: &StudentAppointmentCard) -> String {
    let note_html = c.rejection_note.as_deref().map_or(String::new(), |note| {
        format!(
            r#"<div class="admin-note-box">
                    <strong>Reason for Rejection:</strong><br>
                    {}
                </div>"#,
            html_escape(note)
        )
    });
    let button_class = match c.action {
        StudentAction::Cancel => "btn-cancel",
        StudentAction::DeleteHistory => "btn-cancel history",
    };

    format!(
        r#"<div class="appointment-card status-{status_class}">
            <div class="apt-header">
                <span class="apt-date">{date}</span>
                <span class="status-pill {status_class}">{status_label}</span>
            </div>
            <div class="apt-body">
                <p><strong>Time:</strong> {time}</p>
                <p><strong>Service:</strong> {service}</p>
                <p><strong>Urgency:</strong> {urgency}</p>
                <p><strong>Reason:</strong> {reason}</p>
                <p><strong>Booked via:</strong> {mode}</p>
                {note_html}
            </div>
            <div class="apt-actions">
                <form method="POST" action="/student/appointments/{id}/delete"
                      onsubmit="return confirm('{confirm}');">
                    <button type="submit" class="{button_class}">{label}</button>
                </form>
            </div>
        </div>"#,
        status_class = c.status_class,
        date = html_escape(&c.date),
        status_label = c.status_label,
        time = html_escape(&c.time),
        service = html_escape(&c.service),
        urgency = html_escape(&c.urgency),
        reason = html_escape(&c.reason),
        mode = c.booking_mode,
        id = c.id,
        confirm = c.action.confirm_text(),
        label = c.action.label(),
    )
}

/// The student's appointment list; an empty list renders one placeholder message.
pub fn appointment_cards(cards: &[StudentAppointmentCard]) -> String {
    if cards.is_empty() {
        return r#"<p class="empty">No appointments found.</p>"#.to_string();
    }
    cards.iter().map(card).collect()
}

fn tabs(active: StudentTab) -> String {
    StudentTab::ALL
        .iter()
        .map(|t| {
            let class = if *t == active { "tab-btn active" } else { "tab-btn" };
            format!(
                r#"<a class="{class}" href="/student?tab={}">{}</a>"#,
                t.as_str(),
                t.label()
            )
        })
        .collect()
}

fn booking_tab(min_date: NaiveDate) -> String {
    let services: Vec<(&str, &str)> = SERVICE_TYPES.iter().map(|s| (*s, *s)).collect();
    let urgencies: Vec<(&str, &str)> = URGENCIES.iter().map(|u| (*u, *u)).collect();
    format!(
        r#"<h2>Book an Appointment</h2>
        <form id="booking-form" method="POST" action="/student/appointments">
            <div class="form-group">
                <label for="book-type">Service:</label>
                <select id="book-type" name="service_type" required>
                    <option value="">-- Select service --</option>
                    {services}
                </select>
            </div>
            <div class="form-group">
                <label for="book-date">Date:</label>
                <input type="date" id="book-date" name="date" min="{min_date}" required>
            </div>
            <div class="form-group">
                <label for="book-time">Time:</label>
                <input type="time" id="book-time" name="time" required>
            </div>
            <div class="form-group">
                <label for="book-urgency">Urgency:</label>
                <select id="book-urgency" name="urgency" required>
                    {urgencies}
                </select>
            </div>
            <div class="form-group">
                <label for="book-reason">Reason:</label>
                <textarea id="book-reason" name="reason" rows="3" required></textarea>
            </div>
            <button type="submit">Book Appointment</button>
        </form>"#,
        services = options(&services, ""),
        min_date = min_date.format("%Y-%m-%d"),
        urgencies = options(&urgencies, "Normal"),
    )
}

fn appointments_tab(status: &StatusFilter, cards: Option<&[StudentAppointmentCard]>) -> String {
    let mut choices = vec![("all", "All")];
    choices.extend(
        crate::models::AppointmentStatus::ALL
            .iter()
            .map(|s| (s.as_str(), s.label())),
    );
    let list = match cards {
        Some(cards) => appointment_cards(cards),
        None => r#"<p class="empty">Error loading appointments.</p>"#.to_string(),
    };
    format!(
        r#"<h2>My Appointments</h2>
        <form class="filters" method="GET" action="/student">
            <input type="hidden" name="tab" value="appointments">
            <select id="status-filter" name="status">{}</select>
            <button type="submit">Filter</button>
        </form>
        <div id="appointments-list">{list}</div>"#,
        options(&choices, status.as_str()),
    )
}

fn chat_tab(messages: &[ChatMessage]) -> String {
    let transcript: String = messages
        .iter()
        .map(|m| {
            format!(
                r#"<div class="chat-message {}">{}</div>"#,
                m.sender.as_str(),
                html_escape(&m.text)
            )
        })
        .collect();
    format!(
        r#"<h2>AI Booking Assistant</h2>
        <div id="chat-messages" class="chat-box">{transcript}</div>
        <form method="POST" action="/student/chat" class="filters">
            <input type="text" id="chat-input" name="message" placeholder="Type a message..."
                   autocomplete="off" autofocus style="flex: 1;">
            <button type="submit">Send</button>
        </form>"#
    )
}

pub fn dashboard(page: &StudentPage) -> String {
    let content = match page.tab {
        StudentTab::Book => booking_tab(page.min_date),
        StudentTab::Appointments => appointments_tab(page.status, page.appointments),
        StudentTab::Chatbot => chat_tab(page.chat),
    };
    layout(
        "Student Dashboard",
        "",
        &format!(
            r#"        {header}
        {notice}
        <nav class="tabs">{tabs}</nav>
        <section id="{tab_id}-tab" class="tab-content active">
        {content}
        </section>"#,
            header = header("Student Dashboard", page.name, page.role_label),
            notice = notice_html(page.notice),
            tabs = tabs(page.tab),
            tab_id = page.tab.as_str(),
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::Sender;
    use crate::filter::tests::apt;
    use crate::models::AppointmentStatus;

    fn page<'a>(
        tab: StudentTab,
        status: &'a StatusFilter,
        cards: Option<&'a [StudentAppointmentCard]>,
        chat: &'a [ChatMessage],
    ) -> StudentPage<'a> {
        StudentPage {
            name: "Ana Cruz",
            role_label: "Student",
            tab,
            status,
            appointments: cards,
            chat,
            notice: None,
            min_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        }
    }

    #[test]
    fn test_empty_list_renders_single_placeholder() {
        let html = appointment_cards(&[]);
        assert_eq!(html.matches("No appointments found.").count(), 1);
        assert!(!html.contains("appointment-card"));
    }

    #[test]
    fn test_card_action_and_note() {
        let mut rejected = apt(3, "Ana", "2024-02-01", AppointmentStatus::Rejected);
        rejected.admin_note = Some("Doctor <out>".into());
        let pending = apt(4, "Ana", "2024-02-02", AppointmentStatus::Pending);
        let cards: Vec<_> = [pending, rejected]
            .iter()
            .map(StudentAppointmentCard::from_appointment)
            .collect();

        let html = appointment_cards(&cards);
        assert_eq!(html.matches("appointment-card").count(), 2);
        assert!(html.contains("Cancel Request"));
        assert!(html.contains("Delete History"));
        assert!(html.contains("/student/appointments/4/delete"));
        assert!(html.contains("Reason for Rejection"));
        assert!(html.contains("Doctor &lt;out&gt;"));
        assert!(html.contains(r#"<span class="status-pill rejected">Rejected</span>"#));
    }

    #[test]
    fn test_load_failure_message() {
        let status = StatusFilter::All;
        let html = dashboard(&page(StudentTab::Appointments, &status, None, &[]));
        assert!(html.contains("Error loading appointments."));
    }

    #[test]
    fn test_booking_tab_min_date() {
        let status = StatusFilter::All;
        let html = dashboard(&page(StudentTab::Book, &status, None, &[]));
        assert!(html.contains(r#"min="2024-05-01""#));
        assert!(html.contains(r#"<span id="user-name">Ana Cruz</span>"#));
    }

    #[test]
    fn test_chat_transcript_in_order() {
        let status = StatusFilter::All;
        let chat = vec![
            ChatMessage {
                sender: Sender::User,
                text: "Hello".into(),
            },
            ChatMessage {
                sender: Sender::Bot,
                text: "Hi <there>".into(),
            },
        ];
        let html = dashboard(&page(StudentTab::Chatbot, &status, None, &chat));
        let user_at = html.find(r#"<div class="chat-message user">Hello</div>"#).unwrap();
        let bot_at = html
            .find(r#"<div class="chat-message bot">Hi &lt;there&gt;</div>"#)
            .unwrap();
        assert!(user_at < bot_at);
    }
}
