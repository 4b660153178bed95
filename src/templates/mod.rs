//! HTML for the portal pages.
//!
//! Plain `format!` templates. Every value that came from the backend or the visitor
//! goes through [`html_escape`].

pub mod admin;
pub mod auth;
pub mod student;

use crate::session::{Notice, NoticeKind};

/// Styles shared by every page.
const COMMON_STYLES: &str = r#"
    :root {
        --primary: #2e7d5b;
        --danger: #c0392b;
        --success: #27ae60;
    }
    body {
        font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, Arial, sans-serif;
        max-width: 1100px;
        margin: 30px auto;
        padding: 0 20px;
        background: #f4f7f6;
        color: #333;
    }
    .container {
        background: white;
        padding: 30px;
        border-radius: 8px;
        box-shadow: 0 2px 4px rgba(0,0,0,0.1);
    }
    header.top {
        display: flex;
        justify-content: space-between;
        align-items: center;
        border-bottom: 2px solid var(--primary);
        padding-bottom: 10px;
        margin-bottom: 20px;
    }
    .tabs { margin-bottom: 20px; }
    .tab-btn {
        display: inline-block;
        padding: 8px 16px;
        margin-right: 6px;
        border-radius: 4px;
        background: #e8eeeb;
        color: #333;
        text-decoration: none;
    }
    .tab-btn.active { background: var(--primary); color: white; }
    .form-group { margin: 12px 0; }
    label { display: block; font-weight: bold; margin-bottom: 4px; }
    input, select, textarea {
        width: 100%;
        padding: 8px;
        border: 1px solid #ddd;
        border-radius: 4px;
        box-sizing: border-box;
    }
    .filters { display: flex; gap: 10px; margin-bottom: 10px; }
    .filters input, .filters select { width: auto; }
    button, .btn-primary {
        background: var(--primary);
        color: white;
        padding: 8px 16px;
        border: none;
        border-radius: 4px;
        cursor: pointer;
        text-decoration: none;
    }
    .btn-delete, .btn-danger { background: var(--danger); }
    .btn-cancel { background: #ffe0b2; color: #e65100; }
    .btn-cancel.history { background: #ffcdd2; color: #c62828; }
    .logout-btn { background: #999; }
    table { width: 100%; border-collapse: collapse; }
    th, td { text-align: left; padding: 10px; border-bottom: 1px solid #eee; }
    th { background: #f0f0f0; }
    .status-pill {
        padding: 3px 10px;
        border-radius: 12px;
        font-size: 0.85em;
        background: #eee;
    }
    .status-pill.pending { background: #fff3cd; }
    .status-pill.approved { background: #d4edda; }
    .status-pill.rejected { background: #f8d7da; }
    .status-pill.completed { background: #d1ecf1; }
    .status-pill.canceled { background: #e2e3e5; }
    .urgent { color: var(--danger); font-weight: bold; }
    .not-urgent { color: var(--success); }
    .appointment-card {
        border: 1px solid #eee;
        border-radius: 6px;
        padding: 15px;
        margin-bottom: 12px;
    }
    .apt-header { display: flex; justify-content: space-between; }
    .admin-note-box {
        background: #fdecea;
        border-left: 4px solid var(--danger);
        padding: 8px;
        margin-top: 8px;
    }
    .notice { padding: 10px; border-radius: 4px; margin-bottom: 15px; }
    .notice.success { background: #d4edda; color: #155724; }
    .notice.error { background: #f8d7da; color: #721c24; }
    .empty { text-align: center; padding: 20px; color: #666; }
    .chat-box {
        border: 1px solid #ddd;
        border-radius: 6px;
        padding: 10px;
        min-height: 200px;
        margin-bottom: 10px;
    }
    .chat-message { padding: 6px 10px; margin: 6px 0; border-radius: 10px; max-width: 75%; }
    .chat-message.user { background: var(--primary); color: white; margin-left: auto; }
    .chat-message.bot { background: #eef2f1; }
"#;

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Wrap `body` in the shared document shell.
pub fn layout(title: &str, head_extra: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>School Clinic - {title}</title>
    {head_extra}
    <style>{COMMON_STYLES}</style>
</head>
<body>
    <div class="container">
{body}
    </div>
</body>
</html>"#,
        title = html_escape(title),
    )
}

pub fn notice_html(notice: Option<&Notice>) -> String {
    notice.map_or(String::new(), |n| {
        let class = match n.kind {
            NoticeKind::Success => "success",
            NoticeKind::Error => "error",
        };
        format!(
            r#"<div class="notice {class}">{}</div>"#,
            html_escape(&n.text)
        )
    })
}

/// Page header with the signed-in name, role label and logout button.
pub fn header(title: &str, name: &str, role_label: &str) -> String {
    format!(
        r#"<header class="top">
            <h1>{}</h1>
            <div>
                <span id="user-name">{}</span>
                (<span id="user-role">{}</span>)
                <form method="POST" action="/logout" style="display: inline;"
                      onsubmit="return confirm('Logout?');">
                    <button type="submit" class="logout-btn">Logout</button>
                </form>
            </div>
        </header>"#,
        html_escape(title),
        html_escape(name),
        html_escape(role_label),
    )
}

/// `<option>` list with `selected` on the current value.
pub fn options(choices: &[(&str, &str)], current: &str) -> String {
    choices
        .iter()
        .map(|(value, label)| {
            let selected = if *value == current { " selected" } else { "" };
            format!(
                r#"<option value="{}"{selected}>{}</option>"#,
                html_escape(value),
                html_escape(label)
            )
        })
        .collect()
}

pub fn error_page(status: u16, message: &str) -> String {
    layout(
        "Error",
        "",
        &format!(
            r#"<h1>Something went wrong ({status})</h1>
        <div class="notice error">{}</div>
        <p><a href="/">Back to start</a></p>"#,
            html_escape(message)
        ),
    )
}
