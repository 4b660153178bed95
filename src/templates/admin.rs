use super::{header, html_escape, layout, notice_html, options};
use crate::filter::{AdminCriteria, Category, UserRoleFilter};
use crate::models::AppointmentStatus;
use crate::session::Notice;
use crate::views::{AdminAppointmentRow, AdminTab, AppointmentDetail, UserRow};

pub struct AdminPage<'a> {
    pub name: &'a str,
    pub role_label: &'a str,
    pub tab: AdminTab,
    pub can_manage_users: bool,
    pub criteria: &'a AdminCriteria,
    /// `None` when the list could not be loaded.
    pub appointments: Option<&'a [AdminAppointmentRow]>,
    pub user_filter: UserRoleFilter,
    pub users: Option<&'a [UserRow]>,
    pub notice: Option<&'a Notice>,
}

fn appointment_row(r: &AdminAppointmentRow) -> String {
    let urgency_class = if r.urgent { "urgent" } else { "not-urgent" };
    let delete_html = if r.show_delete {
        format!(
            r#"<form method="POST" action="/admin/appointments/{}/delete" style="display: inline;"
                          onsubmit="return confirm('Are you sure you want to permanently delete this record?');">
                        <button type="submit" class="btn-delete">Delete</button>
                    </form>"#,
            r.id
        )
    } else {
        String::new()
    };

    format!(
        r#"<tr>
                <td>{date}<br><small>{time}</small></td>
                <td>
                    <span style="font-weight:bold">{name}</span><br>
                    <small style="color:#666">{email}</small>
                </td>
                <td>{service}</td>
                <td><span class="{urgency_class}">{urgency}</span></td>
                <td><span class="status-pill {status_class}">{status_label}</span></td>
                <td>
                    <div class="action-buttons">
                        <a class="btn-primary" href="/admin/appointments/{id}">View</a>
                        {delete_html}
                    </div>
                </td>
            </tr>"#,
        date = html_escape(&r.date),
        time = html_escape(&r.time),
        name = html_escape(&r.student_name),
        email = html_escape(&r.student_email),
        service = html_escape(&r.service),
        urgency = html_escape(&r.urgency),
        status_class = r.status_class,
        status_label = r.status_label,
        id = r.id,
    )
}

/// Table body for the appointments tab; an empty list renders one placeholder row.
pub fn appointment_rows(rows: &[AdminAppointmentRow]) -> String {
    if rows.is_empty() {
        return r#"<tr><td colspan="6" class="empty">No appointments found matching these criteria.</td></tr>"#
            .to_string();
    }
    rows.iter().map(appointment_row).collect()
}

fn user_row(u: &UserRow) -> String {
    format!(
        r#"<tr>
                <td>{name}</td>
                <td>{email}</td>
                <td><span style="color: {color}; font-weight:bold;">{role}</span></td>
                <td>{created}</td>
                <td>
                    <form method="POST" action="/admin/users/{id}/delete"
                          onsubmit="return confirm('Delete this user?');">
                        <button type="submit" class="btn-delete">Delete</button>
                    </form>
                </td>
            </tr>"#,
        name = html_escape(&u.full_name),
        email = html_escape(&u.email),
        color = u.role_color,
        role = u.role_label,
        created = html_escape(&u.created),
        id = u.id,
    )
}

/// Table body for the users tab; an empty list renders one placeholder row.
pub fn user_rows(rows: &[UserRow]) -> String {
    if rows.is_empty() {
        return r#"<tr><td colspan="5" class="empty">No users found.</td></tr>"#.to_string();
    }
    rows.iter().map(user_row).collect()
}

fn tabs(active: AdminTab, can_manage_users: bool) -> String {
    let class = |t: AdminTab| if t == active { "tab-btn active" } else { "tab-btn" };
    let mut html = format!(
        r#"<a class="{}" href="/admin?tab=appointments">Appointments</a>"#,
        class(AdminTab::Appointments)
    );
    if can_manage_users {
        html.push_str(&format!(
            r#"<a id="manage-users-tab" class="{}" href="/admin?tab=users">Manage Users</a>"#,
            class(AdminTab::Users)
        ));
    }
    html
}

fn status_choices() -> Vec<(&'static str, &'static str)> {
    let mut choices = vec![("all", "All Statuses")];
    choices.extend(AppointmentStatus::ALL.iter().map(|s| (s.as_str(), s.label())));
    choices
}

fn appointments_tab(criteria: &AdminCriteria, rows: Option<&[AdminAppointmentRow]>) -> String {
    let categories: Vec<(&str, &str)> = Category::CHOICES
        .iter()
        .map(|c| (c.as_str(), c.label()))
        .collect();
    let body = match rows {
        Some(rows) => appointment_rows(rows),
        None => r#"<tr><td colspan="6" class="empty" style="color:red;">Error loading data.</td></tr>"#
            .to_string(),
    };
    format!(
        r#"<form class="filters" method="GET" action="/admin">
            <input type="hidden" name="tab" value="appointments">
            <select id="status-filter" name="status">{statuses}</select>
            <input type="text" id="search-input" name="search" placeholder="Search student name..."
                   value="{search}">
            <select id="sort-order" name="sort">{categories}</select>
            <button type="submit">Apply</button>
        </form>
        <table>
            <thead>
                <tr>
                    <th>Date &amp; Time</th>
                    <th>Student</th>
                    <th>Service</th>
                    <th>Urgency</th>
                    <th>Status</th>
                    <th>Actions</th>
                </tr>
            </thead>
            <tbody id="appointments-list">{body}</tbody>
        </table>"#,
        statuses = options(&status_choices(), criteria.status.as_str()),
        search = html_escape(&criteria.search),
        categories = options(&categories, criteria.category.as_str()),
    )
}

fn users_tab(filter: UserRoleFilter, rows: Option<&[UserRow]>) -> String {
    let body = match rows {
        Some(rows) => user_rows(rows),
        None => r#"<tr><td colspan="5" class="empty" style="color:red;">Error loading data.</td></tr>"#
            .to_string(),
    };
    let role_choices = [("all", "All Users"), ("student", "Students"), ("admin", "Admins")];
    format!(
        r#"<form class="filters" method="GET" action="/admin">
            <input type="hidden" name="tab" value="users">
            <select id="user-role-filter" name="role">{roles}</select>
            <button type="submit">Filter</button>
        </form>
        <table>
            <thead>
                <tr><th>Name</th><th>Email</th><th>Role</th><th>Created</th><th>Actions</th></tr>
            </thead>
            <tbody id="users-list">{body}</tbody>
        </table>

        <h2>Add User</h2>
        <form id="add-user-form" method="POST" action="/admin/users">
            <div class="form-group">
                <label for="new-full-name">Full name:</label>
                <input type="text" id="new-full-name" name="full_name" required>
            </div>
            <div class="form-group">
                <label for="new-email">Email:</label>
                <input type="email" id="new-email" name="email" required>
            </div>
            <div class="form-group">
                <label for="new-password">Password:</label>
                <input type="password" id="new-password" name="password" required>
            </div>
            <div class="form-group">
                <label for="new-role">Role:</label>
                <select id="new-role" name="role" required>
                    <option value="admin">Admin</option>
                    <option value="super_admin">Super Admin</option>
                </select>
            </div>
            <button type="submit">Create User</button>
        </form>"#,
        roles = options(&role_choices, filter.as_str()),
    )
}

pub fn dashboard(page: &AdminPage) -> String {
    let content = match page.tab {
        AdminTab::Appointments => appointments_tab(page.criteria, page.appointments),
        AdminTab::Users => users_tab(page.user_filter, page.users),
    };
    layout(
        "Admin Dashboard",
        "",
        &format!(
            r#"        {header}
        {notice}
        <nav class="tabs">{tabs}</nav>
        <section id="{tab_id}-tab" class="tab-content active">
        {content}
        </section>"#,
            header = header("Admin Dashboard", page.name, page.role_label),
            notice = notice_html(page.notice),
            tabs = tabs(page.tab, page.can_manage_users),
            tab_id = page.tab.as_str(),
        ),
    )
}

/// Appointment details with the status actions.
pub fn appointment_detail_page(
    name: &str,
    role_label: &str,
    detail: &AppointmentDetail,
    notice: Option<&Notice>,
) -> String {
    let note_html = detail.current_note.as_deref().map_or(String::new(), |note| {
        format!(
            r#"<div class="admin-note-box"><strong>Current Note:</strong> {}</div>"#,
            html_escape(note)
        )
    });
    let id = detail.id;

    layout(
        "Appointment Details",
        "",
        &format!(
            r#"        {header}
        {notice}
        <p><a href="/admin?tab=appointments">&larr; Back to appointments</a></p>
        <div id="appointment-details">
            <p><strong>Student:</strong> {student}</p>
            <p><strong>Service:</strong> {service}</p>
            <p><strong>Urgency:</strong> {urgency}</p>
            <p><strong>Reason:</strong> {reason}</p>
            <p><strong>Status:</strong> <span class="status-pill {status_class}">{status_label}</span></p>
            <hr style="margin: 10px 0; border: 0; border-top: 1px solid #eee;">
            {note_html}
        </div>
        <div class="action-buttons" style="margin-top: 15px;">
            <form method="POST" action="/admin/appointments/{id}/status" style="display: inline;">
                <input type="hidden" name="status" value="approved">
                <button type="submit">Approve</button>
            </form>
            <form method="POST" action="/admin/appointments/{id}/status" style="display: inline;">
                <input type="hidden" name="status" value="completed">
                <button type="submit">Mark Completed</button>
            </form>
        </div>
        <form id="reject-form" method="POST" action="/admin/appointments/{id}/status">
            <input type="hidden" name="status" value="rejected">
            <div class="form-group">
                <label for="admin-note">Reason for rejection:</label>
                <textarea id="admin-note" name="admin_note" rows="3"></textarea>
            </div>
            <button type="submit" class="btn-danger">Reject</button>
        </form>"#,
            header = header("Admin Dashboard", name, role_label),
            notice = notice_html(notice),
            student = html_escape(&detail.student_name),
            service = html_escape(&detail.service),
            urgency = html_escape(&detail.urgency),
            reason = html_escape(&detail.reason),
            status_class = detail.status_class,
            status_label = detail.status_label,
        ),
    )
}
