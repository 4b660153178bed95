use super::{html_escape, layout, notice_html};
use crate::session::Notice;

/// Render the login page. `error` is shown under a "Login Failed" heading.
pub fn login_page(error: Option<&str>) -> String {
    let error_html = error.map_or(String::new(), |e| {
        format!(
            r#"<div class="notice error"><strong>Login Failed</strong><br>{}</div>"#,
            html_escape(e)
        )
    });

    layout(
        "Login",
        "",
        &format!(
            r#"        <h1>School Clinic Appointments</h1>
        <h2>Sign in</h2>
        {error_html}
        <form id="login-form" method="POST" action="/login">
            <div class="form-group">
                <label for="email">Email:</label>
                <input type="email" id="email" name="email" required autofocus>
            </div>
            <div class="form-group">
                <label for="password">Password:</label>
                <input type="password" id="password" name="password" required>
            </div>
            <button type="submit">Login</button>
        </form>
        <p style="margin-top: 20px; text-align: center;">
            Don't have an account? <a href="/register">Register here</a>
        </p>"#
        ),
    )
}

/// Render the registration page. A successful registration sends the visitor back
/// to the login page after two seconds.
pub fn register_page(message: Option<&Notice>, redirect_to_login: bool) -> String {
    let refresh = if redirect_to_login {
        r#"<meta http-equiv="refresh" content="2;url=/">"#
    } else {
        ""
    };
    let message_html = notice_html(message);

    layout(
        "Register",
        refresh,
        &format!(
            r#"        <h1>School Clinic Appointments</h1>
        <h2>Create a student account</h2>
        <div id="message">{message_html}</div>
        <form id="register-form" method="POST" action="/register">
            <div class="form-group">
                <label for="full-name">Full name:</label>
                <input type="text" id="full-name" name="full_name" required autofocus>
            </div>
            <div class="form-group">
                <label for="email">Email:</label>
                <input type="email" id="email" name="email" required>
            </div>
            <div class="form-group">
                <label for="password">Password:</label>
                <input type="password" id="password" name="password" required>
            </div>
            <div class="form-group">
                <label for="confirm-password">Confirm password:</label>
                <input type="password" id="confirm-password" name="confirm_password" required>
            </div>
            <button type="submit">Register</button>
        </form>
        <p style="margin-top: 20px; text-align: center;">
            Already have an account? <a href="/">Login here</a>
        </p>"#
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_error_is_escaped() {
        let html = login_page(Some("<bad>"));
        assert!(html.contains("Login Failed"));
        assert!(html.contains("&lt;bad&gt;"));
        assert!(!login_page(None).contains("Login Failed"));
    }

    #[test]
    fn test_register_success_refreshes_to_login() {
        let html = register_page(
            Some(&Notice::success("Registration successful! Redirecting to login...")),
            true,
        );
        assert!(html.contains(r#"content="2;url=/""#));
        assert!(!register_page(None, false).contains("http-equiv"));
    }
}
