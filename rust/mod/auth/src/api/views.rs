//! Login/registration pages.

use axum::response::Html;

use staffvault_core::html::{escape, notice, page};

pub fn index_page() -> Html<String> {
    page(
        "Staff Vault",
        r#"<p><a href="/login">Log in</a> | <a href="/register">Sign up</a></p>"#,
    )
}

pub fn login_page(message: Option<&str>, username: &str) -> Html<String> {
    let body = format!(
        r#"{notice}
<form method="post" action="/login">
  <label>Username <input name="username" value="{username}"></label>
  <label>Password <input name="password" type="password"></label>
  <button type="submit">Log in</button>
</form>
<p>No account? <a href="/register">Sign up</a></p>"#,
        notice = notice(message),
        username = escape(username),
    );
    page("Log in", &body)
}

pub fn register_page(message: Option<&str>, username: &str, first_name: &str, last_name: &str) -> Html<String> {
    let body = format!(
        r#"{notice}
<form method="post" action="/register">
  <label>First name <input name="first_name" value="{first_name}"></label>
  <label>Last name <input name="last_name" value="{last_name}"></label>
  <label>Username <input name="username" value="{username}"></label>
  <label>Password <input name="password" type="password"></label>
  <button type="submit">Sign up</button>
</form>
<p>Already registered? <a href="/login">Log in</a></p>"#,
        notice = notice(message),
        username = escape(username),
        first_name = escape(first_name),
        last_name = escape(last_name),
    );
    page("Sign up", &body)
}
