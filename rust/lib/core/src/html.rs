//! Minimal HTML helpers shared by the server-rendered pages.
//!
//! Markup is deliberately plain; every interpolated value goes through
//! [`escape`].

use axum::response::Html;

/// Escape text for use in HTML element content and quoted attributes.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render an optional notice line (errors, "logged out", ...).
pub fn notice(message: Option<&str>) -> String {
    match message {
        Some(m) => format!("<p class=\"notice\">{}</p>", escape(m)),
        None => String::new(),
    }
}

/// Wrap a body fragment in the common page shell.
pub fn page(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{title}</title></head>\n\
         <body>\n<h1>{title}</h1>\n{body}\n</body>\n</html>\n",
        title = escape(title),
        body = body,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_special_characters() {
        assert_eq!(
            escape(r#"<a href="x">O'Neil & co</a>"#),
            "&lt;a href=&quot;x&quot;&gt;O&#x27;Neil &amp; co&lt;/a&gt;"
        );
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn notice_is_escaped() {
        assert_eq!(notice(None), "");
        assert_eq!(notice(Some("<b>")), "<p class=\"notice\">&lt;b&gt;</p>");
    }

    #[test]
    fn page_contains_title_and_body() {
        let Html(html) = page("Login", "<form></form>");
        assert!(html.contains("<title>Login</title>"));
        assert!(html.contains("<form></form>"));
    }
}
