//! HTML chrome shared by every page.
//!
//! Plain server-rendered markup styled by `/static/style.css`. The greeting
//! page does not go through [`layout`]; its full source is assembled inside
//! the template sink so visitor input becomes part of the template.

/// Base HTML layout wrapper.
pub fn layout(title: &str, content: &str) -> String {
    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} - Breachlab</title>
    <link rel="stylesheet" href="/static/style.css">
</head>
<body>
    <div class="container">
        {HEADER}
        {WARNING}
        <div class="content">
            {content}
        </div>
        {FOOTER}
    </div>
</body>
</html>"##,
        title = title,
        HEADER = header_template(),
        WARNING = warning_template(),
        FOOTER = footer_template(),
        content = content,
    )
}

fn header_template() -> &'static str {
    r##"<header>
            <h1>🔓 Vulnerable Web Application</h1>
            <p class="subtitle">Code Review Laboratory - Educational Purposes Only</p>
        </header>"##
}

fn warning_template() -> &'static str {
    r##"<div class="warning-banner">
            ⚠️ WARNING: This application contains intentional security vulnerabilities. Do NOT deploy to production!
        </div>"##
}

fn footer_template() -> &'static str {
    r##"<footer>
            <p>&copy; 2026 Code Review Lab | For Educational and Training Purposes Only</p>
        </footer>"##
}

/// Success alert component.
pub fn alert_success(message: &str) -> String {
    format!(r##"<div class="alert alert-success"><strong>✅ Success:</strong> {message}</div>"##)
}

/// Error alert component.
pub fn alert_error(message: &str) -> String {
    format!(r##"<div class="alert alert-error"><strong>❌ Error:</strong> {message}</div>"##)
}

/// Table component.
pub fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let headers_html: String = headers
        .iter()
        .map(|h| format!("<th>{h}</th>"))
        .collect();

    let rows_html: String = rows
        .iter()
        .map(|row| {
            let cells: String = row.iter().map(|cell| format!("<td>{cell}</td>")).collect();
            format!("<tr>{cells}</tr>")
        })
        .collect();

    format!(
        r##"<table class="table">
            <thead>
                <tr>{headers_html}</tr>
            </thead>
            <tbody>
                {rows_html}
            </tbody>
        </table>"##
    )
}

/// Code block component. The caller escapes the content first.
pub fn code_block(code: &str) -> String {
    format!(r##"<pre class="output-block"><code>{code}</code></pre>"##)
}

/// Escape text for interpolation into markup. Not applied to the greeting
/// sink, whose whole point is that input reaches the template raw.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_wraps_content_with_the_lab_chrome() {
        let page = layout("Users", "<p>body</p>");
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<title>Users - Breachlab</title>"));
        assert!(page.contains("Vulnerable Web Application"));
        assert!(page.contains("⚠️ WARNING"));
        assert!(page.contains("<p>body</p>"));
        assert!(page.contains("© 2026 Code Review Lab")
            || page.contains("&copy; 2026 Code Review Lab"));
    }

    #[test]
    fn test_escaping_neutralizes_markup() {
        assert_eq!(
            html_escape(r#"<img src=x onerror="pwn()">"#),
            "&lt;img src=x onerror=&quot;pwn()&quot;&gt;"
        );
    }
}
