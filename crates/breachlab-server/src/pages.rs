//! Page templates for the lab's views.
//!
//! Every function renders a complete page through [`layout`]. Database and
//! session values are escaped on the way in; the greeting page is absent
//! here on purpose, its markup lives in the template sink.

use crate::model::{SessionPayload, UserRecord, UserSummary};
use crate::templates::{alert_error, alert_success, code_block, html_escape, layout, table};

// =============================================================================
// Home Page
// =============================================================================

pub fn home_page() -> String {
    let content = r##"<h2>🏠 Welcome to the Lab</h2>
        <p class="lead">
            Each endpoint below demonstrates one deliberately unfixed vulnerability.
            Review the code, craft an exploit, confirm it works, then explain the fix.
        </p>

        <div class="card-grid">
            <a href="/greet" class="card">
                <h3>💬 Greeting</h3>
                <code>GET /greet?name=...</code>
                <p>Your name is pasted into a server-side template before rendering.</p>
                <span class="danger">SSTI</span>
            </a>
            <a href="/users" class="card">
                <h3>👥 User Directory</h3>
                <code>GET /users</code>
                <p>Lists every account in the database.</p>
                <span class="muted">Recon surface</span>
            </a>
            <a href="/user/1" class="card">
                <h3>🔎 Record Lookup</h3>
                <code>GET /user/{id}</code>
                <p>The id segment is concatenated into a SQL statement.</p>
                <span class="danger">SQL Injection</span>
            </a>
            <a href="/upload" class="card">
                <h3>📁 File Upload</h3>
                <code>POST /upload</code>
                <p>Files are saved under whatever name the client supplies.</p>
                <span class="danger">Path Traversal</span>
            </a>
            <a href="/session/save" class="card">
                <h3>🍪 Session Demo</h3>
                <code>GET /session/save · GET /session/load</code>
                <p>The session cookie is deserialized with no integrity check.</p>
                <span class="danger">Insecure Deserialization</span>
            </a>
            <a href="/command" class="card">
                <h3>💻 Command Runner</h3>
                <code>POST /command</code>
                <p>The form field goes straight to the system shell.</p>
                <span class="danger">Command Injection</span>
            </a>
            <a href="/vulnerabilities" class="card">
                <h3>📚 Vulnerability Guide</h3>
                <code>GET /vulnerabilities</code>
                <p>Catalog of everything planted in this application.</p>
                <span class="muted">Reference</span>
            </a>
        </div>"##;

    layout("Home", content)
}

// =============================================================================
// Greeting Form
// =============================================================================

pub fn greet_form_page() -> String {
    let content = r##"<h2>💬 Personalized Greeting</h2>
        <p>Enter a name and the server will greet you. Template syntax is not filtered.</p>

        <form method="get" action="/greet" class="form-panel">
            <label for="name">Your name</label>
            <input type="text" id="name" name="name" placeholder="e.g. Alice" required>
            <button type="submit" class="btn btn-primary">Greet Me</button>
        </form>

        <div class="hint-panel">
            <h3>💡 Try This</h3>
            <p>What happens if your name is <code>{{ 7 * 7 }}</code>?</p>
        </div>

        <div class="actions">
            <a href="/" class="btn btn-secondary">Back to Home</a>
        </div>"##;

    layout("Greeting", content)
}

// =============================================================================
// User Directory
// =============================================================================

pub fn users_page(users: &[UserSummary]) -> String {
    let rows: Vec<Vec<String>> = users
        .iter()
        .map(|u| {
            vec![
                u.id.to_string(),
                html_escape(&u.username),
                html_escape(&u.email),
                format!(r##"<a href="/user/{}" class="btn btn-small">View</a>"##, u.id),
            ]
        })
        .collect();

    let content = format!(
        r##"<h2>👥 User Directory</h2>
        <p>{count} registered users. Follow a record link and then play with the id in the URL.</p>

        {table}

        <div class="actions">
            <a href="/" class="btn btn-secondary">Back to Home</a>
        </div>"##,
        count = users.len(),
        table = table(&["ID", "Username", "Email", ""], &rows),
    );

    layout("Users", &content)
}

// =============================================================================
// Record Lookup
// =============================================================================

pub fn user_detail_page(raw_id: &str, user: &UserRecord) -> String {
    let content = format!(
        r##"<h2>🔎 User Record</h2>
        {found}

        <div class="detail-panel">
            <div class="detail-grid">
                <strong>ID:</strong> <span>{id}</span>
                <strong>Username:</strong> <span>{username}</span>
                <strong>Email:</strong> <span>{email}</span>
                <strong>Password:</strong> <code>{password}</code>
                <strong>Role:</strong> <span class="badge">{role}</span>
                <strong>Created:</strong> <span>{created_at}</span>
            </div>
        </div>

        <div class="hint-panel">
            <h3>📝 Query Executed</h3>
            {query}
            <p>The id segment lands in the statement verbatim. Try <code>0 OR 1=1</code>.</p>
        </div>

        <div class="actions">
            <a href="/users" class="btn btn-primary">All Users</a>
            <a href="/" class="btn btn-secondary">Back to Home</a>
        </div>"##,
        found = alert_success("Record retrieved from the database."),
        id = user.id,
        username = html_escape(&user.username),
        email = html_escape(&user.email),
        password = html_escape(&user.password),
        role = user.role,
        created_at = html_escape(&user.created_at),
        query = code_block(&html_escape(&format!(
            "SELECT * FROM users WHERE id = {raw_id}"
        ))),
    );

    layout("User Detail", &content)
}

/// Shared by "User not found" and "Database error: ..." outcomes; the
/// caller supplies the message, which is shown as-is.
pub fn user_detail_error_page(message: &str) -> String {
    let content = format!(
        r##"<h2>🔎 User Record</h2>
        {alert}

        <div class="actions">
            <a href="/users" class="btn btn-primary">All Users</a>
            <a href="/" class="btn btn-secondary">Back to Home</a>
        </div>"##,
        alert = alert_error(&html_escape(message)),
    );

    layout("User Detail", &content)
}

// =============================================================================
// File Upload
// =============================================================================

/// Outcome strip shown above the upload form.
pub enum UploadNotice {
    Success(String),
    Error(String),
}

pub fn upload_page(notice: Option<&UploadNotice>) -> String {
    let strip = match notice {
        Some(UploadNotice::Success(message)) => alert_success(&html_escape(message)),
        Some(UploadNotice::Error(message)) => alert_error(&html_escape(message)),
        None => String::new(),
    };

    let content = format!(
        r##"<h2>📁 File Upload</h2>
        {strip}
        <p>Uploaded files are written to the <code>uploads/</code> directory under their original name.</p>

        <form method="post" action="/upload" enctype="multipart/form-data" class="form-panel">
            <label for="file">Choose a file</label>
            <input type="file" id="file" name="file">
            <button type="submit" class="btn btn-primary">Upload</button>
        </form>

        <div class="hint-panel">
            <h3>💡 Try This</h3>
            <p>What does a filename like <code>../note.txt</code> do to the destination path?</p>
        </div>

        <div class="actions">
            <a href="/" class="btn btn-secondary">Back to Home</a>
        </div>"##
    );

    layout("File Upload", &content)
}

// =============================================================================
// Session Demo
// =============================================================================

/// What the session page is reporting on.
pub enum SessionView {
    /// A fresh payload was serialized into the cookie.
    Saved(SessionPayload),
    /// The cookie decoded back into a payload.
    Loaded(SessionPayload),
    /// No cookie, or the cookie would not decode.
    Failed(String),
}

pub fn session_page(view: &SessionView) -> String {
    let report = match view {
        SessionView::Saved(payload) => format!(
            "{alert}\n{data}",
            alert = alert_success("Session saved to the <code>session_data</code> cookie."),
            data = payload_grid(payload),
        ),
        SessionView::Loaded(payload) => format!(
            "{alert}\n{data}",
            alert = alert_success("Session loaded from the <code>session_data</code> cookie."),
            data = payload_grid(payload),
        ),
        SessionView::Failed(message) => alert_error(&html_escape(message)),
    };

    let content = format!(
        r##"<h2>🍪 Session Demo</h2>
        {report}

        <div class="hint-panel">
            <h3>💡 Try This</h3>
            <p>
                The cookie is base64-wrapped binary with no signature. Decode it,
                change the role, re-encode it, and load it again.
            </p>
        </div>

        <div class="actions">
            <a href="/session/save" class="btn btn-primary">Save Session</a>
            <a href="/session/load" class="btn btn-primary">Load Session</a>
            <a href="/" class="btn btn-secondary">Back to Home</a>
        </div>"##
    );

    layout("Session Demo", &content)
}

fn payload_grid(payload: &SessionPayload) -> String {
    format!(
        r##"<div class="detail-panel">
            <div class="detail-grid">
                <strong>User:</strong> <span>{user}</span>
                <strong>Role:</strong> <span class="badge">{role}</span>
                <strong>Timestamp:</strong> <span>{timestamp}</span>
            </div>
        </div>"##,
        user = html_escape(&payload.user),
        role = html_escape(&payload.role),
        timestamp = html_escape(&payload.timestamp),
    )
}

// =============================================================================
// Command Runner
// =============================================================================

pub fn command_page(output: Option<&str>, error: Option<&str>) -> String {
    let output_html = output.map_or(String::new(), |text| {
        format!(
            "<h3>📟 Output</h3>\n{block}",
            block = code_block(&html_escape(text))
        )
    });
    let error_html = error.map_or(String::new(), |message| alert_error(&html_escape(message)));

    let content = format!(
        r##"<h2>💻 Command Runner</h2>
        <p>Runs a diagnostic command on the server and shows its output.</p>
        {error_html}

        <form method="post" action="/command" class="form-panel">
            <label for="cmd">Command</label>
            <input type="text" id="cmd" name="cmd" placeholder="e.g. uptime">
            <button type="submit" class="btn btn-primary">Run</button>
        </form>

        {output_html}

        <div class="hint-panel">
            <h3>💡 Try This</h3>
            <p>The field reaches <code>sh -c</code> untouched. What does <code>id; ls -la</code> return?</p>
        </div>

        <div class="actions">
            <a href="/" class="btn btn-secondary">Back to Home</a>
        </div>"##
    );

    layout("Command Runner", &content)
}

// =============================================================================
// Vulnerability Guide
// =============================================================================

pub fn vulnerabilities_page() -> String {
    let entries = [
        (
            "1",
            "Hardcoded Secret Key",
            "Configuration default",
            "The development secret ships in the source and every build. Anyone with the code has the key.",
            "grep for dev_secret_123",
        ),
        (
            "2",
            "Server-Side Template Injection",
            "GET /greet?name=...",
            "Input is concatenated into template source before compilation, so template syntax executes on the server.",
            "{{ 7 * 7 }}",
        ),
        (
            "3",
            "SQL Injection",
            "GET /user/{id}",
            "The path segment is formatted into the statement instead of bound as a parameter.",
            "0 OR 1=1",
        ),
        (
            "4",
            "Path Traversal",
            "POST /upload",
            "The client's filename is trusted verbatim, so relative segments escape the upload directory.",
            "../outside.txt",
        ),
        (
            "5",
            "Insecure Deserialization",
            "GET /session/load",
            "The session cookie is binary-deserialized without any signature or integrity check.",
            "forge the session_data cookie",
        ),
        (
            "6",
            "Command Injection",
            "POST /command",
            "The form field is passed to sh -c unmodified, so shell metacharacters chain arbitrary commands.",
            "id; cat /etc/passwd",
        ),
        (
            "7",
            "Debug Mode Enabled",
            "Configuration default",
            "Debug mode is on by default, so internal fault detail is rendered into error responses.",
            "trigger any 500",
        ),
    ];

    let cards: String = entries
        .iter()
        .map(|(number, name, location, description, payload)| {
            format!(
                r##"<div class="vuln-card">
                <h3>#{number} · {name}</h3>
                <p class="muted">{location}</p>
                <p>{description}</p>
                <p><strong>Try:</strong> <code>{payload}</code></p>
            </div>"##
            )
        })
        .collect();

    let content = format!(
        r##"<h2>📚 Vulnerability Guide</h2>
        <p>Seven issues are planted in this application. All of them are real and exploitable.</p>

        <div class="card-grid">
            {cards}
        </div>

        <div class="actions">
            <a href="/" class="btn btn-secondary">Back to Home</a>
        </div>"##
    );

    layout("Vulnerability Guide", &content)
}

// =============================================================================
// Error Pages
// =============================================================================

pub fn not_found_page() -> String {
    let content = r##"<div class="error-hero">
            <h1>404</h1>
            <h2>Page Not Found</h2>
            <p>The page you requested does not exist.</p>
            <div class="actions">
                <a href="/" class="btn btn-primary">Back to Home</a>
            </div>
        </div>"##;

    layout("Page Not Found", content)
}

/// `detail` is rendered only when debug mode is on (VULN #7).
pub fn server_error_page(detail: Option<&str>) -> String {
    let detail_html = detail.map_or(String::new(), |text| {
        format!(
            "<h3>🐞 Debug Detail</h3>\n{block}",
            block = code_block(&html_escape(text))
        )
    });

    let content = format!(
        r##"<div class="error-hero">
            <h1>500</h1>
            <h2>Internal Server Error</h2>
            <p>Something went wrong while handling the request.</p>
            {detail_html}
            <div class="actions">
                <a href="/" class="btn btn-primary">Back to Home</a>
            </div>
        </div>"##
    );

    layout("Server Error", &content)
}
