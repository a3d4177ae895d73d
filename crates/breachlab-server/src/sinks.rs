//! The vulnerable cores. Every public function here is a direct
//! input → sink mapping, kept deliberately unsafe; the handlers in
//! [`crate::handlers`] only extract request data and render what comes
//! back. This file is the target of the signature scan run by
//! `breachlab verify`.

use base64::Engine;
use minijinja::Environment;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::Connection;
use thiserror::Error;
use tokio::process::Command;

use crate::model::{SessionPayload, UserRecord, UserSummary};

// ============================================================================
// Shipped insecure defaults
// ============================================================================

/// VULN #1: hardcoded development secret, present in every build.
pub const DEV_SECRET_KEY: &str = "dev_secret_123";

/// VULN #7: debug mode on by default.
pub const DEBUG_MODE: bool = true;

// ============================================================================
// Fault type
// ============================================================================

/// What a sink reports when its underlying operation fails.
///
/// The display text is rendered straight into the response page; leaking
/// driver and runtime detail to the caller is the demonstrated behavior.
#[derive(Debug, Error)]
pub enum SinkFault {
    /// Query execution failed; carries the raw driver message.
    #[error("Database error: {0}")]
    Query(String),

    /// Template compilation or rendering failed.
    #[error("{0}")]
    Template(String),

    /// Filesystem write failed.
    #[error("{0}")]
    Upload(String),

    /// Shell launch failed or the command exited non-zero.
    #[error("{0}")]
    Shell(String),

    /// Cookie decoding or deserialization failed.
    #[error("{0}")]
    Session(String),
}

// ============================================================================
// Template-injection sink (greeting)
// ============================================================================

/// Render the personalized greeting page for `name`.
///
/// VULN #2: the visitor's input is pasted into the template source before
/// the template is compiled, so any template syntax it carries is
/// evaluated server-side.
pub fn render_greeting(name: &str) -> Result<String, SinkFault> {
    let source = format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Greeting Result - Breachlab</title>
    <link rel="stylesheet" href="/static/style.css">
</head>
<body>
    <div class="container">
        <header>
            <h1>🔓 Vulnerable Web Application</h1>
            <p class="subtitle">Code Review Laboratory - Educational Purposes Only</p>
        </header>
        <div class="warning-banner">
            ⚠️ WARNING: This application contains intentional security vulnerabilities. Do NOT deploy to production!
        </div>
        <div class="content">
            <h2>💬 Personalized Greeting</h2>
            <div class="alert alert-success">
                <strong>✅ Success:</strong> Your greeting has been generated!
            </div>
            <div class="greeting-hero">
                <h1>Hello {name}! 👋</h1>
            </div>
            <div class="detail-panel">
                <h3>📝 Request Details</h3>
                <div class="detail-grid">
                    <strong>Input Received:</strong>
                    <code>{name}</code>
                    <strong>Vulnerability:</strong>
                    <span class="danger">SSTI (Server-Side Template Injection)</span>
                    <strong>Status:</strong>
                    <span class="success">Template Rendered</span>
                </div>
            </div>
            <div class="actions">
                <a href="/greet" class="btn btn-primary">Try Another Name</a>
                <a href="/" class="btn btn-secondary">Back to Home</a>
                <a href="/vulnerabilities" class="btn btn-secondary">Learn About SSTI</a>
            </div>
        </div>
        <footer>
            <p>&copy; 2026 Code Review Lab | For Educational and Training Purposes Only</p>
        </footer>
    </div>
</body>
</html>"##
    );

    let env = Environment::new();
    env.render_str(&source, ())
        .map_err(|e| SinkFault::Template(e.to_string()))
}

// ============================================================================
// Record lookup (SQL injection) and listing
// ============================================================================

/// One connection per request, released when the sink returns.
async fn connect(database_path: &str) -> Result<SqliteConnection, SinkFault> {
    let options = SqliteConnectOptions::new().filename(database_path);
    SqliteConnection::connect_with(&options)
        .await
        .map_err(|e| SinkFault::Query(e.to_string()))
}

/// Fetch one user by the raw path segment.
///
/// VULN #3: the segment is pasted into the statement, not bound, so it can
/// rewrite the predicate.
pub async fn lookup_user(
    database_path: &str,
    raw_id: &str,
) -> Result<Option<UserRecord>, SinkFault> {
    let mut conn = connect(database_path).await?;
    let query = format!("SELECT * FROM users WHERE id = {raw_id}");
    sqlx::query_as::<_, UserRecord>(&query)
        .fetch_optional(&mut conn)
        .await
        .map_err(|e| SinkFault::Query(e.to_string()))
}

/// All users for the listing page. Takes no caller input.
pub async fn list_users(database_path: &str) -> Result<Vec<UserSummary>, SinkFault> {
    let mut conn = connect(database_path).await?;
    sqlx::query_as::<_, UserSummary>("SELECT id, username, email FROM users")
        .fetch_all(&mut conn)
        .await
        .map_err(|e| SinkFault::Query(e.to_string()))
}

// ============================================================================
// Upload sink (path traversal)
// ============================================================================

/// Persist an uploaded file under the client-chosen name.
///
/// VULN #4: the filename is used verbatim, so `../` sequences walk out of
/// the upload directory. Returns the path that was written.
pub async fn store_upload(
    upload_dir: &str,
    file_name: &str,
    data: &[u8],
) -> Result<String, SinkFault> {
    let destination = format!("{upload_dir}/{file_name}");
    tokio::fs::write(&destination, data)
        .await
        .map_err(|e| SinkFault::Upload(e.to_string()))?;
    tracing::info!(path = %destination, bytes = data.len(), "stored upload");
    Ok(destination)
}

// ============================================================================
// Shell execution (command injection)
// ============================================================================

/// Run the caller's command line through the shell and capture its output.
///
/// VULN #6: the form field reaches `sh -c` unmodified. A failed launch or
/// a non-zero exit is reported as a fault, never raised.
pub async fn run_shell(command: &str) -> Result<String, SinkFault> {
    tracing::warn!(%command, "executing caller-supplied shell command");
    let output = Command::new("sh")
        .arg("-c")
        .arg(command)
        .output()
        .await
        .map_err(|e| SinkFault::Shell(e.to_string()))?;

    if output.status.success() {
        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));
        Ok(text)
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let detail = if stderr.trim().is_empty() {
            format!("command exited with {}", output.status)
        } else {
            stderr.into_owned()
        };
        Err(SinkFault::Shell(detail))
    }
}

// ============================================================================
// Session codec (insecure deserialization)
// ============================================================================

/// Serialize a payload into the `session_data` cookie value.
pub fn seal_session(payload: &SessionPayload) -> Result<String, SinkFault> {
    let bytes = bincode::serialize(payload).map_err(|e| SinkFault::Session(e.to_string()))?;
    Ok(base64::engine::general_purpose::STANDARD.encode(bytes))
}

/// Decode a `session_data` cookie back into a payload.
///
/// VULN #5: whatever bytes the cookie holds are deserialized straight into
/// a live value; nothing authenticates them, so the client controls the
/// result completely.
pub fn open_session(cookie_value: &str) -> Result<SessionPayload, SinkFault> {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(cookie_value)
        .map_err(|e| SinkFault::Session(e.to_string()))?;
    bincode::deserialize(&bytes).map_err(|e| SinkFault::Session(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn seeded_db(dir: &TempDir) -> String {
        let path = dir.path().join("users.db").to_str().unwrap().to_string();
        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true);
        let mut conn = SqliteConnection::connect_with(&options).await.unwrap();
        sqlx::query(
            "CREATE TABLE users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL UNIQUE,
                email TEXT NOT NULL,
                password TEXT NOT NULL,
                role TEXT NOT NULL,
                created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            )",
        )
        .execute(&mut conn)
        .await
        .unwrap();
        for (username, email, password, role) in [
            ("admin", "admin@vulnerable-app.local", "admin123", "administrator"),
            ("john_doe", "john@example.com", "password123", "user"),
            ("alice_jones", "alice@example.com", "welcome2024", "moderator"),
        ] {
            sqlx::query("INSERT INTO users (username, email, password, role) VALUES (?, ?, ?, ?)")
                .bind(username)
                .bind(email)
                .bind(password)
                .bind(role)
                .execute(&mut conn)
                .await
                .unwrap();
        }
        path
    }

    #[tokio::test]
    async fn test_lookup_returns_the_full_record() {
        let dir = TempDir::new().unwrap();
        let db = seeded_db(&dir).await;

        let user = lookup_user(&db, "1").await.unwrap().unwrap();
        assert_eq!(user.username, "admin");
        assert_eq!(user.password, "admin123");
        assert_eq!(user.role, crate::model::Role::Administrator);
    }

    #[tokio::test]
    async fn test_lookup_concatenates_instead_of_binding() {
        let dir = TempDir::new().unwrap();
        let db = seeded_db(&dir).await;

        // No row has id 0, yet the OR clause makes the predicate true for
        // every row, so the lookup comes back with one anyway.
        assert!(lookup_user(&db, "0").await.unwrap().is_none());
        let smuggled = lookup_user(&db, "0 OR 1=1").await.unwrap();
        assert!(smuggled.is_some());
    }

    #[tokio::test]
    async fn test_lookup_unknown_id_is_not_found() {
        let dir = TempDir::new().unwrap();
        let db = seeded_db(&dir).await;

        assert!(lookup_user(&db, "999").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_lookup_malformed_id_reports_a_database_error() {
        let dir = TempDir::new().unwrap();
        let db = seeded_db(&dir).await;

        let fault = lookup_user(&db, "abc").await.unwrap_err();
        assert!(fault.to_string().starts_with("Database error:"));
    }

    #[tokio::test]
    async fn test_listing_returns_every_row() {
        let dir = TempDir::new().unwrap();
        let db = seeded_db(&dir).await;

        let users = list_users(&db).await.unwrap();
        assert_eq!(users.len(), 3);
        assert_eq!(users[0].username, "admin");
        assert_eq!(users[0].email, "admin@vulnerable-app.local");
    }

    #[test]
    fn test_greeting_evaluates_template_syntax() {
        let page = render_greeting("{{ 7 * 7 }}").unwrap();
        assert!(page.contains("Hello 49! 👋"));
        assert!(!page.contains("7 * 7"));
    }

    #[test]
    fn test_greeting_renders_a_plain_name() {
        let page = render_greeting("Alice").unwrap();
        assert!(page.contains("Hello Alice! 👋"));
    }

    #[test]
    fn test_greeting_reports_template_faults() {
        let fault = render_greeting("{% if %}").unwrap_err();
        assert!(matches!(fault, SinkFault::Template(_)));
    }

    #[tokio::test]
    async fn test_upload_writes_the_literal_filename() {
        let dir = TempDir::new().unwrap();
        let upload_dir = dir.path().join("uploads");
        tokio::fs::create_dir_all(&upload_dir).await.unwrap();

        let written = store_upload(upload_dir.to_str().unwrap(), "demo.txt", b"hello")
            .await
            .unwrap();
        assert_eq!(tokio::fs::read(&written).await.unwrap(), b"hello");
    }

    #[tokio::test]
    async fn test_upload_follows_traversal_sequences() {
        let dir = TempDir::new().unwrap();
        let upload_dir = dir.path().join("uploads");
        tokio::fs::create_dir_all(&upload_dir).await.unwrap();

        store_upload(upload_dir.to_str().unwrap(), "../escaped.txt", b"out")
            .await
            .unwrap();
        assert!(dir.path().join("escaped.txt").exists());
    }

    #[tokio::test]
    async fn test_shell_captures_command_output() {
        let output = run_shell("echo hello").await.unwrap();
        assert!(output.contains("hello"));
    }

    #[tokio::test]
    async fn test_shell_reports_invalid_commands_as_faults() {
        let fault = run_shell("definitely_not_a_command_zz9").await.unwrap_err();
        assert!(!fault.to_string().is_empty());
    }

    #[test]
    fn test_session_round_trip_preserves_the_payload() {
        let payload = SessionPayload::sample();
        let cookie = seal_session(&payload).unwrap();
        assert_eq!(open_session(&cookie).unwrap(), payload);
    }

    #[test]
    fn test_session_rejects_corrupted_cookies() {
        assert!(open_session("%%%not-base64%%%").is_err());

        let garbage = base64::engine::general_purpose::STANDARD.encode(b"garbage");
        assert!(open_session(&garbage).is_err());
    }
}
