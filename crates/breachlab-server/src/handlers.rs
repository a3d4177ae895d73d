//! Request handlers for the lab's endpoints.
//!
//! Handlers stay thin: extract the request data, hand it to the matching
//! sink, choose a page for the result. Which faults surface in-page and
//! which ones become a 500 mirrors how each endpoint is meant to fail.

use axum::{
    Form,
    extract::{Multipart, Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;

use crate::error::ErrorPage;
use crate::model::SessionPayload;
use crate::pages::{self, SessionView, UploadNotice};
use crate::sinks;
use crate::state::AppState;

/// Session cookie name
const SESSION_COOKIE_NAME: &str = "session_data";

// =============================================================================
// Home and Reference Pages
// =============================================================================

/// Handler for the home page.
pub async fn home() -> Html<String> {
    Html(pages::home_page())
}

/// Handler for the vulnerability guide page.
pub async fn vulnerabilities() -> Html<String> {
    Html(pages::vulnerabilities_page())
}

/// Fallback handler for unknown paths.
pub async fn not_found() -> (StatusCode, Html<String>) {
    (StatusCode::NOT_FOUND, Html(pages::not_found_page()))
}

// =============================================================================
// Greeting (SSTI)
// =============================================================================

/// Greeting page query parameters.
#[derive(Debug, Deserialize)]
pub struct GreetQuery {
    #[serde(default)]
    pub name: Option<String>,
}

/// Handler for the greeting page. Without a name it shows the form; with
/// one it renders the template sink's output. A template fault bubbles up
/// as a 500.
pub async fn greet(
    State(state): State<AppState>,
    Query(query): Query<GreetQuery>,
) -> Result<Html<String>, ErrorPage> {
    match query.name.as_deref() {
        Some(name) if !name.is_empty() => {
            let page = sinks::render_greeting(name).map_err(|e| state.error_page(e))?;
            Ok(Html(page))
        }
        _ => Ok(Html(pages::greet_form_page())),
    }
}

// =============================================================================
// User Directory and Record Lookup (SQL injection)
// =============================================================================

/// Handler for the user directory page.
pub async fn users_index(State(state): State<AppState>) -> Result<Html<String>, ErrorPage> {
    let users = sinks::list_users(&state.config.database_path)
        .await
        .map_err(|e| state.error_page(e))?;
    Ok(Html(pages::users_page(&users)))
}

/// Handler for the record lookup page. Lookup faults are caught and shown
/// in the page rather than escalating, so the raw driver message is part
/// of the response.
pub async fn user_detail(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Html<String> {
    match sinks::lookup_user(&state.config.database_path, &user_id).await {
        Ok(Some(user)) => Html(pages::user_detail_page(&user_id, &user)),
        Ok(None) => Html(pages::user_detail_error_page("User not found")),
        Err(fault) => Html(pages::user_detail_error_page(&fault.to_string())),
    }
}

// =============================================================================
// File Upload (path traversal)
// =============================================================================

/// Handler for the upload form.
pub async fn upload_form() -> Html<String> {
    Html(pages::upload_page(None))
}

/// Handler for upload submission. A missing or unnamed file renders an
/// in-page notice; a filesystem fault becomes a 500.
pub async fn upload_submit(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Html<String>, ErrorPage> {
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| state.error_page(e))?
    {
        if field.name() == Some("file") {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let data = field.bytes().await.map_err(|e| state.error_page(e))?;
            file = Some((file_name, data.to_vec()));
        }
    }

    let Some((file_name, data)) = file else {
        return Ok(Html(pages::upload_page(Some(&UploadNotice::Error(
            "No file selected".to_string(),
        )))));
    };
    if file_name.is_empty() {
        return Ok(Html(pages::upload_page(Some(&UploadNotice::Error(
            "No file selected".to_string(),
        )))));
    }

    sinks::store_upload(&state.config.upload_dir, &file_name, &data)
        .await
        .map_err(|e| state.error_page(e))?;

    Ok(Html(pages::upload_page(Some(&UploadNotice::Success(
        format!("File '{file_name}' uploaded successfully!"),
    )))))
}

// =============================================================================
// Session Demo (insecure deserialization)
// =============================================================================

/// Handler for saving a session: serializes the demo payload into the
/// `session_data` cookie and reports what was stored.
pub async fn session_save(State(state): State<AppState>) -> Result<Response, ErrorPage> {
    let payload = SessionPayload::sample();
    let cookie_value = sinks::seal_session(&payload).map_err(|e| state.error_page(e))?;
    let cookie = format!("{SESSION_COOKIE_NAME}={cookie_value}; Path=/");

    let page = Html(pages::session_page(&SessionView::Saved(payload)));
    Ok(([(header::SET_COOKIE, cookie)], page).into_response())
}

/// Handler for loading a session: decodes whatever the cookie holds and
/// displays it. Decode faults are shown in the page.
pub async fn session_load(headers: HeaderMap) -> Html<String> {
    let Some(cookie_value) = extract_session_cookie(&headers) else {
        return Html(pages::session_page(&SessionView::Failed(
            "No session data found".to_string(),
        )));
    };

    match sinks::open_session(&cookie_value) {
        Ok(payload) => Html(pages::session_page(&SessionView::Loaded(payload))),
        Err(fault) => Html(pages::session_page(&SessionView::Failed(fault.to_string()))),
    }
}

/// Extract the session cookie value from the Cookie header.
fn extract_session_cookie(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    for cookie in cookies.split(';') {
        let cookie = cookie.trim();
        if let Some(value) = cookie.strip_prefix(&format!("{SESSION_COOKIE_NAME}=")) {
            return Some(value.to_string());
        }
    }
    None
}

// =============================================================================
// Command Runner (command injection)
// =============================================================================

/// Command form data.
#[derive(Debug, Deserialize)]
pub struct CommandForm {
    #[serde(default)]
    pub cmd: String,
}

/// Handler for the command form.
pub async fn command_form() -> Html<String> {
    Html(pages::command_page(None, None))
}

/// Handler for command submission. An empty field just re-renders the
/// form; a shell fault fills the page's error slot.
pub async fn command_submit(Form(form): Form<CommandForm>) -> Html<String> {
    if form.cmd.is_empty() {
        return Html(pages::command_page(None, None));
    }

    match sinks::run_shell(&form.cmd).await {
        Ok(output) => Html(pages::command_page(Some(&output), None)),
        Err(fault) => Html(pages::command_page(None, Some(&fault.to_string()))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_cookie(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_cookie_extraction_finds_the_session_value() {
        let headers = headers_with_cookie("a=1; session_data=abc123; b=2");
        assert_eq!(extract_session_cookie(&headers).as_deref(), Some("abc123"));
    }

    #[test]
    fn test_cookie_extraction_handles_absence() {
        assert_eq!(extract_session_cookie(&HeaderMap::new()), None);

        let headers = headers_with_cookie("other=1");
        assert_eq!(extract_session_cookie(&headers), None);
    }
}
