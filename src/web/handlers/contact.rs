// POST /api/contact — submit the contact form.
// GET  /api/contact — list recent submissions (admin), ?limit= (default 50).
//
// The POST handler is the submission pipeline: structural validation first,
// then the rate limiter (429), then the spam classifier (400). Only a
// validated, admitted, clean submission reaches the database.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::db::models::{ContactMessage, ContactMessageCreate};
use crate::notify;
use crate::web::{api_error, AppState, ClientIp};

pub async fn submit_message(
    State(state): State<AppState>,
    ClientIp(client_ip): ClientIp,
    Json(payload): Json<ContactMessageCreate>,
) -> Response {
    if let Err(detail) = validate(&payload) {
        return api_error(StatusCode::UNPROCESSABLE_ENTITY, detail);
    }

    let now = Utc::now();
    if !state.limiter.check_and_record(&client_ip, now) {
        warn!(client = %client_ip, "Rate limit exceeded");
        return api_error(
            StatusCode::TOO_MANY_REQUESTS,
            "Too many messages sent. Please wait before sending another message.",
        );
    }

    if state.classifier.classify(&payload.name, &payload.message) {
        warn!(client = %client_ip, "Submission flagged as spam");
        return api_error(
            StatusCode::BAD_REQUEST,
            "Message flagged as potential spam. Please revise your message.",
        );
    }

    let message = ContactMessage::new(payload, Some(client_ip), now);
    match state.db.insert_contact_message(&message).await {
        Ok(()) => {
            info!(name = %message.name, email = %message.email, "New contact message");
            notify::spawn_send(state.notifier.clone(), message.clone());
            Json(message).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to save contact message");
            api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to submit message. Please try again later.",
            )
        }
    }
}

#[derive(Deserialize, Default)]
pub struct ListQuery {
    pub limit: Option<usize>,
}

/// GET /api/contact — recent submissions, newest first.
pub async fn list_messages(
    State(state): State<AppState>,
    Query(params): Query<ListQuery>,
) -> Response {
    let limit = params.limit.unwrap_or(50).min(500);
    match state.db.get_recent_messages(limit as u32).await {
        Ok(messages) => Json(messages).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to retrieve contact messages");
            api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to retrieve messages",
            )
        }
    }
}

/// Structural validation of the submission fields. Runs before the rate
/// limiter so malformed requests never consume a slot.
fn validate(payload: &ContactMessageCreate) -> Result<(), &'static str> {
    let name_len = payload.name.trim().chars().count();
    if !(2..=100).contains(&name_len) {
        return Err("Name must be between 2 and 100 characters");
    }
    let message_len = payload.message.trim().chars().count();
    if !(10..=1000).contains(&message_len) {
        return Err("Message must be between 10 and 1000 characters");
    }
    if !is_plausible_email(&payload.email) {
        return Err("Invalid email address");
    }
    Ok(())
}

/// Loose email shape check — one @, a non-empty local part, and a dotted
/// domain. Real validation happens when the operator replies.
fn is_plausible_email(email: &str) -> bool {
    if email.contains(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains('@')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(name: &str, email: &str, message: &str) -> ContactMessageCreate {
        ContactMessageCreate {
            name: name.to_string(),
            email: email.to_string(),
            message: message.to_string(),
        }
    }

    #[test]
    fn test_validate_accepts_normal_submission() {
        let p = payload("Jane Doe", "jane@example.com", "I'd like to talk about a project.");
        assert!(validate(&p).is_ok());
    }

    #[test]
    fn test_validate_name_bounds() {
        let p = payload("J", "jane@example.com", "I'd like to talk about a project.");
        assert!(validate(&p).is_err());
        let p = payload(&"x".repeat(101), "jane@example.com", "A long enough message.");
        assert!(validate(&p).is_err());
        let p = payload(&"x".repeat(100), "jane@example.com", "A long enough message.");
        assert!(validate(&p).is_ok());
    }

    #[test]
    fn test_validate_message_bounds() {
        let p = payload("Jane", "jane@example.com", "too short");
        assert!(validate(&p).is_err());
        let p = payload("Jane", "jane@example.com", &"x".repeat(1001));
        assert!(validate(&p).is_err());
        let p = payload("Jane", "jane@example.com", &"x".repeat(1000));
        assert!(validate(&p).is_ok());
    }

    #[test]
    fn test_validate_whitespace_padding_does_not_count() {
        // 1 real character padded to look longer
        let p = payload("   J   ", "jane@example.com", "A long enough message.");
        assert!(validate(&p).is_err());
    }

    #[test]
    fn test_email_shapes() {
        assert!(is_plausible_email("jane@example.com"));
        assert!(is_plausible_email("jane.doe+tag@mail.example.co.uk"));
        assert!(!is_plausible_email("janeexample.com"));
        assert!(!is_plausible_email("@example.com"));
        assert!(!is_plausible_email("jane@nodot"));
        assert!(!is_plausible_email("jane@.example.com"));
        assert!(!is_plausible_email("jane@example.com."));
        assert!(!is_plausible_email("jane doe@example.com"));
        assert!(!is_plausible_email("jane@@example.com"));
    }
}
