// Operator notification — one email per accepted submission.
//
// Delivery is fire-and-forget: the notification task runs after the HTTP
// response is already decided, and a delivery failure is logged but never
// surfaced to the submitting client. The submission is in the database
// either way.

use std::sync::Arc;

use anyhow::{Context, Result};
use lettre::message::{Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::db::models::ContactMessage;

/// Sends the operator a notification email over SMTP (STARTTLS).
pub struct EmailNotifier {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl EmailNotifier {
    /// Build a notifier from config, or None when SMTP isn't configured.
    /// Running without notifications is a supported mode — submissions are
    /// still persisted and can be read back with `postbox messages`.
    pub fn from_config(config: &Config) -> Result<Option<Self>> {
        if !config.smtp_configured() {
            return Ok(None);
        }

        let from: Mailbox = config
            .sender_email
            .parse()
            .with_context(|| format!("SENDER_EMAIL is not a valid address: {}", config.sender_email))?;
        let to: Mailbox = config
            .notify_email
            .parse()
            .with_context(|| format!("NOTIFY_EMAIL is not a valid address: {}", config.notify_email))?;

        let credentials = Credentials::new(
            config.sender_email.clone(),
            config.sender_password.clone(),
        );
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            .with_context(|| format!("Failed to configure SMTP relay {}", config.smtp_host))?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Some(Self { mailer, from, to }))
    }

    /// Send the notification for one accepted submission.
    pub async fn send(&self, message: &ContactMessage) -> Result<()> {
        let email = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(format!("New portfolio contact from {}", message.name))
            .multipart(
                MultiPart::alternative()
                    .singlepart(SinglePart::plain(text_body(message)))
                    .singlepart(SinglePart::html(html_body(message))),
            )
            .context("Failed to build notification email")?;

        self.mailer
            .send(email)
            .await
            .context("SMTP send failed")?;
        Ok(())
    }
}

/// Spawn the notification in the background. Failures are logged, never
/// propagated — the submission has already succeeded.
pub fn spawn_send(notifier: Option<Arc<EmailNotifier>>, message: ContactMessage) {
    let Some(notifier) = notifier else {
        debug!("Email notifications disabled, skipping");
        return;
    };
    tokio::spawn(async move {
        match notifier.send(&message).await {
            Ok(()) => info!(name = %message.name, "Notification email sent"),
            Err(e) => warn!(error = %e, "Failed to send notification email"),
        }
    });
}

fn text_body(message: &ContactMessage) -> String {
    format!(
        "New contact form submission\n\n\
         Name: {}\n\
         Email: {}\n\
         Received: {}\n\n\
         {}\n",
        message.name,
        message.email,
        message.timestamp.format("%B %d, %Y at %H:%M UTC"),
        message.message,
    )
}

fn html_body(message: &ContactMessage) -> String {
    format!(
        "<html><body style=\"font-family: sans-serif; line-height: 1.6;\">\
         <h2>New contact form submission</h2>\
         <p><strong>Name:</strong> {}</p>\
         <p><strong>Email:</strong> <a href=\"mailto:{}\">{}</a></p>\
         <p><strong>Received:</strong> {}</p>\
         <blockquote style=\"border-left: 4px solid #ccc; padding-left: 12px;\">{}</blockquote>\
         </body></html>",
        escape_html(&message.name),
        escape_html(&message.email),
        escape_html(&message.email),
        message.timestamp.format("%B %d, %Y at %H:%M UTC"),
        escape_html(&message.message).replace('\n', "<br>"),
    )
}

/// Minimal HTML escaping — submission text is untrusted.
fn escape_html(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::ContactMessageCreate;
    use chrono::Utc;

    fn sample() -> ContactMessage {
        ContactMessage::new(
            ContactMessageCreate {
                name: "Jane <script>".to_string(),
                email: "jane@example.com".to_string(),
                message: "Line one\nLine two & three".to_string(),
            },
            None,
            Utc::now(),
        )
    }

    #[test]
    fn test_html_body_escapes_untrusted_text() {
        let html = html_body(&sample());
        assert!(html.contains("Jane &lt;script&gt;"));
        assert!(html.contains("Line one<br>Line two &amp; three"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_text_body_contains_fields() {
        let text = text_body(&sample());
        assert!(text.contains("jane@example.com"));
        assert!(text.contains("Line one\nLine two & three"));
    }

    #[test]
    fn test_notifier_disabled_without_smtp_settings() {
        let config = Config {
            db_path: "./postbox.db".to_string(),
            smtp_host: "smtp.gmail.com".to_string(),
            smtp_port: 587,
            sender_email: String::new(),
            sender_password: String::new(),
            notify_email: String::new(),
            rate_limit_max: 3,
            rate_limit_window_secs: 3600,
        };
        assert!(EmailNotifier::from_config(&config).unwrap().is_none());
    }
}
