use std::env;

use anyhow::{Context, Result};

/// Central configuration loaded from environment variables.
///
/// All secrets come from env vars (never hardcoded). The .env file
/// is loaded automatically at startup via dotenvy.
pub struct Config {
    pub db_path: String,
    /// SMTP relay host for notification email (defaults to smtp.gmail.com).
    pub smtp_host: String,
    /// SMTP submission port (defaults to 587, STARTTLS).
    pub smtp_port: u16,
    /// Account the notification email is sent from (SENDER_EMAIL).
    pub sender_email: String,
    /// App password for the sender account (SENDER_PASSWORD).
    pub sender_password: String,
    /// Operator address that receives the notifications (NOTIFY_EMAIL).
    pub notify_email: String,
    /// Max admitted submissions per client per window (default 3).
    pub rate_limit_max: usize,
    /// Rate limit window in seconds (default 3600).
    pub rate_limit_window_secs: i64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Everything has a default except the SMTP credentials — without
    /// those the server still runs, it just skips email notifications.
    pub fn load() -> Result<Self> {
        let smtp_port = match env::var("SMTP_PORT") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("SMTP_PORT is not a valid port: {raw}"))?,
            Err(_) => 587,
        };
        let rate_limit_max = match env::var("POSTBOX_RATE_LIMIT") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("POSTBOX_RATE_LIMIT is not a valid count: {raw}"))?,
            Err(_) => 3,
        };
        let rate_limit_window_secs = match env::var("POSTBOX_RATE_WINDOW_SECS") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("POSTBOX_RATE_WINDOW_SECS is not valid: {raw}"))?,
            Err(_) => 3600,
        };

        Ok(Self {
            db_path: env::var("POSTBOX_DB_PATH").unwrap_or_else(|_| "./postbox.db".to_string()),
            smtp_host: env::var("SMTP_HOST").unwrap_or_else(|_| "smtp.gmail.com".to_string()),
            smtp_port,
            sender_email: env::var("SENDER_EMAIL").unwrap_or_default(),
            sender_password: env::var("SENDER_PASSWORD").unwrap_or_default(),
            notify_email: env::var("NOTIFY_EMAIL").unwrap_or_default(),
            rate_limit_max,
            rate_limit_window_secs,
        })
    }

    /// Whether enough SMTP settings are present to send notifications.
    pub fn smtp_configured(&self) -> bool {
        !self.sender_email.is_empty()
            && !self.sender_password.is_empty()
            && !self.notify_email.is_empty()
    }
}
