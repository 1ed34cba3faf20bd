use std::path::PathBuf;

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from: String,
    pub feedback_to: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub upload_dir: PathBuf,
    pub static_dir: PathBuf,
    pub session_ttl_minutes: i64,
    pub max_upload_bytes: usize,
    pub smtp: Option<SmtpConfig>,
    /// Contact links shown on the landing page.
    pub contact_telegram: Option<String>,
    pub contact_whatsapp: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://fitlog.db?mode=rwc".into());
        let host = std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port = std::env::var("APP_PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(8080);
        let upload_dir = std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".into());
        let static_dir = std::env::var("STATIC_DIR").unwrap_or_else(|_| "static".into());
        let session_ttl_minutes = std::env::var("SESSION_TTL_MINUTES")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(60 * 24 * 7);
        let max_upload_mb = std::env::var("MAX_UPLOAD_MB")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(20);

        let smtp = match std::env::var("SMTP_HOST") {
            Ok(host) if !host.is_empty() => Some(SmtpConfig {
                host,
                port: std::env::var("SMTP_PORT")
                    .ok()
                    .and_then(|v| v.parse::<u16>().ok())
                    .unwrap_or(587),
                username: std::env::var("SMTP_USERNAME").ok(),
                password: std::env::var("SMTP_PASSWORD").ok(),
                from: std::env::var("FEEDBACK_FROM").context("FEEDBACK_FROM is required with SMTP_HOST")?,
                feedback_to: std::env::var("FEEDBACK_TO").context("FEEDBACK_TO is required with SMTP_HOST")?,
            }),
            _ => None,
        };

        let contact = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());

        Ok(Self {
            database_url,
            host,
            port,
            upload_dir: upload_dir.into(),
            static_dir: static_dir.into(),
            session_ttl_minutes,
            max_upload_bytes: max_upload_mb * 1024 * 1024,
            smtp,
            contact_telegram: contact("CONTACT_TELEGRAM_URL"),
            contact_whatsapp: contact("CONTACT_WHATSAPP_URL"),
        })
    }

    /// Settings for tests and local tooling: in-memory database, no SMTP.
    pub fn for_tests(upload_dir: PathBuf) -> Self {
        Self {
            database_url: "sqlite::memory:".into(),
            host: "127.0.0.1".into(),
            port: 0,
            upload_dir,
            static_dir: "static".into(),
            session_ttl_minutes: 60,
            max_upload_bytes: 5 * 1024 * 1024,
            smtp: None,
            contact_telegram: None,
            contact_whatsapp: None,
        }
    }
}
