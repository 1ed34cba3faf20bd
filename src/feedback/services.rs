use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use tracing::{error, info};

use crate::error::AppError;
use crate::feedback::mailer::{Mailer, OutgoingMail};

#[derive(Debug, Deserialize)]
pub struct FeedbackForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub fn compose(form: &FeedbackForm) -> Result<OutgoingMail, AppError> {
    let name = form.name.trim();
    let email = form.email.trim();
    let message = form.message.trim();

    if name.is_empty() || email.is_empty() || message.is_empty() {
        return Err(AppError::Validation(
            "Name, email and message are required.".into(),
        ));
    }
    if !is_valid_email(email) {
        return Err(AppError::Validation("Please enter a valid email address.".into()));
    }

    // keep the subject on one line
    let subject_name: String = name.chars().filter(|c| !c.is_control()).collect();
    Ok(OutgoingMail {
        reply_to: email.to_string(),
        subject: format!("Message from {subject_name}"),
        body: format!("Name: {name}\nEmail: {email}\n\nMessage:\n{message}"),
    })
}

/// Validate and send. A missing mailer is a send failure.
pub async fn send(mailer: Option<&dyn Mailer>, form: &FeedbackForm) -> Result<(), AppError> {
    let mail = compose(form)?;
    let Some(mailer) = mailer else {
        error!("feedback received but no mailer configured");
        return Err(AppError::Internal(anyhow::anyhow!("mailer not configured")));
    };
    mailer.send(mail).await.map_err(|e| {
        error!(error = %e, "feedback email failed");
        AppError::Internal(e)
    })?;
    info!("feedback email sent");
    Ok(())
}
