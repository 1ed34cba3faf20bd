use anyhow::Context;
use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::config::SmtpConfig;

/// A message for the site owner. Sender and recipient come from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub reply_to: String,
    pub subject: String,
    pub body: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: OutgoingMail) -> anyhow::Result<()>;
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl SmtpMailer {
    pub fn new(cfg: &SmtpConfig) -> anyhow::Result<Self> {
        let from: Mailbox = cfg.from.parse().context("invalid FEEDBACK_FROM address")?;
        let to: Mailbox = cfg.feedback_to.parse().context("invalid FEEDBACK_TO address")?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::relay(&cfg.host)
            .with_context(|| format!("smtp relay {}", cfg.host))?
            .port(cfg.port);
        if let (Some(user), Some(pass)) = (&cfg.username, &cfg.password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        Ok(Self {
            transport: builder.build(),
            from,
            to,
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, mail: OutgoingMail) -> anyhow::Result<()> {
        let reply_to: Mailbox = mail.reply_to.parse().context("invalid reply-to address")?;
        let message = Message::builder()
            .from(self.from.clone())
            .reply_to(reply_to)
            .to(self.to.clone())
            .subject(mail.subject)
            .header(ContentType::TEXT_PLAIN)
            .body(mail.body)
            .context("build feedback email")?;

        self.transport.send(message).await.context("smtp send")?;
        Ok(())
    }
}

/// Keeps sent mail in memory.
#[cfg(test)]
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: std::sync::Mutex<Vec<OutgoingMail>>,
}

#[cfg(test)]
#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, mail: OutgoingMail) -> anyhow::Result<()> {
        self.sent.lock().expect("mailer lock").push(mail);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(from: &str) -> SmtpConfig {
        SmtpConfig {
            host: "smtp.example.com".into(),
            port: 587,
            username: Some("user".into()),
            password: Some("pass".into()),
            from: from.into(),
            feedback_to: "owner@example.com".into(),
        }
    }

    #[test]
    fn rejects_bad_addresses_before_connecting() {
        let err = SmtpMailer::new(&config("not an address")).err().unwrap();
        assert!(err.to_string().contains("FEEDBACK_FROM"));

        let mut cfg = config("noreply@example.com");
        cfg.feedback_to = "nobody".into();
        let err = SmtpMailer::new(&cfg).err().unwrap();
        assert!(err.to_string().contains("FEEDBACK_TO"));
    }
}
