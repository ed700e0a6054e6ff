use async_trait::async_trait;
use lettre::{
    message::{Mailbox, MultiPart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use uuid::Uuid;

use super::{EmailError, EmailTransport, OutgoingEmail};
use crate::core::config::EmailConfig;

/// Sends email through an SMTP relay using STARTTLS
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &EmailConfig) -> Result<Self, EmailError> {
        let from: Mailbox = config.from_address.parse()?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port);

        if let (Some(user), Some(pass)) = (&config.smtp_user, &config.smtp_password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        tracing::info!(
            "SMTP mailer configured: host={}, port={}, from={}",
            config.smtp_host,
            config.smtp_port,
            from
        );

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }

    fn message_id(&self) -> String {
        format!("<{}@{}>", Uuid::new_v4(), self.from.email.domain())
    }
}

#[async_trait]
impl EmailTransport for SmtpMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<String, EmailError> {
        let message_id = self.message_id();

        let message = Message::builder()
            .from(self.from.clone())
            .to(email.to.parse()?)
            .subject(email.subject.clone())
            .message_id(Some(message_id.clone()))
            .multipart(MultiPart::alternative_plain_html(
                email.text.clone(),
                email.html.clone(),
            ))
            .map_err(|e| EmailError::Build(e.to_string()))?;

        self.transport.send(message).await?;

        tracing::info!(to = %email.to, message_id = %message_id, "Email sent");
        Ok(message_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn config(from: &str) -> EmailConfig {
        EmailConfig {
            smtp_host: "smtp.example.com".to_string(),
            smtp_port: 587,
            smtp_user: Some("mailer".to_string()),
            smtp_password: Some("secret".to_string()),
            from_address: from.to_string(),
            send_timeout: Duration::from_secs(5),
        }
    }

    #[tokio::test]
    async fn test_message_id_uses_sender_domain() {
        let mailer = SmtpMailer::new(&config("Lost & Found <noreply@lostandfound.test>")).unwrap();
        let id = mailer.message_id();

        assert!(id.starts_with('<'));
        assert!(id.ends_with("@lostandfound.test>"));
    }

    #[tokio::test]
    async fn test_invalid_sender_rejected() {
        let result = SmtpMailer::new(&config("not an address"));
        assert!(matches!(result, Err(EmailError::Address(_))));
    }
}
