//! Outbound email.
//!
//! [`EmailTransport`] is the seam the notification dispatcher sends through;
//! [`SmtpMailer`] is the production implementation. Bodies are rendered from
//! templates in `templates/email/`.

mod smtp_mailer;
mod templates;

use async_trait::async_trait;
use thiserror::Error;

pub use smtp_mailer::SmtpMailer;
pub use templates::{
    render_general_email, render_match_email, GeneralEmailContext, MatchEmailContext, RenderedEmail,
};

/// Errors that can occur while building or sending an email
#[derive(Debug, Error)]
pub enum EmailError {
    /// SMTP transport-level failure (authentication, connection, etc.)
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled
    #[error("Email build error: {0}")]
    Build(String),

    /// A template failed to render
    #[error("Email template error: {0}")]
    Template(String),
}

/// A fully rendered message for one recipient
#[derive(Debug, Clone)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
    pub text: String,
}

#[async_trait]
pub trait EmailTransport: Send + Sync {
    /// Deliver one message, returning its Message-ID
    async fn send(&self, email: &OutgoingEmail) -> Result<String, EmailError>;
}
