//! Email body templates using Jinja2 syntax.
//!
//! Templates are compiled into the binary. Names ending in `.html` are
//! auto-escaped; `.txt` templates are rendered verbatim.

use minijinja::Environment;
use serde::Serialize;
use std::sync::OnceLock;

use super::EmailError;

static TEMPLATE_ENV: OnceLock<Environment<'static>> = OnceLock::new();

const MATCH_HTML: &str = "match_notification.html";
const MATCH_TEXT: &str = "match_notification.txt";
const GENERAL_HTML: &str = "notification.html";
const GENERAL_TEXT: &str = "notification.txt";

pub const MATCH_EMAIL_SUBJECT: &str = "Potential Match Found - Lost & Found";
pub const GENERAL_EMAIL_SUBJECT: &str = "New notification - Lost & Found";

fn init_environment() -> Environment<'static> {
    let mut env = Environment::new();

    for (name, source) in [
        (
            MATCH_HTML,
            include_str!("../../../templates/email/match_notification.html"),
        ),
        (
            MATCH_TEXT,
            include_str!("../../../templates/email/match_notification.txt"),
        ),
        (
            GENERAL_HTML,
            include_str!("../../../templates/email/notification.html"),
        ),
        (
            GENERAL_TEXT,
            include_str!("../../../templates/email/notification.txt"),
        ),
    ] {
        if let Err(e) = env.add_template(name, source) {
            tracing::warn!("Failed to load email template {}: {}", name, e);
        }
    }

    env
}

fn get_environment() -> &'static Environment<'static> {
    TEMPLATE_ENV.get_or_init(init_environment)
}

/// Values available to the match notification templates
#[derive(Debug, Clone, Serialize)]
pub struct MatchEmailContext {
    pub recipient_name: String,
    pub match_status: String,
    /// Creation date, already formatted for display
    pub created_on: String,
    pub notes: Option<String>,
    pub custom_message: Option<String>,
    pub matches_url: String,
}

/// Values available to the general notification templates
#[derive(Debug, Clone, Serialize)]
pub struct GeneralEmailContext {
    pub recipient_name: String,
    pub message: String,
    pub app_url: String,
}

/// Rendered subject, HTML body and plain-text body
#[derive(Debug, Clone)]
pub struct RenderedEmail {
    pub subject: String,
    pub html: String,
    pub text: String,
}

fn render_pair<C: Serialize>(
    subject: &str,
    html: &str,
    text: &str,
    ctx: &C,
) -> Result<RenderedEmail, EmailError> {
    let env = get_environment();

    let render = |name: &str| {
        env.get_template(name)
            .and_then(|t| t.render(ctx))
            .map_err(|e| EmailError::Template(format!("{}: {}", name, e)))
    };

    Ok(RenderedEmail {
        subject: subject.to_string(),
        html: render(html)?,
        text: render(text)?,
    })
}

pub fn render_match_email(ctx: &MatchEmailContext) -> Result<RenderedEmail, EmailError> {
    render_pair(MATCH_EMAIL_SUBJECT, MATCH_HTML, MATCH_TEXT, ctx)
}

pub fn render_general_email(ctx: &GeneralEmailContext) -> Result<RenderedEmail, EmailError> {
    render_pair(GENERAL_EMAIL_SUBJECT, GENERAL_HTML, GENERAL_TEXT, ctx)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> MatchEmailContext {
        MatchEmailContext {
            recipient_name: "Dana <script>".to_string(),
            match_status: "pending".to_string(),
            created_on: "2025-03-14".to_string(),
            notes: Some("Same brand and colour".to_string()),
            custom_message: None,
            matches_url: "http://localhost:5173/matches".to_string(),
        }
    }

    #[test]
    fn test_html_is_escaped_text_is_not() {
        let email = render_match_email(&context()).unwrap();

        assert_eq!(email.subject, MATCH_EMAIL_SUBJECT);
        assert!(email.html.contains("Dana &lt;script&gt;"));
        assert!(email.text.contains("Hello Dana <script>,"));
        assert!(email.text.contains("- Notes: Same brand and colour"));
    }

    #[test]
    fn test_custom_message_is_optional() {
        let email = render_match_email(&context()).unwrap();
        assert!(!email.html.contains("Message from the team"));

        let ctx = MatchEmailContext {
            custom_message: Some("Please bring ID".to_string()),
            ..context()
        };
        let email = render_match_email(&ctx).unwrap();
        assert!(email.html.contains("Please bring ID"));
        assert!(email.text.contains("Message from the team: \"Please bring ID\""));
    }

    #[test]
    fn test_general_email_carries_message() {
        let email = render_general_email(&GeneralEmailContext {
            recipient_name: "Sam".to_string(),
            message: "Your item was approved".to_string(),
            app_url: "http://localhost:5173".to_string(),
        })
        .unwrap();

        assert_eq!(email.subject, GENERAL_EMAIL_SUBJECT);
        assert!(email.text.contains("Your item was approved"));
        assert!(email.html.contains("Hello Sam,"));
    }
}
