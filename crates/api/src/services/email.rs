//! Email service for sending invitation emails.
//!
//! Supports multiple providers:
//! - `console`: Logs emails to console (development)
//! - `sendgrid`: Uses the SendGrid API
//! - `smtp`: Sends via SMTP server (pending full implementation)
//!
//! The provider and credentials are explicit configuration handed to the
//! service at construction time; nothing reads environment state at send
//! time.

use crate::config::EmailConfig;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Errors that can occur during email operations.
#[derive(Debug, Error)]
pub enum EmailError {
    #[error("Email service not configured")]
    NotConfigured,

    #[error("Failed to send email: {0}")]
    SendFailed(String),

    #[error("Provider error: {0}")]
    ProviderError(String),
}

/// Email message to be sent.
#[derive(Debug, Clone)]
pub struct EmailMessage {
    /// Recipient email address
    pub to: String,
    /// Recipient name (optional)
    pub to_name: Option<String>,
    /// Email subject
    pub subject: String,
    /// Plain text body
    pub body_text: String,
    /// HTML body (optional)
    pub body_html: Option<String>,
}

/// Email service for sending transactional emails.
#[derive(Clone)]
pub struct EmailService {
    config: Arc<EmailConfig>,
}

impl EmailService {
    /// Creates a new EmailService with the given configuration.
    pub fn new(config: EmailConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Check if email service is enabled.
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Send an email message.
    pub async fn send(&self, message: EmailMessage) -> Result<(), EmailError> {
        if !self.config.enabled {
            debug!(
                to = %message.to,
                subject = %message.subject,
                "Email service disabled, skipping send"
            );
            return Ok(());
        }

        match self.config.provider.as_str() {
            "console" => self.send_console(message).await,
            "sendgrid" => self.send_sendgrid(message).await,
            "smtp" => self.send_smtp(message).await,
            provider => {
                error!(provider = %provider, "Unknown email provider");
                Err(EmailError::NotConfigured)
            }
        }
    }

    /// Send an invitation email with the invite link.
    pub async fn send_invitation_email(
        &self,
        to_email: &str,
        to_name: Option<&str>,
        role: &str,
        invite_link: &str,
    ) -> Result<(), EmailError> {
        let subject = "You're invited!";

        let greeting = to_name.unwrap_or("there");

        let body_text = format!(
            r#"Hello {greeting},

You have been invited to join a project as a {role}.

Please follow the link below to accept the invitation:

{invite_link}

If you weren't expecting this invitation, you can safely ignore this email.

Best,
{sender}"#,
            sender = self.config.sender_name,
        );

        let body_html = if self.config.template_style == "html" {
            Some(format!(
                r#"<div style="font-family: Arial, sans-serif; line-height: 1.5; padding: 20px;">
    <h2>Hello {greeting},</h2>
    <p>You have been invited to join a project as a <strong>{role}</strong>.</p>
    <p>Please click the link below to accept your invitation:</p>
    <a href="{invite_link}"
       style="display:inline-block; padding:10px 15px; color:white; background:#007BFF; border-radius:5px; text-decoration:none;"
       target="_blank">
       Accept Invitation
    </a>
    <br/><br/>
    <p style="color: #666; font-size: 14px;">If you weren't expecting this invitation, you can safely ignore this email.</p>
    <p>Best,<br/>{sender}</p>
</div>"#,
                sender = self.config.sender_name,
            ))
        } else {
            None
        };

        let message = EmailMessage {
            to: to_email.to_string(),
            to_name: to_name.map(|s| s.to_string()),
            subject: subject.to_string(),
            body_text,
            body_html,
        };

        self.send(message).await
    }

    /// Console provider - logs email to console (for development).
    async fn send_console(&self, message: EmailMessage) -> Result<(), EmailError> {
        info!(
            to = %message.to,
            to_name = ?message.to_name,
            subject = %message.subject,
            from = %self.config.sender_email,
            from_name = %self.config.sender_name,
            "Email (console provider)"
        );

        info!(
            body_text = %message.body_text,
            "Email body (plain text)"
        );

        if let Some(html) = &message.body_html {
            debug!("Email body (HTML) - {} chars", html.len());
        }

        Ok(())
    }

    /// SendGrid provider - sends via the SendGrid v3 API.
    async fn send_sendgrid(&self, message: EmailMessage) -> Result<(), EmailError> {
        if self.config.sendgrid_api_key.is_empty() {
            return Err(EmailError::NotConfigured);
        }

        let client = reqwest::Client::new();

        let mut personalizations = serde_json::json!({
            "to": [{
                "email": message.to
            }]
        });

        if let Some(name) = &message.to_name {
            personalizations["to"][0]["name"] = serde_json::json!(name);
        }

        let mut content = vec![serde_json::json!({
            "type": "text/plain",
            "value": message.body_text
        })];

        if let Some(html) = &message.body_html {
            content.push(serde_json::json!({
                "type": "text/html",
                "value": html
            }));
        }

        let body = serde_json::json!({
            "personalizations": [personalizations],
            "from": {
                "email": self.config.sender_email,
                "name": self.config.sender_name
            },
            "subject": message.subject,
            "content": content
        });

        let response = client
            .post("https://api.sendgrid.com/v3/mail/send")
            .header(
                "Authorization",
                format!("Bearer {}", self.config.sendgrid_api_key),
            )
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| EmailError::SendFailed(format!("SendGrid request failed: {}", e)))?;

        if response.status().is_success() {
            info!(
                to = %message.to,
                subject = %message.subject,
                "Email sent via SendGrid"
            );
            Ok(())
        } else {
            let status = response.status();
            let error_body = response.text().await.unwrap_or_default();
            error!(
                status = %status,
                error = %error_body,
                "SendGrid API error"
            );
            Err(EmailError::ProviderError(format!(
                "SendGrid returned {}: {}",
                status, error_body
            )))
        }
    }

    /// SMTP provider - sends via SMTP server.
    async fn send_smtp(&self, message: EmailMessage) -> Result<(), EmailError> {
        if self.config.smtp_host.is_empty() {
            return Err(EmailError::NotConfigured);
        }

        // TODO: implement with the lettre crate; console/sendgrid cover
        // current deployments.
        warn!(
            provider = "smtp",
            host = %self.config.smtp_host,
            port = %self.config.smtp_port,
            to = %message.to,
            "SMTP provider configured but not implemented; email not sent"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> EmailConfig {
        EmailConfig {
            enabled: true,
            provider: "console".to_string(),
            sendgrid_api_key: String::new(),
            smtp_host: String::new(),
            smtp_port: 587,
            sender_email: "hello@projecthub.example".to_string(),
            sender_name: "Project Hub".to_string(),
            template_style: "html".to_string(),
        }
    }

    #[test]
    fn test_email_service_creation() {
        let service = EmailService::new(test_config());
        assert!(service.is_enabled());
    }

    #[test]
    fn test_email_service_disabled() {
        let mut config = test_config();
        config.enabled = false;
        let service = EmailService::new(config);
        assert!(!service.is_enabled());
    }

    #[tokio::test]
    async fn test_send_console_email() {
        let service = EmailService::new(test_config());

        let message = EmailMessage {
            to: "student@example.com".to_string(),
            to_name: Some("Test Student".to_string()),
            subject: "Test Subject".to_string(),
            body_text: "Test body".to_string(),
            body_html: Some("<p>Test body</p>".to_string()),
        };

        assert!(service.send(message).await.is_ok());
    }

    #[tokio::test]
    async fn test_send_disabled_silently_succeeds() {
        let mut config = test_config();
        config.enabled = false;
        let service = EmailService::new(config);

        let message = EmailMessage {
            to: "student@example.com".to_string(),
            to_name: None,
            subject: "Test".to_string(),
            body_text: "Test".to_string(),
            body_html: None,
        };

        assert!(service.send(message).await.is_ok());
    }

    #[tokio::test]
    async fn test_send_invitation_email() {
        let service = EmailService::new(test_config());

        let result = service
            .send_invitation_email(
                "student@example.com",
                Some("Test Student"),
                "Student",
                "http://localhost:3000/accept-invitation?token=abc&invitationId=def",
            )
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_sendgrid_without_key_is_not_configured() {
        let mut config = test_config();
        config.provider = "sendgrid".to_string();
        let service = EmailService::new(config);

        let message = EmailMessage {
            to: "student@example.com".to_string(),
            to_name: None,
            subject: "Test".to_string(),
            body_text: "Test".to_string(),
            body_html: None,
        };

        let result = service.send(message).await;
        assert!(matches!(result, Err(EmailError::NotConfigured)));
    }

    #[tokio::test]
    async fn test_unknown_provider_rejected() {
        let mut config = test_config();
        config.provider = "carrier-pigeon".to_string();
        let service = EmailService::new(config);

        let message = EmailMessage {
            to: "student@example.com".to_string(),
            to_name: None,
            subject: "Test".to_string(),
            body_text: "Test".to_string(),
            body_html: None,
        };

        let result = service.send(message).await;
        assert!(matches!(result, Err(EmailError::NotConfigured)));
    }
}
