use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::core::config::SmtpConfig;
use crate::core::error::{AppError, Result};

/// Client for outbound status-update emails over SMTP.
///
/// Disabled configurations construct a client with no transport; sends
/// become no-ops so callers never need to special-case it.
pub struct EmailClient {
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    from: Mailbox,
}

impl EmailClient {
    pub fn new(config: &SmtpConfig) -> Result<Self> {
        let from = config
            .from_address
            .parse::<Mailbox>()
            .map_err(|e| AppError::Internal(format!("Invalid SMTP_FROM address: {}", e)))?;

        let transport = if config.enabled {
            let credentials = Credentials::new(config.username.clone(), config.password.clone());
            let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
                .map_err(|e| {
                    AppError::Internal(format!("Failed to create SMTP transport: {}", e))
                })?
                .port(config.port)
                .credentials(credentials)
                .build();
            Some(transport)
        } else {
            None
        };

        Ok(Self { transport, from })
    }

    pub fn is_configured(&self) -> bool {
        self.transport.is_some()
    }

    /// Send a status-update email. When the ticket originated from an
    /// inbound email, `in_reply_to` threads the update onto that message.
    pub async fn send_status_update(
        &self,
        to: &str,
        subject: &str,
        body: String,
        in_reply_to: Option<&str>,
    ) -> Result<()> {
        let Some(transport) = self.transport.as_ref() else {
            tracing::debug!("SMTP disabled, skipping status email to {}", to);
            return Ok(());
        };

        let to = to
            .parse::<Mailbox>()
            .map_err(|e| AppError::Validation(format!("Invalid recipient address: {}", e)))?;

        let mut builder = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(subject);

        if let Some(message_id) = in_reply_to {
            builder = builder
                .in_reply_to(message_id.to_string())
                .references(message_id.to_string());
        }

        let email = builder
            .body(body)
            .map_err(|e| AppError::Internal(format!("Failed to build email: {}", e)))?;

        transport
            .send(email)
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("Failed to send email: {}", e)))?;

        Ok(())
    }
}
