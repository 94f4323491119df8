//! Outbound email delivery
//!
//! [`SmtpMailer`] wraps the `lettre` async SMTP transport (STARTTLS relay,
//! optional credentials). Services depend on the [`Mailer`] trait so tests
//! can substitute a recording implementation. Delivery failures surface to
//! the caller as `MailDelivery` errors; the reset-request flow must never
//! claim success when the relay refused the message.

use async_trait::async_trait;
use blog_common::{AppError, SmtpConfig};
use lettre::{
    message::header::ContentType, transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::{info, instrument};

/// Port for sending application email
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send the password-reset message carrying the tokenized link
    async fn send_password_reset(
        &self,
        to: &str,
        username: &str,
        reset_url: &str,
    ) -> Result<(), AppError>;
}

/// Compose the plain-text body of the reset message
fn reset_email_body(username: &str, reset_url: &str) -> String {
    format!(
        "Hi {username},\n\n\
         To reset your password, please visit the following link:\n\
         {reset_url}\n\n\
         The link expires in 30 minutes. If you did not make this request,\n\
         simply ignore this email and no changes will be made.\n"
    )
}

/// SMTP-backed mailer
pub struct SmtpMailer {
    config: SmtpConfig,
}

impl SmtpMailer {
    /// Create a mailer with the given SMTP configuration
    pub fn new(config: SmtpConfig) -> Self {
        Self { config }
    }

    fn transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, AppError> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.server)
            .map_err(|e| AppError::MailDelivery(e.to_string()))?
            .port(self.config.port);

        if let (Some(user), Some(pass)) = (&self.config.username, &self.config.password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        Ok(builder.build())
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    #[instrument(skip(self, reset_url))]
    async fn send_password_reset(
        &self,
        to: &str,
        username: &str,
        reset_url: &str,
    ) -> Result<(), AppError> {
        let email = Message::builder()
            .from(
                self.config
                    .from_address
                    .parse()
                    .map_err(|e| AppError::MailDelivery(format!("Bad sender address: {e}")))?,
            )
            .to(to
                .parse()
                .map_err(|e| AppError::MailDelivery(format!("Bad recipient address: {e}")))?)
            .subject("Password reset request")
            .header(ContentType::TEXT_PLAIN)
            .body(reset_email_body(username, reset_url))
            .map_err(|e| AppError::MailDelivery(e.to_string()))?;

        self.transport()?
            .send(email)
            .await
            .map_err(|e| AppError::MailDelivery(e.to_string()))?;

        info!(to = %to, "Password reset email sent");
        Ok(())
    }
}
