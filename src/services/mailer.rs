use crate::config::SmtpConfig;
use crate::models::ContactMessage;
use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Delivery result of a notification attempt. Consumed for logging only;
/// never turned into an error the submission pipeline could see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyOutcome {
    Sent,
    Skipped,
    Failed,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn notify(&self, message: &ContactMessage) -> NotifyOutcome;
}

/// Notifies the site operator about new contact messages over SMTP.
pub struct SmtpMailer {
    config: SmtpConfig,
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
}

impl SmtpMailer {
    /// An incomplete configuration yields a mailer that skips every
    /// delivery rather than an error.
    pub fn new(config: SmtpConfig) -> Self {
        if !config.is_complete() {
            tracing::warn!("Email configuration incomplete, contact notifications will be skipped");
            return Self {
                config,
                transport: None,
            };
        }

        let creds = Credentials::new(config.user.clone(), config.password.clone());
        let transport = match AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host) {
            Ok(builder) => Some(builder.port(config.port).credentials(creds).build()),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Failed to create SMTP relay, contact notifications will be skipped"
                );
                None
            }
        };

        Self { config, transport }
    }

    fn compose(&self, message: &ContactMessage) -> Result<Message, anyhow::Error> {
        let from: Mailbox =
            format!("{} <{}>", self.config.from_name, self.config.from_email).parse()?;
        let to: Mailbox = self.config.from_email.parse()?;
        let reply_to: Mailbox = message.email.parse()?;

        let (text_body, html_body) = notification_bodies(message);

        let email = Message::builder()
            .from(from)
            .to(to)
            .reply_to(reply_to)
            .subject(format!("New contact form submission from {}", message.name))
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text_body),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html_body),
                    ),
            )?;

        Ok(email)
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn notify(&self, message: &ContactMessage) -> NotifyOutcome {
        let Some(transport) = self.transport.as_ref() else {
            tracing::debug!(id = %message.id, "Email configuration incomplete, skipping notification");
            return NotifyOutcome::Skipped;
        };

        let email = match self.compose(message) {
            Ok(email) => email,
            Err(e) => {
                tracing::error!(id = %message.id, error = %e, "Failed to compose notification email");
                return NotifyOutcome::Failed;
            }
        };

        match tokio::time::timeout(SEND_TIMEOUT, transport.send(email)).await {
            Ok(Ok(_)) => {
                tracing::info!(
                    id = %message.id,
                    email = %message.email,
                    "Notification email sent"
                );
                NotifyOutcome::Sent
            }
            Ok(Err(e)) => {
                tracing::error!(id = %message.id, error = %e, "Failed to send notification email");
                NotifyOutcome::Failed
            }
            Err(_) => {
                tracing::error!(id = %message.id, "Timed out sending notification email");
                NotifyOutcome::Failed
            }
        }
    }
}

fn notification_bodies(message: &ContactMessage) -> (String, String) {
    let received_at = message.created_at.format("%Y-%m-%d %H:%M:%S UTC");

    let text = format!(
        "New contact form submission\n\n\
         Name: {name}\n\
         Email: {email}\n\n\
         Message:\n{body}\n\n\
         Received at: {received_at}\n",
        name = message.name,
        email = message.email,
        body = message.message,
        received_at = received_at,
    );

    let html = format!(
        r#"<html>
<body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333;">
    <h2>New contact form submission</h2>
    <p><strong>Name:</strong> {name}</p>
    <p><strong>Email:</strong> <a href="mailto:{email}">{email}</a></p>
    <div style="background-color: #f9f9f9; padding: 15px; margin: 20px 0;">
        <p style="margin: 0; white-space: pre-wrap;">{body}</p>
    </div>
    <p style="color: #777; font-size: 12px;">
        Sent from the portfolio website contact form. Received at: {received_at}
    </p>
</body>
</html>
"#,
        name = message.name,
        email = message.email,
        body = message.message,
        received_at = received_at,
    );

    (text, html)
}

/// Mock mailer for testing
pub struct MockMailer {
    outcome: NotifyOutcome,
    send_count: AtomicU64,
}

impl MockMailer {
    pub fn new() -> Self {
        Self::with_outcome(NotifyOutcome::Sent)
    }

    pub fn failing() -> Self {
        Self::with_outcome(NotifyOutcome::Failed)
    }

    pub fn with_outcome(outcome: NotifyOutcome) -> Self {
        Self {
            outcome,
            send_count: AtomicU64::new(0),
        }
    }

    pub fn send_count(&self) -> u64 {
        self.send_count.load(Ordering::SeqCst)
    }
}

impl Default for MockMailer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Mailer for MockMailer {
    async fn notify(&self, message: &ContactMessage) -> NotifyOutcome {
        self.send_count.fetch_add(1, Ordering::SeqCst);

        tracing::info!(
            id = %message.id,
            email = %message.email,
            "[MOCK] Notification email would be sent"
        );

        self.outcome
    }
}
