use crate::config::SmtpConfig;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::sync::{Arc, Mutex};

/// Outgoing mail transport. A failure must be distinguishable from a
/// success, nothing more is required of it.
#[async_trait::async_trait]
pub trait IMailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> anyhow::Result<()>;
}

/// Sends mail through an SMTP relay and is used when not testing
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> Self {
        let credentials = Credentials::new(config.username.clone(), config.password.clone());
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
            .unwrap_or_else(|_| panic!("SMTP_HOST: {} to be a valid relay host.", config.host))
            .credentials(credentials)
            .build();
        let from = config
            .from
            .parse()
            .unwrap_or_else(|_| panic!("SMTP_FROM: {} to be a valid mailbox.", config.from));

        Self { transport, from }
    }
}

#[async_trait::async_trait]
impl IMailer for SmtpMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> anyhow::Result<()> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(to.parse().map_err(anyhow::Error::new)?)
            .subject(subject)
            .body(body.to_string())?;
        self.transport.send(message).await?;
        Ok(())
    }
}

/// An email captured by the `InMemoryMailer`
#[derive(Debug, Clone, PartialEq)]
pub struct Email {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Records outgoing mail instead of sending it. Addresses registered with
/// `fail_sends_to` report a transport failure.
#[derive(Clone, Default)]
pub struct InMemoryMailer {
    sent: Arc<Mutex<Vec<Email>>>,
    failing: Arc<Mutex<Vec<String>>>,
}

impl InMemoryMailer {
    pub fn new() -> Self {
        Default::default()
    }

    /// All mail sent so far, in send order
    pub fn sent(&self) -> Vec<Email> {
        self.sent.lock().unwrap().clone()
    }

    pub fn fail_sends_to(&self, address: &str) {
        self.failing.lock().unwrap().push(address.to_string());
    }
}

#[async_trait::async_trait]
impl IMailer for InMemoryMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> anyhow::Result<()> {
        if self.failing.lock().unwrap().iter().any(|a| a == to) {
            return Err(anyhow::anyhow!("Mail transport rejected message to: {}", to));
        }
        self.sent.lock().unwrap().push(Email {
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}
