//! SMTP transport built on lettre.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::Error as SmtpError;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tokio::net::TcpStream;
use tracing::{debug, warn};

use super::MailError;
use super::settings::{SmtpSettings, TlsMode};
use crate::domain::delivery::{DeliveryFailure, TransportInfo, TransportKind};
use crate::domain::entities::OutboundEmail;
use crate::domain::transport::MailTransport;

/// SMTP reply codes that mean the credentials were refused.
const AUTH_FAILURE_CODES: [&str; 3] = ["530", "534", "535"];

/// Sends mail through an SMTP relay such as Gmail.
///
/// Every send and verification starts with a plain TCP connect bounded by
/// the connection timeout, so an unroutable host fails after that timeout
/// alone. The SMTP session that follows is bounded by the greeting timeout
/// for a verification, and by the greeting plus socket timeouts for a send.
/// lettre additionally applies the socket timeout to every read and write.
pub struct SmtpTransport {
    name: String,
    host: String,
    port: u16,
    connection_timeout: Duration,
    greeting_timeout: Duration,
    send_budget: Duration,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpTransport {
    /// Builds the transport. No connection is opened until the first send or
    /// verification.
    ///
    /// # Errors
    ///
    /// Returns [`MailError::Smtp`] if the TLS parameters for `host` cannot be
    /// constructed.
    pub fn new(settings: SmtpSettings) -> Result<Self, MailError> {
        let mut builder = match settings.tls {
            TlsMode::None => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&settings.host),
            TlsMode::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)
                .map_err(|e| MailError::Smtp(e.to_string()))?,
            TlsMode::StartTls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
                .map_err(|e| MailError::Smtp(e.to_string()))?,
        };

        builder = builder
            .port(settings.port)
            .timeout(Some(settings.socket_timeout));

        if !settings.username.is_empty() {
            builder = builder.credentials(Credentials::new(
                settings.username.clone(),
                settings.password.clone(),
            ));
        }

        Ok(Self {
            name: settings.name,
            host: settings.host,
            port: settings.port,
            connection_timeout: settings.connection_timeout,
            greeting_timeout: settings.greeting_timeout,
            send_budget: settings.greeting_timeout + settings.socket_timeout,
            transport: builder.build(),
        })
    }

    /// Opens and drops a TCP connection to the relay within the connection
    /// timeout.
    async fn check_connect(&self) -> Result<(), DeliveryFailure> {
        let connect = TcpStream::connect((self.host.as_str(), self.port));

        match tokio::time::timeout(self.connection_timeout, connect).await {
            Err(_) => Err(self.timed_out(self.connection_timeout, "the connection")),
            Ok(Err(e)) => Err(DeliveryFailure::unreachable(format!(
                "{} {}:{} connection failed: {e}",
                self.name, self.host, self.port
            ))),
            Ok(Ok(_stream)) => Ok(()),
        }
    }

    /// Converts an [`OutboundEmail`] into a lettre message with a generated
    /// `Message-ID`, which is returned alongside it.
    fn build_message(&self, email: &OutboundEmail) -> Result<(Message, String), DeliveryFailure> {
        let from_address: Address = email.from.address.parse().map_err(|_| {
            DeliveryFailure::message_invalid(format!(
                "invalid sender address: {}",
                email.from.address
            ))
        })?;

        let to: Mailbox = email.to.parse().map_err(|_| {
            DeliveryFailure::provider_rejected(format!("malformed recipient address: {}", email.to))
        })?;

        let message_id = generate_message_id(from_address.domain());
        let display_name = (!email.from.name.is_empty()).then(|| email.from.name.clone());
        let from = Mailbox::new(display_name, from_address);

        let mut builder = Message::builder()
            .from(from)
            .to(to)
            .subject(email.subject.clone())
            .message_id(Some(message_id.clone()));

        if let Some(reply_to) = &email.reply_to {
            match reply_to.parse::<Mailbox>() {
                Ok(mailbox) => builder = builder.reply_to(mailbox),
                Err(_) => warn!(
                    reply_to = %reply_to,
                    "Reply-To is not a valid mailbox, sending without it"
                ),
            }
        }

        let message = builder
            .multipart(MultiPart::alternative_plain_html(
                email.text.clone(),
                email.html.clone(),
            ))
            .map_err(|e| DeliveryFailure::message_invalid(e.to_string()))?;

        Ok((message, message_id))
    }

    fn timed_out(&self, budget: Duration, phase: &str) -> DeliveryFailure {
        DeliveryFailure::unreachable(format!(
            "{} {}:{} did not complete {} within {}ms",
            self.name,
            self.host,
            self.port,
            phase,
            budget.as_millis()
        ))
    }
}

#[async_trait]
impl MailTransport for SmtpTransport {
    fn info(&self) -> TransportInfo {
        TransportInfo::new(self.name.clone(), TransportKind::Smtp)
    }

    async fn send(&self, email: &OutboundEmail) -> Result<String, DeliveryFailure> {
        let (message, message_id) = self.build_message(email)?;

        self.check_connect().await?;

        debug!(transport = %self.name, to = %email.to, "Sending via SMTP");

        match tokio::time::timeout(self.send_budget, self.transport.send(message)).await {
            Err(_) => Err(self.timed_out(self.send_budget, "the send")),
            Ok(Err(e)) => Err(classify_smtp_error(&e)),
            Ok(Ok(_response)) => Ok(message_id),
        }
    }

    async fn verify(&self) -> Result<(), DeliveryFailure> {
        self.check_connect().await?;

        match tokio::time::timeout(self.greeting_timeout, self.transport.test_connection()).await {
            Err(_) => Err(self.timed_out(self.greeting_timeout, "the greeting")),
            Ok(Err(e)) => Err(classify_smtp_error(&e)),
            Ok(Ok(true)) => Ok(()),
            Ok(Ok(false)) => Err(DeliveryFailure::unreachable(format!(
                "{}:{} accepted the connection but did not answer NOOP",
                self.host, self.port
            ))),
        }
    }
}

/// Maps a lettre SMTP error onto the delivery failure taxonomy.
fn classify_smtp_error(error: &SmtpError) -> DeliveryFailure {
    let message = error.to_string();

    if error.is_timeout() || error.is_tls() {
        return DeliveryFailure::unreachable(message);
    }

    if let Some(code) = error.status() {
        let code = code.to_string();
        if AUTH_FAILURE_CODES.contains(&code.as_str()) {
            return DeliveryFailure::auth_rejected(message);
        }
        return DeliveryFailure::provider_rejected(message);
    }

    if error.is_client() {
        return DeliveryFailure::auth_rejected(message);
    }

    DeliveryFailure::unreachable(message)
}

/// Generates a `Message-ID` of the form `<millis.random@domain>`.
fn generate_message_id(domain: &str) -> String {
    let token: [u8; 8] = rand::random();
    format!(
        "<{}.{}@{}>",
        Utc::now().timestamp_millis(),
        hex::encode(token),
        domain
    )
}
