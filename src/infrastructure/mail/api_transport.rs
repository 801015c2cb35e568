//! Transactional email API transport (Resend-compatible).

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::MailError;
use super::settings::ApiSettings;
use crate::domain::delivery::{DeliveryFailure, TransportInfo, TransportKind};
use crate::domain::entities::OutboundEmail;
use crate::domain::transport::MailTransport;

/// Error name returned when a send-only key calls a management endpoint.
const RESTRICTED_KEY_ERROR: &str = "restricted_api_key";

/// Request body for `POST /emails`.
#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    from: String,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<&'a str>,
}

/// Successful response body for `POST /emails`.
#[derive(Debug, Deserialize)]
struct SendEmailResponse {
    id: String,
}

/// Sends mail through an HTTP API authenticated with a bearer key.
pub struct ApiTransport {
    name: String,
    base_url: String,
    api_key: String,
    client: Client,
}

impl ApiTransport {
    /// Builds the transport with a client bounded by the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns [`MailError::Http`] if the HTTP client cannot be constructed.
    pub fn new(settings: ApiSettings) -> Result<Self, MailError> {
        let client = Client::builder()
            .connect_timeout(settings.timeout)
            .timeout(settings.timeout)
            .build()
            .map_err(|e| MailError::Http(e.to_string()))?;

        Ok(Self {
            name: settings.name,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key,
            client,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

#[async_trait]
impl MailTransport for ApiTransport {
    fn info(&self) -> TransportInfo {
        TransportInfo::new(self.name.clone(), TransportKind::Api)
    }

    async fn send(&self, email: &OutboundEmail) -> Result<String, DeliveryFailure> {
        let body = SendEmailRequest {
            from: email.from.mailbox(),
            to: [email.to.as_str()],
            subject: &email.subject,
            html: &email.html,
            text: &email.text,
            reply_to: email.reply_to.as_deref(),
        };

        debug!(transport = %self.name, to = %email.to, "Sending via API");

        let response = self
            .client
            .post(self.endpoint("emails"))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| classify_request_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(classify_status(status, &detail));
        }

        let sent: SendEmailResponse = response.json().await.map_err(|e| {
            DeliveryFailure::provider_rejected(format!("unexpected response body: {e}"))
        })?;

        Ok(sent.id)
    }

    async fn verify(&self) -> Result<(), DeliveryFailure> {
        let response = self
            .client
            .get(self.endpoint("domains"))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| classify_request_error(&e))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let detail = response.text().await.unwrap_or_default();
        if is_send_only_key(status, &detail) {
            debug!(transport = %self.name, "API key is restricted to sending");
            return Ok(());
        }

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(classify_status(status, &detail)),
            _ if status.is_server_error() => Err(classify_status(status, &detail)),
            _ => Ok(()),
        }
    }
}

/// Send-only keys cannot list domains but are valid for delivery.
fn is_send_only_key(status: StatusCode, detail: &str) -> bool {
    status == StatusCode::UNAUTHORIZED && detail.contains(RESTRICTED_KEY_ERROR)
}

/// Transport-level failures never reached the provider's application.
fn classify_request_error(error: &reqwest::Error) -> DeliveryFailure {
    DeliveryFailure::unreachable(error.to_string())
}

/// Maps a non-success HTTP status onto the delivery failure taxonomy.
fn classify_status(status: StatusCode, detail: &str) -> DeliveryFailure {
    let message = if detail.is_empty() {
        format!("provider responded {status}")
    } else {
        format!("provider responded {status}: {detail}")
    };

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => DeliveryFailure::auth_rejected(message),
        _ => DeliveryFailure::provider_rejected(message),
    }
}
