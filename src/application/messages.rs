//! Rendering of lead notifications and diagnostic messages.

use askama::Template;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::domain::entities::{Lead, OutboundEmail, Sender};

/// Placeholder for optional fields the customer left out.
const NOT_PROVIDED: &str = "Not provided";

/// Labelled value rendered as one table row.
struct DetailRow {
    label: String,
    value: String,
}

/// Flattened, display-ready view of a lead shared by both templates.
struct LeadView<'a> {
    id: String,
    name: &'a str,
    email: &'a str,
    phone: &'a str,
    address: &'a str,
    search_type: &'a str,
    vehicle_info: &'a str,
    tire_size: &'a str,
    season: &'a str,
    tire_size_details: Vec<DetailRow>,
    extra: Vec<DetailRow>,
    received_at: String,
    environment: &'a str,
}

impl<'a> LeadView<'a> {
    fn new(lead: &'a Lead, environment: &'a str) -> Self {
        let submission = &lead.submission;
        let or_placeholder = |value: &'a Option<String>| value.as_deref().unwrap_or(NOT_PROVIDED);

        Self {
            id: lead.id.to_string(),
            name: submission.name(),
            email: submission.email(),
            phone: submission.phone(),
            address: or_placeholder(&submission.address),
            search_type: or_placeholder(&submission.search_type),
            vehicle_info: or_placeholder(&submission.vehicle_info),
            tire_size: or_placeholder(&submission.tire_size),
            season: or_placeholder(&submission.season),
            tire_size_details: submission
                .tire_size_details()
                .into_iter()
                .map(|(label, value)| DetailRow {
                    label: label.to_string(),
                    value: value.to_string(),
                })
                .collect(),
            extra: submission
                .extra
                .iter()
                .map(|(key, value)| DetailRow {
                    label: key.clone(),
                    value: match value {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    },
                })
                .collect(),
            received_at: lead.received_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            environment,
        }
    }
}

#[derive(Template)]
#[template(path = "lead_email.html")]
struct LeadEmailHtml<'a> {
    lead: &'a LeadView<'a>,
}

#[derive(Template)]
#[template(path = "lead_email.txt")]
struct LeadEmailText<'a> {
    lead: &'a LeadView<'a>,
}

/// Builds outbound messages with a fixed sender and recipient.
#[derive(Debug, Clone)]
pub struct MessageComposer {
    sender: Sender,
    recipient: String,
    environment: String,
}

impl MessageComposer {
    pub fn new(sender: Sender, recipient: impl Into<String>, environment: impl Into<String>) -> Self {
        Self {
            sender,
            recipient: recipient.into(),
            environment: environment.into(),
        }
    }

    /// Renders the notification for a recorded lead.
    ///
    /// The reply-to is the submitter's email so the recipient can answer the
    /// customer directly. Submitted values are HTML-escaped in the HTML body.
    ///
    /// # Errors
    ///
    /// Returns [`askama::Error`] if a template fails to render.
    pub fn lead_notification(&self, lead: &Lead) -> Result<OutboundEmail, askama::Error> {
        let view = LeadView::new(lead, &self.environment);

        let subject = match lead.submission.search_type.as_deref() {
            Some(search_type) => format!("New Tire Lead: {} ({})", view.name, search_type),
            None => format!("New Tire Lead: {}", view.name),
        };

        let html = LeadEmailHtml { lead: &view }.render()?;
        let text = LeadEmailText { lead: &view }.render()?;

        Ok(OutboundEmail {
            from: self.sender.clone(),
            to: self.recipient.clone(),
            reply_to: Some(lead.submission.email().to_string()),
            subject,
            html,
            text,
        })
    }

    /// Builds the fixed diagnostic message used by the test-email endpoint.
    pub fn diagnostic(&self, sent_at: DateTime<Utc>) -> OutboundEmail {
        let stamp = sent_at.to_rfc3339();

        OutboundEmail {
            from: self.sender.clone(),
            to: self.recipient.clone(),
            reply_to: None,
            subject: "Test Email from TireConnect API".to_string(),
            html: format!("<p>Test email sent at {stamp}</p>"),
            text: format!("Test email sent at {stamp}"),
        }
    }
}
