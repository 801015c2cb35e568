//! DTOs for lead submission and listing endpoints.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::application::services::LeadReceipt;
use crate::domain::delivery::{
    DeliveryFailure, DeliveryResult, DeliveryStatus, FailedAttempt, TransportInfo, TransportKind,
};
use crate::domain::entities::{Lead, LeadId};

/// Response for `POST /send-lead`.
///
/// Always `success: true` once the lead is recorded; the delivery outcome is
/// carried by `deliveryStatus` and the optional fields.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendLeadResponse {
    pub success: bool,
    pub message: String,
    pub lead_id: LeadId,
    pub received_at: DateTime<Utc>,
    pub delivery_status: DeliveryStatus,

    #[serde(flatten)]
    pub ids: MessageIds,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub transport: Option<TransportInfo>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<DeliveryFailure>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed_attempts: Vec<FailedAttempt>,
}

impl From<LeadReceipt> for SendLeadResponse {
    fn from(receipt: LeadReceipt) -> Self {
        let LeadReceipt { lead, delivery } = receipt;
        let delivery_status = delivery.status();

        match delivery {
            DeliveryResult::Sent {
                transport,
                message_id,
                failed_attempts,
            } => Self {
                success: true,
                message: "Lead sent successfully".to_string(),
                lead_id: lead.id,
                received_at: lead.received_at,
                delivery_status,
                ids: MessageIds::new(&transport, message_id),
                transport: Some(transport),
                note: None,
                error: None,
                failed_attempts,
            },
            DeliveryResult::Failed {
                failure,
                failed_attempts,
            } => Self {
                success: true,
                message: "Lead received successfully (logged internally)".to_string(),
                lead_id: lead.id,
                received_at: lead.received_at,
                delivery_status,
                ids: MessageIds::default(),
                transport: None,
                note: Some("Email notification may be delayed".to_string()),
                error: Some(failure),
                failed_attempts,
            },
        }
    }
}

/// Provider message identifier, keyed by the kind of transport that
/// produced it: `messageId` for SMTP, `emailId` for the HTTP API.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageIds {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_id: Option<String>,
}

impl MessageIds {
    pub fn new(transport: &TransportInfo, id: String) -> Self {
        match transport.kind {
            TransportKind::Smtp => Self {
                message_id: Some(id),
                email_id: None,
            },
            TransportKind::Api => Self {
                message_id: None,
                email_id: Some(id),
            },
        }
    }
}

/// Response for `GET /leads`.
#[derive(Debug, Serialize)]
pub struct LeadListResponse {
    /// Number of leads in this response.
    pub count: usize,
    /// Number of leads currently held in memory.
    pub total: usize,
    pub leads: Vec<Lead>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::LeadSubmission;
    use serde_json::json;

    fn lead() -> Lead {
        Lead::new(
            LeadId::new(7),
            Utc::now(),
            LeadSubmission::new("Jo", "jo@x.com", "555-1"),
        )
    }

    #[test]
    fn test_sent_via_smtp_reports_message_id() {
        let response = SendLeadResponse::from(LeadReceipt {
            lead: lead(),
            delivery: DeliveryResult::Sent {
                transport: TransportInfo::new("smtp-primary", TransportKind::Smtp),
                message_id: "<abc@example.com>".to_string(),
                failed_attempts: vec![],
            },
        });

        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["success"], true);
        assert_eq!(value["leadId"], "7");
        assert_eq!(value["deliveryStatus"], "sent");
        assert_eq!(value["messageId"], "<abc@example.com>");
        assert!(value.get("emailId").is_none());
        assert!(value.get("note").is_none());
        assert!(value.get("failedAttempts").is_none());
    }

    #[test]
    fn test_sent_via_api_reports_email_id() {
        let response = SendLeadResponse::from(LeadReceipt {
            lead: lead(),
            delivery: DeliveryResult::Sent {
                transport: TransportInfo::new("resend", TransportKind::Api),
                message_id: "email_123".to_string(),
                failed_attempts: vec![],
            },
        });

        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["emailId"], "email_123");
        assert!(value.get("messageId").is_none());
        assert_eq!(value["transport"], json!({ "name": "resend", "kind": "api" }));
    }

    #[test]
    fn test_failed_delivery_is_still_success() {
        let failure = DeliveryFailure::unreachable("connection refused");
        let response = SendLeadResponse::from(LeadReceipt {
            lead: lead(),
            delivery: DeliveryResult::failed(
                failure.clone(),
                vec![FailedAttempt {
                    transport: TransportInfo::new("smtp-primary", TransportKind::Smtp),
                    failure,
                }],
            ),
        });

        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["success"], true);
        assert_eq!(value["message"], "Lead received successfully (logged internally)");
        assert_eq!(value["deliveryStatus"], "failed-but-recorded");
        assert_eq!(value["note"], "Email notification may be delayed");
        assert_eq!(value["error"]["kind"], "transport-unreachable");
        assert_eq!(value["failedAttempts"][0]["transport"]["name"], "smtp-primary");
    }
}
