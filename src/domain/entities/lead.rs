//! Lead entities: the submitted tire-search form and the recorded lead.

use std::collections::BTreeMap;
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_with::{DeserializeFromStr, SerializeDisplay};
use validator::Validate;

/// A customer's tire search request as posted by the web form.
///
/// Only `name`, `email` and `phone` are required, and only for presence:
/// no shape checks are applied to email or phone. Any field the form sends
/// that is not listed here is kept in [`LeadSubmission::extra`] so the
/// recorded lead carries everything that was submitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LeadSubmission {
    #[validate(required(message = "name is required"), length(min = 1, message = "name must not be empty"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[validate(required(message = "email is required"), length(min = 1, message = "email must not be empty"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[validate(required(message = "phone is required"), length(min = 1, message = "phone must not be empty"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    /// Search mode selected in the form, e.g. "By Vehicle" or "By Tire Size".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_info: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tire_size: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub front_tire_size: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rear_tire_size: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed_rating: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_index: Option<String>,

    /// Unrecognised form fields, preserved verbatim.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl LeadSubmission {
    /// Creates a submission with only the required identity fields set.
    pub fn new(name: impl Into<String>, email: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            email: Some(email.into()),
            phone: Some(phone.into()),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    pub fn email(&self) -> &str {
        self.email.as_deref().unwrap_or_default()
    }

    pub fn phone(&self) -> &str {
        self.phone.as_deref().unwrap_or_default()
    }

    /// Returns the tire-size search attributes that were provided, labelled
    /// for display.
    pub fn tire_size_details(&self) -> Vec<(&'static str, &str)> {
        [
            ("Front Tire Size", &self.front_tire_size),
            ("Rear Tire Size", &self.rear_tire_size),
            ("Speed Rating", &self.speed_rating),
            ("Load Index", &self.load_index),
        ]
        .into_iter()
        .filter_map(|(label, value)| value.as_deref().map(|v| (label, v)))
        .collect()
    }
}

/// Identifier assigned to a lead when it is recorded.
///
/// Derived from the receipt time in milliseconds and kept strictly increasing
/// by the recorder. Serialized as a decimal string.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, SerializeDisplay, DeserializeFromStr,
)]
pub struct LeadId(u64);

impl LeadId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for LeadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for LeadId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

/// Keys the recorder assigns itself. Submitted fields with these names are
/// discarded so they cannot shadow the generated values.
pub const RESERVED_KEYS: [&str; 2] = ["id", "receivedAt"];

/// A recorded submission.
///
/// Created once by the lead recorder and never modified afterwards; readers
/// receive clones.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: LeadId,
    pub received_at: DateTime<Utc>,
    #[serde(flatten)]
    pub submission: LeadSubmission,
}

impl Lead {
    pub fn new(id: LeadId, received_at: DateTime<Utc>, mut submission: LeadSubmission) -> Self {
        submission
            .extra
            .retain(|key, _| !RESERVED_KEYS.contains(&key.as_str()));

        Self {
            id,
            received_at,
            submission,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_submission_deserializes_camel_case_fields() {
        let submission: LeadSubmission = serde_json::from_value(json!({
            "name": "Jo",
            "email": "jo@x.com",
            "phone": "555-1",
            "searchType": "By Tire Size",
            "frontTireSize": "225/45R17",
            "loadIndex": "91"
        }))
        .unwrap();

        assert_eq!(submission.name(), "Jo");
        assert_eq!(submission.search_type.as_deref(), Some("By Tire Size"));
        assert_eq!(submission.front_tire_size.as_deref(), Some("225/45R17"));
        assert_eq!(submission.load_index.as_deref(), Some("91"));
        assert!(submission.extra.is_empty());
    }

    #[test]
    fn test_submission_keeps_unknown_fields() {
        let submission: LeadSubmission = serde_json::from_value(json!({
            "name": "Jo",
            "email": "jo@x.com",
            "phone": "555-1",
            "promoCode": "SPRING",
            "consent": true
        }))
        .unwrap();

        assert_eq!(submission.extra.get("promoCode"), Some(&json!("SPRING")));
        assert_eq!(submission.extra.get("consent"), Some(&json!(true)));
    }

    #[test]
    fn test_accessors_default_to_empty() {
        let submission = LeadSubmission::default();

        assert_eq!(submission.name(), "");
        assert_eq!(submission.email(), "");
        assert_eq!(submission.phone(), "");
    }

    #[test]
    fn test_tire_size_details_only_lists_present_values() {
        let submission = LeadSubmission {
            front_tire_size: Some("225/45R17".to_string()),
            speed_rating: Some("W".to_string()),
            ..LeadSubmission::new("Jo", "jo@x.com", "555-1")
        };

        assert_eq!(
            submission.tire_size_details(),
            vec![("Front Tire Size", "225/45R17"), ("Speed Rating", "W")]
        );
    }

    #[test]
    fn test_lead_serializes_flat_with_string_id() {
        let received_at = Utc::now();
        let lead = Lead::new(
            LeadId::new(1_700_000_000_000),
            received_at,
            LeadSubmission {
                front_tire_size: Some("225/45R17".to_string()),
                ..LeadSubmission::new("Jo", "jo@x.com", "555-1")
            },
        );

        let value = serde_json::to_value(&lead).unwrap();

        assert_eq!(value["id"], "1700000000000");
        assert_eq!(value["name"], "Jo");
        assert_eq!(value["frontTireSize"], "225/45R17");
        assert!(value.get("address").is_none());
        assert!(value["receivedAt"].is_string());
    }

    #[test]
    fn test_lead_drops_submitted_reserved_keys() {
        let submission: LeadSubmission = serde_json::from_value(json!({
            "name": "Jo",
            "email": "jo@x.com",
            "phone": "555-1",
            "id": "spoofed",
            "receivedAt": "1999-01-01",
            "promoCode": "SPRING"
        }))
        .unwrap();
        assert!(submission.extra.contains_key("id"));

        let lead = Lead::new(LeadId::new(42), Utc::now(), submission);
        let raw = serde_json::to_string(&lead).unwrap();

        assert_eq!(raw.matches("\"id\"").count(), 1);
        assert_eq!(raw.matches("\"receivedAt\"").count(), 1);
        assert!(!raw.contains("spoofed"));

        let value: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["id"], "42");
        assert_eq!(value["promoCode"], "SPRING");
    }

    #[test]
    fn test_lead_id_parses_from_string() {
        let id: LeadId = "42".parse().unwrap();
        assert_eq!(id, LeadId::new(42));
        assert!("abc".parse::<LeadId>().is_err());
    }
}
