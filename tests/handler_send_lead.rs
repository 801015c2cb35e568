mod common;

use axum_test::TestServer;
use common::StubTransport;
use serde_json::json;
use std::sync::Arc;
use tire_lead_api::domain::delivery::{DeliveryFailure, TransportKind};
use tire_lead_api::domain::repositories::LeadRepository;
use tire_lead_api::domain::transport::MailTransport;

#[tokio::test]
async fn test_send_lead_missing_fields_is_rejected() {
    let transport = StubTransport::sending("smtp-primary", TransportKind::Smtp, "<id@example.com>");
    let (state, repository) = common::create_test_state(vec![transport.clone()]);
    let server = TestServer::new(common::create_test_app(state)).unwrap();

    for body in [
        json!({ "email": "jo@x.com", "phone": "555-1" }),
        json!({ "name": "Jo", "phone": "555-1" }),
        json!({ "name": "Jo", "email": "jo@x.com" }),
        json!({ "name": "", "email": "jo@x.com", "phone": "555-1" }),
        json!({}),
    ] {
        let response = server.post("/send-lead").json(&body).await;

        response.assert_status_bad_request();
        let json = response.json::<serde_json::Value>();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"]["code"], "validation_error");
    }

    assert_eq!(repository.count(), 0);
    assert_eq!(transport.send_count(), 0);
}

#[tokio::test]
async fn test_send_lead_non_object_body_is_rejected() {
    let (state, repository) = common::create_test_state(vec![]);
    let server = TestServer::new(common::create_test_app(state)).unwrap();

    let response = server.post("/send-lead").json(&json!(["Jo"])).await;

    response.assert_status_bad_request();
    assert_eq!(response.json::<serde_json::Value>()["success"], false);
    assert_eq!(repository.count(), 0);
}

#[tokio::test]
async fn test_send_lead_success() {
    let transport = StubTransport::sending("smtp-primary", TransportKind::Smtp, "<id@example.com>");
    let (state, repository) = common::create_test_state(vec![transport.clone()]);
    let server = TestServer::new(common::create_test_app(state)).unwrap();

    let response = server
        .post("/send-lead")
        .json(&json!({ "name": "Jo", "email": "jo@x.com", "phone": "555-1" }))
        .await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "Lead sent successfully");
    assert_eq!(json["deliveryStatus"], "sent");
    assert_eq!(json["messageId"], "<id@example.com>");
    assert!(json["leadId"].is_string());
    assert!(json["receivedAt"].is_string());

    assert_eq!(repository.count(), 1);
    assert_eq!(transport.send_count(), 1);
}

#[tokio::test]
async fn test_send_lead_via_api_reports_email_id() {
    let transport = StubTransport::sending("resend", TransportKind::Api, "email_123");
    let (state, _repository) = common::create_test_state(vec![transport]);
    let server = TestServer::new(common::create_test_app(state)).unwrap();

    let response = server
        .post("/send-lead")
        .json(&json!({ "name": "Jo", "email": "jo@x.com", "phone": "555-1" }))
        .await;

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["emailId"], "email_123");
    assert!(json.get("messageId").is_none());
}

#[tokio::test]
async fn test_send_lead_each_valid_submission_adds_one_lead() {
    let failing = StubTransport::failing(
        "smtp-primary",
        TransportKind::Smtp,
        DeliveryFailure::auth_rejected("535 bad credentials"),
    );
    let (state, repository) = common::create_test_state(vec![failing]);
    let server = TestServer::new(common::create_test_app(state)).unwrap();

    for n in 1..=3 {
        let response = server
            .post("/send-lead")
            .json(&json!({ "name": format!("Lead {n}"), "email": "jo@x.com", "phone": "555-1" }))
            .await;

        response.assert_status_ok();
        assert_eq!(repository.count(), n);
    }
}

#[tokio::test]
async fn test_send_lead_falls_back_to_alternate() {
    let primary = StubTransport::failing(
        "smtp-primary",
        TransportKind::Smtp,
        DeliveryFailure::unreachable("connection refused"),
    );
    let alternate =
        StubTransport::sending("smtp-alternate", TransportKind::Smtp, "<alt@example.com>");
    let (state, repository) = common::create_test_state(vec![primary.clone(), alternate.clone()]);
    let server = TestServer::new(common::create_test_app(state)).unwrap();

    let response = server
        .post("/send-lead")
        .json(&json!({ "name": "Jo", "email": "jo@x.com", "phone": "555-1" }))
        .await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["success"], true);
    assert_eq!(json["deliveryStatus"], "sent");
    assert_eq!(json["transport"]["name"], "smtp-alternate");
    assert_eq!(json["messageId"], "<alt@example.com>");
    assert_eq!(json["failedAttempts"][0]["failure"]["kind"], "transport-unreachable");

    assert_eq!(repository.count(), 1);
    assert_eq!(primary.send_count(), 1);
    assert_eq!(alternate.send_count(), 1);
}

#[tokio::test]
async fn test_send_lead_all_transports_fail_still_succeeds() {
    let primary = StubTransport::failing(
        "smtp-primary",
        TransportKind::Smtp,
        DeliveryFailure::unreachable("timed out"),
    );
    let api = StubTransport::failing(
        "resend",
        TransportKind::Api,
        DeliveryFailure::provider_rejected("provider responded 422"),
    );
    let transports: Vec<Arc<dyn MailTransport>> = vec![primary, api];
    let (state, repository) = common::create_test_state(transports);
    let server = TestServer::new(common::create_test_app(state)).unwrap();

    let response = server
        .post("/send-lead")
        .json(&json!({ "name": "Jo", "email": "jo@x.com", "phone": "555-1" }))
        .await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "Lead received successfully (logged internally)");
    assert_eq!(json["note"], "Email notification may be delayed");
    assert_eq!(json["deliveryStatus"], "failed-but-recorded");
    assert_eq!(json["error"]["kind"], "provider-rejected");
    assert_eq!(json["failedAttempts"].as_array().unwrap().len(), 2);
    assert_eq!(repository.count(), 1);
}

#[tokio::test]
async fn test_send_lead_without_transports_is_not_configured() {
    let (state, repository) = common::create_test_state(vec![]);
    let server = TestServer::new(common::create_test_app(state)).unwrap();

    let response = server
        .post("/send-lead")
        .json(&json!({ "name": "Jo", "email": "jo@x.com", "phone": "555-1" }))
        .await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["success"], true);
    assert_eq!(json["deliveryStatus"], "failed-but-recorded");
    assert_eq!(json["error"]["kind"], "not-configured");

    let leads = repository.recent(1);
    assert_eq!(leads.len(), 1);
    assert_eq!(leads[0].id.to_string(), json["leadId"].as_str().unwrap());
}

#[tokio::test]
async fn test_send_lead_then_list_round_trips_fields() {
    let transport = StubTransport::sending("smtp-primary", TransportKind::Smtp, "<id@example.com>");
    let (state, _repository) = common::create_test_state(vec![transport]);
    let server = TestServer::new(common::create_test_app(state)).unwrap();

    let response = server
        .post("/send-lead")
        .json(&json!({
            "name": "Jo",
            "email": "jo@x.com",
            "phone": "555-1",
            "searchType": "By Tire Size",
            "frontTireSize": "225/45R17"
        }))
        .await;

    response.assert_status_ok();
    let sent = response.json::<serde_json::Value>();
    assert_eq!(sent["success"], true);
    let lead_id = sent["leadId"].as_str().unwrap().to_string();

    let listing = server.get("/leads").await.json::<serde_json::Value>();

    let lead = listing["leads"]
        .as_array()
        .unwrap()
        .iter()
        .find(|lead| lead["id"] == lead_id.as_str())
        .expect("submitted lead is listed");
    assert_eq!(lead["frontTireSize"], "225/45R17");
    assert_eq!(lead["searchType"], "By Tire Size");
    assert_eq!(lead["name"], "Jo");
}

#[tokio::test]
async fn test_send_lead_keeps_unknown_fields() {
    let (state, repository) = common::create_test_state(vec![]);
    let server = TestServer::new(common::create_test_app(state)).unwrap();

    server
        .post("/send-lead")
        .json(&json!({
            "name": "Jo",
            "email": "jo@x.com",
            "phone": "555-1",
            "promoCode": "SPRING"
        }))
        .await
        .assert_status_ok();

    let leads = repository.recent(1);
    assert_eq!(leads[0].submission.extra.get("promoCode"), Some(&json!("SPRING")));
}

#[tokio::test]
async fn test_send_lead_cannot_override_generated_id() {
    let (state, _repository) = common::create_test_state(vec![]);
    let server = TestServer::new(common::create_test_app(state)).unwrap();

    let response = server
        .post("/send-lead")
        .json(&json!({
            "name": "Jo",
            "email": "jo@x.com",
            "phone": "555-1",
            "id": "spoofed",
            "receivedAt": "1999-01-01"
        }))
        .await;

    response.assert_status_ok();
    let lead_id = response.json::<serde_json::Value>()["leadId"]
        .as_str()
        .unwrap()
        .to_string();

    let listing = server.get("/leads").await;
    let raw = listing.text();
    assert!(!raw.contains("spoofed"));
    assert!(!raw.contains("1999-01-01"));

    let json = listing.json::<serde_json::Value>();
    assert_eq!(json["leads"][0]["id"], lead_id.as_str());
    assert_ne!(json["leads"][0]["receivedAt"], "1999-01-01");
}

#[tokio::test]
async fn test_send_lead_accepts_form_encoding() {
    let transport = StubTransport::sending("smtp-primary", TransportKind::Smtp, "<id@example.com>");
    let (state, repository) = common::create_test_state(vec![transport.clone()]);
    let server = TestServer::new(common::create_test_app(state)).unwrap();

    let response = server
        .post("/send-lead")
        .form(&[
            ("name", "Jo"),
            ("email", "jo@x.com"),
            ("phone", "555-1"),
            ("searchType", "By Tire Size"),
            ("frontTireSize", "225/45R17"),
        ])
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<serde_json::Value>()["deliveryStatus"], "sent");

    let leads = repository.recent(1);
    assert_eq!(leads[0].submission.name(), "Jo");
    assert_eq!(leads[0].submission.front_tire_size.as_deref(), Some("225/45R17"));
    assert_eq!(transport.send_count(), 1);
}

#[tokio::test]
async fn test_send_lead_form_missing_fields_is_rejected() {
    let (state, repository) = common::create_test_state(vec![]);
    let server = TestServer::new(common::create_test_app(state)).unwrap();

    let response = server
        .post("/send-lead")
        .form(&[("name", "Jo"), ("email", "")])
        .await;

    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<serde_json::Value>()["success"], false);
    assert_eq!(repository.count(), 0);
}
