#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tire_lead_api::application::messages::MessageComposer;
use tire_lead_api::application::services::NotificationService;
use tire_lead_api::config::RateLimitSettings;
use tire_lead_api::domain::delivery::{DeliveryFailure, TransportInfo, TransportKind};
use tire_lead_api::domain::entities::{OutboundEmail, Sender};
use tire_lead_api::domain::transport::MailTransport;
use tire_lead_api::infrastructure::persistence::InMemoryLeadRepository;
use tire_lead_api::routes::build_router;
use tire_lead_api::state::AppState;

pub const RECIPIENT: &str = "owner@example.com";

/// In-process transport with a fixed outcome that counts its calls.
pub struct StubTransport {
    info: TransportInfo,
    outcome: Result<String, DeliveryFailure>,
    sent: AtomicUsize,
}

impl StubTransport {
    pub fn sending(name: &str, kind: TransportKind, id: &str) -> Arc<Self> {
        Arc::new(Self {
            info: TransportInfo::new(name, kind),
            outcome: Ok(id.to_string()),
            sent: AtomicUsize::new(0),
        })
    }

    pub fn failing(name: &str, kind: TransportKind, failure: DeliveryFailure) -> Arc<Self> {
        Arc::new(Self {
            info: TransportInfo::new(name, kind),
            outcome: Err(failure),
            sent: AtomicUsize::new(0),
        })
    }

    pub fn send_count(&self) -> usize {
        self.sent.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MailTransport for StubTransport {
    fn info(&self) -> TransportInfo {
        self.info.clone()
    }

    async fn send(&self, _email: &OutboundEmail) -> Result<String, DeliveryFailure> {
        self.sent.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone()
    }

    async fn verify(&self) -> Result<(), DeliveryFailure> {
        self.outcome.clone().map(|_| ())
    }
}

pub fn composer() -> MessageComposer {
    MessageComposer::new(
        Sender::new("TireConnect Lead", "leads@example.com"),
        RECIPIENT,
        "test",
    )
}

pub fn notifier(transports: Vec<Arc<dyn MailTransport>>) -> Arc<NotificationService> {
    Arc::new(NotificationService::new(transports, composer()))
}

pub fn create_test_state(
    transports: Vec<Arc<dyn MailTransport>>,
) -> (AppState, Arc<InMemoryLeadRepository>) {
    let repository = Arc::new(InMemoryLeadRepository::default());
    let state = AppState::new(Arc::clone(&repository), notifier(transports), "test");

    (state, repository)
}

/// Full router with rate limiting disabled.
pub fn create_test_app(state: AppState) -> Router {
    build_router(state, &RateLimitSettings::disabled())
}
