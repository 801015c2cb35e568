//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::{LeadService, NotificationService, StatusService};
use crate::infrastructure::persistence::InMemoryLeadRepository;

#[derive(Clone)]
pub struct AppState {
    pub lead_service: Arc<LeadService<InMemoryLeadRepository>>,
    pub notification_service: Arc<NotificationService>,
    pub status_service: Arc<StatusService<InMemoryLeadRepository>>,
    pub environment: String,
}

impl AppState {
    /// Wires the services around one lead log and one notifier.
    pub fn new(
        repository: Arc<InMemoryLeadRepository>,
        notification_service: Arc<NotificationService>,
        environment: impl Into<String>,
    ) -> Self {
        Self {
            lead_service: Arc::new(LeadService::new(
                Arc::clone(&repository),
                Arc::clone(&notification_service),
            )),
            status_service: Arc::new(StatusService::new(
                repository,
                Arc::clone(&notification_service),
            )),
            notification_service,
            environment: environment.into(),
        }
    }
}
