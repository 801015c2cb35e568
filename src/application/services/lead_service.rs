//! Lead intake: validation, recording and notification.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::application::services::NotificationService;
use crate::domain::delivery::{DeliveryFailure, DeliveryResult};
use crate::domain::entities::{Lead, LeadSubmission};
use crate::domain::repositories::LeadRepository;
use crate::domain::validation::validate_submission;
use crate::error::AppError;

/// Outcome of an accepted submission.
#[derive(Debug, Clone)]
pub struct LeadReceipt {
    pub lead: Lead,
    pub delivery: DeliveryResult,
}

/// Service accepting lead submissions.
///
/// A submission that passes validation is always recorded before any
/// notification is attempted, so a failed delivery never loses the lead.
pub struct LeadService<R: LeadRepository> {
    repository: Arc<R>,
    notifier: Arc<NotificationService>,
}

impl<R: LeadRepository> LeadService<R> {
    pub fn new(repository: Arc<R>, notifier: Arc<NotificationService>) -> Self {
        Self {
            repository,
            notifier,
        }
    }

    /// Validates, records and notifies.
    ///
    /// The notification runs in its own task and is awaited, so it completes
    /// even if the caller goes away mid-request.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `name`, `email` or `phone` is
    /// missing or empty. Delivery problems are never errors; they are
    /// reported in [`LeadReceipt::delivery`].
    pub async fn submit(&self, submission: LeadSubmission) -> Result<LeadReceipt, AppError> {
        let submission = validate_submission(submission)?;

        let lead = self.repository.append(submission);
        metrics::counter!("leads_received_total").increment(1);
        info!(
            lead_id = %lead.id,
            name = %lead.submission.name(),
            search_type = lead.submission.search_type.as_deref().unwrap_or("-"),
            leads_count = self.repository.count(),
            "Lead recorded"
        );

        let notifier = Arc::clone(&self.notifier);
        let pending = lead.clone();
        let delivery = tokio::spawn(async move { notifier.notify(&pending).await })
            .await
            .unwrap_or_else(|e| {
                error!(lead_id = %lead.id, error = %e, "Notification task aborted");
                DeliveryResult::failed(
                    DeliveryFailure::internal("notification task aborted"),
                    Vec::new(),
                )
            });

        let outcome = if delivery.is_sent() { "sent" } else { "failed" };
        metrics::counter!("lead_notifications_total", "outcome" => outcome).increment(1);

        if let Some(failure) = delivery.failure() {
            warn!(
                lead_id = %lead.id,
                kind = %failure.kind,
                error = %failure.message,
                "Lead notification failed, lead kept locally"
            );
            match serde_json::to_string(&lead) {
                Ok(backup) => warn!(lead_id = %lead.id, backup = %backup, "Lead backup"),
                Err(e) => error!(lead_id = %lead.id, error = %e, "Failed to serialize lead backup"),
            }
        }

        Ok(LeadReceipt { lead, delivery })
    }

    /// Returns up to `limit` leads, most recent first.
    pub fn recent(&self, limit: usize) -> Vec<Lead> {
        self.repository.recent(limit)
    }

    pub fn count(&self) -> usize {
        self.repository.count()
    }
}
