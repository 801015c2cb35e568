//! Health reporting for the lead service.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::application::services::NotificationService;
use crate::domain::delivery::{ProbeResult, TransportInfo, TransportKind, VerificationReport};
use crate::domain::repositories::LeadRepository;

/// SMTP reachability as shown on the health endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmtpStatus {
    Ready,
    Error,
    NotConfigured,
}

impl SmtpStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::Error => "error",
            Self::NotConfigured => "not-configured",
        }
    }
}

/// Snapshot of transport reachability and recorded leads.
#[derive(Debug, Clone)]
pub struct StatusReport {
    pub checked_at: DateTime<Utc>,
    pub leads_count: usize,
    pub smtp_configured: bool,
    pub api_configured: bool,
    pub active: Option<TransportInfo>,
    pub probes: Vec<ProbeResult>,
    pub startup: Option<VerificationReport>,
}

impl StatusReport {
    /// `ready` if any SMTP transport answered, `error` if none did.
    pub fn smtp_status(&self) -> SmtpStatus {
        if !self.smtp_configured {
            return SmtpStatus::NotConfigured;
        }

        if self.smtp_probes().any(|probe| probe.reachable) {
            SmtpStatus::Ready
        } else {
            SmtpStatus::Error
        }
    }

    /// First SMTP probe error, reported only when no SMTP transport is
    /// reachable.
    pub fn smtp_error(&self) -> Option<String> {
        if self.smtp_status() != SmtpStatus::Error {
            return None;
        }

        self.smtp_probes()
            .find_map(|probe| probe.error.as_ref())
            .map(|failure| failure.message.clone())
    }

    fn smtp_probes(&self) -> impl Iterator<Item = &ProbeResult> {
        self.probes
            .iter()
            .filter(|probe| probe.transport.kind == TransportKind::Smtp)
    }
}

/// Builds [`StatusReport`]s. Every report triggers a live probe of all
/// transports.
pub struct StatusService<R: LeadRepository> {
    repository: Arc<R>,
    notifier: Arc<NotificationService>,
}

impl<R: LeadRepository> StatusService<R> {
    pub fn new(repository: Arc<R>, notifier: Arc<NotificationService>) -> Self {
        Self {
            repository,
            notifier,
        }
    }

    pub async fn report(&self) -> StatusReport {
        let probes = self.notifier.probe_all().await;

        StatusReport {
            checked_at: Utc::now(),
            leads_count: self.repository.count(),
            smtp_configured: self.notifier.has_kind(TransportKind::Smtp),
            api_configured: self.notifier.has_kind(TransportKind::Api),
            active: self.notifier.active_transport(),
            probes,
            startup: self.notifier.startup_report(),
        }
    }
}
