//! Lead notification through an ordered chain of mail transports.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use chrono::Utc;
use tracing::{error, info, warn};

use crate::application::messages::MessageComposer;
use crate::domain::delivery::{
    DeliveryFailure, DeliveryResult, FailedAttempt, ProbeResult, TransportInfo, TransportKind,
    VerificationReport,
};
use crate::domain::entities::{Lead, OutboundEmail};
use crate::domain::transport::MailTransport;

/// Delivers rendered messages through a fallback chain of transports.
///
/// One transport is *active* at a time. It starts as the head of the chain
/// and moves to whichever transport last proved usable, either during
/// [`verify_transports`](Self::verify_transports) or by accepting a message
/// after the active one failed.
///
/// Delivery never returns an error: every outcome, including an empty chain,
/// is reported through [`DeliveryResult`].
pub struct NotificationService {
    transports: Vec<Arc<dyn MailTransport>>,
    composer: MessageComposer,
    active: AtomicUsize,
    startup_report: RwLock<Option<VerificationReport>>,
}

impl NotificationService {
    /// Creates the service. The first transport in `transports` starts as
    /// the active one.
    pub fn new(transports: Vec<Arc<dyn MailTransport>>, composer: MessageComposer) -> Self {
        Self {
            transports,
            composer,
            active: AtomicUsize::new(0),
            startup_report: RwLock::new(None),
        }
    }

    /// Identity of every transport in chain order.
    pub fn transports(&self) -> Vec<TransportInfo> {
        self.transports.iter().map(|t| t.info()).collect()
    }

    pub fn is_configured(&self) -> bool {
        !self.transports.is_empty()
    }

    /// Whether the chain contains at least one transport of `kind`.
    pub fn has_kind(&self, kind: TransportKind) -> bool {
        self.transports.iter().any(|t| t.info().kind == kind)
    }

    /// Transport that will be tried first on the next delivery.
    pub fn active_transport(&self) -> Option<TransportInfo> {
        self.transports
            .get(self.active.load(Ordering::Relaxed))
            .map(|t| t.info())
    }

    /// Renders and delivers the notification for a recorded lead.
    pub async fn notify(&self, lead: &Lead) -> DeliveryResult {
        match self.composer.lead_notification(lead) {
            Ok(email) => self.deliver(&email).await,
            Err(e) => {
                error!(lead_id = %lead.id, error = %e, "Failed to render lead notification");
                DeliveryResult::failed(
                    DeliveryFailure::message_invalid(format!("template rendering failed: {e}")),
                    Vec::new(),
                )
            }
        }
    }

    /// Sends the fixed diagnostic message through the chain.
    pub async fn send_test(&self) -> DeliveryResult {
        let email = self.composer.diagnostic(Utc::now());
        self.deliver(&email).await
    }

    /// Tries the active transport, then every other transport in chain order,
    /// each at most once. Stops at the first success.
    pub async fn deliver(&self, email: &OutboundEmail) -> DeliveryResult {
        if self.transports.is_empty() {
            warn!(subject = %email.subject, "No mail transport configured, skipping delivery");
            return DeliveryResult::failed(DeliveryFailure::not_configured(), Vec::new());
        }

        let mut failed_attempts = Vec::new();

        for index in self.attempt_order() {
            let transport = &self.transports[index];
            let info = transport.info();

            match transport.send(email).await {
                Ok(message_id) => {
                    self.promote(index);
                    info!(
                        transport = %info,
                        message_id = %message_id,
                        fallbacks = failed_attempts.len(),
                        "Email delivered"
                    );
                    return DeliveryResult::Sent {
                        transport: info,
                        message_id,
                        failed_attempts,
                    };
                }
                Err(failure) => {
                    warn!(
                        transport = %info,
                        kind = %failure.kind,
                        error = %failure.message,
                        "Delivery attempt failed"
                    );
                    failed_attempts.push(FailedAttempt {
                        transport: info,
                        failure,
                    });
                }
            }
        }

        let failure = failed_attempts
            .last()
            .map(|attempt| attempt.failure.clone())
            .unwrap_or_else(DeliveryFailure::not_configured);

        error!(
            attempts = failed_attempts.len(),
            kind = %failure.kind,
            "All mail transports failed"
        );

        DeliveryResult::failed(failure, failed_attempts)
    }

    /// Probes the chain starting from the active transport and makes the
    /// first reachable one active. The report is kept for status queries.
    pub async fn verify_transports(&self) -> VerificationReport {
        let mut probes = Vec::new();
        let mut active = None;

        for index in self.attempt_order() {
            let transport = &self.transports[index];
            let info = transport.info();
            let probe = ProbeResult::from_outcome(info.clone(), transport.verify().await);

            if probe.reachable {
                info!(transport = %info, "Mail transport verified");
                self.promote(index);
                active = Some(info);
                probes.push(probe);
                break;
            }

            if let Some(failure) = &probe.error {
                warn!(transport = %info, error = %failure, "Mail transport verification failed");
            }
            probes.push(probe);
        }

        if active.is_none() {
            if self.transports.is_empty() {
                warn!("No mail transport configured; leads will only be recorded locally");
            } else {
                error!("No mail transport is reachable; leads will only be recorded locally");
            }
        }

        let report = VerificationReport {
            checked_at: Utc::now(),
            active,
            probes,
        };

        *self
            .startup_report
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(report.clone());

        report
    }

    /// Probes every transport concurrently, in chain order, without changing
    /// the active transport.
    pub async fn probe_all(&self) -> Vec<ProbeResult> {
        let pending: Vec<_> = self
            .transports
            .iter()
            .map(|transport| {
                let transport = Arc::clone(transport);
                (
                    transport.info(),
                    tokio::spawn(async move { transport.verify().await }),
                )
            })
            .collect();

        let mut probes = Vec::with_capacity(pending.len());
        for (info, handle) in pending {
            let outcome = handle
                .await
                .unwrap_or_else(|e| Err(DeliveryFailure::internal(format!("probe task failed: {e}"))));
            probes.push(ProbeResult::from_outcome(info, outcome));
        }

        probes
    }

    /// Result of the last [`verify_transports`](Self::verify_transports) run,
    /// `None` while it is still in progress.
    pub fn startup_report(&self) -> Option<VerificationReport> {
        self.startup_report
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn attempt_order(&self) -> Vec<usize> {
        let len = self.transports.len();
        if len == 0 {
            return Vec::new();
        }

        let active = self.active.load(Ordering::Relaxed).min(len - 1);
        std::iter::once(active)
            .chain((0..len).filter(|&index| index != active))
            .collect()
    }

    fn promote(&self, index: usize) {
        let previous = self.active.swap(index, Ordering::Relaxed);
        if previous != index {
            info!(
                transport = %self.transports[index].info(),
                "Switched active mail transport"
            );
        }
    }
}
