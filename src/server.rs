//! HTTP server initialization and runtime setup.
//!
//! Builds the lead log and mail transport chain, starts transport
//! verification in the background and runs the Axum server until shutdown.

use crate::application::messages::MessageComposer;
use crate::application::services::NotificationService;
use crate::config::Config;
use crate::domain::repositories::LeadRepository;
use crate::infrastructure::mail::build_chain;
use crate::infrastructure::persistence::InMemoryLeadRepository;
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::Result;
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Bounded in-memory lead log
/// - Mail transport fallback chain
/// - Background transport verification
/// - Axum HTTP server with graceful shutdown
///
/// Transport verification never delays startup: requests are accepted while
/// it runs, and a missing or unreachable provider only degrades notifications.
///
/// # Errors
///
/// Returns an error if:
/// - The listen address is invalid
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let repository = Arc::new(InMemoryLeadRepository::new(config.lead_log_capacity));
    tracing::info!(capacity = repository.capacity(), "Lead log ready");

    let transports = build_chain(&config.mail.chain());
    if transports.is_empty() {
        tracing::warn!("No mail transport configured; leads will only be recorded locally");
    }

    let composer = MessageComposer::new(
        config.mail.sender(),
        config.mail.recipient.clone(),
        config.environment.clone(),
    );
    let notifier = Arc::new(NotificationService::new(transports, composer));

    let verifier = Arc::clone(&notifier);
    tokio::spawn(async move {
        let report = verifier.verify_transports().await;
        match report.active {
            Some(active) => tracing::info!(transport = %active, "Active mail transport selected"),
            None => tracing::warn!("Startup verification found no reachable mail transport"),
        }
    });

    let state = AppState::new(repository, notifier, config.environment.clone());

    let app = app_router(state, &config.rate_limit);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");

    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
