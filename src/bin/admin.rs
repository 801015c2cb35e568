//! CLI administration tool for tire-lead-api.
//!
//! Inspects the mail configuration and exercises the transports without
//! starting the HTTP server.
//!
//! # Usage
//!
//! ```bash
//! # Show the resolved configuration and fallback chain
//! cargo run --bin admin -- config
//!
//! # Probe every transport in the chain
//! cargo run --bin admin -- verify
//!
//! # Send the diagnostic email (asks for confirmation)
//! cargo run --bin admin -- send-test
//! cargo run --bin admin -- send-test -y
//! ```
//!
//! # Environment Variables
//!
//! Same as the server, see [`tire_lead_api::config`].

use tire_lead_api::application::messages::MessageComposer;
use tire_lead_api::application::services::NotificationService;
use tire_lead_api::config::{self, Config, mask_secret};
use tire_lead_api::domain::delivery::DeliveryResult;
use tire_lead_api::infrastructure::mail::build_chain;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;

/// CLI tool for checking tire-lead-api mail delivery.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the resolved configuration (secrets masked)
    Config,

    /// Probe every configured mail transport
    Verify,

    /// Send the diagnostic email through the fallback chain
    SendTest {
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = config::load_from_env()?;

    match cli.command {
        Commands::Config => show_config(&config),
        Commands::Verify => verify(&config).await,
        Commands::SendTest { yes } => send_test(&config, yes).await?,
    }

    Ok(())
}

fn notifier(config: &Config) -> NotificationService {
    NotificationService::new(
        build_chain(&config.mail.chain()),
        MessageComposer::new(
            config.mail.sender(),
            config.mail.recipient.clone(),
            config.environment.clone(),
        ),
    )
}

/// Displays the configuration and the fallback chain in attempt order.
fn show_config(config: &Config) {
    let mail = &config.mail;

    println!("{}", "⚙️  Configuration".bright_blue().bold());
    println!();
    println!("  Listen:        {}", config.listen_addr.cyan());
    println!("  Environment:   {}", config.environment.cyan());
    println!("  Lead log size: {}", config.lead_log_capacity.to_string().cyan());
    println!("  Sender:        {}", mail.sender().mailbox().cyan());
    println!("  Recipient:     {}", mail.recipient.cyan());
    println!();

    let smtp_user = mail.smtp_user.as_deref().unwrap_or("-");
    let smtp_pass = mail.smtp_pass.as_deref().map(mask_secret);
    println!(
        "  SMTP:          {}:{} ({}) user {} password {}",
        mail.smtp_host,
        mail.smtp_port,
        mail.smtp_tls,
        smtp_user.cyan(),
        smtp_pass.as_deref().unwrap_or("-").bright_black()
    );
    match mail.api_key.as_deref() {
        Some(key) => println!(
            "  API:           {} key {}",
            mail.api_url,
            mask_secret(key).bright_black()
        ),
        None => println!("  API:           {}", "not configured".yellow()),
    }
    println!();

    let chain = mail.chain();
    if chain.is_empty() {
        println!("{}", "⚠️  No mail transport configured".yellow());
        println!("   Leads will be recorded but no email will be sent.");
        return;
    }

    println!("{}", "Fallback chain:".bright_white().bold());
    for (position, transport) in chain.iter().enumerate() {
        println!(
            "  {}. {:<16} {}",
            position + 1,
            transport.name().cyan(),
            transport.describe().bright_black()
        );
    }
    println!();
}

/// Probes every transport concurrently and prints the results.
async fn verify(config: &Config) {
    println!("{}", "🔍 Verifying mail transports".bright_blue().bold());
    println!();

    let notifier = notifier(config);
    if !notifier.is_configured() {
        println!("{}", "⚠️  No mail transport configured".yellow());
        return;
    }

    let probes = notifier.probe_all().await;

    for probe in &probes {
        match &probe.error {
            None => println!("  {} {}", "✅".green(), probe.transport.to_string().cyan()),
            Some(failure) => println!(
                "  {} {} {} {}",
                "❌".red(),
                probe.transport.to_string().cyan(),
                failure.kind.to_string().red(),
                failure.message.bright_black()
            ),
        }
    }

    let reachable = probes.iter().filter(|p| p.reachable).count();
    println!();
    println!(
        "  Reachable: {}/{}",
        reachable.to_string().bright_white().bold(),
        probes.len()
    );
    println!();
}

/// Sends the diagnostic email after confirmation.
async fn send_test(config: &Config, skip_confirm: bool) -> Result<()> {
    println!("{}", "📧 Send test email".bright_blue().bold());
    println!();
    println!("  To: {}", config.mail.recipient.cyan());
    println!();

    let notifier = notifier(config);
    if !notifier.is_configured() {
        println!("{}", "⚠️  No mail transport configured".yellow());
        return Ok(());
    }

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Send the test email?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    match notifier.send_test().await {
        DeliveryResult::Sent {
            transport,
            message_id,
            failed_attempts,
        } => {
            for attempt in &failed_attempts {
                println!(
                    "  {} {} {}",
                    "↪".yellow(),
                    attempt.transport.to_string().cyan(),
                    attempt.failure.to_string().bright_black()
                );
            }
            println!();
            println!("{}", "✅ Test email sent!".green().bold());
            println!("  Transport:  {}", transport.to_string().cyan());
            println!("  Message ID: {}", message_id.bright_black());
        }
        DeliveryResult::Failed {
            failure,
            failed_attempts,
        } => {
            for attempt in &failed_attempts {
                println!(
                    "  {} {} {}",
                    "❌".red(),
                    attempt.transport.to_string().cyan(),
                    attempt.failure.to_string().bright_black()
                );
            }
            println!();
            anyhow::bail!("Test email failed: {failure}");
        }
    }

    println!();
    Ok(())
}
