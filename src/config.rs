//! Application configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup and validated before the server starts.
//! Missing mail credentials are not an error: the service still accepts and
//! records leads, it just has no transport to notify through.
//!
//! ## Mail transports
//!
//! ```bash
//! # Gmail / SMTP relay (STARTTLS on 587, implicit TLS alternate on 465)
//! export SMTP_USER="leads@example.com"
//! export SMTP_PASS="app-password"
//!
//! # Resend-compatible HTTP API
//! export RESEND_API_KEY="re_..."
//! ```
//!
//! SMTP counts as configured only when both `SMTP_USER` and `SMTP_PASS` are
//! set. When both SMTP and an API key are present, `MAIL_PRIMARY` picks which
//! one heads the fallback chain (default: `api`).
//!
//! ## Optional Variables
//!
//! - `LISTEN` - Bind address (default: `0.0.0.0:$PORT`, `PORT` default `3000`)
//! - `APP_ENV` - Deployment name shown in emails and `/health` (default: `development`)
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)
//! - `SMTP_HOST` / `SMTP_PORT` / `SMTP_TLS` - Primary relay (default: `smtp.gmail.com` / `587` / `starttls`)
//! - `SMTP_ALT_PORT` / `SMTP_ALT_TLS` - Alternate relay on the same host (default: `465` / `tls`, `off` disables)
//! - `SMTP_CONNECTION_TIMEOUT_MS`, `SMTP_GREETING_TIMEOUT_MS`, `SMTP_SOCKET_TIMEOUT_MS` - default `30000` each
//! - `RESEND_API_URL` / `API_TIMEOUT_MS` - API endpoint and timeout (default: `https://api.resend.com` / `30000`)
//! - `MAIL_FROM` / `MAIL_FROM_NAME` - Sender (default: `SMTP_USER` / `TireConnect Lead`)
//! - `LEAD_RECIPIENT` - Where lead notifications go (default: the sender address)
//! - `LEAD_LOG_CAPACITY` - Number of leads kept in memory (default: 100, max: 10000)
//! - `RATE_LIMIT_ENABLED`, `RATE_LIMIT_PER_SECOND`, `RATE_LIMIT_BURST` - Per-IP limits (default: `true`, `2`, `100`)

use std::env;
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use url::Url;
use validator::ValidateEmail;

use crate::domain::entities::Sender;
use crate::infrastructure::mail::{ApiSettings, MailTransportConfig, SmtpSettings, TlsMode};
use crate::infrastructure::persistence::InMemoryLeadRepository;

/// Sender used for API-only setups without `MAIL_FROM`.
const API_FALLBACK_SENDER: &str = "onboarding@resend.dev";

/// Upper bound for `LEAD_LOG_CAPACITY`.
const MAX_LEAD_LOG_CAPACITY: usize = 10_000;

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: String,
    pub environment: String,
    pub log_level: String,
    pub log_format: String,
    pub mail: MailSettings,
    pub lead_log_capacity: usize,
    pub rate_limit: RateLimitSettings,
}

/// Which provider heads the fallback chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailPrimary {
    Smtp,
    Api,
}

impl FromStr for MailPrimary {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "smtp" => Ok(Self::Smtp),
            "api" | "resend" => Ok(Self::Api),
            other => Err(format!("expected 'smtp' or 'api', got '{other}'")),
        }
    }
}

impl fmt::Display for MailPrimary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Smtp => f.write_str("smtp"),
            Self::Api => f.write_str("api"),
        }
    }
}

/// Mail provider settings and message addressing.
#[derive(Clone)]
pub struct MailSettings {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_tls: TlsMode,
    pub smtp_user: Option<String>,
    pub smtp_pass: Option<String>,
    /// `None` disables the alternate relay.
    pub smtp_alt_port: Option<u16>,
    pub smtp_alt_tls: TlsMode,
    pub connection_timeout: Duration,
    pub greeting_timeout: Duration,
    pub socket_timeout: Duration,
    pub api_key: Option<String>,
    pub api_url: String,
    pub api_timeout: Duration,
    pub primary: MailPrimary,
    pub from_address: String,
    pub from_name: String,
    pub recipient: String,
}

impl fmt::Debug for MailSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailSettings")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("smtp_tls", &self.smtp_tls)
            .field("smtp_user", &self.smtp_user)
            .field("smtp_pass", &self.smtp_pass.as_deref().map(mask_secret))
            .field("smtp_alt_port", &self.smtp_alt_port)
            .field("smtp_alt_tls", &self.smtp_alt_tls)
            .field("api_key", &self.api_key.as_deref().map(mask_secret))
            .field("api_url", &self.api_url)
            .field("primary", &self.primary)
            .field("from_address", &self.from_address)
            .field("recipient", &self.recipient)
            .finish_non_exhaustive()
    }
}

impl MailSettings {
    /// Credentials for SMTP, present only when both user and password are set.
    fn smtp_credentials(&self) -> Option<(&str, &str)> {
        match (self.smtp_user.as_deref(), self.smtp_pass.as_deref()) {
            (Some(user), Some(pass)) if !user.is_empty() && !pass.is_empty() => Some((user, pass)),
            _ => None,
        }
    }

    pub fn smtp_configured(&self) -> bool {
        self.smtp_credentials().is_some()
    }

    pub fn api_configured(&self) -> bool {
        self.api_key.as_deref().is_some_and(|key| !key.is_empty())
    }

    /// Builds the ordered fallback chain.
    ///
    /// SMTP contributes the primary relay and, unless disabled or identical,
    /// the alternate port on the same host. The API contributes one entry.
    /// `primary` decides which group comes first.
    pub fn chain(&self) -> Vec<MailTransportConfig> {
        let mut smtp = Vec::new();
        if let Some((user, pass)) = self.smtp_credentials() {
            let relay = |name: &str, port: u16, tls: TlsMode| {
                MailTransportConfig::Smtp(SmtpSettings {
                    name: name.to_string(),
                    host: self.smtp_host.clone(),
                    port,
                    tls,
                    username: user.to_string(),
                    password: pass.to_string(),
                    connection_timeout: self.connection_timeout,
                    greeting_timeout: self.greeting_timeout,
                    socket_timeout: self.socket_timeout,
                })
            };

            smtp.push(relay("smtp-primary", self.smtp_port, self.smtp_tls));
            if let Some(alt_port) = self.smtp_alt_port.filter(|&port| port != self.smtp_port) {
                smtp.push(relay("smtp-alternate", alt_port, self.smtp_alt_tls));
            }
        }

        let mut api = Vec::new();
        if let Some(api_key) = self.api_key.as_deref().filter(|key| !key.is_empty()) {
            api.push(MailTransportConfig::Api(ApiSettings {
                name: "resend".to_string(),
                base_url: self.api_url.clone(),
                api_key: api_key.to_string(),
                timeout: self.api_timeout,
            }));
        }

        match self.primary {
            MailPrimary::Smtp => smtp.into_iter().chain(api).collect(),
            MailPrimary::Api => api.into_iter().chain(smtp).collect(),
        }
    }

    pub fn sender(&self) -> Sender {
        Sender::new(self.from_name.clone(), self.from_address.clone())
    }
}

/// Per-IP rate limiting applied to every route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitSettings {
    pub enabled: bool,
    pub per_second: u64,
    pub burst_size: u32,
}

impl RateLimitSettings {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            per_second: 2,
            burst_size: 100,
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a TLS mode or `MAIL_PRIMARY` value is not recognised.
    pub fn from_env() -> Result<Self> {
        let port = env_or("PORT", "3000");
        let listen_addr = env::var("LISTEN").unwrap_or_else(|_| format!("0.0.0.0:{port}"));
        let environment = env_or("APP_ENV", "development");
        let log_level = env_or("RUST_LOG", "info");
        let log_format = env_or("LOG_FORMAT", "text");

        let mail = Self::load_mail_settings()?;

        let lead_log_capacity = env_parse(
            "LEAD_LOG_CAPACITY",
            InMemoryLeadRepository::DEFAULT_CAPACITY,
        );

        let defaults = RateLimitSettings::default();
        let rate_limit = RateLimitSettings {
            enabled: env::var("RATE_LIMIT_ENABLED")
                .map(|v| !(v.eq_ignore_ascii_case("false") || v == "0"))
                .unwrap_or(defaults.enabled),
            per_second: env_parse("RATE_LIMIT_PER_SECOND", defaults.per_second),
            burst_size: env_parse("RATE_LIMIT_BURST", defaults.burst_size),
        };

        Ok(Self {
            listen_addr,
            environment,
            log_level,
            log_format,
            mail,
            lead_log_capacity,
            rate_limit,
        })
    }

    fn load_mail_settings() -> Result<MailSettings> {
        let smtp_tls = env_or("SMTP_TLS", "starttls")
            .parse::<TlsMode>()
            .map_err(anyhow::Error::msg)
            .context("Invalid SMTP_TLS")?;

        let smtp_alt_tls = env_or("SMTP_ALT_TLS", "tls")
            .parse::<TlsMode>()
            .map_err(anyhow::Error::msg)
            .context("Invalid SMTP_ALT_TLS")?;

        let smtp_alt_port = match env::var("SMTP_ALT_PORT") {
            Ok(v) if v.eq_ignore_ascii_case("off") || v.is_empty() => None,
            Ok(v) => Some(v.parse().context("SMTP_ALT_PORT must be a port number or 'off'")?),
            Err(_) => Some(465),
        };

        let smtp_user = non_empty_env("SMTP_USER");
        let smtp_pass = non_empty_env("SMTP_PASS");
        let api_key = non_empty_env("RESEND_API_KEY");

        let primary = match non_empty_env("MAIL_PRIMARY") {
            Some(v) => v
                .parse::<MailPrimary>()
                .map_err(anyhow::Error::msg)
                .context("Invalid MAIL_PRIMARY")?,
            None if api_key.is_some() => MailPrimary::Api,
            None => MailPrimary::Smtp,
        };

        let from_address = non_empty_env("MAIL_FROM")
            .or_else(|| smtp_user.clone())
            .unwrap_or_else(|| API_FALLBACK_SENDER.to_string());
        let recipient = non_empty_env("LEAD_RECIPIENT").unwrap_or_else(|| from_address.clone());

        Ok(MailSettings {
            smtp_host: env_or("SMTP_HOST", "smtp.gmail.com"),
            smtp_port: env_parse("SMTP_PORT", 587),
            smtp_tls,
            smtp_user,
            smtp_pass,
            smtp_alt_port,
            smtp_alt_tls,
            connection_timeout: env_millis("SMTP_CONNECTION_TIMEOUT_MS", 30_000),
            greeting_timeout: env_millis("SMTP_GREETING_TIMEOUT_MS", 30_000),
            socket_timeout: env_millis("SMTP_SOCKET_TIMEOUT_MS", 30_000),
            api_key,
            api_url: env_or("RESEND_API_URL", "https://api.resend.com"),
            api_timeout: env_millis("API_TIMEOUT_MS", 30_000),
            primary,
            from_address,
            from_name: env_or("MAIL_FROM_NAME", "TireConnect Lead"),
            recipient,
        })
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `log_format` is not `text` or `json`
    /// - `listen_addr` is not a socket address
    /// - `lead_log_capacity` is outside `1..=10000`
    /// - rate limits are zero while enabled
    /// - sender or recipient is not an email address
    /// - the API URL is not an http(s) URL
    /// - any mail timeout is zero
    pub fn validate(&self) -> Result<()> {
        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        if self.listen_addr.parse::<SocketAddr>().is_err() {
            anyhow::bail!(
                "LISTEN must be in format 'host:port', got '{}'",
                self.listen_addr
            );
        }

        if self.lead_log_capacity == 0 || self.lead_log_capacity > MAX_LEAD_LOG_CAPACITY {
            anyhow::bail!(
                "LEAD_LOG_CAPACITY must be between 1 and {}, got {}",
                MAX_LEAD_LOG_CAPACITY,
                self.lead_log_capacity
            );
        }

        if self.rate_limit.enabled
            && (self.rate_limit.per_second == 0 || self.rate_limit.burst_size == 0)
        {
            anyhow::bail!("RATE_LIMIT_PER_SECOND and RATE_LIMIT_BURST must be greater than 0");
        }

        let mail = &self.mail;

        if !mail.from_address.validate_email() {
            anyhow::bail!(
                "MAIL_FROM must be an email address, got '{}'",
                mail.from_address
            );
        }

        if !mail.recipient.validate_email() {
            anyhow::bail!(
                "LEAD_RECIPIENT must be an email address, got '{}'",
                mail.recipient
            );
        }

        let api_url = Url::parse(&mail.api_url)
            .with_context(|| format!("RESEND_API_URL is not a valid URL: '{}'", mail.api_url))?;
        if api_url.scheme() != "https" && api_url.scheme() != "http" {
            anyhow::bail!(
                "RESEND_API_URL must use http or https, got '{}'",
                mail.api_url
            );
        }

        if [
            mail.connection_timeout,
            mail.greeting_timeout,
            mail.socket_timeout,
            mail.api_timeout,
        ]
        .iter()
        .any(Duration::is_zero)
        {
            anyhow::bail!("Mail timeouts must be greater than 0");
        }

        Ok(())
    }

    /// Prints configuration summary (without sensitive data).
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Listen address: {}", self.listen_addr);
        tracing::info!("  Environment: {}", self.environment);
        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);
        tracing::info!("  Lead log capacity: {}", self.lead_log_capacity);

        if self.rate_limit.enabled {
            tracing::info!(
                "  Rate limit: {}/s, burst {}",
                self.rate_limit.per_second,
                self.rate_limit.burst_size
            );
        } else {
            tracing::info!("  Rate limit: disabled");
        }

        let mail = &self.mail;
        tracing::info!("  Sender: {}", mail.sender().mailbox());
        tracing::info!("  Recipient: {}", mail.recipient);

        match mail.smtp_credentials() {
            Some((user, pass)) => tracing::info!(
                "  SMTP: {}@{}:{} ({}), password {}",
                user,
                mail.smtp_host,
                mail.smtp_port,
                mail.smtp_tls,
                mask_secret(pass)
            ),
            None => tracing::info!("  SMTP: not configured"),
        }

        match mail.api_key.as_deref() {
            Some(key) => tracing::info!("  API: {} (key {})", mail.api_url, mask_secret(key)),
            None => tracing::info!("  API: not configured"),
        }

        let chain = mail.chain();
        if chain.is_empty() {
            tracing::warn!("  Mail chain: empty, leads will only be recorded locally");
        } else {
            let names: Vec<&str> = chain.iter().map(MailTransportConfig::name).collect();
            tracing::info!("  Mail chain: {}", names.join(" -> "));
        }
    }
}

/// Masks a secret for display, keeping a short prefix.
///
/// - `re_123456789` → `re_***`
/// - `abc` → `***`
pub fn mask_secret(secret: &str) -> String {
    if secret.chars().count() <= 6 {
        return "***".to_string();
    }

    let prefix: String = secret.chars().take(3).collect();
    format!("{prefix}***")
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_millis(key: &str, default: u64) -> Duration {
    Duration::from_millis(env_parse(key, default))
}

/// Loads and validates configuration from environment variables.
///
/// # Errors
///
/// Returns an error if a value cannot be parsed or validation fails.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}
