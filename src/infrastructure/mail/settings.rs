//! Connection parameters for mail transports.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::domain::delivery::TransportKind;

/// How the SMTP session is secured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TlsMode {
    /// Plain connection upgraded with STARTTLS (port 587).
    StartTls,
    /// Implicit TLS from the first byte (port 465).
    Tls,
    /// No encryption. Only for local relays.
    None,
}

impl FromStr for TlsMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "starttls" => Ok(Self::StartTls),
            "tls" | "ssl" => Ok(Self::Tls),
            "none" => Ok(Self::None),
            other => Err(format!(
                "TLS mode must be 'starttls', 'tls' or 'none', got '{other}'"
            )),
        }
    }
}

impl fmt::Display for TlsMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StartTls => f.write_str("starttls"),
            Self::Tls => f.write_str("tls"),
            Self::None => f.write_str("none"),
        }
    }
}

/// SMTP relay parameters.
///
/// Connection, greeting and socket timeouts are independent: the first two
/// bound session setup, the socket timeout bounds each read or write.
#[derive(Clone)]
pub struct SmtpSettings {
    pub name: String,
    pub host: String,
    pub port: u16,
    pub tls: TlsMode,
    pub username: String,
    pub password: String,
    pub connection_timeout: Duration,
    pub greeting_timeout: Duration,
    pub socket_timeout: Duration,
}

impl fmt::Debug for SmtpSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpSettings")
            .field("name", &self.name)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("tls", &self.tls)
            .field("username", &self.username)
            .field("password", &"***")
            .field("connection_timeout", &self.connection_timeout)
            .field("greeting_timeout", &self.greeting_timeout)
            .field("socket_timeout", &self.socket_timeout)
            .finish()
    }
}

/// Transactional email API parameters (Resend-compatible).
#[derive(Clone)]
pub struct ApiSettings {
    pub name: String,
    /// Base URL without trailing slash, e.g. `https://api.resend.com`.
    pub base_url: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl fmt::Debug for ApiSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiSettings")
            .field("name", &self.name)
            .field("base_url", &self.base_url)
            .field("api_key", &"***")
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// One entry of the fallback chain.
#[derive(Debug, Clone)]
pub enum MailTransportConfig {
    Smtp(SmtpSettings),
    Api(ApiSettings),
}

impl MailTransportConfig {
    pub fn name(&self) -> &str {
        match self {
            Self::Smtp(settings) => &settings.name,
            Self::Api(settings) => &settings.name,
        }
    }

    pub fn kind(&self) -> TransportKind {
        match self {
            Self::Smtp(_) => TransportKind::Smtp,
            Self::Api(_) => TransportKind::Api,
        }
    }

    /// Human-readable endpoint description without secrets.
    pub fn describe(&self) -> String {
        match self {
            Self::Smtp(s) => format!("smtp://{}:{} ({}) as {}", s.host, s.port, s.tls, s.username),
            Self::Api(a) => format!("{} (api key configured)", a.base_url),
        }
    }
}
