//! DTO for the service metadata endpoint.

use serde::Serialize;

/// Static description of the service and its endpoints.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInfoResponse {
    pub service: &'static str,
    pub version: &'static str,
    pub status: &'static str,
    pub environment: String,
    pub endpoints: Endpoints,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoints {
    pub send_lead: &'static str,
    pub health: &'static str,
    pub test_email: &'static str,
    pub leads: &'static str,
}

impl ServiceInfoResponse {
    pub fn new(environment: String) -> Self {
        Self {
            service: "TireConnect Lead API",
            version: env!("CARGO_PKG_VERSION"),
            status: "running",
            environment,
            endpoints: Endpoints {
                send_lead: "POST /send-lead",
                health: "GET /health",
                test_email: "GET /test-email",
                leads: "GET /leads",
            },
        }
    }
}
