//! Availability Gate: process-wide record of whether the generative-language
//! backend is usable. Computed once in `main`, read-only afterwards.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use super::{LlmClient, TextGenerator};

#[derive(Clone)]
pub enum AvailabilityGate {
    /// No credential was supplied.
    Unconfigured,
    /// Credential present and the client initialised.
    Live(Arc<dyn TextGenerator>),
    /// Credential present but client construction failed; carries the reason.
    Failed(String),
}

impl AvailabilityGate {
    /// Builds the gate from an optional API key. Never fails: initialisation
    /// errors are recorded as `Failed` so every LLM-backed tier degrades.
    pub fn from_credential(api_key: Option<&str>, model: &str, timeout: Duration) -> Self {
        let Some(key) = api_key.map(str::trim).filter(|k| !k.is_empty()) else {
            info!("No LLM credential configured; all tiers will use rule-based fallbacks");
            return AvailabilityGate::Unconfigured;
        };

        match LlmClient::new(key.to_string(), model.to_string(), timeout) {
            Ok(client) => {
                info!("LLM client initialized (model: {})", client.model());
                AvailabilityGate::Live(Arc::new(client))
            }
            Err(e) => {
                warn!("LLM client failed to initialize: {e}");
                AvailabilityGate::Failed(e.to_string())
            }
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, AvailabilityGate::Live(_))
    }

    pub fn credential_configured(&self) -> bool {
        !matches!(self, AvailabilityGate::Unconfigured)
    }

    /// The generator, only when the gate is live.
    pub fn generator(&self) -> Option<&dyn TextGenerator> {
        match self {
            AvailabilityGate::Live(generator) => Some(generator.as_ref()),
            _ => None,
        }
    }

    pub fn status_label(&self) -> &'static str {
        match self {
            AvailabilityGate::Unconfigured => "unconfigured",
            AvailabilityGate::Live(_) => "live",
            AvailabilityGate::Failed(_) => "failed",
        }
    }

    /// Human-readable reason the gate is closed, used in degraded-response warnings.
    pub fn unavailable_reason(&self) -> Option<String> {
        match self {
            AvailabilityGate::Unconfigured => Some("LLM credential is not configured".to_string()),
            AvailabilityGate::Live(_) => None,
            AvailabilityGate::Failed(reason) => {
                Some(format!("LLM client failed to initialize: {reason}"))
            }
        }
    }
}

impl std::fmt::Debug for AvailabilityGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AvailabilityGate::Unconfigured => f.write_str("Unconfigured"),
            AvailabilityGate::Live(_) => f.write_str("Live"),
            AvailabilityGate::Failed(reason) => f.debug_tuple("Failed").field(reason).finish(),
        }
    }
}
