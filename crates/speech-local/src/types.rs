use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A recognizer result payload, decoded from the JSON a backend emits once
/// per completed utterance. Only `text` is required; `alternatives` carries
/// optional ranking metadata some engines provide.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecognizerResult {
    pub text: String,
    #[serde(default)]
    pub alternatives: Vec<Alternative>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alternative {
    pub text: String,
    pub confidence: f32,
}

/// Configuration for a listener backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListenerConfig {
    pub sample_rate_hz: u32,
    /// When set, the recognizer is constrained to these phrases only.
    /// Used by the wake listener to improve robustness.
    #[serde(default)]
    pub grammar: Option<Vec<String>>,
}

impl ListenerConfig {
    /// A config constrained to a fixed phrase set. Used for the wake
    /// listener, where recognizing anything else is unwanted.
    pub fn constrained(phrases: Vec<String>) -> Self {
        Self {
            grammar: Some(phrases),
            ..Self::default()
        }
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: 16_000,
            grammar: None,
        }
    }
}

/// One utterance event delivered by a listener: the raw recognizer payload
/// plus a capture timestamp. Transient, discarded after dispatch.
#[derive(Debug, Clone)]
pub struct Utterance {
    pub payload: String,
    pub ts: Option<OffsetDateTime>,
}

impl Utterance {
    pub fn now(payload: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
            ts: Some(OffsetDateTime::now_utc()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constrained_config_keeps_default_sample_rate() {
        let cfg = ListenerConfig::constrained(vec!["hey music".to_string()]);
        assert_eq!(cfg.sample_rate_hz, 16_000);
        assert_eq!(cfg.grammar.as_deref(), Some(["hey music".to_string()].as_slice()));
    }
}
