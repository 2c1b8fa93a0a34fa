use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use verbum_retry::{Backoff, DEFAULT_INITIAL_DELAY, DEFAULT_RETRIES};

/// Every configurable knob, grouped by the component that reads it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub genai: GenAiSettings,
    pub retry: RetrySettings,
    pub storage: StorageSettings,
    pub bible: BibleSettings,
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenAiSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Base URL of the generative language API; the client's own default when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    pub passage_model: String,
    pub reasoning_model: String,
    pub quick_model: String,
    pub timeout_secs: u64,
}

impl GenAiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for GenAiSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: None,
            passage_model: "gemini-3-pro-preview".to_string(),
            reasoning_model: "gemini-3-pro-preview".to_string(),
            quick_model: "gemini-3-flash-preview".to_string(),
            timeout_secs: 60,
        }
    }
}

// Keeps the key out of logs.
impl fmt::Debug for GenAiSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenAiSettings")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("endpoint", &self.endpoint)
            .field("passage_model", &self.passage_model)
            .field("reasoning_model", &self.reasoning_model)
            .field("quick_model", &self.quick_model)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    /// Retries after the first attempt.
    pub retries: u32,
    /// Wait before the first retry; doubled after each one.
    pub initial_delay_ms: u64,
}

impl RetrySettings {
    pub fn backoff(&self) -> Backoff {
        Backoff::new(self.retries, Duration::from_millis(self.initial_delay_ms))
    }
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self { retries: DEFAULT_RETRIES, initial_delay_ms: DEFAULT_INITIAL_DELAY.as_millis() as u64 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Directory holding the key-value store. The platform data directory when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Serve reads only; writes are logged and dropped.
    pub read_only: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BibleSettings {
    /// Translation used when none is given on the command line.
    pub default_version: String,
}

impl Default for BibleSettings {
    fn default() -> Self {
        Self { default_version: "ARA".to_string() }
    }
}
