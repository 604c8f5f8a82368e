//! Consumer configuration.
//!
//! Settings can be built in code, deserialized (every field has a default),
//! or overlaid from environment variables:
//!
//! | Variable | Values |
//! |----------|--------|
//! | `TOOLCALL_STREAM_DISPATCH` | `await` (default), `detached` |
//! | `TOOLCALL_STREAM_TRUNCATION` | `drop` (default), `fail` |
//! | `TOOLCALL_STREAM_DEBUG` | `1` logs the merged call after every fragment |

use crate::error::{Error, ErrorContext};
use serde::{Deserialize, Serialize};

pub const ENV_DISPATCH: &str = "TOOLCALL_STREAM_DISPATCH";
pub const ENV_TRUNCATION: &str = "TOOLCALL_STREAM_TRUNCATION";
pub const ENV_DEBUG: &str = "TOOLCALL_STREAM_DEBUG";

/// Whether the consumer waits for a handler before reading the next fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchMode {
    /// Block the stream loop until the handler returns. Side effects of
    /// successive calls happen in call order; a slow handler delays the
    /// rest of the stream.
    #[default]
    Await,
    /// Spawn the handler on the tokio runtime and keep reading. Handlers are
    /// joined, in dispatch order, when the stream finishes.
    Detached,
}

impl DispatchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DispatchMode::Await => "await",
            DispatchMode::Detached => "detached",
        }
    }
}

impl std::fmt::Display for DispatchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DispatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "await" | "" => Ok(DispatchMode::Await),
            "detached" => Ok(DispatchMode::Detached),
            other => Err(format!("Unknown dispatch mode: {}", other)),
        }
    }
}

/// What happens to a call still accumulating when the stream ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TruncationPolicy {
    /// Log a warning and report the lost call in the summary.
    #[default]
    Drop,
    /// Fail `finish` with `ToolCallError::TruncatedStream`.
    Fail,
}

impl TruncationPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            TruncationPolicy::Drop => "drop",
            TruncationPolicy::Fail => "fail",
        }
    }
}

impl std::fmt::Display for TruncationPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TruncationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "drop" | "" => Ok(TruncationPolicy::Drop),
            "fail" => Ok(TruncationPolicy::Fail),
            other => Err(format!("Unknown truncation policy: {}", other)),
        }
    }
}

/// Configuration for [`StreamConsumer`](crate::stream::StreamConsumer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsumerConfig {
    pub dispatch_mode: DispatchMode,
    pub truncation: TruncationPolicy,
    pub debug_tool_calls: bool,
}

impl ConsumerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dispatch_mode(mut self, mode: DispatchMode) -> Self {
        self.dispatch_mode = mode;
        self
    }

    pub fn with_truncation(mut self, policy: TruncationPolicy) -> Self {
        self.truncation = policy;
        self
    }

    pub fn with_debug_tool_calls(mut self, enabled: bool) -> Self {
        self.debug_tool_calls = enabled;
        self
    }

    /// Defaults overlaid with the process environment.
    pub fn from_env() -> Result<Self, Error> {
        Self::default().overlay(|key| std::env::var(key).ok())
    }

    /// Overlay values from an arbitrary key lookup (the environment in
    /// [`from_env`](Self::from_env)).
    pub fn overlay<F>(mut self, lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_DISPATCH) {
            self.dispatch_mode = raw.parse().map_err(|e: String| {
                Error::configuration_with_context(
                    e,
                    ErrorContext::new()
                        .with_field_path(ENV_DISPATCH)
                        .with_source("consumer_config"),
                )
            })?;
        }
        if let Some(raw) = lookup(ENV_TRUNCATION) {
            self.truncation = raw.parse().map_err(|e: String| {
                Error::configuration_with_context(
                    e,
                    ErrorContext::new()
                        .with_field_path(ENV_TRUNCATION)
                        .with_source("consumer_config"),
                )
            })?;
        }
        if let Some(raw) = lookup(ENV_DEBUG) {
            self.debug_tool_calls = raw.trim() == "1";
        }
        Ok(self)
    }
}
