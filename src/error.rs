use thiserror::Error;

/// Structured error context for better error handling and debugging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Field path or configuration key that caused the error (e.g., "config.dispatch_mode", "links[0].url")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., expected value, actual value)
    pub details: Option<String>,
    /// Source of the error (e.g., "registry_builder", "consumer_config")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self {
            field_path: None,
            details: None,
            source: None,
        }
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Why a single tool call was not (successfully) executed.
///
/// None of these stop the stream loop: the pending call is discarded and
/// consumption continues with the next fragment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolCallError {
    #[error("unknown tool: {name}")]
    UnknownTool { name: String },

    #[error("malformed arguments for {name}: {message}")]
    MalformedJson { name: String, message: String },

    #[error("arguments for {name} violate schema: {}", .errors.join("; "))]
    SchemaViolation { name: String, errors: Vec<String> },

    #[error("handler for {name} failed: {message}")]
    Handler { name: String, message: String },

    #[error("stream ended while tool call {name} (id {id:?}) was incomplete after {received} bytes")]
    TruncatedStream {
        name: String,
        id: String,
        received: usize,
    },
}

impl ToolCallError {
    /// Name of the tool the failed call targeted.
    pub fn tool_name(&self) -> &str {
        match self {
            ToolCallError::UnknownTool { name }
            | ToolCallError::MalformedJson { name, .. }
            | ToolCallError::SchemaViolation { name, .. }
            | ToolCallError::Handler { name, .. }
            | ToolCallError::TruncatedStream { name, .. } => name,
        }
    }

    /// Short, stable label used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ToolCallError::UnknownTool { .. } => "unknown_tool",
            ToolCallError::MalformedJson { .. } => "malformed_json",
            ToolCallError::SchemaViolation { .. } => "schema_violation",
            ToolCallError::Handler { .. } => "handler_error",
            ToolCallError::TruncatedStream { .. } => "truncated_stream",
        }
    }
}

/// Unified error type for the crate.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Tool call error: {0}")]
    ToolCall(#[from] ToolCallError),

    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("Runtime error: {message}{}", format_context(.context))]
    Runtime {
        message: String,
        context: ErrorContext,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

// Helper function to format error context for display
fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

impl Error {
    /// Create a new runtime error with structured context (transport
    /// failures reported by a fragment source, for instance)
    pub fn runtime_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Runtime {
            message: msg.into(),
            context,
        }
    }

    /// Create a new configuration error with structured context
    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Configuration { context, .. } | Error::Runtime { context, .. } => Some(context),
            _ => None,
        }
    }
}
