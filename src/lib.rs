//! # toolcall-stream
//!
//! Incremental assembly of LLM tool calls from streamed completions.
//!
//! A chat model streaming a tool call sends the call's name and its JSON
//! arguments in small pieces interleaved with ordinary text. This crate
//! reassembles those pieces, decides the moment the arguments form a complete
//! document that satisfies the tool's schema, and runs the registered handler
//! exactly once, while the text keeps flowing to the caller.
//!
//! ## Overview
//!
//! - **Merging**: [`utils::tool_call_assembler::merge`] folds each fragment into the pending call
//! - **Speculative parsing**: [`ToolRegistry::validate`] tells "not finished yet" apart from "wrong"
//! - **Dispatch**: [`Dispatcher`] runs one handler per resolved call, inline or detached
//! - **Consumption**: [`StreamConsumer`] drives the state machine over a fragment stream
//! - **Wire input**: [`pipeline`] decodes OpenAI-compatible SSE bodies into fragments
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use futures::stream;
//! use serde_json::{json, Value};
//! use toolcall_stream::{
//!     handler_fn, ConsumerConfig, StreamConsumer, ToolRegistry,
//!     types::{StreamFragment, ToolCallFragment, ToolDefinition},
//! };
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> toolcall_stream::Result<()> {
//! let registry = ToolRegistry::builder()
//!     .register(
//!         ToolDefinition::function("echo", None, json!({"type": "object"})),
//!         handler_fn(|args: Value| async move { anyhow::Ok(args) }),
//!     )
//!     .build()?;
//!
//! let fragments = vec![
//!     StreamFragment::content("Working on it"),
//!     StreamFragment::tool_call(ToolCallFragment::new().with_id("c1").with_name("echo")),
//!     StreamFragment::tool_call(ToolCallFragment::new().with_arguments("{\"x\":")),
//!     StreamFragment::tool_call(ToolCallFragment::new().with_arguments("1}")),
//! ];
//!
//! let summary = StreamConsumer::new(Arc::new(registry), ConsumerConfig::default())
//!     .consume(stream::iter(fragments.into_iter().map(Ok)))
//!     .await?;
//!
//! assert_eq!(summary.content, "Working on it");
//! assert_eq!(summary.results[0].content, json!({"x": 1}));
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`types`] | Fragments, tool definitions, calls, results and wire payloads |
//! | [`utils`] | Fragment merging |
//! | [`registry`] | Tool registry, schema compilation and argument validation |
//! | [`dispatch`] | Handler trait and dispatcher |
//! | [`stream`] | Stream consumer state machine |
//! | [`pipeline`] | SSE decoding into fragments |
//! | [`tools`] | Ready-made QA answer tools |
//! | [`config`] | Consumer configuration |

pub mod config;
pub mod dispatch;
pub mod pipeline;
pub mod registry;
pub mod stream;
pub mod tools;
pub mod types;
pub mod utils;

// Re-export main types for convenience
pub use config::{ConsumerConfig, DispatchMode, TruncationPolicy};
pub use dispatch::{handler_fn, typed_handler, Dispatcher, ToolHandler};
pub use registry::{ParseOutcome, ToolRegistry, ToolRegistryBuilder};
pub use stream::{ConsumerState, Step, StreamConsumer, StreamSummary};
pub use types::{
    fragment::{AccumulatedToolCall, StreamFragment, ToolCallFragment},
    tool::{ToolCall, ToolDefinition, ToolResult, ValidatedCall},
};

use futures::Stream;
use std::pin::Pin;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// A unified pinned, boxed stream that emits `Result<T>`
pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = Result<T>> + Send + 'a>>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext, ToolCallError};
