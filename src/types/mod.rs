//! # Types Module
//!
//! Core data types shared by the assembler, the registry and the consumer.
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`StreamFragment`] | One unit of the provider stream (content and/or tool-call delta) |
//! | [`ToolCallFragment`] | Partial tool-call update |
//! | [`AccumulatedToolCall`] | Tool call being reconstructed from fragments |
//! | [`ToolDefinition`] | Tool definition sent to the model |
//! | [`ToolCall`] | Complete tool call from a non-streaming completion |
//! | [`ValidatedCall`] | Tool call whose arguments passed schema validation |
//! | [`ToolResult`] | Outcome of running a handler |
//!
//! ## Submodules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`fragment`] | Stream fragments and accumulated call state |
//! | [`tool`] | Tool definitions, calls and results |
//! | [`chunk`] | OpenAI-compatible response payloads |
//!
//! ## Example
//!
//! ```rust
//! use toolcall_stream::types::{StreamFragment, ToolCallFragment, ToolDefinition};
//!
//! let def = ToolDefinition::function(
//!     "provideLinks",
//!     Some("Provides links".to_string()),
//!     serde_json::json!({"type": "object"}),
//! );
//! assert_eq!(def.name(), "provideLinks");
//!
//! let fragment = StreamFragment::tool_call(
//!     ToolCallFragment::new().with_id("call_1").with_name("provideLinks"),
//! );
//! assert!(fragment.content.is_none());
//! ```

pub mod chunk;
pub mod fragment;
pub mod tool;

pub use chunk::{ChatCompletion, ChatCompletionChunk};
pub use fragment::{AccumulatedToolCall, StreamFragment, ToolCallFragment};
pub use tool::{FunctionDefinition, ToolCall, ToolDefinition, ToolResult, ValidatedCall};
