//! Small building blocks used by the stream consumer.

pub mod tool_call_assembler;

pub use tool_call_assembler::{is_candidate, merge};
