//! Handler dispatch for resolved tool calls.
//!
//! A [`Dispatcher`] runs exactly one registered handler per resolved call.
//! Nothing here is retried: an unknown name or a failing handler is reported
//! once and the call is over.

pub mod handler;

pub use handler::{handler_fn, typed_handler, FnHandler, ToolHandler, TypedHandler};

use crate::error::ToolCallError;
use crate::registry::{ParseOutcome, ToolRegistry};
use crate::types::tool::{ToolCall, ToolResult, ValidatedCall};
use std::sync::Arc;
use tracing::{info, warn};

/// Looks up and awaits handlers in a shared [`ToolRegistry`].
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<ToolRegistry>,
}

impl Dispatcher {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    /// Run the handler registered for `call.name`.
    pub async fn invoke(&self, call: ValidatedCall) -> Result<ToolResult, ToolCallError> {
        let handler = match self.registry.get(&call.name) {
            Some(tool) => tool.handler(),
            None => {
                warn!(tool = %call.name, id = %call.id, "no handler registered; dropping call");
                return Err(ToolCallError::UnknownTool { name: call.name });
            }
        };

        info!(tool = %call.name, id = %call.id, "dispatching tool call");
        match handler.call(call.args.clone()).await {
            Ok(content) => Ok(ToolResult::ok(&call, content)),
            Err(e) => {
                let message = format!("{:#}", e);
                warn!(tool = %call.name, id = %call.id, error = %message, "tool handler failed");
                Err(ToolCallError::Handler {
                    name: call.name,
                    message,
                })
            }
        }
    }

    /// Validate and dispatch the complete calls of a non-streaming completion,
    /// in order.
    ///
    /// A call whose arguments end early is reported as malformed here: the
    /// response is finished, so nothing more can arrive.
    pub async fn dispatch_complete(
        &self,
        calls: &[ToolCall],
    ) -> Vec<Result<ToolResult, ToolCallError>> {
        let mut out = Vec::with_capacity(calls.len());
        for call in calls {
            let outcome = match self.registry.validate(&call.name, &call.arguments) {
                ParseOutcome::Complete(args) => {
                    self.invoke(ValidatedCall {
                        id: call.id.clone(),
                        name: call.name.clone(),
                        args,
                    })
                    .await
                }
                ParseOutcome::Incomplete => {
                    let err = ToolCallError::MalformedJson {
                        name: call.name.clone(),
                        message: "arguments end before the JSON document is complete".to_string(),
                    };
                    warn!(tool = %call.name, id = %call.id, error = %err, "skipping tool call");
                    Err(err)
                }
                ParseOutcome::Rejected(err) => {
                    warn!(tool = %call.name, id = %call.id, kind = err.kind(), error = %err, "skipping tool call");
                    Err(err)
                }
            };
            out.push(outcome);
        }
        out
    }
}
