//! Stream consumer: turns a fragment stream into text plus dispatched tool calls.
//!
//! A [`StreamConsumer`] holds at most one pending tool call. Every fragment
//! carrying tool-call data is merged into it, and as soon as the merged
//! arguments parse and validate, the call is dispatched exactly once and the
//! consumer goes back to [`ConsumerState::Idle`].
//!
//! ```text
//!            tool-call fragment                 Complete → dispatch
//!   Idle ───────────────────────► Accumulating ─────────────────────► Idle
//!    ▲                              │    ▲  Incomplete (stay)
//!    │                     Rejected │    │
//!    │                              ▼    └──────
//!    └──────────────────────── Discarding
//!       new id or name                   (same-call leftovers dropped)
//! ```
//!
//! A rejected call's remaining argument chunks are dropped in
//! [`ConsumerState::Discarding`] until a fragment names a different call.
//!
//! Text content never touches this state. It is appended to a buffer, handed
//! to the optional renderer and returned in the [`StreamSummary`].


use crate::config::{ConsumerConfig, DispatchMode, TruncationPolicy};
use crate::dispatch::Dispatcher;
use crate::error::ToolCallError;
use crate::registry::{ParseOutcome, ToolRegistry};
use crate::types::fragment::{AccumulatedToolCall, StreamFragment, ToolCallFragment};
use crate::types::tool::{ToolResult, ValidatedCall};
use crate::utils::tool_call_assembler::{is_candidate, merge};
use crate::Result;
use futures::{Stream, StreamExt};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Callback receiving each text delta together with the text so far.
pub type ContentRenderer = Box<dyn FnMut(&str, &str) + Send>;

/// Tool-call side of the consumer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConsumerState {
    #[default]
    Idle,
    Accumulating(AccumulatedToolCall),
    /// A call with this id was rejected; its trailing fragments are dropped.
    Discarding { id: String },
}

/// What a single fragment did to the consumer.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Nothing to act on.
    Ignored,
    /// Text was appended; no tool-call data.
    Content,
    /// Merged, but name or arguments are still empty.
    Accumulating,
    /// Arguments are a prefix of a JSON document.
    Incomplete,
    /// The call resolved and was handed to its handler.
    Dispatched { id: String, name: String },
    /// The pending call was rejected and discarded.
    Abandoned(ToolCallError),
    /// Leftover fragment of an abandoned call, dropped.
    Discarded,
}

/// Outcome of a consumed stream.
#[derive(Debug, Clone, Default)]
pub struct StreamSummary {
    /// All text content, in arrival order.
    pub content: String,
    /// Successful handler results, in dispatch order.
    pub results: Vec<ToolResult>,
    /// Rejected calls and failed handlers.
    pub failures: Vec<ToolCallError>,
    /// Call still accumulating when the stream ended.
    pub truncated: Option<AccumulatedToolCall>,
    /// Validation attempts that found the arguments unfinished.
    pub incomplete_attempts: usize,
    /// Consumption stopped on a cancellation token.
    pub cancelled: bool,
}

impl StreamSummary {
    /// The stream ran to its end with no call left pending.
    pub fn is_clean(&self) -> bool {
        self.truncated.is_none() && !self.cancelled
    }
}

pub struct StreamConsumer {
    dispatcher: Dispatcher,
    config: ConsumerConfig,
    state: ConsumerState,
    content: String,
    renderer: Option<ContentRenderer>,
    results: Vec<ToolResult>,
    failures: Vec<ToolCallError>,
    detached: Vec<(String, JoinHandle<std::result::Result<ToolResult, ToolCallError>>)>,
    incomplete_attempts: usize,
}

impl std::fmt::Debug for StreamConsumer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamConsumer")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("content_len", &self.content.len())
            .field("detached", &self.detached.len())
            .finish()
    }
}

impl StreamConsumer {
    pub fn new(registry: Arc<ToolRegistry>, config: ConsumerConfig) -> Self {
        Self {
            dispatcher: Dispatcher::new(registry),
            config,
            state: ConsumerState::Idle,
            content: String::new(),
            renderer: None,
            results: Vec::new(),
            failures: Vec::new(),
            detached: Vec::new(),
            incomplete_attempts: 0,
        }
    }

    /// Install a renderer called with `(delta, snapshot)` for every non-empty
    /// text delta.
    pub fn on_content<F>(mut self, renderer: F) -> Self
    where
        F: FnMut(&str, &str) + Send + 'static,
    {
        self.renderer = Some(Box::new(renderer));
        self
    }

    pub fn state(&self) -> &ConsumerState {
        &self.state
    }

    /// The pending call, if one is accumulating.
    pub fn pending(&self) -> Option<&AccumulatedToolCall> {
        match &self.state {
            ConsumerState::Accumulating(call) => Some(call),
            ConsumerState::Idle | ConsumerState::Discarding { .. } => None,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Process one fragment. Content is handled before tool-call data.
    pub async fn on_fragment(&mut self, fragment: StreamFragment) -> Step {
        let mut step = Step::Ignored;

        if let Some(delta) = fragment.content.as_deref().filter(|c| !c.is_empty()) {
            self.content.push_str(delta);
            if let Some(render) = self.renderer.as_mut() {
                render(delta, &self.content);
            }
            step = Step::Content;
        }

        if let Some(tool_call) = fragment.tool_call.as_ref() {
            let tool_step = self.on_tool_fragment(tool_call).await;
            if tool_step != Step::Ignored {
                step = tool_step;
            }
        }

        step
    }

    async fn on_tool_fragment(&mut self, fragment: &ToolCallFragment) -> Step {
        let current = match std::mem::take(&mut self.state) {
            ConsumerState::Idle if fragment.is_empty() => return Step::Ignored,
            ConsumerState::Idle => None,
            ConsumerState::Accumulating(call) => Some(call),
            ConsumerState::Discarding { id } => {
                if fragment.is_empty() {
                    self.state = ConsumerState::Discarding { id };
                    return Step::Ignored;
                }
                if !starts_new_call(fragment, &id) {
                    debug!(id = %id, "dropping fragment of abandoned tool call");
                    self.state = ConsumerState::Discarding { id };
                    return Step::Discarded;
                }
                None
            }
        };

        let call = merge(current, fragment);
        if self.config.debug_tool_calls {
            debug!(
                id = %call.id,
                tool = %call.name,
                arguments = %call.arguments_text,
                "merged tool call fragment"
            );
        }

        if !is_candidate(&call) {
            self.state = ConsumerState::Accumulating(call);
            return Step::Accumulating;
        }

        match self
            .dispatcher
            .registry()
            .validate(&call.name, &call.arguments_text)
        {
            ParseOutcome::Incomplete => {
                self.incomplete_attempts += 1;
                self.state = ConsumerState::Accumulating(call);
                Step::Incomplete
            }
            ParseOutcome::Rejected(err) => {
                warn!(
                    tool = %call.name,
                    id = %call.id,
                    kind = err.kind(),
                    error = %err,
                    "abandoning tool call"
                );
                self.failures.push(err.clone());
                self.state = ConsumerState::Discarding { id: call.id };
                Step::Abandoned(err)
            }
            ParseOutcome::Complete(args) => {
                let AccumulatedToolCall { id, name, .. } = call;
                self.dispatch(ValidatedCall {
                    id: id.clone(),
                    name: name.clone(),
                    args,
                })
                .await;
                Step::Dispatched { id, name }
            }
        }
    }

    async fn dispatch(&mut self, call: ValidatedCall) {
        match self.config.dispatch_mode {
            DispatchMode::Await => match self.dispatcher.invoke(call).await {
                Ok(result) => self.results.push(result),
                Err(err) => self.failures.push(err),
            },
            DispatchMode::Detached => {
                let dispatcher = self.dispatcher.clone();
                let name = call.name.clone();
                let handle = tokio::spawn(async move { dispatcher.invoke(call).await });
                self.detached.push((name, handle));
            }
        }
    }

    /// Drive the consumer over `stream` until it ends, then [`finish`](Self::finish).
    ///
    /// A transport error ends consumption immediately and is returned as is;
    /// detached handlers already spawned keep running.
    pub async fn consume<S>(mut self, stream: S) -> Result<StreamSummary>
    where
        S: Stream<Item = Result<StreamFragment>>,
    {
        futures::pin_mut!(stream);
        while let Some(item) = stream.next().await {
            self.on_fragment(item?).await;
        }
        self.finish().await
    }

    /// Like [`consume`](Self::consume), but stops as soon as `cancel` fires.
    ///
    /// On cancellation the pending call is discarded without running its
    /// handler, and the summary has `cancelled` set.
    pub async fn consume_until_cancelled<S>(
        mut self,
        stream: S,
        cancel: CancellationToken,
    ) -> Result<StreamSummary>
    where
        S: Stream<Item = Result<StreamFragment>>,
    {
        futures::pin_mut!(stream);
        loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    return Ok(self.abort().await);
                }
                item = stream.next() => item,
            };
            match next {
                Some(item) => {
                    self.on_fragment(item?).await;
                }
                None => break,
            }
        }
        self.finish().await
    }

    /// End of stream. A call still accumulating is handled per the
    /// configured [`TruncationPolicy`]; detached handlers are joined first.
    pub async fn finish(mut self) -> Result<StreamSummary> {
        self.join_detached(false).await;

        let truncated = match std::mem::take(&mut self.state) {
            ConsumerState::Accumulating(call) => Some(call),
            ConsumerState::Idle | ConsumerState::Discarding { .. } => None,
        };

        if let Some(call) = &truncated {
            let err = ToolCallError::TruncatedStream {
                name: call.name.clone(),
                id: call.id.clone(),
                received: call.arguments_text.len(),
            };
            match self.config.truncation {
                TruncationPolicy::Drop => {
                    warn!(
                        tool = %call.name,
                        id = %call.id,
                        received = call.arguments_text.len(),
                        "stream ended with an unresolved tool call"
                    );
                    self.failures.push(err);
                }
                TruncationPolicy::Fail => return Err(err.into()),
            }
        }

        Ok(self.into_summary(truncated, false))
    }

    /// Stop without resolving the pending call. Its handler is never run.
    ///
    /// Detached handlers still running are aborted and recorded as
    /// [`ToolCallError::Handler`] failures; those already finished keep
    /// their results.
    pub async fn abort(mut self) -> StreamSummary {
        if let ConsumerState::Accumulating(call) = std::mem::take(&mut self.state) {
            debug!(tool = %call.name, id = %call.id, "discarding pending tool call");
        }
        self.join_detached(true).await;
        self.into_summary(None, true)
    }

    async fn join_detached(&mut self, abort: bool) {
        let detached = std::mem::take(&mut self.detached);
        if abort {
            for (_, handle) in &detached {
                handle.abort();
            }
        }
        for (name, handle) in detached {
            match handle.await {
                Ok(Ok(result)) => self.results.push(result),
                Ok(Err(err)) => self.failures.push(err),
                Err(join_err) if join_err.is_cancelled() => {
                    debug!(tool = %name, "detached tool handler aborted");
                    self.failures.push(ToolCallError::Handler {
                        name,
                        message: "cancelled before completion".to_string(),
                    });
                }
                Err(join_err) => {
                    warn!(tool = %name, error = %join_err, "detached tool handler did not complete");
                    self.failures.push(ToolCallError::Handler {
                        name,
                        message: join_err.to_string(),
                    });
                }
            }
        }
    }

    fn into_summary(self, truncated: Option<AccumulatedToolCall>, cancelled: bool) -> StreamSummary {
        StreamSummary {
            content: self.content,
            results: self.results,
            failures: self.failures,
            truncated,
            incomplete_attempts: self.incomplete_attempts,
            cancelled,
        }
    }
}

/// True when `fragment` belongs to a call other than the abandoned `id`.
fn starts_new_call(fragment: &ToolCallFragment, id: &str) -> bool {
    fragment.name.as_deref().is_some_and(|name| !name.is_empty())
        || fragment
            .id
            .as_deref()
            .is_some_and(|other| !other.is_empty() && other != id)
}
