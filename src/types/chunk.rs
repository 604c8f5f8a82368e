//! OpenAI-compatible chat completion payloads.
//!
//! Only the response side is modelled: streamed `chat.completion.chunk`
//! frames and the non-streaming `chat.completion` body. Every field is
//! optional on the wire, so everything defaults.

use serde::{Deserialize, Serialize};

use super::fragment::{StreamFragment, ToolCallFragment};
use super::tool::ToolCall;

/// One streamed `chat.completion.chunk` frame.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatCompletionChunk {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub choices: Vec<ChunkChoice>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChunkChoice {
    #[serde(default)]
    pub index: u32,
    #[serde(default)]
    pub delta: ChunkDelta,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChunkDelta {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tool_calls: Option<Vec<ToolCallDelta>>,
    /// Legacy `functions` API delta.
    #[serde(default)]
    pub function_call: Option<FunctionDelta>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolCallDelta {
    #[serde(default)]
    pub index: Option<u32>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, rename = "type")]
    pub call_type: Option<String>,
    #[serde(default)]
    pub function: Option<FunctionDelta>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FunctionDelta {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub arguments: Option<String>,
}

impl ChatCompletionChunk {
    /// Map the first choice of this chunk onto a [`StreamFragment`].
    ///
    /// Empty content is treated as absent. Only the first tool-call entry is
    /// taken; the consumer tracks a single pending call.
    pub fn into_fragment(self) -> StreamFragment {
        let id = self.id;
        let Some(choice) = self.choices.into_iter().next() else {
            return StreamFragment {
                id,
                ..StreamFragment::default()
            };
        };

        let delta = choice.delta;
        let content = delta.content.filter(|c| !c.is_empty());

        let tool_call = match delta.tool_calls {
            Some(calls) => {
                if calls.len() > 1 {
                    tracing::debug!(
                        extra = calls.len() - 1,
                        "chunk carries parallel tool-call deltas; only the first is tracked"
                    );
                }
                calls.into_iter().next().map(|tc| {
                    let (name, arguments_chunk) = tc
                        .function
                        .map(|f| (f.name, f.arguments))
                        .unwrap_or((None, None));
                    ToolCallFragment {
                        id: tc.id,
                        name,
                        arguments_chunk,
                    }
                })
            }
            None => delta.function_call.map(|f| ToolCallFragment {
                id: None,
                name: f.name,
                arguments_chunk: f.arguments,
            }),
        };

        StreamFragment {
            id,
            content,
            tool_call,
        }
    }
}

/// Non-streaming `chat.completion` body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatCompletion {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub choices: Vec<CompletionChoice>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompletionChoice {
    #[serde(default)]
    pub index: u32,
    #[serde(default)]
    pub message: CompletionMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompletionMessage {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tool_calls: Option<Vec<WireToolCall>>,
    #[serde(default)]
    pub function_call: Option<WireFunction>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WireToolCall {
    #[serde(default)]
    pub id: String,
    #[serde(default, rename = "type")]
    pub call_type: Option<String>,
    pub function: WireFunction,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WireFunction {
    pub name: String,
    #[serde(default)]
    pub arguments: String,
}

impl ChatCompletion {
    /// Non-empty content of every choice, in choice order.
    pub fn contents(&self) -> impl Iterator<Item = &str> {
        self.choices
            .iter()
            .filter_map(|c| c.message.content.as_deref())
            .filter(|c| !c.is_empty())
    }

    /// Complete tool calls of every choice that finished because of them.
    ///
    /// Choices finishing for another reason (`stop`, `length`, ...) are
    /// skipped even if they carry partial tool-call data.
    pub fn tool_calls(&self) -> Vec<ToolCall> {
        let mut out = Vec::new();
        for choice in &self.choices {
            match choice.finish_reason.as_deref() {
                Some("tool_calls") => {
                    for tc in choice.message.tool_calls.iter().flatten() {
                        if tc.call_type.as_deref().map_or(true, |t| t == "function") {
                            out.push(ToolCall {
                                id: tc.id.clone(),
                                name: tc.function.name.clone(),
                                arguments: tc.function.arguments.clone(),
                            });
                        }
                    }
                }
                Some("function_call") => {
                    if let Some(f) = &choice.message.function_call {
                        out.push(ToolCall {
                            id: String::new(),
                            name: f.name.clone(),
                            arguments: f.arguments.clone(),
                        });
                    }
                }
                _ => {}
            }
        }
        out
    }
}
