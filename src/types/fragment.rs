//! Stream fragments and the accumulated state of one in-flight tool call.

use serde::{Deserialize, Serialize};

/// One partial tool-call update.
///
/// Every field is optional and append-only in meaning: a fragment never
/// replaces what earlier fragments contributed (the `id` is the one exception,
/// see [`merge`](crate::utils::tool_call_assembler::merge)).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCallFragment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments_chunk: Option<String>,
}

impl ToolCallFragment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_arguments(mut self, chunk: impl Into<String>) -> Self {
        self.arguments_chunk = Some(chunk.into());
        self
    }

    /// True when the fragment carries nothing that could change merged state.
    pub fn is_empty(&self) -> bool {
        self.id.as_deref().map_or(true, str::is_empty)
            && self.name.as_deref().map_or(true, str::is_empty)
            && self.arguments_chunk.as_deref().map_or(true, str::is_empty)
    }
}

/// One unit of the provider stream: an optional content-text delta and/or an
/// optional tool-call delta.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamFragment {
    /// Provider-assigned identifier of the response the fragment belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call: Option<ToolCallFragment>,
}

impl StreamFragment {
    pub fn content(text: impl Into<String>) -> Self {
        Self {
            content: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn tool_call(fragment: ToolCallFragment) -> Self {
        Self {
            tool_call: Some(fragment),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// Tool call being reconstructed from fragments.
///
/// Owned exclusively by the stream consumer. The fields are only written by
/// [`merge`](crate::utils::tool_call_assembler::merge), which keeps
/// `arguments_text` append-only and never clears a non-empty `name`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AccumulatedToolCall {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) arguments_text: String,
}

impl AccumulatedToolCall {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arguments_text(&self) -> &str {
        &self.arguments_text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragment_is_empty() {
        assert!(ToolCallFragment::new().is_empty());
        assert!(ToolCallFragment::new().with_name("").with_arguments("").is_empty());
        assert!(!ToolCallFragment::new().with_arguments("{").is_empty());
        assert!(!ToolCallFragment::new().with_id("call_1").is_empty());
    }

    #[test]
    fn test_fragment_deserializes_sparse_json() {
        let frag: ToolCallFragment =
            serde_json::from_str(r#"{"arguments_chunk":"{\"a\""}"#).unwrap();
        assert_eq!(frag.id, None);
        assert_eq!(frag.name, None);
        assert_eq!(frag.arguments_chunk.as_deref(), Some("{\"a\""));
    }

    #[test]
    fn test_stream_fragment_constructors() {
        let f = StreamFragment::content("Hello").with_id("chatcmpl-1");
        assert_eq!(f.content.as_deref(), Some("Hello"));
        assert_eq!(f.id.as_deref(), Some("chatcmpl-1"));
        assert!(f.tool_call.is_none());

        let f = StreamFragment::tool_call(ToolCallFragment::new().with_name("provideLinks"));
        assert!(f.content.is_none());
        assert_eq!(
            f.tool_call.and_then(|t| t.name).as_deref(),
            Some("provideLinks")
        );
    }
}
