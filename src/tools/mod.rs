//! Ready-made QA answer tools.
//!
//! A QA model answers in text and reports structured side data through two
//! tool calls:
//!
//! | Tool | Arguments |
//! |------|-----------|
//! | `provideLinks` | [`ProvideLinks`]: the sources cited by the answer |
//! | `provideAIAnnotations` | [`ProvideAiAnnotations`]: how confident the answer is |
//!
//! The parameter schemas are generated from the argument types, so the
//! `tools` list sent to the model and the validation applied to its replies
//! cannot drift apart.
//!
//! ```rust
//! use toolcall_stream::registry::ToolRegistry;
//! use toolcall_stream::tools::{register_qa_tools, ProvideAiAnnotations, ProvideLinks};
//!
//! let registry = register_qa_tools(
//!     ToolRegistry::builder(),
//!     |args: ProvideLinks| async move { anyhow::Ok(serde_json::json!(args.links().len())) },
//!     |args: ProvideAiAnnotations| async move {
//!         anyhow::Ok(serde_json::json!(args.ai_annotations.answer_confidence))
//!     },
//! )
//! .build()
//! .unwrap();
//! assert_eq!(registry.names().collect::<Vec<_>>(), ["provideLinks", "provideAIAnnotations"]);
//! ```

pub mod qa;

pub use qa::{AiAnnotations, AnswerConfidence, Link, ProvideAiAnnotations, ProvideLinks, RecordType};

use crate::registry::{json_schema_from_type, ToolRegistryBuilder};
use crate::types::tool::ToolDefinition;
use serde_json::Value;
use std::future::Future;

pub const PROVIDE_LINKS: &str = "provideLinks";
pub const PROVIDE_AI_ANNOTATIONS: &str = "provideAIAnnotations";

const PROVIDE_LINKS_DESCRIPTION: &str = "Provides links to the sources used in the answer";
const PROVIDE_AI_ANNOTATIONS_DESCRIPTION: &str =
    "Annotates the answer with how confident it is given the sources";

/// Register `provideLinks` and `provideAIAnnotations` with typed handlers.
pub fn register_qa_tools<L, LFut, A, AFut>(
    builder: ToolRegistryBuilder,
    on_links: L,
    on_annotations: A,
) -> ToolRegistryBuilder
where
    L: Fn(ProvideLinks) -> LFut + Send + Sync + 'static,
    LFut: Future<Output = anyhow::Result<Value>> + Send + 'static,
    A: Fn(ProvideAiAnnotations) -> AFut + Send + Sync + 'static,
    AFut: Future<Output = anyhow::Result<Value>> + Send + 'static,
{
    builder
        .register_typed(PROVIDE_LINKS, PROVIDE_LINKS_DESCRIPTION, on_links)
        .register_typed(
            PROVIDE_AI_ANNOTATIONS,
            PROVIDE_AI_ANNOTATIONS_DESCRIPTION,
            on_annotations,
        )
}

/// `tools` request entries for the QA tools, without registering handlers.
pub fn qa_tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::function(
            PROVIDE_LINKS,
            Some(PROVIDE_LINKS_DESCRIPTION.to_string()),
            json_schema_from_type::<ProvideLinks>(),
        ),
        ToolDefinition::function(
            PROVIDE_AI_ANNOTATIONS,
            Some(PROVIDE_AI_ANNOTATIONS_DESCRIPTION.to_string()),
            json_schema_from_type::<ProvideAiAnnotations>(),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ToolCallError;
    use crate::registry::{ParseOutcome, ToolRegistry};
    use serde_json::json;

    fn registry() -> ToolRegistry {
        register_qa_tools(
            ToolRegistry::builder(),
            |args: ProvideLinks| async move { anyhow::Ok(json!(args.links().len())) },
            |args: ProvideAiAnnotations| async move {
                anyhow::Ok(json!(args.ai_annotations.confidence().to_string()))
            },
        )
        .build()
        .unwrap()
    }

    #[test]
    fn test_definitions_match_registry() {
        let reg = registry();
        assert_eq!(reg.tool_definitions(), qa_tool_definitions());
        let links = &qa_tool_definitions()[0];
        assert_eq!(links.tool_type, "function");
        let params = links.function.parameters.as_ref().unwrap();
        assert_eq!(params["type"], "object");
        assert!(params["properties"]["links"].is_object());
    }

    #[test]
    fn test_links_accepts_optional_and_extra_fields() {
        let reg = registry();
        let raw = r#"{"links":[{"url":"https://docs.example.com","title":null,"type":"documentation","breadcrumbs":["Docs","Start"],"score":0.9}]}"#;
        let ParseOutcome::Complete(value) = reg.validate(PROVIDE_LINKS, raw) else {
            panic!("expected complete");
        };
        let args: ProvideLinks = serde_json::from_value(value).unwrap();
        let link = &args.links()[0];
        assert_eq!(link.record_type(), Some(RecordType::Documentation));
        assert_eq!(link.breadcrumbs.as_deref().unwrap(), ["Docs", "Start"]);
        assert_eq!(link.extra["score"], json!(0.9));

        assert!(reg.validate(PROVIDE_LINKS, "{}").is_complete());
        assert!(reg.validate(PROVIDE_LINKS, r#"{"links":null}"#).is_complete());
    }

    #[test]
    fn test_link_requires_url() {
        let outcome = registry().validate(PROVIDE_LINKS, r#"{"links":[{"title":"x"}]}"#);
        assert!(matches!(
            outcome,
            ParseOutcome::Rejected(ToolCallError::SchemaViolation { .. })
        ));
    }

    #[test]
    fn test_annotations_confidence() {
        let reg = registry();
        let ParseOutcome::Complete(value) = reg.validate(
            PROVIDE_AI_ANNOTATIONS,
            r#"{"aiAnnotations":{"answerConfidence":"somewhat_confident","reason":"partial"}}"#,
        ) else {
            panic!("expected complete");
        };
        let args: ProvideAiAnnotations = serde_json::from_value(value).unwrap();
        assert_eq!(
            args.ai_annotations.confidence(),
            AnswerConfidence::SomewhatConfident
        );
        assert_eq!(args.ai_annotations.extra["reason"], "partial");

        assert!(matches!(
            reg.validate(PROVIDE_AI_ANNOTATIONS, r#"{"aiAnnotations":{}}"#),
            ParseOutcome::Rejected(ToolCallError::SchemaViolation { .. })
        ));
    }

    #[test]
    fn test_unlisted_values_are_kept() {
        assert_eq!(
            RecordType::from("forum_thread"),
            RecordType::Custom("forum_thread".into())
        );
        assert_eq!(RecordType::from("site").to_string(), "site");
        assert_eq!(
            AnswerConfidence::from("unsure").as_str(),
            "unsure"
        );
        assert_eq!(AnswerConfidence::from("other"), AnswerConfidence::Other);
    }

    #[tokio::test]
    async fn test_handler_receives_typed_args() {
        let reg = registry();
        let handler = reg.get(PROVIDE_LINKS).unwrap().handler();
        let out = handler
            .call(json!({"links": [{"url": "a"}, {"url": "b"}]}))
            .await
            .unwrap();
        assert_eq!(out, json!(2));
    }
}
