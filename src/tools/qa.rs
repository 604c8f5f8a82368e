//! Argument types of the QA answer tools.
//!
//! Both tools accept unknown keys and keep them, so a model that sends more
//! than these fields is not rejected.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Arguments of `provideLinks`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ProvideLinks {
    #[serde(default)]
    pub links: Option<Vec<Link>>,
}

impl ProvideLinks {
    pub fn links(&self) -> &[Link] {
        self.links.as_deref().unwrap_or_default()
    }
}

/// A cited source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Link {
    /// Footnote marker, e.g. `1`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub record_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breadcrumbs: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Link {
    pub fn record_type(&self) -> Option<RecordType> {
        self.record_type.as_deref().map(RecordType::from)
    }
}

/// Kind of record a link points at. Unlisted values are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecordType {
    Documentation,
    Site,
    DiscoursePost,
    GithubIssue,
    GithubDiscussion,
    StackoverflowQuestion,
    DiscordForumPost,
    DiscordMessage,
    CustomQuestionAnswer,
    Custom(String),
}

impl RecordType {
    pub fn as_str(&self) -> &str {
        match self {
            RecordType::Documentation => "documentation",
            RecordType::Site => "site",
            RecordType::DiscoursePost => "discourse_post",
            RecordType::GithubIssue => "github_issue",
            RecordType::GithubDiscussion => "github_discussion",
            RecordType::StackoverflowQuestion => "stackoverflow_question",
            RecordType::DiscordForumPost => "discord_forum_post",
            RecordType::DiscordMessage => "discord_message",
            RecordType::CustomQuestionAnswer => "custom_question_answer",
            RecordType::Custom(s) => s,
        }
    }
}

impl From<&str> for RecordType {
    fn from(s: &str) -> Self {
        match s {
            "documentation" => RecordType::Documentation,
            "site" => RecordType::Site,
            "discourse_post" => RecordType::DiscoursePost,
            "github_issue" => RecordType::GithubIssue,
            "github_discussion" => RecordType::GithubDiscussion,
            "stackoverflow_question" => RecordType::StackoverflowQuestion,
            "discord_forum_post" => RecordType::DiscordForumPost,
            "discord_message" => RecordType::DiscordMessage,
            "custom_question_answer" => RecordType::CustomQuestionAnswer,
            other => RecordType::Custom(other.to_string()),
        }
    }
}

impl std::fmt::Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Arguments of `provideAIAnnotations`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ProvideAiAnnotations {
    #[serde(rename = "aiAnnotations")]
    pub ai_annotations: AiAnnotations,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AiAnnotations {
    /// One of `very_confident`, `somewhat_confident`, `not_confident`,
    /// `no_sources`, `other`, or any other string.
    #[serde(rename = "answerConfidence")]
    pub answer_confidence: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AiAnnotations {
    pub fn confidence(&self) -> AnswerConfidence {
        AnswerConfidence::from(self.answer_confidence.as_str())
    }
}

/// How well the answer is supported by the sources.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AnswerConfidence {
    /// Confident answer, no hesitation.
    VeryConfident,
    /// Answer addresses the question with minor uncertainties.
    SomewhatConfident,
    /// Suggestions provided, no direct answer in the sources.
    NotConfident,
    /// No relevant information found.
    NoSources,
    /// Unclear question or unrelated to the product.
    Other,
    Unrecognized(String),
}

impl AnswerConfidence {
    pub fn as_str(&self) -> &str {
        match self {
            AnswerConfidence::VeryConfident => "very_confident",
            AnswerConfidence::SomewhatConfident => "somewhat_confident",
            AnswerConfidence::NotConfident => "not_confident",
            AnswerConfidence::NoSources => "no_sources",
            AnswerConfidence::Other => "other",
            AnswerConfidence::Unrecognized(s) => s,
        }
    }
}

impl From<&str> for AnswerConfidence {
    fn from(s: &str) -> Self {
        match s {
            "very_confident" => AnswerConfidence::VeryConfident,
            "somewhat_confident" => AnswerConfidence::SomewhatConfident,
            "not_confident" => AnswerConfidence::NotConfident,
            "no_sources" => AnswerConfidence::NoSources,
            "other" => AnswerConfidence::Other,
            other => AnswerConfidence::Unrecognized(other.to_string()),
        }
    }
}

impl std::fmt::Display for AnswerConfidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
