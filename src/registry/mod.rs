//! Tool registry and argument validation.
//!
//! The registry is a closed table, built once, mapping a tool name to its
//! definition, its compiled JSON Schema and its handler. Lookups of a name
//! that was never registered produce an explicit
//! [`ToolCallError::UnknownTool`] rather than falling through.
//!
//! [`ToolRegistry::validate`] is the speculative-parse step of the stream
//! consumer. Its [`ParseOutcome`] keeps "the text is not finished yet"
//! ([`ParseOutcome::Incomplete`]) apart from every genuine rejection.

mod schema;

pub use schema::json_schema_from_type;

use crate::dispatch::handler::{typed_handler, ToolHandler};
use crate::error::{Error, ErrorContext, ToolCallError};
use crate::types::tool::ToolDefinition;
use jsonschema::{Draft, JSONSchema};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

/// Result of one validation attempt on raw argument text.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    /// Parsed and accepted by the tool's schema.
    Complete(Value),
    /// The text is a prefix of a JSON document; more input may complete it.
    Incomplete,
    /// The call can never succeed.
    Rejected(ToolCallError),
}

impl ParseOutcome {
    pub fn is_complete(&self) -> bool {
        matches!(self, ParseOutcome::Complete(_))
    }

    pub fn is_incomplete(&self) -> bool {
        matches!(self, ParseOutcome::Incomplete)
    }
}

/// One registry entry.
pub struct RegisteredTool {
    definition: ToolDefinition,
    schema: JSONSchema,
    handler: Arc<dyn ToolHandler>,
}

impl RegisteredTool {
    pub fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    pub fn handler(&self) -> Arc<dyn ToolHandler> {
        Arc::clone(&self.handler)
    }
}

/// Immutable name → {schema, handler} table.
pub struct ToolRegistry {
    tools: Vec<RegisteredTool>,
    by_name: HashMap<String, usize>,
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names().collect::<Vec<_>>())
            .finish()
    }
}

impl ToolRegistry {
    pub fn builder() -> ToolRegistryBuilder {
        ToolRegistryBuilder::new()
    }

    pub fn get(&self, name: &str) -> Option<&RegisteredTool> {
        self.by_name.get(name).map(|&i| &self.tools[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Tool names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.iter().map(|t| t.definition.name())
    }

    /// `tools` entries for a chat completion request, in registration order.
    pub fn tool_definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| t.definition.clone()).collect()
    }

    /// Parse `raw` and validate it against the schema registered for `name`.
    ///
    /// - input ends mid-document: `Incomplete`
    /// - any other JSON syntax error: `Rejected(MalformedJson)`; appending
    ///   text cannot repair it
    /// - unknown name: `Rejected(UnknownTool)`, decided only once the
    ///   arguments are complete so a streamed call is consumed whole
    /// - schema or argument-type mismatch: `Rejected(SchemaViolation)`
    pub fn validate(&self, name: &str, raw: &str) -> ParseOutcome {
        let value: Value = match serde_json::from_str(raw) {
            Ok(v) => v,
            Err(e) if e.is_eof() => return ParseOutcome::Incomplete,
            Err(e) => {
                return ParseOutcome::Rejected(ToolCallError::MalformedJson {
                    name: name.to_string(),
                    message: e.to_string(),
                })
            }
        };

        let Some(tool) = self.get(name) else {
            return ParseOutcome::Rejected(ToolCallError::UnknownTool {
                name: name.to_string(),
            });
        };

        if let Err(errors) = tool.schema.validate(&value) {
            let errors: Vec<String> = errors
                .map(|e| {
                    let path = e.instance_path.to_string();
                    if path.is_empty() {
                        e.to_string()
                    } else {
                        format!("{}: {}", path, e)
                    }
                })
                .collect();
            return ParseOutcome::Rejected(ToolCallError::SchemaViolation {
                name: name.to_string(),
                errors,
            });
        }

        if let Err(message) = tool.handler.check_args(&value) {
            return ParseOutcome::Rejected(ToolCallError::SchemaViolation {
                name: name.to_string(),
                errors: vec![message],
            });
        }

        ParseOutcome::Complete(value)
    }
}

/// Collects tool registrations; [`build`](Self::build) compiles the schemas.
#[derive(Default)]
pub struct ToolRegistryBuilder {
    entries: Vec<(ToolDefinition, Arc<dyn ToolHandler>)>,
}

impl ToolRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool from an explicit definition. A definition without
    /// `parameters` accepts any JSON arguments.
    pub fn register(mut self, definition: ToolDefinition, handler: Arc<dyn ToolHandler>) -> Self {
        self.entries.push((definition, handler));
        self
    }

    /// Register a tool whose parameter schema is generated from `T` and whose
    /// handler receives `T`.
    pub fn register_typed<T, F, Fut>(
        self,
        name: impl Into<String>,
        description: impl Into<String>,
        handler: F,
    ) -> Self
    where
        T: schemars::JsonSchema + DeserializeOwned + Send + 'static,
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Value>> + Send + 'static,
    {
        let description = description.into();
        let definition = ToolDefinition::function(
            name,
            (!description.is_empty()).then_some(description),
            json_schema_from_type::<T>(),
        );
        self.register(definition, typed_handler(handler))
    }

    pub fn build(self) -> Result<ToolRegistry, Error> {
        let mut tools = Vec::with_capacity(self.entries.len());
        let mut by_name = HashMap::with_capacity(self.entries.len());

        for (definition, handler) in self.entries {
            let name = definition.name().to_string();
            if name.is_empty() {
                return Err(Error::configuration_with_context(
                    "tool name must not be empty",
                    ErrorContext::new().with_source("registry_builder"),
                ));
            }
            if by_name.contains_key(&name) {
                return Err(Error::configuration_with_context(
                    format!("tool '{}' registered twice", name),
                    ErrorContext::new()
                        .with_field_path(name)
                        .with_source("registry_builder"),
                ));
            }

            let schema_value = definition
                .function
                .parameters
                .clone()
                .unwrap_or_else(|| Value::Object(Default::default()));
            let schema = JSONSchema::options()
                .with_draft(Draft::Draft7)
                .compile(&schema_value)
                .map_err(|e| {
                    Error::configuration_with_context(
                        format!("invalid parameter schema for tool '{}'", name),
                        ErrorContext::new()
                            .with_field_path(format!("{}.parameters", name))
                            .with_details(e.to_string())
                            .with_source("registry_builder"),
                    )
                })?;

            by_name.insert(name, tools.len());
            tools.push(RegisteredTool {
                definition,
                schema,
                handler,
            });
        }

        Ok(ToolRegistry { tools, by_name })
    }
}
