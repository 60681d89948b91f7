//! crates/study_planner_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the planner's core logic.
//! The generation provider is the only external collaborator; the flows talk to
//! it exclusively through `GenerationService` so any backend can be plugged in.

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::Value;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from the provider (auth, quota, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Provider call timed out after {0} seconds")]
    Timeout(u64),
    #[error("Provider returned malformed output: {0}")]
    MalformedOutput(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Provider Request and Output
//=========================================================================================

/// A helper the provider may be told about when generating.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    /// JSON schema of the tool's arguments.
    pub parameters: Value,
}

/// Named JSON schema the structured output must validate against.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputSchema {
    pub name: String,
    pub schema: Value,
}

impl OutputSchema {
    /// Derives the schema from a type's `JsonSchema` implementation.
    pub fn of<T: JsonSchema>(name: &str) -> Self {
        Self {
            name: name.to_string(),
            schema: schemars::schema_for!(T).to_value(),
        }
    }
}

/// One call to the generation provider.
#[derive(Debug, Clone, Default)]
pub struct ProviderRequest {
    /// `None` lets the adapter use its configured default model.
    pub model: Option<String>,
    pub prompt: String,
    pub output_schema: Option<OutputSchema>,
    pub tools: Vec<ToolSpec>,
}

impl ProviderRequest {
    pub fn text(prompt: String, model: Option<&str>) -> Self {
        Self {
            model: model.map(str::to_string),
            prompt,
            ..Default::default()
        }
    }

    pub fn structured(prompt: String, model: Option<&str>, schema: OutputSchema) -> Self {
        Self {
            model: model.map(str::to_string),
            prompt,
            output_schema: Some(schema),
            tools: Vec::new(),
        }
    }

    pub fn with_tools(mut self, tools: Vec<ToolSpec>) -> Self {
        self.tools = tools;
        self
    }
}

/// What the provider handed back. Text calls fill `text`, schema calls fill
/// `structured`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderOutput {
    pub text: Option<String>,
    pub structured: Option<Value>,
}

impl ProviderOutput {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            structured: None,
        }
    }

    pub fn from_structured(value: Value) -> Self {
        Self {
            text: None,
            structured: Some(value),
        }
    }

    /// Deserializes the structured payload into `T`.
    pub fn decode<T: DeserializeOwned>(self) -> PortResult<T> {
        let value = self.structured.ok_or_else(|| {
            PortError::MalformedOutput("response carried no structured output".to_string())
        })?;
        serde_json::from_value(value).map_err(|e| PortError::MalformedOutput(e.to_string()))
    }
}

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait GenerationService: Send + Sync {
    /// Generates text, or schema-shaped JSON when an output schema is supplied.
    async fn generate(&self, request: ProviderRequest) -> PortResult<ProviderOutput>;
}
