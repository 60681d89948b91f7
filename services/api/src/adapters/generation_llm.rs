//! services/api/src/adapters/generation_llm.rs
//!
//! This module contains the adapter for the plan/quiz generation LLM.
//! It implements the `GenerationService` port from the `core` crate.

const SYSTEM_INSTRUCTIONS: &str = "You are a study planning assistant. You design clear, well-ordered study plans and quiz questions for learners. Be accurate and concise.";

const STRUCTURED_OUTPUT_INSTRUCTIONS: &str =
    "Respond ONLY with a JSON object that matches the requested schema. Do not wrap it in markdown.";

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs, ResponseFormat,
        ResponseFormatJsonSchema,
    },
    Client,
};
use async_trait::async_trait;
use study_planner_core::ports::{
    GenerationService, PortError, PortResult, ProviderOutput, ProviderRequest, ToolSpec,
};
use tracing::debug;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `GenerationService` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiGenerationAdapter {
    client: Client<OpenAIConfig>,
    default_model: String,
}

impl OpenAiGenerationAdapter {
    /// Creates a new `OpenAiGenerationAdapter`.
    pub fn new(client: Client<OpenAIConfig>, default_model: String) -> Self {
        Self {
            client,
            default_model,
        }
    }

    /// Builds the system message, listing any helpers offered for this call.
    fn system_prompt(request: &ProviderRequest) -> String {
        let mut prompt = SYSTEM_INSTRUCTIONS.to_string();
        if !request.tools.is_empty() {
            prompt.push_str("\n\n");
            prompt.push_str(&render_tools(&request.tools));
        }
        if request.output_schema.is_some() {
            prompt.push_str("\n\n");
            prompt.push_str(STRUCTURED_OUTPUT_INSTRUCTIONS);
        }
        prompt
    }
}

/// Renders the capability list offered to the model for one call.
fn render_tools(tools: &[ToolSpec]) -> String {
    let mut rendered = String::from("Available tools:");
    for tool in tools {
        rendered.push_str(&format!(
            "\n- {}: {} Arguments schema: {}",
            tool.name, tool.description, tool.parameters
        ));
    }
    rendered
}

/// Removes a markdown code fence some models put around JSON output.
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    match trimmed.strip_prefix("```") {
        Some(rest) => {
            let rest = rest.strip_prefix("json").unwrap_or(rest);
            rest.strip_suffix("```").unwrap_or(rest).trim()
        }
        None => trimmed,
    }
}

//=========================================================================================
// `GenerationService` Trait Implementation
//=========================================================================================

#[async_trait]
impl GenerationService for OpenAiGenerationAdapter {
    /// Generates plain text, or JSON validated against the requested schema.
    async fn generate(&self, request: ProviderRequest) -> PortResult<ProviderOutput> {
        let model = request
            .model
            .clone()
            .unwrap_or_else(|| self.default_model.clone());

        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(Self::system_prompt(&request))
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(request.prompt.clone())
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
        ];

        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(&model).messages(messages).n(1);
        if let Some(schema) = &request.output_schema {
            args.response_format(ResponseFormat::JsonSchema {
                json_schema: ResponseFormatJsonSchema {
                    name: schema.name.clone(),
                    description: None,
                    schema: Some(schema.schema.clone()),
                    strict: Some(false),
                },
            });
        }
        let chat_request = args
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        debug!(
            "Calling model '{}' (schema: {:?}, tools: {})",
            model,
            request.output_schema.as_ref().map(|s| s.name.as_str()),
            request.tools.len()
        );

        // Call the API and manually map the error, which respects the orphan rule.
        let response = self
            .client
            .chat()
            .create(chat_request)
            .await
            .map_err(|e: OpenAIError| PortError::Unexpected(e.to_string()))?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content);

        match (&request.output_schema, content) {
            (None, content) => Ok(ProviderOutput {
                text: content,
                structured: None,
            }),
            (Some(_), Some(content)) => {
                let value = serde_json::from_str(strip_code_fence(&content))
                    .map_err(|e| PortError::MalformedOutput(e.to_string()))?;
                Ok(ProviderOutput::from_structured(value))
            }
            (Some(schema), None) => Err(PortError::MalformedOutput(format!(
                "LLM response contained no content for schema '{}'",
                schema.name
            ))),
        }
    }
}
