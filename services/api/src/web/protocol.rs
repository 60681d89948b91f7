//! services/api/src/web/protocol.rs
//!
//! Defines the JSON protocol of `POST /generate`: the lenient request parser and
//! the response envelope.

use serde::Serialize;
use serde_json::Value;
use study_planner_core::domain::{Difficulty, FlowMode, PlanResult, QuizResult};
use study_planner_core::flows::{
    DEFAULT_TOPIC_COUNT, MAX_TOPIC_COUNT, MIN_TOPIC_COUNT, STRUCTURED_STUDY_PLAN_PROMPT,
    STUDY_TOPICS_PROMPT,
};
use study_planner_core::quiz::GENERATE_QUIZ_QUESTIONS;
use study_planner_core::tools::{ESTIMATE_STUDY_TIME, FIND_EDUCATIONAL_LINK};
use utoipa::ToSchema;

pub const MISSING_SUBJECT: &str = "Missing subject";
pub const INTERNAL_SERVER_ERROR: &str = "Internal Server Error";

//=========================================================================================
// Request
//=========================================================================================

/// The only fatal request problem: a missing or blank subject.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("{}", MISSING_SUBJECT)]
pub struct MissingSubject;

/// A normalized `POST /generate` body.
///
/// Unknown or wrong-typed fields fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Eq, ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct GenerationRequest {
    /// What to study. Must not be blank.
    pub subject: String,
    pub model: Option<String>,
    /// beginner | intermediate | advanced
    #[schema(value_type = String, default = "beginner")]
    pub difficulty: Difficulty,
    /// simple | structured | enhanced
    #[schema(value_type = String, default = "structured")]
    pub flow_mode: FlowMode,
    /// Legacy synonym for `flowMode: "enhanced"`.
    pub enhanced: bool,
    /// Number of topics for the simple flow, 3 to 10.
    #[schema(default = 5, minimum = 3, maximum = 10)]
    pub topic_count: u8,
    pub include_time_estimates: bool,
    pub include_quiz: bool,
}

impl GenerationRequest {
    pub fn from_json(value: &Value) -> Result<Self, MissingSubject> {
        let subject = value
            .get("subject")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(MissingSubject)?
            .to_string();

        let model = value
            .get("model")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        let difficulty = value
            .get("difficulty")
            .and_then(Value::as_str)
            .and_then(Difficulty::parse)
            .unwrap_or_default();

        let flow_mode = value
            .get("flowMode")
            .and_then(Value::as_str)
            .and_then(FlowMode::parse)
            .unwrap_or_default();

        let topic_count = value
            .get("topicCount")
            .and_then(Value::as_f64)
            .filter(|n| n.is_finite())
            .map(|n| n.clamp(f64::from(MIN_TOPIC_COUNT), f64::from(MAX_TOPIC_COUNT)) as u8)
            .unwrap_or(DEFAULT_TOPIC_COUNT);

        Ok(Self {
            subject,
            model,
            difficulty,
            flow_mode,
            enhanced: flag(value, "enhanced"),
            topic_count,
            include_time_estimates: flag(value, "includeTimeEstimates"),
            include_quiz: flag(value, "includeQuiz"),
        })
    }

    /// The flow that handles this request. `simple` wins over the enhanced flag.
    pub fn resolved_flow(&self) -> FlowMode {
        match self.flow_mode {
            FlowMode::Simple => FlowMode::Simple,
            _ if self.enhanced => FlowMode::Enhanced,
            mode => mode,
        }
    }

    /// The declared tool list for the response metadata. Derived from the
    /// request flags only, not from what the provider actually invoked.
    pub fn tools_used(&self) -> Vec<String> {
        let flow = self.resolved_flow();
        let mut tools = match flow {
            FlowMode::Simple => vec![STUDY_TOPICS_PROMPT],
            _ => {
                let mut tools = vec![STRUCTURED_STUDY_PLAN_PROMPT, FIND_EDUCATIONAL_LINK];
                if flow == FlowMode::Enhanced || self.include_time_estimates {
                    tools.push(ESTIMATE_STUDY_TIME);
                }
                tools
            }
        };
        if self.include_quiz {
            tools.push(GENERATE_QUIZ_QUESTIONS);
        }
        tools.into_iter().map(str::to_string).collect()
    }
}

fn flag(value: &Value, field: &str) -> bool {
    value.get(field).and_then(Value::as_bool).unwrap_or(false)
}

//=========================================================================================
// Responses
//=========================================================================================

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMeta {
    /// The flow that produced `data`.
    pub flow_mode: String,
    pub tools_used: Vec<String>,
}

/// The 200 response envelope.
#[derive(Debug, Serialize, ToSchema)]
pub struct GenerateResponse {
    /// A text, structured or enhanced plan, depending on `meta.flowMode`.
    #[schema(value_type = Object)]
    pub data: PlanResult,
    /// One entry per plan topic, or null when no quiz was generated.
    #[schema(value_type = Option<Vec<Object>>)]
    pub quiz: Option<Vec<QuizResult>>,
    pub meta: ResponseMeta,
}

/// Body of every non-200 response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: &str) -> Self {
        Self {
            error: message.to_string(),
        }
    }
}
