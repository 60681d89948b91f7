//! crates/study_planner_core/src/domain.rs
//!
//! Defines the core data structures for the study planner.
//! Every value here is request-scoped: built while a plan is generated and
//! dropped once the response has been sent.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

//=========================================================================================
// Request Options
//=========================================================================================

/// How much prior knowledge the learner brings. Drives prompt phrasing and the
/// time-estimate lookup table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }

    /// Parses a wire value, ignoring case and surrounding whitespace.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "beginner" => Some(Difficulty::Beginner),
            "intermediate" => Some(Difficulty::Intermediate),
            "advanced" => Some(Difficulty::Advanced),
            _ => None,
        }
    }
}

/// Which plan-generation pipeline handles a request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowMode {
    Simple,
    #[default]
    Structured,
    Enhanced,
}

impl FlowMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlowMode::Simple => "simple",
            FlowMode::Structured => "structured",
            FlowMode::Enhanced => "enhanced",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "simple" => Some(FlowMode::Simple),
            "structured" => Some(FlowMode::Structured),
            "enhanced" => Some(FlowMode::Enhanced),
            _ => None,
        }
    }
}

/// Preferred learning platform for the resource lookup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Youtube,
    Khanacademy,
    Coursera,
    #[default]
    Any,
}

//=========================================================================================
// Tool Outputs
//=========================================================================================

/// A single learning resource recommendation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub title: String,
    pub url: String,
    pub platform: String,
}

/// The full output of the time estimator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeEstimate {
    pub topic: String,
    pub hours_per_week: u32,
    pub total_weeks: u32,
    pub description: String,
}

impl TimeEstimate {
    /// Total hours implied by the estimate.
    pub fn total_hours(&self) -> u32 {
        self.hours_per_week * self.total_weeks
    }
}

//=========================================================================================
// Plan Results
//=========================================================================================

/// Output of the simple flow: the provider's raw bullet list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextPlan {
    pub text: String,
}

/// Output of the structured flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructuredPlan {
    pub subject: String,
    pub topics: Vec<String>,
    pub resource: Resource,
    pub difficulty: Difficulty,
}

/// Weekly load attached to an enhanced-plan topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicTime {
    pub hours_per_week: u32,
    pub total_weeks: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedTopic {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_time: Option<TopicTime>,
}

/// Output of the enhanced flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedPlan {
    pub subject: String,
    pub difficulty: Difficulty,
    pub topics: Vec<EnhancedTopic>,
    pub resource: Resource,
    /// Only present when time estimates were requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_estimated_hours: Option<u32>,
}

/// The single plan produced per request. Serialized untagged; the response
/// metadata names the flow that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PlanResult {
    Text(TextPlan),
    Structured(StructuredPlan),
    Enhanced(EnhancedPlan),
}

impl PlanResult {
    pub fn flow_mode(&self) -> FlowMode {
        match self {
            PlanResult::Text(_) => FlowMode::Simple,
            PlanResult::Structured(_) => FlowMode::Structured,
            PlanResult::Enhanced(_) => FlowMode::Enhanced,
        }
    }

    /// Plain topic names in plan order. Text plans carry no topic list.
    pub fn topic_names(&self) -> Vec<String> {
        match self {
            PlanResult::Text(_) => Vec::new(),
            PlanResult::Structured(plan) => plan.topics.clone(),
            PlanResult::Enhanced(plan) => plan.topics.iter().map(|t| t.name.clone()).collect(),
        }
    }
}

//=========================================================================================
// Quiz
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
    MultipleChoice,
    TrueFalse,
    ShortAnswer,
}

/// A single generated quiz question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct QuizQuestion {
    pub question: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// All questions generated for one plan topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizResult {
    pub topic: String,
    pub questions: Vec<QuizQuestion>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn difficulty_parse_is_case_insensitive() {
        assert_eq!(Difficulty::parse(" Advanced "), Some(Difficulty::Advanced));
        assert_eq!(Difficulty::parse("expert"), None);
    }

    #[test]
    fn enhanced_plan_omits_absent_time_fields() {
        let plan = PlanResult::Enhanced(EnhancedPlan {
            subject: "Rust".to_string(),
            difficulty: Difficulty::Beginner,
            topics: vec![EnhancedTopic {
                name: "Ownership".to_string(),
                estimated_time: None,
            }],
            resource: Resource {
                title: "Rust Book".to_string(),
                url: "https://doc.rust-lang.org/book/".to_string(),
                platform: "Web".to_string(),
            },
            total_estimated_hours: None,
        });

        let value = serde_json::to_value(&plan).unwrap();
        assert_eq!(value["topics"], json!([{ "name": "Ownership" }]));
        assert!(value.get("totalEstimatedHours").is_none());
        assert_eq!(value["difficulty"], "beginner");
    }

    #[test]
    fn topic_names_normalizes_every_plan_shape() {
        let text = PlanResult::Text(TextPlan { text: "- a".to_string() });
        assert!(text.topic_names().is_empty());

        let enhanced = PlanResult::Enhanced(EnhancedPlan {
            subject: "Math".to_string(),
            difficulty: Difficulty::Advanced,
            topics: vec![
                EnhancedTopic { name: "A".to_string(), estimated_time: None },
                EnhancedTopic {
                    name: "B".to_string(),
                    estimated_time: Some(TopicTime { hours_per_week: 12, total_weeks: 12 }),
                },
            ],
            resource: Resource {
                title: "t".to_string(),
                url: "https://example.com".to_string(),
                platform: "p".to_string(),
            },
            total_estimated_hours: Some(144),
        });
        assert_eq!(enhanced.topic_names(), vec!["A", "B"]);
        assert_eq!(enhanced.flow_mode(), FlowMode::Enhanced);
    }

    #[test]
    fn quiz_question_type_uses_kebab_case() {
        let question: QuizQuestion = serde_json::from_value(json!({
            "question": "Is Rust memory safe?",
            "type": "true-false",
            "answer": "True"
        }))
        .unwrap();
        assert_eq!(question.question_type, QuestionType::TrueFalse);
        assert!(question.options.is_none());
    }
}
