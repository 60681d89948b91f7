//! crates/study_planner_core/src/flows.rs
//!
//! The three plan-generation pipelines. Each builds a prompt, makes a single
//! provider call, and repairs the provider output locally where it can.

use crate::domain::{
    Difficulty, EnhancedPlan, EnhancedTopic, Resource, StructuredPlan, TextPlan, TopicTime,
};
use crate::ports::{GenerationService, OutputSchema, PortResult, ProviderRequest, ToolSpec};
use crate::tools::{self, FIND_EDUCATIONAL_LINK};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{debug, info};
use url::Url;

pub const STUDY_TOPICS_PROMPT: &str = "studyTopicsPrompt";
pub const STRUCTURED_STUDY_PLAN_PROMPT: &str = "structuredStudyPlanPrompt";

pub const DEFAULT_TOPIC_COUNT: u8 = 5;
pub const MIN_TOPIC_COUNT: u8 = 3;
pub const MAX_TOPIC_COUNT: u8 = 10;

pub const EMPTY_TEXT_PLACEHOLDER: &str = "No study topics were generated.";

const SIMPLE_PROMPT_TEMPLATE: &str = r#"List {count} key study topics for learning {subject}.
Order them from the fundamentals to more advanced material.
Respond with a bulleted list, one topic per line, and no extra commentary."#;

const STRUCTURED_PROMPT_TEMPLATE: &str = r#"Create a {difficulty} study plan for "{subject}". {audience}

Return:
- subject: the subject being studied
- topics: 3 to 5 topics, ordered from the fundamentals to more advanced material
- resource: one recommended learning resource with a title, an absolute url and the platform it is hosted on

Use the findEducationalLink tool to pick the resource."#;

const ENHANCED_PROMPT_TEMPLATE: &str = r#"Create a {difficulty} study plan for "{subject}". {audience}

Return:
- subject: the subject being studied
- topics: 3 to 5 topic names, ordered from the fundamentals to more advanced material. Give plain names only, without time estimates.
- resource: one recommended learning resource with a title, an absolute url and the platform it is hosted on

Use the findEducationalLink tool to pick the resource. The estimateStudyTime tool is available if you need to reason about workload."#;

//=========================================================================================
// Provider Output Shapes
//=========================================================================================

#[derive(Debug, Deserialize, JsonSchema)]
struct ResourceDraft {
    title: Option<String>,
    url: Option<String>,
    platform: Option<String>,
}

/// What the structured and enhanced flows ask the provider for.
#[derive(Debug, Deserialize, JsonSchema)]
struct PlanDraft {
    #[serde(default)]
    subject: String,
    #[serde(default)]
    topics: Vec<String>,
    resource: Option<ResourceDraft>,
}

/// The repaired output shared by the structured and enhanced flows.
struct BasePlan {
    subject: String,
    topics: Vec<String>,
    resource: Resource,
}

//=========================================================================================
// Flows
//=========================================================================================

/// Plain-text topic list. No schema, no tools.
pub async fn simple_plan(
    provider: &dyn GenerationService,
    subject: &str,
    model: Option<&str>,
    topic_count: u8,
) -> PortResult<TextPlan> {
    let count = topic_count.clamp(MIN_TOPIC_COUNT, MAX_TOPIC_COUNT);
    let prompt = SIMPLE_PROMPT_TEMPLATE
        .replace("{count}", &count.to_string())
        .replace("{subject}", subject);

    let output = provider.generate(ProviderRequest::text(prompt, model)).await?;
    let text = output
        .text
        .filter(|text| !text.trim().is_empty())
        .unwrap_or_else(|| EMPTY_TEXT_PLACEHOLDER.to_string());

    Ok(TextPlan { text })
}

/// Schema-validated plan with an ordered topic list and one resource.
pub async fn structured_plan(
    provider: &dyn GenerationService,
    subject: &str,
    model: Option<&str>,
    difficulty: Difficulty,
) -> PortResult<StructuredPlan> {
    let prompt = render_plan_prompt(STRUCTURED_PROMPT_TEMPLATE, subject, difficulty);
    let base = generate_base_plan(
        provider,
        prompt,
        subject,
        model,
        vec![tools::find_educational_link_tool()],
    )
    .await?;

    Ok(StructuredPlan {
        subject: base.subject,
        topics: base.topics,
        resource: base.resource,
        difficulty,
    })
}

/// Structured plan whose topics can carry time estimates and a running total.
pub async fn enhanced_plan(
    provider: &dyn GenerationService,
    subject: &str,
    difficulty: Difficulty,
    model: Option<&str>,
    include_time_estimates: bool,
) -> PortResult<EnhancedPlan> {
    let prompt = render_plan_prompt(ENHANCED_PROMPT_TEMPLATE, subject, difficulty);
    let base = generate_base_plan(
        provider,
        prompt,
        subject,
        model,
        vec![
            tools::find_educational_link_tool(),
            tools::estimate_study_time_tool(),
        ],
    )
    .await?;

    let mut total_hours = 0;
    let mut topics = Vec::with_capacity(base.topics.len());
    for name in base.topics {
        let estimated_time = if include_time_estimates {
            let estimate = tools::estimate(&name, difficulty);
            total_hours += estimate.total_hours();
            Some(TopicTime {
                hours_per_week: estimate.hours_per_week,
                total_weeks: estimate.total_weeks,
            })
        } else {
            None
        };
        topics.push(EnhancedTopic {
            name,
            estimated_time,
        });
    }

    Ok(EnhancedPlan {
        subject: base.subject,
        difficulty,
        topics,
        resource: base.resource,
        total_estimated_hours: include_time_estimates.then_some(total_hours),
    })
}

//=========================================================================================
// Helpers
//=========================================================================================

fn render_plan_prompt(template: &str, subject: &str, difficulty: Difficulty) -> String {
    let audience = match difficulty {
        Difficulty::Beginner => "The learner is new to the subject and has no prior knowledge.",
        Difficulty::Intermediate => {
            "The learner knows the basics and wants to deepen their understanding."
        }
        Difficulty::Advanced => {
            "The learner is experienced and wants expert-level depth and nuance."
        }
    };
    template
        .replace("{difficulty}", difficulty.as_str())
        .replace("{subject}", subject)
        .replace("{audience}", audience)
}

async fn generate_base_plan(
    provider: &dyn GenerationService,
    prompt: String,
    requested_subject: &str,
    model: Option<&str>,
    tools: Vec<ToolSpec>,
) -> PortResult<BasePlan> {
    let request = ProviderRequest::structured(prompt, model, OutputSchema::of::<PlanDraft>("study_plan"))
        .with_tools(tools);
    let draft: PlanDraft = provider.generate(request).await?.decode()?;

    let subject = if draft.subject.trim().is_empty() {
        requested_subject.to_string()
    } else {
        draft.subject.trim().to_string()
    };
    let topics: Vec<String> = draft
        .topics
        .into_iter()
        .map(|topic| topic.trim().to_string())
        .filter(|topic| !topic.is_empty())
        .collect();
    debug!("Provider proposed {} topics for '{}'", topics.len(), subject);

    let resource = resolve_resource(draft.resource, &subject);
    Ok(BasePlan {
        subject,
        topics,
        resource,
    })
}

/// Keeps the provider's resource when it has an absolute URL, otherwise looks
/// one up for the subject.
fn resolve_resource(draft: Option<ResourceDraft>, subject: &str) -> Resource {
    if let Some(draft) = draft {
        if let Some(url) = draft.url.map(|url| url.trim().to_string()) {
            if is_absolute_url(&url) {
                return Resource {
                    title: non_blank(draft.title).unwrap_or_else(|| subject.to_string()),
                    url,
                    platform: non_blank(draft.platform).unwrap_or_else(|| "Web".to_string()),
                };
            }
        }
    }

    info!(
        "Plan for '{}' has no valid resource URL; falling back to {}",
        subject, FIND_EDUCATIONAL_LINK
    );
    tools::lookup(subject, None)
}

/// Only parseable http(s) URLs with a host are kept.
fn is_absolute_url(value: &str) -> bool {
    match Url::parse(value) {
        Ok(url) => {
            matches!(url.scheme(), "http" | "https")
                && url.host_str().is_some_and(|host| !host.is_empty())
        }
        Err(_) => false,
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{PortError, ProviderOutput};
    use crate::test_utils::ScriptedProvider;
    use serde_json::json;

    fn plan_output(topics: &[&str], resource: serde_json::Value) -> ProviderOutput {
        ProviderOutput::from_structured(json!({
            "subject": "Rust",
            "topics": topics,
            "resource": resource,
        }))
    }

    #[tokio::test]
    async fn simple_plan_returns_provider_text() {
        let provider = ScriptedProvider::new(vec![Ok(ProviderOutput::from_text("- Syntax\n- Ownership"))]);

        let plan = simple_plan(&provider, "Rust", Some("gpt-4o"), 7).await.unwrap();

        assert_eq!(plan.text, "- Syntax\n- Ownership");
        let request = &provider.requests()[0];
        assert!(request.prompt.starts_with("List 7 key study topics for learning Rust."));
        assert!(request.output_schema.is_none());
        assert!(request.tools.is_empty());
        assert_eq!(request.model.as_deref(), Some("gpt-4o"));
    }

    #[tokio::test]
    async fn simple_plan_uses_placeholder_for_empty_text() {
        let provider = ScriptedProvider::new(vec![
            Ok(ProviderOutput::from_text("  \n")),
            Ok(ProviderOutput::default()),
        ]);

        let blank = simple_plan(&provider, "Rust", None, 5).await.unwrap();
        let absent = simple_plan(&provider, "Rust", None, 5).await.unwrap();

        assert_eq!(blank.text, EMPTY_TEXT_PLACEHOLDER);
        assert_eq!(absent.text, EMPTY_TEXT_PLACEHOLDER);
    }

    #[tokio::test]
    async fn simple_plan_clamps_topic_count() {
        let provider = ScriptedProvider::new(vec![
            Ok(ProviderOutput::from_text("a")),
            Ok(ProviderOutput::from_text("b")),
        ]);
        simple_plan(&provider, "Rust", None, 1).await.unwrap();
        simple_plan(&provider, "Rust", None, 50).await.unwrap();

        let requests = provider.requests();
        assert!(requests[0].prompt.starts_with("List 3 key"));
        assert!(requests[1].prompt.starts_with("List 10 key"));
    }

    #[tokio::test]
    async fn structured_plan_keeps_provider_resource_and_stamps_difficulty() {
        let provider = ScriptedProvider::new(vec![Ok(ProviderOutput::from_structured(json!({
            "subject": "Rust",
            "topics": ["Syntax", "Ownership", "Traits"],
            "resource": { "title": "The Book", "url": "https://doc.rust-lang.org/book/", "platform": "Web" },
            "difficulty": "beginner"
        })))]);

        let plan = structured_plan(&provider, "Rust", None, Difficulty::Advanced)
            .await
            .unwrap();

        assert_eq!(plan.difficulty, Difficulty::Advanced);
        assert_eq!(plan.topics, vec!["Syntax", "Ownership", "Traits"]);
        assert_eq!(plan.resource.url, "https://doc.rust-lang.org/book/");

        let request = &provider.requests()[0];
        assert_eq!(request.output_schema.as_ref().unwrap().name, "study_plan");
        let tool_names: Vec<&str> = request.tools.iter().map(|t| t.name).collect();
        assert_eq!(tool_names, vec!["findEducationalLink"]);
        assert!(request.prompt.contains("expert-level depth"));
    }

    #[tokio::test]
    async fn structured_plan_falls_back_when_resource_url_missing() {
        let provider = ScriptedProvider::new(vec![
            Ok(plan_output(&["A"], json!({ "title": "Somewhere" }))),
            Ok(plan_output(&["A"], serde_json::Value::Null)),
            Ok(plan_output(&["A"], json!({ "title": "Relative", "url": "rust-lang.org" }))),
        ]);

        for _ in 0..3 {
            let plan = structured_plan(&provider, "Rust", None, Difficulty::Beginner)
                .await
                .unwrap();
            assert_eq!(
                plan.resource.url,
                "https://www.youtube.com/results?search_query=Rust+tutorial"
            );
            assert_eq!(plan.resource.platform, "YouTube");
        }
    }

    #[tokio::test]
    async fn structured_plan_falls_back_when_resource_url_is_malformed() {
        let provider = ScriptedProvider::new(vec![
            Ok(plan_output(&["A"], json!({ "title": "Broken", "url": "https://not a url" }))),
            Ok(plan_output(&["A"], json!({ "title": "No host", "url": "https://" }))),
            Ok(plan_output(&["A"], json!({ "title": "Wrong scheme", "url": "ftp://example.com/rust" }))),
        ]);

        for _ in 0..3 {
            let plan = structured_plan(&provider, "Rust", None, Difficulty::Beginner)
                .await
                .unwrap();
            assert_eq!(plan.resource, tools::lookup("Rust", None));
        }
    }

    #[test]
    fn is_absolute_url_accepts_http_and_https_with_host() {
        assert!(is_absolute_url("https://doc.rust-lang.org/book/"));
        assert!(is_absolute_url("http://example.com"));
        assert!(!is_absolute_url("https://not a url"));
        assert!(!is_absolute_url("mailto:someone@example.com"));
        assert!(!is_absolute_url("rust-lang.org"));
    }

    #[tokio::test]
    async fn structured_plan_uses_requested_subject_when_provider_omits_it() {
        let provider = ScriptedProvider::new(vec![Ok(ProviderOutput::from_structured(json!({
            "topics": ["  Limits ", ""]
        })))]);

        let plan = structured_plan(&provider, "Calculus", None, Difficulty::Beginner)
            .await
            .unwrap();

        assert_eq!(plan.subject, "Calculus");
        assert_eq!(plan.topics, vec!["Limits"]);
        assert!(plan.resource.url.contains("Calculus"));
    }

    #[tokio::test]
    async fn structured_plan_propagates_provider_failure() {
        let provider = ScriptedProvider::new(vec![Err(PortError::Timeout(60))]);
        let result = structured_plan(&provider, "Rust", None, Difficulty::Beginner).await;
        assert!(matches!(result, Err(PortError::Timeout(60))));
    }

    #[tokio::test]
    async fn structured_plan_rejects_missing_structured_output() {
        let provider = ScriptedProvider::new(vec![Ok(ProviderOutput::from_text("not json"))]);
        let result = structured_plan(&provider, "Rust", None, Difficulty::Beginner).await;
        assert!(matches!(result, Err(PortError::MalformedOutput(_))));
    }

    #[tokio::test]
    async fn enhanced_plan_totals_time_estimates() {
        let provider = ScriptedProvider::new(vec![Ok(plan_output(
            &["A", "B"],
            json!({ "title": "t", "url": "https://example.com", "platform": "p" }),
        ))]);

        let plan = enhanced_plan(&provider, "Rust", Difficulty::Beginner, None, true)
            .await
            .unwrap();

        assert_eq!(plan.total_estimated_hours, Some(40));
        assert_eq!(plan.topics.len(), 2);
        assert_eq!(plan.topics[0].name, "A");
        assert_eq!(
            plan.topics[1].estimated_time,
            Some(TopicTime { hours_per_week: 5, total_weeks: 4 })
        );

        let tool_names: Vec<&str> = provider.requests()[0].tools.iter().map(|t| t.name).collect();
        assert_eq!(tool_names, vec!["findEducationalLink", "estimateStudyTime"]);
    }

    #[tokio::test]
    async fn enhanced_plan_without_estimates_omits_total() {
        let provider = ScriptedProvider::new(vec![Ok(plan_output(&["A", "B"], json!({})))]);

        let plan = enhanced_plan(&provider, "Rust", Difficulty::Advanced, None, false)
            .await
            .unwrap();

        assert_eq!(plan.total_estimated_hours, None);
        assert!(plan.topics.iter().all(|t| t.estimated_time.is_none()));
        assert!(plan.resource.url.starts_with("https://"));
        let value = serde_json::to_value(&plan).unwrap();
        assert!(value.get("totalEstimatedHours").is_none());
    }

    #[tokio::test]
    async fn enhanced_plan_totals_advanced_estimates() {
        let provider = ScriptedProvider::new(vec![Ok(plan_output(
            &["A", "B", "C"],
            json!({ "url": "https://example.com" }),
        ))]);

        let plan = enhanced_plan(&provider, "Rust", Difficulty::Advanced, None, true)
            .await
            .unwrap();

        assert_eq!(plan.total_estimated_hours, Some(3 * 144));
        assert_eq!(plan.resource.title, "Rust");
        assert_eq!(plan.resource.platform, "Web");
    }
}
