//! crates/study_planner_core/src/quiz.rs
//!
//! Provider-backed quiz generation. Quizzes are an optional enrichment, so a
//! failed call degrades to an empty question list instead of an error.

use crate::domain::{Difficulty, QuizQuestion, QuizResult};
use crate::ports::{GenerationService, OutputSchema, ProviderRequest};
use futures::future::join_all;
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{info, warn};

pub const GENERATE_QUIZ_QUESTIONS: &str = "generateQuizQuestions";
pub const DEFAULT_QUESTION_COUNT: u8 = 3;
const MAX_QUESTION_COUNT: u8 = 10;

const QUIZ_PROMPT_TEMPLATE: &str = r#"Generate {count} quiz questions about "{topic}" at the {difficulty} level.

Use a mixture of question types:
- "multiple-choice": include 3-4 answer options in "options"
- "true-false": the answer is either "True" or "False"
- "short-answer": the answer is a short phrase or sentence

For every question give the correct answer and a one-sentence explanation of why it is correct."#;

/// Shape requested from the provider. Wrapped in an object because structured
/// output must have an object at its root.
#[derive(Debug, Deserialize, JsonSchema)]
struct QuizDraft {
    questions: Vec<QuizQuestion>,
}

/// Generates `count` questions (clamped to 1..=10) for a single topic.
pub async fn generate_quiz(
    provider: &dyn GenerationService,
    topic: &str,
    count: u8,
    difficulty: Difficulty,
    model: Option<&str>,
) -> QuizResult {
    let count = count.clamp(1, MAX_QUESTION_COUNT);
    let prompt = QUIZ_PROMPT_TEMPLATE
        .replace("{count}", &count.to_string())
        .replace("{topic}", topic)
        .replace("{difficulty}", difficulty.as_str());

    let request = ProviderRequest::structured(
        prompt,
        model,
        OutputSchema::of::<QuizDraft>("quiz_questions"),
    );

    let questions = match provider.generate(request).await {
        Ok(output) => match output.decode::<QuizDraft>() {
            Ok(draft) => draft.questions,
            Err(e) => {
                warn!("Quiz output for topic '{}' was malformed: {}", topic, e);
                Vec::new()
            }
        },
        Err(e) => {
            warn!("Quiz generation failed for topic '{}': {}", topic, e);
            Vec::new()
        }
    };

    QuizResult {
        topic: topic.to_string(),
        questions,
    }
}

/// Generates one quiz per distinct topic, concurrently.
///
/// Duplicate names keep their first position. The result order always follows
/// the input order, never completion order.
pub async fn generate_quizzes(
    provider: &dyn GenerationService,
    topics: &[String],
    difficulty: Difficulty,
    model: Option<&str>,
) -> Vec<QuizResult> {
    let mut distinct: Vec<&str> = Vec::with_capacity(topics.len());
    for topic in topics {
        let topic = topic.trim();
        if !topic.is_empty() && !distinct.contains(&topic) {
            distinct.push(topic);
        }
    }

    info!("Generating quizzes for {} topics in parallel", distinct.len());
    join_all(
        distinct
            .into_iter()
            .map(|topic| generate_quiz(provider, topic, DEFAULT_QUESTION_COUNT, difficulty, model)),
    )
    .await
}
