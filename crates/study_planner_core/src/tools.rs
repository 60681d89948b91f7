//! crates/study_planner_core/src/tools.rs
//!
//! The deterministic helpers offered to the provider during plan generation.
//! Both are pure and total; the flows call them directly as a fallback.

use crate::domain::{Difficulty, Platform, Resource, TimeEstimate};
use crate::ports::ToolSpec;
use schemars::JsonSchema;
use serde::Deserialize;

pub const FIND_EDUCATIONAL_LINK: &str = "findEducationalLink";
pub const ESTIMATE_STUDY_TIME: &str = "estimateStudyTime";

const DEFAULT_RESOURCE_URL: &str = "https://www.khanacademy.org";

//=========================================================================================
// Resource Lookup
//=========================================================================================

/// Arguments of the `findEducationalLink` tool.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct LookupArgs {
    /// The topic to find a learning resource for.
    pub topic: String,
    /// Preferred platform, if any.
    pub platform: Option<Platform>,
}

/// Builds a search link for `topic` on the preferred platform.
pub fn lookup(topic: &str, platform: Option<Platform>) -> Resource {
    let topic = topic.trim();
    if topic.is_empty() {
        return Resource {
            title: "Khan Academy".to_string(),
            url: DEFAULT_RESOURCE_URL.to_string(),
            platform: "Khan Academy".to_string(),
        };
    }

    let encoded = urlencoding::encode(topic);
    match platform.unwrap_or_default() {
        Platform::Khanacademy => Resource {
            title: format!("{} on Khan Academy", topic),
            url: format!("https://www.khanacademy.org/search?page_search_query={}", encoded),
            platform: "Khan Academy".to_string(),
        },
        Platform::Coursera => Resource {
            title: format!("{} courses on Coursera", topic),
            url: format!("https://www.coursera.org/search?query={}", encoded),
            platform: "Coursera".to_string(),
        },
        Platform::Youtube | Platform::Any => Resource {
            title: format!("{} tutorials on YouTube", topic),
            url: format!("https://www.youtube.com/results?search_query={}+tutorial", encoded),
            platform: "YouTube".to_string(),
        },
    }
}

pub fn find_educational_link_tool() -> ToolSpec {
    ToolSpec {
        name: FIND_EDUCATIONAL_LINK,
        description: "Find an educational resource link (title, url, platform) for a topic, optionally on a preferred platform: youtube, khanacademy, coursera or any.",
        parameters: schemars::schema_for!(LookupArgs).to_value(),
    }
}

//=========================================================================================
// Time Estimator
//=========================================================================================

/// Arguments of the `estimateStudyTime` tool.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct EstimateArgs {
    pub topic: String,
    pub difficulty: Difficulty,
}

/// Looks up the weekly load for a topic at the given difficulty.
pub fn estimate(topic: &str, difficulty: Difficulty) -> TimeEstimate {
    let (hours_per_week, total_weeks) = match difficulty {
        Difficulty::Beginner => (5, 4),
        Difficulty::Intermediate => (8, 8),
        Difficulty::Advanced => (12, 12),
    };

    TimeEstimate {
        topic: topic.to_string(),
        hours_per_week,
        total_weeks,
        description: format!(
            "To learn {} at the {} level, plan for about {} hours per week over {} weeks.",
            topic,
            difficulty.as_str(),
            hours_per_week,
            total_weeks
        ),
    }
}

pub fn estimate_study_time_tool() -> ToolSpec {
    ToolSpec {
        name: ESTIMATE_STUDY_TIME,
        description: "Estimate the hours per week and total weeks needed to study a topic at a given difficulty (beginner, intermediate or advanced).",
        parameters: schemars::schema_for!(EstimateArgs).to_value(),
    }
}
