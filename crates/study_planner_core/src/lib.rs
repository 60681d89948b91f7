pub mod domain;
pub mod flows;
pub mod ports;
pub mod quiz;
pub mod tools;

#[cfg(test)]
mod test_utils;

pub use domain::{
    Difficulty, EnhancedPlan, EnhancedTopic, FlowMode, Platform, PlanResult, QuestionType,
    QuizQuestion, QuizResult, Resource, StructuredPlan, TextPlan, TimeEstimate, TopicTime,
};
pub use ports::{
    GenerationService, OutputSchema, PortError, PortResult, ProviderOutput, ProviderRequest,
    ToolSpec,
};
