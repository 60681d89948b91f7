pub mod generation_llm;
pub mod timeout;

pub use generation_llm::OpenAiGenerationAdapter;
pub use timeout::TimeoutGenerationAdapter;
