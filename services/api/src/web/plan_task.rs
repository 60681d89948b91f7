//! services/api/src/web/plan_task.rs
//!
//! This module contains the asynchronous "worker" function responsible for
//! handling a single plan request: run one flow, then the optional quiz fan-out.

use crate::web::{
    protocol::{GenerateResponse, GenerationRequest, ResponseMeta},
    state::AppState,
};
use std::sync::Arc;
use std::time::Instant;
use study_planner_core::{
    domain::{FlowMode, PlanResult},
    flows, quiz,
    ports::PortResult,
};
use tracing::info;

/// Runs the flow selected by the request and assembles the response envelope.
///
/// Flow failures propagate. Quiz failures never do: each topic degrades to an
/// empty question list.
pub async fn plan_process(
    app_state: Arc<AppState>,
    request: GenerationRequest,
) -> PortResult<GenerateResponse> {
    let start_time = Instant::now();
    let provider = app_state.generation_adapter.as_ref();
    let model = request.model.as_deref();

    let plan = match request.resolved_flow() {
        FlowMode::Simple => PlanResult::Text(
            flows::simple_plan(provider, &request.subject, model, request.topic_count).await?,
        ),
        FlowMode::Enhanced => PlanResult::Enhanced(
            flows::enhanced_plan(
                provider,
                &request.subject,
                request.difficulty,
                model,
                request.include_time_estimates,
            )
            .await?,
        ),
        FlowMode::Structured => PlanResult::Structured(
            flows::structured_plan(provider, &request.subject, model, request.difficulty).await?,
        ),
    };
    info!("⏱️ Plan generation took: {:?}", start_time.elapsed());

    let quiz = if request.include_quiz {
        let topics = plan.topic_names();
        if topics.is_empty() {
            info!("Quiz requested but the plan has no topics; skipping.");
            None
        } else {
            let quiz_start = Instant::now();
            let quizzes =
                quiz::generate_quizzes(provider, &topics, request.difficulty, model).await;
            info!("⏱️ Quiz generation (parallel) took: {:?}", quiz_start.elapsed());
            Some(quizzes)
        }
    } else {
        None
    };

    info!("⏱️ Total plan process took: {:?}", start_time.elapsed());
    Ok(GenerateResponse {
        meta: ResponseMeta {
            flow_mode: plan.flow_mode().as_str().to_string(),
            tools_used: request.tools_used(),
        },
        data: plan,
        quiz,
    })
}
