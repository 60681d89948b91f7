//! services/api/src/adapters/timeout.rs
//!
//! A decorator that bounds every call to an inner `GenerationService`.
//! An elapsed deadline surfaces as `PortError::Timeout`, which callers treat
//! like any other provider failure.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use study_planner_core::ports::{
    GenerationService, PortError, PortResult, ProviderOutput, ProviderRequest,
};
use tracing::warn;

#[derive(Clone)]
pub struct TimeoutGenerationAdapter {
    inner: Arc<dyn GenerationService>,
    timeout: Duration,
}

impl TimeoutGenerationAdapter {
    pub fn new(inner: Arc<dyn GenerationService>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }
}

#[async_trait]
impl GenerationService for TimeoutGenerationAdapter {
    async fn generate(&self, request: ProviderRequest) -> PortResult<ProviderOutput> {
        match tokio::time::timeout(self.timeout, self.inner.generate(request)).await {
            Ok(result) => result,
            Err(_) => {
                warn!("Provider call exceeded {:?}", self.timeout);
                Err(PortError::Timeout(self.timeout.as_secs()))
            }
        }
    }
}
