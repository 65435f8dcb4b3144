use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;
use sqlx::PgPool;

use crate::config::Config;
use crate::llm_client::TextGenerator;
use crate::screening::requirements_cache::RequirementsCache;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub s3: S3Client,
    /// Requirements-stage output cached in Redis per job description.
    pub requirements_cache: RequirementsCache,
    /// Model behind every screening stage. `LlmClient` in production.
    pub generator: Arc<dyn TextGenerator>,
    pub config: Config,
}
