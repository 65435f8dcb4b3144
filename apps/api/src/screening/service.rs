//! Screening service: orchestrates one screening end to end.
//!
//! Flow: validate → dedupe resumes → insert screening → archive resumes →
//!       requirements (cache-aware, once) → screen batch → persist → rank.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::TextGenerator;
use crate::models::screening::ScreeningRow;
use crate::screening::pipeline::{screen_batch, CandidateInput, CandidateResult, SharedInputs};
use crate::screening::ranking::{rank, RankingFilter, ScreeningCounts};
use crate::screening::repository::{self, ScreeningSource};
use crate::screening::requirements_cache::RequirementsCache;
use crate::screening::resume_text::{dedupe_by_name, ResumeSource};
use crate::screening::stages::{extract_requirements, StageOutput};
use crate::screening::storage::upload_resume;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ScreeningRequest {
    pub jd_text: String,
    pub resumes: Vec<ResumeSource>,
    pub filter: RankingFilter,
    pub source: ScreeningSource,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScreeningResponse {
    pub screening_id: Uuid,
    #[serde(flatten)]
    pub counts: ScreeningCounts,
    pub min_score: u32,
    pub top_n: usize,
    pub top: Vec<CandidateResult>,
}

/// A stored screening with every result and the ranking under its own filter.
#[derive(Debug, Clone, Serialize)]
pub struct ScreeningDetail {
    pub screening: ScreeningRow,
    #[serde(flatten)]
    pub counts: ScreeningCounts,
    pub results: Vec<CandidateResult>,
    pub top: Vec<CandidateResult>,
}

// ────────────────────────────────────────────────────────────────────────────
// Screening pipeline
// ────────────────────────────────────────────────────────────────────────────

pub async fn run_screening(
    state: &AppState,
    request: ScreeningRequest,
) -> Result<ScreeningResponse, AppError> {
    let ScreeningRequest {
        jd_text,
        resumes,
        filter,
        source,
    } = request;

    // Step 1: Validate
    let jd_text = jd_text.trim().to_string();
    if jd_text.is_empty() {
        return Err(AppError::Validation(
            "A job description is required".to_string(),
        ));
    }
    let resumes = dedupe_by_name(resumes);
    if resumes.is_empty() {
        return Err(AppError::Validation(
            "At least one PDF resume is required".to_string(),
        ));
    }

    // Step 2: Record the screening
    let screening_id = Uuid::new_v4();
    repository::insert_screening(&state.db, screening_id, &jd_text, &filter, source)
        .await
        .map_err(AppError::Internal)?;
    info!(
        "Screening {screening_id}: {} resumes (min_score={}, top_n={})",
        resumes.len(),
        filter.min_score,
        filter.top_n
    );

    // Step 3: Archive resumes (best effort)
    let mut candidates = Vec::with_capacity(resumes.len());
    for resume in resumes {
        let storage_key = upload_resume(
            &state.s3,
            &state.config.s3_bucket,
            screening_id,
            &resume.name,
            resume.bytes.clone(),
        )
        .await;
        candidates.push(CandidateInput {
            source: resume,
            storage_key,
        });
    }

    // Step 4: Requirements, shared by every candidate
    let requirements = resolve_requirements(
        state.generator.as_ref(),
        &state.requirements_cache,
        &jd_text,
    )
    .await;
    repository::set_requirements(&state.db, screening_id, requirements.text())
        .await
        .map_err(AppError::Internal)?;

    // Step 5: Screen
    let shared = Arc::new(SharedInputs {
        jd_text,
        requirements,
    });
    let results = screen_batch(
        state.generator.clone(),
        candidates,
        shared,
        state.config.screening_concurrency,
    )
    .await;

    // Step 6: Persist
    repository::insert_candidate_results(&state.db, screening_id, &results)
        .await
        .map_err(AppError::Internal)?;

    // Step 7: Rank
    let counts = ScreeningCounts::of(&results);
    let top = rank(&results, &filter);
    info!(
        "Screening {screening_id} complete: {}/{} scored, {} in top list",
        counts.scored,
        counts.total,
        top.len()
    );

    Ok(ScreeningResponse {
        screening_id,
        counts,
        min_score: filter.min_score,
        top_n: filter.top_n,
        top,
    })
}

/// Cached requirements when available; otherwise runs the stage and caches
/// a completed result.
pub async fn resolve_requirements(
    generator: &dyn TextGenerator,
    cache: &RequirementsCache,
    jd_text: &str,
) -> StageOutput {
    if let Some(cached) = cache.get(jd_text).await {
        return StageOutput::Completed(cached);
    }
    let output = extract_requirements(generator, jd_text).await;
    if let StageOutput::Completed(text) = &output {
        cache.put(jd_text, text).await;
    }
    output
}

/// Loads a stored screening and re-ranks it under the filter it was run with.
pub async fn load_screening(state: &AppState, screening_id: Uuid) -> Result<ScreeningDetail, AppError> {
    let screening = repository::get_screening(&state.db, screening_id)
        .await
        .map_err(AppError::Internal)?
        .ok_or_else(|| AppError::NotFound(format!("Screening {screening_id} not found")))?;

    let results: Vec<CandidateResult> = repository::list_candidate_results(&state.db, screening_id)
        .await
        .map_err(AppError::Internal)?
        .into_iter()
        .map(|row| row.into_result())
        .collect();

    let filter = RankingFilter::new(
        u32::try_from(screening.min_score).unwrap_or(0),
        usize::try_from(screening.top_n).unwrap_or(1),
    )?;

    Ok(ScreeningDetail {
        counts: ScreeningCounts::of(&results),
        top: rank(&results, &filter),
        results,
        screening,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::LlmError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedRequirements(AtomicUsize);

    #[async_trait]
    impl TextGenerator for FixedRequirements {
        async fn generate(&self, _prompt: &str, _system: &str) -> Result<String, LlmError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok("- Rust\n- Postgres".to_string())
        }
    }

    /// Nothing listens on port 1, so every cache call degrades to a miss.
    fn unreachable_cache() -> RequirementsCache {
        RequirementsCache::new(redis::Client::open("redis://127.0.0.1:1/").unwrap(), 60)
    }

    #[tokio::test]
    async fn test_requirements_fall_back_to_stage_when_cache_is_down() {
        let generator = FixedRequirements(AtomicUsize::new(0));
        let output = resolve_requirements(&generator, &unreachable_cache(), "Rust role").await;

        assert_eq!(output, StageOutput::Completed("- Rust - Postgres".to_string()));
        assert_eq!(generator.0.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_response_flattens_counts() {
        let response = ScreeningResponse {
            screening_id: Uuid::nil(),
            counts: ScreeningCounts {
                total: 3,
                scored: 2,
                unscored: 1,
            },
            min_score: 85,
            top_n: 20,
            top: vec![],
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["total"], 3);
        assert_eq!(json["unscored"], 1);
        assert_eq!(json["min_score"], 85);
        assert!(json["top"].as_array().unwrap().is_empty());
    }
}
