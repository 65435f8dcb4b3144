//! Screening task graph.
//!
//! ```text
//!   requirements (once per screening) ──────────────┐
//!   identity  ─┐                                    ├─> evaluation ─> score
//!   red_flags ─┴─ (concurrent, per candidate) ──────┘
//! ```
//!
//! Each node has typed inputs and a `StageOutput`. The per-candidate accumulator
//! is an ordered list of `StageRecord`s keyed by stage. Candidates are
//! independent and run concurrently under a permit limit.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info};

use crate::llm_client::TextGenerator;
use crate::scoring::{derive_score, normalize_report};
use crate::screening::resume_text::{extract_text, ResumeSource};
use crate::screening::stages::{
    detect_red_flags, evaluate, extract_identity, Stage, StageOutput, StageRecord,
};

/// Everything one candidate's graph run needs besides the shared inputs.
#[derive(Debug, Clone)]
pub struct CandidateInput {
    pub source: ResumeSource,
    pub storage_key: Option<String>,
}

/// Outcome for one resume. Built once after all stages finish, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateResult {
    pub resume_name: String,
    pub storage_key: Option<String>,
    /// `None` means no confident score could be derived.
    pub score: Option<u32>,
    pub details: Vec<StageRecord>,
}

/// Inputs shared by every candidate in one screening.
#[derive(Debug, Clone)]
pub struct SharedInputs {
    pub jd_text: String,
    pub requirements: StageOutput,
}

/// Loads the resume text and runs the per-candidate part of the graph.
pub async fn screen_candidate(
    generator: &dyn TextGenerator,
    input: CandidateInput,
    shared: &SharedInputs,
) -> CandidateResult {
    let resume_text = extract_text(&input.source)
        .await
        .map_err(|e| format!("could not read resume: {e}"));
    let (score, details) =
        run_graph(generator, resume_text.as_deref().map_err(String::as_str), shared).await;

    CandidateResult {
        resume_name: input.source.name,
        storage_key: input.storage_key,
        score,
        details,
    }
}

/// identity ∥ red_flags, then evaluation.
///
/// The stored evaluation detail is the normalized report, and the score is
/// the one that report displays.
async fn run_graph(
    generator: &dyn TextGenerator,
    resume_text: Result<&str, &str>,
    shared: &SharedInputs,
) -> (Option<u32>, Vec<StageRecord>) {
    let (identity, red_flags, evaluation) = match resume_text {
        Ok(resume_text) => {
            let (identity, red_flags) = tokio::join!(
                extract_identity(generator, resume_text),
                detect_red_flags(generator, resume_text)
            );
            let evaluation =
                evaluate(generator, resume_text, &shared.jd_text, &shared.requirements).await;
            (identity, red_flags, evaluation)
        }
        Err(reason) => {
            let failed = StageOutput::Failed(reason.to_string());
            (failed.clone(), failed.clone(), failed)
        }
    };

    let score = evaluation.text().and_then(derive_score);
    let evaluation_detail = match &evaluation {
        StageOutput::Completed(report) => StageOutput::Completed(normalize_report(report)),
        failed => failed.clone(),
    };

    let details = vec![
        StageRecord::new(Stage::Identity, &identity),
        StageRecord::new(Stage::Requirements, &shared.requirements),
        StageRecord::new(Stage::RedFlags, &red_flags),
        StageRecord::new(Stage::Evaluation, &evaluation_detail),
    ];
    (score, details)
}

/// Screens every candidate with at most `concurrency` graphs in flight.
/// Output order matches input order.
pub async fn screen_batch(
    generator: Arc<dyn TextGenerator>,
    candidates: Vec<CandidateInput>,
    shared: Arc<SharedInputs>,
    concurrency: usize,
) -> Vec<CandidateResult> {
    let total = candidates.len();
    let permits = Arc::new(Semaphore::new(concurrency.max(1)));
    let names: Vec<String> = candidates.iter().map(|c| c.source.name.clone()).collect();
    let storage_keys: Vec<Option<String>> =
        candidates.iter().map(|c| c.storage_key.clone()).collect();

    let mut join_set = JoinSet::new();
    for (index, candidate) in candidates.into_iter().enumerate() {
        let generator = generator.clone();
        let shared = shared.clone();
        let permits = permits.clone();
        join_set.spawn(async move {
            // The semaphore is never closed, so acquisition only fails on shutdown.
            let _permit = permits.acquire_owned().await.ok();
            let result = screen_candidate(generator.as_ref(), candidate, &shared).await;
            (index, result)
        });
    }

    let mut slots: Vec<Option<CandidateResult>> = vec![None; total];
    let mut done = 0;
    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok((index, result)) => {
                done += 1;
                info!(
                    "Screened {done}/{total}: {} (score: {:?})",
                    result.resume_name, result.score
                );
                slots[index] = Some(result);
            }
            Err(e) => error!("Screening task failed: {e}"),
        }
    }

    slots
        .into_iter()
        .zip(names.into_iter().zip(storage_keys))
        .map(|(slot, (name, storage_key))| {
            slot.unwrap_or_else(|| aborted_result(name, storage_key, shared.as_ref()))
        })
        .collect()
}

/// Stand-in for a candidate whose task died before producing a result.
fn aborted_result(
    resume_name: String,
    storage_key: Option<String>,
    shared: &SharedInputs,
) -> CandidateResult {
    let failed = StageOutput::Failed("screening task aborted".to_string());
    CandidateResult {
        resume_name,
        storage_key,
        score: None,
        details: vec![
            StageRecord::new(Stage::Identity, &failed),
            StageRecord::new(Stage::Requirements, &shared.requirements),
            StageRecord::new(Stage::RedFlags, &failed),
            StageRecord::new(Stage::Evaluation, &failed),
        ],
    }
}
