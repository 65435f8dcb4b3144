//! Axum route handlers for the Screening API.

use std::path::{Path as FsPath, PathBuf};

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::scoring::{self, normalize_report, ScoreStrategy};
use crate::screening::ranking::RankingFilter;
use crate::screening::repository::ScreeningSource;
use crate::screening::resume_text::{read_folder, ResumeSource};
use crate::screening::service::{
    load_screening, run_screening, ScreeningDetail, ScreeningRequest, ScreeningResponse,
};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct FolderScreeningRequest {
    pub folder_path: PathBuf,
    pub jd_text: String,
    pub min_score: Option<u32>,
    pub top_n: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct ScoreReportRequest {
    pub report: String,
}

#[derive(Debug, Serialize)]
pub struct ScoreReportResponse {
    pub score: Option<u32>,
    pub strategy: Option<ScoreStrategy>,
    pub normalized_report: String,
}

#[derive(Debug, Deserialize)]
pub struct ScoreBatchRequest {
    pub reports: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ScoreBatchResponse {
    pub scores: Vec<Option<u32>>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/screenings
///
/// Multipart fields: `resumes` (one or more PDF files), `jd_text` or `jd_file`
/// (an uploaded file wins over pasted text), optional `min_score` and `top_n`.
pub async fn handle_create_screening(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ScreeningResponse>, AppError> {
    let mut resumes = Vec::new();
    let mut jd_text = String::new();
    let mut jd_file: Option<String> = None;
    let mut min_score: Option<u32> = None;
    let mut top_n: Option<usize> = None;

    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        let field_name = field.name().unwrap_or("").to_string();
        match field_name.as_str() {
            "resumes" => {
                let name = field.file_name().unwrap_or("").to_string();
                let bytes = field.bytes().await.map_err(bad_multipart)?;
                if name.to_ascii_lowercase().ends_with(".pdf") {
                    resumes.push(ResumeSource { name, bytes });
                } else {
                    tracing::warn!("Skipping non-PDF upload '{name}'");
                }
            }
            "jd_text" => jd_text = field.text().await.map_err(bad_multipart)?,
            "jd_file" => {
                let bytes = field.bytes().await.map_err(bad_multipart)?;
                jd_file = Some(String::from_utf8_lossy(&bytes).into_owned());
            }
            "min_score" => {
                let raw = field.text().await.map_err(bad_multipart)?;
                min_score = Some(parse_field("min_score", &raw)?);
            }
            "top_n" => {
                let raw = field.text().await.map_err(bad_multipart)?;
                top_n = Some(parse_field("top_n", &raw)?);
            }
            _ => {}
        }
    }

    let filter = build_filter(&state, min_score, top_n)?;
    let jd_text = jd_file.filter(|t| !t.trim().is_empty()).unwrap_or(jd_text);

    let response = run_screening(
        &state,
        ScreeningRequest {
            jd_text,
            resumes,
            filter,
            source: ScreeningSource::Upload,
        },
    )
    .await?;
    Ok(Json(response))
}

/// POST /api/v1/screenings/folder
///
/// Screens every PDF in a server-side directory under `RESUME_FOLDER_ROOT`.
/// Relative paths are resolved against that root.
pub async fn handle_folder_screening(
    State(state): State<AppState>,
    Json(request): Json<FolderScreeningRequest>,
) -> Result<Json<ScreeningResponse>, AppError> {
    let filter = build_filter(&state, request.min_score, request.top_n)?;
    if request.jd_text.trim().is_empty() {
        return Err(AppError::Validation("jd_text cannot be empty".to_string()));
    }

    let folder = confine_to_root(&state.config.resume_folder_root, &request.folder_path).await?;
    let resumes = read_folder(&folder).await.map_err(|e| {
        AppError::Validation(format!(
            "Cannot read folder {}: {e}",
            request.folder_path.display()
        ))
    })?;

    let response = run_screening(
        &state,
        ScreeningRequest {
            jd_text: request.jd_text,
            resumes,
            filter,
            source: ScreeningSource::Folder,
        },
    )
    .await?;
    Ok(Json(response))
}

/// GET /api/v1/screenings/:id
pub async fn handle_get_screening(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ScreeningDetail>, AppError> {
    Ok(Json(load_screening(&state, id).await?))
}

/// POST /api/v1/reports/score
///
/// Derives a score from one evaluation report and returns its normalized form.
pub async fn handle_score_report(
    Json(request): Json<ScoreReportRequest>,
) -> Json<ScoreReportResponse> {
    let derived = scoring::derive(&request.report);
    Json(ScoreReportResponse {
        score: derived.map(|d| d.value),
        strategy: derived.map(|d| d.strategy),
        normalized_report: normalize_report(&request.report),
    })
}

/// POST /api/v1/reports/score-batch
///
/// Re-scores stored reports in parallel. Output order matches input order.
pub async fn handle_score_batch(
    Json(request): Json<ScoreBatchRequest>,
) -> Result<Json<ScoreBatchResponse>, AppError> {
    let scores = tokio::task::spawn_blocking(move || scoring::derive_scores(&request.reports))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Batch scoring task failed: {e}")))?;
    Ok(Json(ScoreBatchResponse { scores }))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn build_filter(
    state: &AppState,
    min_score: Option<u32>,
    top_n: Option<usize>,
) -> Result<RankingFilter, AppError> {
    RankingFilter::new(
        min_score.unwrap_or(state.config.default_min_score),
        top_n.unwrap_or(state.config.default_top_n),
    )
}

/// Resolves `requested` against `root` and rejects anything that escapes it,
/// including `..` segments and symlinks.
async fn confine_to_root(root: &FsPath, requested: &FsPath) -> Result<PathBuf, AppError> {
    let root = tokio::fs::canonicalize(root).await.map_err(|e| {
        AppError::Internal(anyhow::anyhow!(
            "Resume folder root {} is unavailable: {e}",
            root.display()
        ))
    })?;
    let folder = tokio::fs::canonicalize(root.join(requested))
        .await
        .map_err(|e| {
            AppError::Validation(format!("Cannot read folder {}: {e}", requested.display()))
        })?;
    if !folder.starts_with(&root) {
        return Err(AppError::Validation(format!(
            "Folder {} is outside the resume folder root",
            requested.display()
        )));
    }
    Ok(folder)
}

fn parse_field<T: std::str::FromStr>(name: &str, raw: &str) -> Result<T, AppError> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::Validation(format!("{name} must be a non-negative integer, got '{raw}'")))
}

fn bad_multipart(e: axum::extract::multipart::MultipartError) -> AppError {
    AppError::Validation(format!("Malformed multipart body: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_field() {
        assert_eq!(parse_field::<u32>("min_score", " 70 ").unwrap(), 70);
        assert!(parse_field::<u32>("min_score", "-5").is_err());
        assert!(parse_field::<usize>("top_n", "ten").is_err());
    }

    #[tokio::test]
    async fn test_confine_to_root_accepts_subfolders() {
        let root = tempfile::tempdir().unwrap();
        std::fs::create_dir(root.path().join("batch-1")).unwrap();

        let relative = confine_to_root(root.path(), FsPath::new("batch-1")).await.unwrap();
        let absolute = confine_to_root(root.path(), &root.path().join("batch-1"))
            .await
            .unwrap();
        assert_eq!(relative, absolute);
        assert!(relative.ends_with("batch-1"));
    }

    #[tokio::test]
    async fn test_confine_to_root_rejects_escapes() {
        let parent = tempfile::tempdir().unwrap();
        let root = parent.path().join("root");
        std::fs::create_dir(&root).unwrap();
        std::fs::create_dir(parent.path().join("private")).unwrap();

        let dotdot = confine_to_root(&root, FsPath::new("../private")).await;
        assert!(matches!(dotdot, Err(AppError::Validation(_))));

        let absolute = confine_to_root(&root, &parent.path().join("private")).await;
        assert!(matches!(absolute, Err(AppError::Validation(_))));

        let missing = confine_to_root(&root, FsPath::new("nope")).await;
        assert!(matches!(missing, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_score_report_handler() {
        let Json(response) = handle_score_report(Json(ScoreReportRequest {
            report: "Skills: 45/30\nExperience: 40/50\nEducation: 8/10".to_string(),
        }))
        .await;
        assert_eq!(response.score, Some(78));
        assert_eq!(response.strategy, Some(ScoreStrategy::Breakdown));
        assert!(response.normalized_report.contains("Skills: 30/30"));
    }

    #[tokio::test]
    async fn test_score_batch_handler_preserves_order() {
        let Json(response) = handle_score_batch(Json(ScoreBatchRequest {
            reports: vec![
                "Total Score: 64/100".to_string(),
                "nothing here".to_string(),
                "Score: 91 out of 100".to_string(),
            ],
        }))
        .await
        .unwrap();
        assert_eq!(response.scores, vec![Some(64), None, Some(91)]);
    }
}
