//! Screening persistence (PostgreSQL).

use anyhow::Result;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::screening::{CandidateResultRow, ScreeningRow};
use crate::screening::pipeline::CandidateResult;
use crate::screening::ranking::RankingFilter;

/// Where the resumes of a screening came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreeningSource {
    Upload,
    Folder,
}

impl ScreeningSource {
    pub fn as_str(self) -> &'static str {
        match self {
            ScreeningSource::Upload => "upload",
            ScreeningSource::Folder => "folder",
        }
    }
}

pub async fn insert_screening(
    pool: &PgPool,
    screening_id: Uuid,
    jd_text: &str,
    filter: &RankingFilter,
    source: ScreeningSource,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO screenings (id, jd_text, min_score, top_n, source)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(screening_id)
    .bind(jd_text)
    .bind(filter.min_score as i16)
    .bind(filter.top_n as i32)
    .bind(source.as_str())
    .execute(pool)
    .await?;
    Ok(())
}

/// Records the shared requirements text once the stage has run.
pub async fn set_requirements(
    pool: &PgPool,
    screening_id: Uuid,
    requirements: Option<&str>,
) -> Result<()> {
    sqlx::query("UPDATE screenings SET requirements = $1 WHERE id = $2")
        .bind(requirements)
        .bind(screening_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Inserts all results in one transaction, keeping their input position.
pub async fn insert_candidate_results(
    pool: &PgPool,
    screening_id: Uuid,
    results: &[CandidateResult],
) -> Result<()> {
    let mut tx = pool.begin().await?;
    for (position, result) in results.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO candidate_results
                (screening_id, position, resume_name, storage_key, score, details)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(screening_id)
        .bind(position as i32)
        .bind(&result.resume_name)
        .bind(&result.storage_key)
        .bind(result.score.map(|s| s as i16))
        .bind(serde_json::to_value(&result.details)?)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;

    info!(
        "Persisted {} candidate results for screening {screening_id}",
        results.len()
    );
    Ok(())
}

pub async fn get_screening(pool: &PgPool, screening_id: Uuid) -> Result<Option<ScreeningRow>> {
    Ok(
        sqlx::query_as::<_, ScreeningRow>("SELECT * FROM screenings WHERE id = $1")
            .bind(screening_id)
            .fetch_optional(pool)
            .await?,
    )
}

pub async fn list_candidate_results(
    pool: &PgPool,
    screening_id: Uuid,
) -> Result<Vec<CandidateResultRow>> {
    Ok(sqlx::query_as::<_, CandidateResultRow>(
        "SELECT * FROM candidate_results WHERE screening_id = $1 ORDER BY position ASC",
    )
    .bind(screening_id)
    .fetch_all(pool)
    .await?)
}
