use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

use crate::screening::pipeline::CandidateResult;
use crate::screening::stages::StageRecord;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ScreeningRow {
    pub id: Uuid,
    pub jd_text: String,
    pub requirements: Option<String>,
    pub min_score: i16,
    pub top_n: i32,
    /// `upload` or `folder`.
    pub source: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CandidateResultRow {
    pub id: Uuid,
    pub screening_id: Uuid,
    pub position: i32,
    pub resume_name: String,
    pub storage_key: Option<String>,
    /// NULL when no score could be derived.
    pub score: Option<i16>,
    pub details: Value,
    pub created_at: DateTime<Utc>,
}

impl CandidateResultRow {
    /// Rebuilds the domain result. Undecodable details come back empty
    /// rather than failing the whole screening read.
    pub fn into_result(self) -> CandidateResult {
        let details: Vec<StageRecord> = serde_json::from_value(self.details).unwrap_or_else(|e| {
            tracing::warn!("Stored details for {} are unreadable: {e}", self.resume_name);
            Vec::new()
        });
        CandidateResult {
            resume_name: self.resume_name,
            storage_key: self.storage_key,
            score: self.score.and_then(|s| u32::try_from(s).ok()),
            details,
        }
    }
}
