//! Resume loading: PDF bytes in, plain text out.
//!
//! `pdf-extract` is CPU-bound and can panic on malformed documents, so it always
//! runs inside `tokio::task::spawn_blocking`.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum ResumeTextError {
    #[error("failed to extract text from {name}: {reason}")]
    Extract { name: String, reason: String },

    #[error("{0} contains no extractable text")]
    Empty(String),

    #[error("text extraction task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// One resume document awaiting screening.
#[derive(Debug, Clone)]
pub struct ResumeSource {
    /// File name shown in results. Also the de-duplication key.
    pub name: String,
    pub bytes: Bytes,
}

/// Extracts the text of a PDF resume. Page breaks become single spaces.
pub async fn extract_text(source: &ResumeSource) -> Result<String, ResumeTextError> {
    let bytes = source.bytes.clone();
    let extracted = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
        .await?
        .map_err(|e| ResumeTextError::Extract {
            name: source.name.clone(),
            reason: format!("{e:?}"),
        })?;

    let text = join_pages(&extracted);
    if text.is_empty() {
        return Err(ResumeTextError::Empty(source.name.clone()));
    }
    debug!("Extracted {} chars from {}", text.len(), source.name);
    Ok(text)
}

/// Joins form-feed separated pages with single spaces, dropping blank pages.
fn join_pages(raw: &str) -> String {
    raw.split('\u{c}')
        .map(str::trim)
        .filter(|page| !page.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lists every `*.pdf` file (extension matched case-insensitively) in `dir`, sorted by path.
pub async fn discover_pdfs(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut paths = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if entry.file_type().await?.is_file() && is_pdf(&path) {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

/// Reads every PDF in `dir` into memory.
pub async fn read_folder(dir: &Path) -> std::io::Result<Vec<ResumeSource>> {
    let paths = discover_pdfs(dir).await?;
    let mut sources = Vec::with_capacity(paths.len());
    for path in paths {
        let bytes = tokio::fs::read(&path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        sources.push(ResumeSource {
            name,
            bytes: Bytes::from(bytes),
        });
    }
    info!("Found {} PDF resumes in {}", sources.len(), dir.display());
    Ok(sources)
}

/// Drops later sources whose name was already seen, preserving order.
pub fn dedupe_by_name(sources: Vec<ResumeSource>) -> Vec<ResumeSource> {
    let mut seen = HashSet::new();
    sources
        .into_iter()
        .filter(|s| seen.insert(s.name.clone()))
        .collect()
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}
