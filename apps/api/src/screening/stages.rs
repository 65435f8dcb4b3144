//! Screening stages: one model call each, failures captured as values.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::llm_client::prompts::{DOCUMENT_BOUNDARY_INSTRUCTION, PLAIN_TEXT_SYSTEM};
use crate::llm_client::TextGenerator;
use crate::screening::prompts::{
    EVALUATION_PROMPT_TEMPLATE, IDENTITY_PROMPT_TEMPLATE, RED_FLAGS_PROMPT_TEMPLATE,
    REQUIREMENTS_PROMPT_TEMPLATE,
};

/// Nodes of the screening task graph, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Identity,
    Requirements,
    RedFlags,
    Evaluation,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Identity => "identity",
            Stage::Requirements => "requirements",
            Stage::RedFlags => "red_flags",
            Stage::Evaluation => "evaluation",
        }
    }
}

/// Result of one stage. A failure is data, not a fault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutput {
    Completed(String),
    Failed(String),
}

impl StageOutput {
    /// Generated text, only when the stage completed.
    pub fn text(&self) -> Option<&str> {
        match self {
            StageOutput::Completed(text) => Some(text),
            StageOutput::Failed(_) => None,
        }
    }
}

/// One entry of a candidate's audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageRecord {
    pub stage: Stage,
    pub text: String,
    pub failed: bool,
}

impl StageRecord {
    pub fn new(stage: Stage, output: &StageOutput) -> Self {
        match output {
            StageOutput::Completed(text) => Self {
                stage,
                text: text.clone(),
                failed: false,
            },
            StageOutput::Failed(reason) => Self {
                stage,
                text: format!("Error in {}: {reason}", stage.as_str()),
                failed: true,
            },
        }
    }
}

async fn run_stage(generator: &dyn TextGenerator, stage: Stage, prompt: &str) -> StageOutput {
    match generator.generate(prompt, PLAIN_TEXT_SYSTEM).await {
        Ok(text) => StageOutput::Completed(text),
        Err(e) => {
            warn!("Stage {} failed: {e}", stage.as_str());
            StageOutput::Failed(e.to_string())
        }
    }
}

/// Candidate name and contact details.
pub async fn extract_identity(generator: &dyn TextGenerator, resume_text: &str) -> StageOutput {
    let prompt = IDENTITY_PROMPT_TEMPLATE
        .replace("{boundary_instruction}", DOCUMENT_BOUNDARY_INSTRUCTION)
        .replace("{resume_text}", resume_text);
    run_stage(generator, Stage::Identity, &prompt).await
}

/// Job requirements, flattened onto a single line.
pub async fn extract_requirements(generator: &dyn TextGenerator, jd_text: &str) -> StageOutput {
    let prompt = REQUIREMENTS_PROMPT_TEMPLATE
        .replace("{boundary_instruction}", DOCUMENT_BOUNDARY_INSTRUCTION)
        .replace("{jd_text}", jd_text);
    match run_stage(generator, Stage::Requirements, &prompt).await {
        StageOutput::Completed(text) => StageOutput::Completed(flatten_lines(&text)),
        failed => failed,
    }
}

/// Recruiter concerns about the resume.
pub async fn detect_red_flags(generator: &dyn TextGenerator, resume_text: &str) -> StageOutput {
    let prompt = RED_FLAGS_PROMPT_TEMPLATE
        .replace("{boundary_instruction}", DOCUMENT_BOUNDARY_INSTRUCTION)
        .replace("{resume_text}", resume_text);
    run_stage(generator, Stage::RedFlags, &prompt).await
}

/// The four-category scoring report. Depends on the extracted requirements.
pub async fn evaluate(
    generator: &dyn TextGenerator,
    resume_text: &str,
    jd_text: &str,
    requirements: &StageOutput,
) -> StageOutput {
    let prompt = build_evaluation_prompt(resume_text, jd_text, requirements);
    run_stage(generator, Stage::Evaluation, &prompt).await
}

fn build_evaluation_prompt(resume_text: &str, jd_text: &str, requirements: &StageOutput) -> String {
    EVALUATION_PROMPT_TEMPLATE
        .replace("{boundary_instruction}", DOCUMENT_BOUNDARY_INSTRUCTION)
        .replace(
            "{requirements}",
            requirements.text().unwrap_or("(requirements unavailable)"),
        )
        .replace("{jd_text}", jd_text)
        .replace("{resume_text}", resume_text)
}

fn flatten_lines(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
