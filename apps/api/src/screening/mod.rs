//! Resume screening: loads resumes, runs the stage graph per candidate,
//! persists results and ranks them.

pub mod handlers;
pub mod pipeline;
pub mod prompts;
pub mod ranking;
pub mod repository;
pub mod requirements_cache;
pub mod resume_text;
pub mod service;
pub mod stages;
pub mod storage;
