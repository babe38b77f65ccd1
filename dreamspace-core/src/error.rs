use serde::{Deserialize, Serialize};
use std::fmt;

/// Failure of a single exchange with the generative service
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("service returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("service returned no candidates")]
    NoCandidates,

    #[error("invalid image: {0}")]
    InvalidImage(String),

    #[error("no image in response")]
    NoImage,
}

/// The three calls of a generation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineStage {
    Analyze,
    Transform,
    Render,
}

impl PipelineStage {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Analyze => "room analysis",
            Self::Transform => "design transformation",
            Self::Render => "image rendering",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{stage} failed: {source}")]
pub struct PipelineError {
    pub stage: PipelineStage,
    #[source]
    pub source: ServiceError,
}

impl PipelineError {
    pub fn new(stage: PipelineStage, source: ServiceError) -> Self {
        Self { stage, source }
    }
}

/// What the UI keeps about the last failed generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineFailure {
    pub stage: PipelineStage,
    pub message: String,
}

impl From<&PipelineError> for PipelineFailure {
    fn from(err: &PipelineError) -> Self {
        Self {
            stage: err.stage,
            message: err.source.to_string(),
        }
    }
}
