use thiserror::Error;

/// Batch-level failures. Per-record problems never surface here; they
/// resolve to sentinel values during normalization.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("skill {skill:?} is listed under both {first:?} and {second:?}")]
    DuplicateSkill {
        skill: String,
        first: String,
        second: String,
    },
    #[error("domain {0:?} is defined more than once")]
    DuplicateDomain(String),
    #[error("surface form {form:?} is claimed by both {first:?} and {second:?}")]
    ConflictingSynonym {
        form: String,
        first: String,
        second: String,
    },
    #[error("domain {0:?} collides with a fixed dataset column")]
    ReservedDomain(String),
    #[error("empty {0} name in vocabulary")]
    EmptyName(&'static str),
    #[error("vocabulary config error: {0}")]
    Vocabulary(#[from] config::ConfigError),
    #[error("record #{index} has no source_id")]
    MissingSourceId { index: usize },
}

pub type Result<T> = std::result::Result<T, PipelineError>;
