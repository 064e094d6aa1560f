//! Normalization and skill tagging for scraped job listings.
//!
//! Raw listings flow one way: [`normalize`] → [`classify`] / [`skills`] →
//! [`assemble`]. The core does no I/O; `sources`, `export` and `db` are the
//! adapters around it.

pub mod assemble;
pub mod classify;
pub mod db;
pub mod error;
pub mod export;
pub mod extras;
pub mod normalize;
pub mod record;
pub mod settings;
pub mod skills;
pub mod sources;
pub mod table;

pub use assemble::{assemble, AssembleOptions, Pipeline};
pub use error::{PipelineError, Result};
pub use record::{
    AssemblyReport, Dataset, EnrichedJobRecord, ExperienceLevel, NormalizedJobRecord,
    RawJobRecord, NOT_SPECIFIED,
};
pub use skills::SkillVocabulary;
pub use table::Table;
