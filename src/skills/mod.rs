pub mod extract;
pub mod vocabulary;

pub use extract::{extract, extract_from_text};
pub use vocabulary::{DomainSpec, SkillSpec, SkillVocabulary, VocabularySpec};
