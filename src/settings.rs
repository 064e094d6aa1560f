use std::path::PathBuf;

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::table::DEFAULT_SKILL_DELIMITER;

const SETTINGS_FILE: &str = "jobs_enrichment";
const ENV_PREFIX: &str = "JOBS";

/// Run defaults. Layered: built-in defaults, then `jobs_enrichment.{toml,json,...}`
/// in the working directory, then `JOBS_*` environment variables.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub vocabulary_path: Option<PathBuf>,
    pub filter_incomplete: bool,
    pub skill_delimiter: String,
    pub sqlite_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            vocabulary_path: None,
            filter_incomplete: false,
            skill_delimiter: DEFAULT_SKILL_DELIMITER.to_string(),
            sqlite_path: None,
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::from_builder(
            Config::builder()
                .add_source(File::with_name(SETTINGS_FILE).required(false))
                .add_source(Environment::with_prefix(ENV_PREFIX)),
        )
    }

    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, config::ConfigError> {
        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    #[test]
    fn empty_sources_yield_defaults() {
        let s = Settings::from_builder(Config::builder()).unwrap();
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn file_values_override_defaults() {
        let s = Settings::from_builder(Config::builder().add_source(File::from_str(
            "filter_incomplete = true\nskill_delimiter = \"|\"\nvocabulary_path = \"vocab/custom.toml\"",
            FileFormat::Toml,
        )))
        .unwrap();
        assert!(s.filter_incomplete);
        assert_eq!(s.skill_delimiter, "|");
        assert_eq!(s.vocabulary_path, Some(PathBuf::from("vocab/custom.toml")));
        assert_eq!(s.sqlite_path, None);
    }
}
