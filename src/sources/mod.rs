//! Readers that turn files produced by the scraping side into raw records.

pub mod remoteok;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;

use crate::record::RawJobRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SourceFormat {
    /// JSON array of records already in raw form.
    #[default]
    Raw,
    /// RemoteOK API dump.
    Remoteok,
}

pub fn load_records(
    path: &Path,
    format: SourceFormat,
    limit: Option<usize>,
) -> Result<Vec<RawJobRecord>> {
    let text = fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    parse_records(&text, format, limit).with_context(|| format!("Failed to parse {:?}", path))
}

pub fn parse_records(
    text: &str,
    format: SourceFormat,
    limit: Option<usize>,
) -> Result<Vec<RawJobRecord>> {
    let mut records = match format {
        SourceFormat::Raw => serde_json::from_str::<Vec<RawJobRecord>>(text)?,
        SourceFormat::Remoteok => remoteok::parse(text, limit)?,
    };
    if let Some(n) = limit {
        records.truncate(n);
    }
    Ok(records)
}
