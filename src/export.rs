use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use crate::record::Dataset;
use crate::table::Table;

pub fn write_csv(table: &Table, path: &Path) -> Result<usize> {
    let file = fs::File::create(path).with_context(|| format!("Failed to create {:?}", path))?;
    write_csv_to(table, file)?;
    Ok(table.rows.len())
}

pub fn write_csv_to<W: Write>(table: &Table, out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(&table.headers)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_json(dataset: &Dataset, path: &Path) -> Result<usize> {
    let file = fs::File::create(path).with_context(|| format!("Failed to create {:?}", path))?;
    serde_json::to_writer_pretty(file, dataset.records())?;
    Ok(dataset.len())
}
