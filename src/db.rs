use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::Connection;

use crate::table::{Table, ROW_ID_COLUMN};

pub fn connect(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path).with_context(|| format!("Failed to open {:?}", path))?;
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;
    Ok(conn)
}

/// Domain columns vary with the vocabulary, so the table is rebuilt per run.
pub fn init_schema(conn: &Connection, table: &Table) -> Result<()> {
    let columns = table
        .headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            let kind = if i >= table.headers.len() - table.domain_columns().len() {
                "INTEGER NOT NULL DEFAULT 0"
            } else {
                "TEXT"
            };
            format!("{} {}", quote_ident(h), kind)
        })
        .collect::<Vec<_>>()
        .join(",\n            ");
    conn.execute_batch(&format!(
        "
        DROP TABLE IF EXISTS enriched_jobs;
        CREATE TABLE enriched_jobs (
            {id} INTEGER PRIMARY KEY,
            {columns}
        );
        CREATE INDEX IF NOT EXISTS idx_enriched_jobs_level ON enriched_jobs(experience_level);
        ",
        id = ROW_ID_COLUMN,
    ))?;
    Ok(())
}

pub fn save_table(conn: &Connection, table: &Table) -> Result<usize> {
    init_schema(conn, table)?;
    let names = table.headers.iter().map(|h| quote_ident(h)).collect::<Vec<_>>();
    let placeholders = (1..=names.len()).map(|i| format!("?{i}")).collect::<Vec<_>>();
    let sql = format!(
        "INSERT INTO enriched_jobs ({}) VALUES ({})",
        names.join(", "),
        placeholders.join(", ")
    );

    let tx = conn.unchecked_transaction()?;
    {
        let mut stmt = tx.prepare(&sql)?;
        for row in &table.rows {
            stmt.execute(rusqlite::params_from_iter(row.iter()))?;
        }
    }
    tx.commit()?;
    Ok(table.rows.len())
}

pub fn count_rows(conn: &Connection) -> Result<usize> {
    let n: i64 = conn.query_row("SELECT COUNT(*) FROM enriched_jobs", [], |r| r.get(0))?;
    Ok(n as usize)
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_rows_into_memory_db() {
        let conn = Connection::open_in_memory().unwrap();
        let table = Table {
            headers: vec![
                "source_id".into(),
                "title".into(),
                "company".into(),
                "location".into(),
                "posted_date".into(),
                "experience_level".into(),
                "skills".into(),
                "job_type".into(),
                "salary_hint".into(),
                "tags".into(),
                "url".into(),
                "description".into(),
                "cloud".into(),
            ],
            rows: vec![vec![
                "remoteok".into(),
                "Dev".into(),
                "Acme".into(),
                "remote".into(),
                "2024-01-07".into(),
                "senior".into(),
                "aws".into(),
                "".into(),
                "".into(),
                "".into(),
                "".into(),
                "".into(),
                "1".into(),
            ]],
        };
        assert_eq!(save_table(&conn, &table).unwrap(), 1);
        // Re-saving replaces rather than appends.
        save_table(&conn, &table).unwrap();
        assert_eq!(count_rows(&conn).unwrap(), 1);
        let cloud: i64 = conn
            .query_row("SELECT cloud FROM enriched_jobs", [], |r| r.get(0))
            .unwrap();
        assert_eq!(cloud, 1);
    }
}
