use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use tracing::info;

use jobs_enrichment::settings::Settings;
use jobs_enrichment::sources::{self, SourceFormat};
use jobs_enrichment::{
    db, export, AssembleOptions, Dataset, ExperienceLevel, Pipeline, SkillVocabulary,
};

#[derive(Parser)]
#[command(name = "jobs_enrichment", about = "Normalize scraped job listings and tag skills")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize, classify and skill-tag a file of listings
    Run {
        /// Input JSON file
        #[arg(short, long)]
        input: PathBuf,
        /// Input layout
        #[arg(short, long, value_enum, default_value_t = SourceFormat::Raw)]
        format: SourceFormat,
        /// Max listings to read
        #[arg(short = 'n', long)]
        limit: Option<usize>,
        /// Skill vocabulary file (default: built-in)
        #[arg(long)]
        vocabulary: Option<PathBuf>,
        /// Scrape time used for "N days ago" dates (RFC 3339 or YYYY-MM-DD; default: now)
        #[arg(long, value_parser = parse_reference_time)]
        reference_time: Option<DateTime<Utc>>,
        /// Drop listings with neither title nor company
        #[arg(long)]
        filter_incomplete: bool,
        /// Write the table as CSV
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Write enriched records as JSON
        #[arg(long)]
        json: Option<PathBuf>,
        /// Write the table into a SQLite database
        #[arg(long)]
        sqlite: Option<PathBuf>,
    },
    /// Validate a vocabulary and list its domains
    Vocab {
        #[arg(long)]
        vocabulary: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load().context("Failed to load settings")?;
    info!(?settings, "settings loaded");

    let result = match cli.command {
        Commands::Run {
            input,
            format,
            limit,
            vocabulary,
            reference_time,
            filter_incomplete,
            csv,
            json,
            sqlite,
        } => {
            let vocab_path = vocabulary.or_else(|| settings.vocabulary_path.clone());
            let vocabulary = load_vocabulary(vocab_path.as_deref())?;
            let options = AssembleOptions {
                filter_incomplete: filter_incomplete || settings.filter_incomplete,
            };
            let pipeline = Pipeline::new(vocabulary, options);

            let records = sources::load_records(&input, format, limit)?;
            println!("Loaded {} listings from {:?}", records.len(), input);
            if records.is_empty() {
                return Ok(());
            }

            let reference_time = reference_time.unwrap_or_else(Utc::now);
            let dataset = pipeline.run(&records, reference_time)?;
            print_summary(&dataset);

            let table =
                dataset.to_table_with_delimiter(pipeline.vocabulary(), &settings.skill_delimiter);
            if let Some(path) = csv {
                let n = export::write_csv(&table, &path)?;
                println!("Wrote {} rows to {:?}", n, path);
            }
            if let Some(path) = json {
                let n = export::write_json(&dataset, &path)?;
                println!("Wrote {} records to {:?}", n, path);
            }
            if let Some(path) = sqlite.or_else(|| settings.sqlite_path.clone()) {
                let conn = db::connect(&path)?;
                let n = db::save_table(&conn, &table)?;
                println!("Saved {} rows to {:?}", n, path);
            }
            Ok(())
        }
        Commands::Vocab { vocabulary } => {
            let vocab_path = vocabulary.or_else(|| settings.vocabulary_path.clone());
            let vocab = load_vocabulary(vocab_path.as_deref())?;
            for domain in vocab.domains() {
                let names: Vec<&str> = domain.skills.iter().map(|s| s.canonical.as_str()).collect();
                println!("{:<24} {:>3} | {}", domain.name, names.len(), names.join(", "));
            }
            println!("\n{} skills in {} domains", vocab.skill_count(), vocab.domains().len());
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_elapsed(elapsed));
    }

    result
}

fn load_vocabulary(path: Option<&Path>) -> Result<SkillVocabulary> {
    let vocab = match path {
        Some(p) => SkillVocabulary::from_file(p)
            .with_context(|| format!("Invalid vocabulary {:?}", p))?,
        None => SkillVocabulary::builtin().context("Invalid built-in vocabulary")?,
    };
    info!(
        domains = vocab.domains().len(),
        skills = vocab.skill_count(),
        "vocabulary loaded"
    );
    Ok(vocab)
}

fn parse_reference_time(s: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| format!("expected RFC 3339 or YYYY-MM-DD, got {s:?}"))
}

fn print_summary(dataset: &Dataset) {
    let r = dataset.report();
    println!(
        "Kept {} of {} listings ({} duplicates, {} incomplete, {} filtered).",
        dataset.len(),
        r.input,
        r.duplicates,
        r.incomplete,
        r.filtered,
    );

    let levels: Vec<String> = ExperienceLevel::ALL
        .iter()
        .map(|lvl| {
            let n = dataset.iter().filter(|rec| rec.experience_level == *lvl).count();
            format!("{lvl}: {n}")
        })
        .collect();
    println!("Levels: {}", levels.join(", "));

    let tagged = dataset.iter().filter(|rec| !rec.skills.is_empty()).count();
    println!("Listings with at least one skill: {}", tagged);
}

fn format_elapsed(d: Duration) -> String {
    let secs = d.as_secs();
    match (secs / 3600, secs % 3600 / 60, secs % 60) {
        (0, 0, _) => format!("{:.1}s", d.as_secs_f64()),
        (0, m, s) => format!("{m}m {s}s"),
        (h, m, s) => format!("{h}h {m}m {s}s"),
    }
}
