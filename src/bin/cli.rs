use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::SqlitePool;
use trivia_api::db::queries::categories::{get_all_categories, import_categories};
use trivia_api::db::queries::questions::{get_all_questions, import_questions};
use trivia_api::db::{establish_connection, run_migrations, Category, Question};
use trivia_api::telemetry::init_tracing;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Database path
    db_path: PathBuf,
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replace categories and questions with the CSV files in a directory
    Import { path: PathBuf },
    /// Write categories and questions as CSV files into a directory
    Export { path: PathBuf },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing("info");
    let cli = Cli::parse();
    let pool = establish_connection(&cli.db_path)
        .await
        .context("Cannot connect to DB")?;
    run_migrations(&pool).await?;
    match cli.command {
        Commands::Export { path } => export_data(&pool, &path).await.context("Cannot export"),
        Commands::Import { path } => import_data(&pool, &path).await.context("Cannot import"),
    }
}

fn write_to(path: PathBuf, data: Vec<impl Serialize>) -> anyhow::Result<()> {
    let file = std::fs::File::create(path)?;
    let mut wtr = csv::Writer::from_writer(file);
    for line in data {
        wtr.serialize(line)?;
    }
    wtr.flush()?;
    Ok(())
}

fn read_from<T: DeserializeOwned>(path: PathBuf) -> anyhow::Result<Vec<T>> {
    let file = std::fs::File::open(&path)
        .with_context(|| format!("Cannot open {}", path.display()))?;
    let mut rdr = csv::Reader::from_reader(file);
    let records = rdr.deserialize().collect::<Result<Vec<T>, _>>()?;
    Ok(records)
}

async fn export_data(pool: &SqlitePool, path: &Path) -> anyhow::Result<()> {
    let categories = get_all_categories(pool).await?;
    let questions = get_all_questions(pool).await?;
    if !path.exists() {
        std::fs::create_dir_all(path)?
    }
    tracing::info!(
        "Exporting {} categories and {} questions to {}",
        categories.len(),
        questions.len(),
        path.display()
    );
    write_to(path.join("categories.csv"), categories)?;
    write_to(path.join("questions.csv"), questions)?;
    Ok(())
}

async fn import_data(pool: &SqlitePool, path: &Path) -> anyhow::Result<()> {
    let categories: Vec<Category> = read_from(path.join("categories.csv"))?;
    let questions: Vec<Question> = read_from(path.join("questions.csv"))?;
    tracing::info!(
        "Importing {} categories and {} questions from {}",
        categories.len(),
        questions.len(),
        path.display()
    );
    import_categories(pool, categories).await?;
    import_questions(pool, questions).await?;
    Ok(())
}
