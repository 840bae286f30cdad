//! Bootstrap entry point.
//!
//! # Responsibility
//! - Read configuration from flags/environment.
//! - Initialize logging, open the database, build both repositories, and
//!   hand them to `SeedRunner` explicitly.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use dualstore_core::db::{open_db, open_db_in_memory};
use dualstore_core::{
    core_version, default_log_level, init_logging, CustomerDocumentRepository,
    InMemoryDocumentRepository, RunReport, SeedRunner, SqliteCustomerRepository,
    SqliteDocumentRepository, DIRECTORY_TABLE,
};
use log::{error, info};
use rusqlite::Connection;
use std::path::PathBuf;
use std::process::ExitCode;

/// Seeds and queries customer records in a row store and a document store.
#[derive(Debug, Parser)]
#[command(name = "dualstore", version)]
struct Cli {
    /// SQLite database file. Uses a private in-memory database when omitted.
    #[arg(long, env = "DUALSTORE_DB")]
    db: Option<PathBuf>,

    /// trace|debug|info|warn|error. Defaults to debug in debug builds, info otherwise.
    #[arg(long, env = "DUALSTORE_LOG_LEVEL")]
    log_level: Option<String>,

    /// Absolute directory for rolling log files. Logs go to stderr when omitted.
    #[arg(long, env = "DUALSTORE_LOG_DIR")]
    log_dir: Option<String>,

    /// Backend for the document collection.
    #[arg(long, value_enum, default_value_t = DocumentStore::Sqlite)]
    document_store: DocumentStore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum DocumentStore {
    /// JSON documents in the same SQLite database.
    Sqlite,
    /// Process-local collection, discarded on exit.
    Memory,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| default_log_level().to_string());

    if let Err(err) = init_logging(&level, cli.log_dir.as_deref()) {
        eprintln!("failed to initialize logging: {err}");
        return ExitCode::FAILURE;
    }

    match run(&cli) {
        Ok(report) => {
            info!(
                "event=run_complete module=cli status=ok version={} relational_matches={} directory_rows={} documents={}",
                core_version(),
                report.relational.matches.len(),
                report.directory.all.len(),
                report.documents.all.len()
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("event=run_complete module=cli status=error error={err:#}");
            if cli.log_dir.is_some() {
                eprintln!("dualstore: {err:#}");
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<RunReport> {
    let conn = match &cli.db {
        Some(path) => open_db(path)
            .with_context(|| format!("failed to open database `{}`", path.display()))?,
        None => open_db_in_memory().context("failed to open in-memory database")?,
    };

    match cli.document_store {
        DocumentStore::Sqlite => run_sequence(&conn, SqliteDocumentRepository::new(&conn)),
        DocumentStore::Memory => run_sequence(&conn, InMemoryDocumentRepository::new()),
    }
}

fn run_sequence<D: CustomerDocumentRepository>(
    conn: &Connection,
    documents: D,
) -> anyhow::Result<RunReport> {
    let customers = SqliteCustomerRepository::new(conn);
    let directory = SqliteCustomerRepository::with_table(conn, DIRECTORY_TABLE)
        .context("invalid directory table")?;

    SeedRunner::new(customers, directory, documents)
        .run()
        .context("seed sequence aborted")
}
