//! Logger composition example
//!
//! Demonstrates Broadcast (console and file at once) and Dispatch (errors to
//! one file, everything else to another).
//!
//! Run with: cargo run --example routing

use rust_section_logger::prelude::*;
use rust_section_logger::sinks::{ConsoleSink, FileSink};
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<()> {
    println!("=== Rust Section Logger - Routing Example ===\n");

    let dir = std::env::temp_dir().join("rust_section_logger_routing");
    std::fs::create_dir_all(&dir)?;
    let errors_path: PathBuf = dir.join("errors.log");
    let journal_path: PathBuf = dir.join("journal.log");

    let errors = Logger::new(FileSink::new(&errors_path)?);
    let journal = Logger::new(FileSink::new(&journal_path)?);
    let console = Logger::new(ConsoleSink::new());

    let (high, low) = (errors.clone(), journal.clone());
    let by_severity = dispatch(move |_section, severity| {
        if severity >= Severity::Error {
            high.clone()
        } else {
            low.clone()
        }
    });
    let everything = broadcast([console.clone(), by_severity]);

    let engine = Engine::builder()
        .default_level(Severity::Info)
        .logger(everything)
        .build();
    let jobs = engine.section("jobs.nightly");

    for step in ["fetch", "transform", "load"] {
        engine
            .entry(Severity::Info, format!("step '{}' done", step))
            .section(&jobs)
            .send()
            .await?;
    }
    engine
        .entry(Severity::Error, "load step wrote 0 rows")
        .section(&jobs)
        .send()
        .await?;

    // Composites do not own their members; close each one
    for logger in [&console, &errors, &journal] {
        logger.close().await?;
    }

    println!("\nErrors file:  {}", errors_path.display());
    println!("{}", std::fs::read_to_string(&errors_path)?);
    println!("Journal file: {}", journal_path.display());
    println!("{}", std::fs::read_to_string(&journal_path)?);

    println!("=== Example completed successfully! ===");
    Ok(())
}
