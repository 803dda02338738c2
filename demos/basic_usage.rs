//! Basic section logger usage example
//!
//! Demonstrates rule-driven section levels, per-section overrides and the
//! logging macros with a console sink.
//!
//! Run with: cargo run --example basic_usage

use rust_section_logger::prelude::*;
use rust_section_logger::sinks::ConsoleSink;
use rust_section_logger::{debug, error, info, warning};

#[tokio::main]
async fn main() -> Result<()> {
    println!("=== Rust Section Logger - Basic Usage Example ===\n");

    let template = Template::parse("[{time}] [{level}] {section} ({loc-file}:{loc-line}): {message}")?;
    let console = Logger::new(ConsoleSink::new().with_template(template));

    let engine = Engine::builder()
        .rules_text("db.*=debug\nhttp.*=warning")
        .rules_from_env("SECTION_LOG_RULES")
        .logger(console.clone())
        .build();

    let db = engine.section("db.pool");
    let http = engine.section("http.server");

    println!("1. Levels resolved from rules:");
    debug!(engine, section = &db, "pool resized to {} connections", 16).await?;
    info!(engine, section = &http, "request served (hidden)").await?;
    warning!(engine, section = &http, "slow request: {} ms", 1200).await?;

    println!("\n2. Pinning a section level:");
    engine.set_level(&http, Severity::Debug);
    info!(engine, section = &http, "request served (now visible)").await?;

    println!("\n3. Reloading rules keeps the pinned level:");
    engine.reload_rules("*=error");
    debug!(engine, section = &http, "still visible").await?;
    debug!(engine, section = &db, "hidden after reload").await?;

    engine.reset_level(&http);
    info!(engine, section = &http, "hidden after reset").await?;

    println!("\n4. Multi-line messages and attached errors:");
    let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "cannot open socket");
    engine
        .entry(Severity::Error, "bind failed\nfalling back to port 8081")
        .section(&http)
        .error_from(&io)
        .send()
        .await?;
    error!(engine, "default section is '{}'", engine.default_section()).await?;

    console.close().await?;
    engine.log_ignore_errors(Severity::Fatal, "absorbed after close").await;

    println!("\n=== Example completed successfully! ===");
    Ok(())
}
