//! Level offset example
//!
//! Demonstrates shifting the levels of a noisy component down one step,
//! and changing the minimum level at runtime.
//!
//! Run with: cargo run --example level_offset

use rust_logfmt_handler::prelude::*;
use std::io;
use std::sync::Arc;

fn main() -> Result<()> {
    println!("=== Rust Logfmt Handler - Level Offset Example ===\n");

    let level = Arc::new(LevelVar::new(Level::INFO));
    let handler = Handler::builder()
        .leveler(Arc::clone(&level))
        .show_time(false)
        .build_for_terminal(io::stderr())?;
    let logger = Logger::new(handler);

    println!("1. A chatty dependency logs one step quieter:");
    let dependency = logger.with_prefix("dep").with_level_offset(-Level::STEP);
    dependency.info("info becomes debug, hidden at INFO");
    dependency.warn("warn becomes info");

    println!("\n2. Raising verbosity at runtime:");
    level.set(Level::DEBUG);
    dependency.info("now visible as debug");

    println!("\n3. Offsets are reversible:");
    dependency.with_level_offset(Level::STEP).info("back to info");

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
