//! Basic handler usage example
//!
//! Demonstrates logging at each level to stderr, colored when stderr is a
//! terminal.
//!
//! Run with: cargo run --example basic_usage

use rust_logfmt_handler::prelude::*;
use rust_logfmt_handler::{info, warn};
use std::io;

fn main() -> Result<()> {
    println!("=== Rust Logfmt Handler - Basic Usage Example ===\n");

    let handler = Handler::builder()
        .level(Level::TRACE)
        .build_for_terminal(io::stderr())?;
    let logger = Logger::new(handler);

    println!("1. Logging at different levels:");
    logger.trace("This is a trace message");
    logger.debug("This is a debug message");
    logger.info("This is an info message");
    logger.warn("This is a warning message");
    logger.error("This is an error message");

    println!("\n2. Formatted messages with attributes:");
    let port = 8080;
    info!(logger, "Listening on port {}", port; "tls" => false);
    warn!(logger, "Slow request"; "path" => "/api/v1/users", "elapsed" => std::time::Duration::from_millis(1250));

    println!("\n3. Multi-line messages repeat the header:");
    logger.info("first line\nsecond line");

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
