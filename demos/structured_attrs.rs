//! Structured attributes example
//!
//! Demonstrates attached attributes, groups, multi-line values, lazy values
//! and the replace hook.
//!
//! Run with: cargo run --example structured_attrs

use rust_logfmt_handler::prelude::*;
use std::io;

fn main() -> Result<()> {
    println!("=== Rust Logfmt Handler - Structured Attributes Example ===\n");

    let handler = Handler::builder()
        .level(Level::DEBUG)
        .replace_attr(|groups, attr| {
            // Redact secrets wherever they appear.
            if attr.key == "password" {
                return Attr::new(attr.key, "***");
            }
            if groups.is_empty() && attr.key == rust_logfmt_handler::TIME_KEY {
                return Attr::empty();
            }
            attr
        })
        .build_for_terminal(io::stderr())?;
    let logger = Logger::new(handler);

    println!("1. Attributes attached once, logged with every event:");
    let service = logger.with([Attr::new("service", "billing"), Attr::new("version", "1.4.2")]);
    service.info("started");

    println!("\n2. Groups nest keys:");
    let request = service.with_group("req");
    request.log(
        Level::INFO,
        "served",
        [
            Attr::new("method", "POST"),
            Attr::group("user", [Attr::new("id", 42), Attr::new("password", "hunter2")]),
        ],
    );

    println!("\n3. Multi-line values get their own block:");
    let err = io::Error::other("connection reset\nretrying in 5s");
    service.log(Level::ERROR, "upstream failed", [Attr::error(&err), Attr::new("attempt", 3)]);

    println!("\n4. Lazy values are computed only when logged:");
    service.log(
        Level::DEBUG,
        "cache stats",
        [Attr::lazy("entries", || Value::from(1024u64))],
    );

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
