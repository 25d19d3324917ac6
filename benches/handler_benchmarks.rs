//! Criterion benchmarks for rust_logfmt_handler

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use rust_logfmt_handler::prelude::*;
use std::io;
use std::time::Duration;

fn discard_handler(style: Style) -> Handler {
    Handler::builder()
        .level(Level::TRACE)
        .style(style)
        .build(io::sink())
        .expect("valid handler")
}

// ============================================================================
// Rendering Benchmarks
// ============================================================================

fn bench_messages(c: &mut Criterion) {
    let mut group = c.benchmark_group("messages");
    group.throughput(Throughput::Elements(1));

    let plain = discard_handler(Style::plain());
    let colored = discard_handler(Style::colored());

    group.bench_function("plain", |b| {
        b.iter(|| {
            plain
                .handle(Record::new(Level::INFO, black_box("request served")))
                .unwrap()
        });
    });

    group.bench_function("colored", |b| {
        b.iter(|| {
            colored
                .handle(Record::new(Level::INFO, black_box("request served")))
                .unwrap()
        });
    });

    group.bench_function("multiline", |b| {
        b.iter(|| {
            plain
                .handle(Record::new(Level::WARN, black_box("first\nsecond\nthird")))
                .unwrap()
        });
    });

    group.finish();
}

fn bench_attrs(c: &mut Criterion) {
    let mut group = c.benchmark_group("attrs");
    group.throughput(Throughput::Elements(1));

    let handler = discard_handler(Style::colored());
    let attached = handler
        .with_group("req")
        .with_attrs([Attr::new("method", "GET"), Attr::new("path", "/api/v1")]);

    group.bench_function("five_attrs", |b| {
        b.iter(|| {
            let record = Record::new(Level::INFO, "served").with_attrs([
                Attr::new("status", 200),
                Attr::new("latency", Duration::from_micros(1500)),
                Attr::new("bytes", 5120u64),
                Attr::new("cached", false),
                Attr::new("ratio", 0.75),
            ]);
            handler.handle(black_box(record)).unwrap()
        });
    });

    group.bench_function("attached_in_group", |b| {
        b.iter(|| {
            let record = Record::new(Level::INFO, "served").with_attr(Attr::new("status", 200));
            attached.handle(black_box(record)).unwrap()
        });
    });

    group.bench_function("multiline_value", |b| {
        b.iter(|| {
            let record = Record::new(Level::ERROR, "failed")
                .with_attr(Attr::new("error", "line one\nline two\nline three"));
            handler.handle(black_box(record)).unwrap()
        });
    });

    group.finish();
}

// ============================================================================
// Derivation Benchmarks
// ============================================================================

fn bench_derivation(c: &mut Criterion) {
    let mut group = c.benchmark_group("derivation");
    let handler = discard_handler(Style::plain());

    group.bench_function("with_attrs", |b| {
        b.iter(|| black_box(handler.with_attrs([Attr::new("k", 1), Attr::new("j", "v")])));
    });

    group.bench_function("with_group", |b| {
        b.iter(|| black_box(handler.with_group("g")));
    });

    group.finish();
}

fn bench_disabled(c: &mut Criterion) {
    let logger = Logger::new(
        Handler::builder()
            .level(Level::ERROR)
            .build(io::sink())
            .expect("valid handler"),
    );

    c.bench_function("disabled_level", |b| {
        b.iter(|| logger.log(Level::DEBUG, black_box("hidden"), [Attr::new("k", 1)]));
    });
}

criterion_group!(
    benches,
    bench_messages,
    bench_attrs,
    bench_derivation,
    bench_disabled
);
criterion_main!(benches);
