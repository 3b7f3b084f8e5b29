//! Criterion benchmarks for rust_contextual_logger

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use rust_contextual_logger::prelude::*;

fn sink_logger(threshold: i32) -> Logger {
    Logger::builder()
        .verbosity(threshold)
        .appender(WriterAppender::new(std::io::sink()))
        .build()
}

// ============================================================================
// Derivation Benchmarks
// ============================================================================

fn bench_derivation(c: &mut Criterion) {
    let mut group = c.benchmark_group("derivation");
    group.throughput(Throughput::Elements(1));

    let logger = sink_logger(0).with_name("root").with_values(kv!["pod" => "192.168.0.1"]);

    group.bench_function("with_name", |b| {
        b.iter(|| black_box(logger.with_name(black_box("child"))));
    });

    group.bench_function("with_values", |b| {
        b.iter(|| black_box(logger.with_values(kv!["container" => black_box(4)])));
    });

    group.finish();
}

// ============================================================================
// Gating Benchmarks
// ============================================================================

fn bench_gating(c: &mut Criterion) {
    let mut group = c.benchmark_group("gating");
    group.throughput(Throughput::Elements(1));

    let logger = sink_logger(0);

    group.bench_function("disabled_v_info", |b| {
        b.iter(|| logger.v(black_box(5)).info("Filtered out", ()));
    });

    group.bench_function("enabled_check", |b| {
        b.iter(|| black_box(logger.v(black_box(5)).enabled()));
    });

    group.finish();
}

// ============================================================================
// Delivery Benchmarks
// ============================================================================

fn bench_delivery(c: &mut Criterion) {
    let mut group = c.benchmark_group("delivery");
    group.throughput(Throughput::Elements(1));

    let sync_logger = sink_logger(0).with_name("bench");
    group.bench_function("sync_info", |b| {
        b.iter(|| sync_logger.info(black_box("Info message"), kv!["n" => 1, "ok" => true]));
    });

    group.bench_function("sync_error", |b| {
        let err = LoggerError::other("benchmark failure");
        b.iter(|| sync_logger.error(Some(&err), black_box("Error message"), ()));
    });

    let async_logger = Logger::builder()
        .appender(WriterAppender::new(std::io::sink()))
        .async_mode(10_000)
        .build()
        .with_name("bench");
    group.bench_function("async_info", |b| {
        b.iter(|| async_logger.info(black_box("Info message"), kv!["n" => 1, "ok" => true]));
    });
    let _ = async_logger.flush();

    let json_logger = Logger::builder()
        .appender(WriterAppender::new(std::io::sink()).with_output_format(OutputFormat::Json))
        .build();
    group.bench_function("json_info", |b| {
        b.iter(|| json_logger.info(black_box("Info message"), kv!["n" => 1, "ok" => true]));
    });

    group.finish();
}

criterion_group!(benches, bench_derivation, bench_gating, bench_delivery);
criterion_main!(benches);
