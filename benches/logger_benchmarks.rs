//! Criterion benchmarks for rust_section_logger

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use rust_section_logger::{
    silent_diagnostics, Engine, LogRecord, Logger, Pattern, Severity, Template,
};

// ============================================================================
// Pattern Matching Benchmarks
// ============================================================================

fn bench_pattern_matching(c: &mut Criterion) {
    let mut group = c.benchmark_group("pattern_matching");
    group.throughput(Throughput::Elements(1));

    let literal = Pattern::compile("net.http.server");
    let prefix = Pattern::compile("net.*");
    let infix = Pattern::compile("*http*");
    let overlapping = Pattern::compile("*aab*aab*aab");

    group.bench_function("literal", |b| {
        b.iter(|| literal.matches(black_box("net.http.server")))
    });

    group.bench_function("prefix", |b| {
        b.iter(|| prefix.matches(black_box("net.http.server")))
    });

    group.bench_function("infix", |b| {
        b.iter(|| infix.matches(black_box("net.http.server")))
    });

    group.bench_function("overlapping_backtrack", |b| {
        b.iter(|| overlapping.matches(black_box("aaabaaabaaaabaab")))
    });

    group.finish();
}

// ============================================================================
// Rule Resolution Benchmarks
// ============================================================================

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");
    group.throughput(Throughput::Elements(1));

    let engine = Engine::builder()
        .on_diagnostic(silent_diagnostics())
        .rules_text(
            "db.pool=debug\ndb.*=info\nnet.http.*=warning\nnet.*=notice\ncache.*=error\n*=warning",
        )
        .build();

    group.bench_function("first_rule", |b| {
        b.iter(|| engine.resolve(black_box("db.pool")))
    });

    group.bench_function("last_rule", |b| {
        b.iter(|| engine.resolve(black_box("jobs.scheduler")))
    });

    group.bench_function("intern_existing", |b| {
        let _held = engine.section("db.replica");
        b.iter(|| engine.section(black_box("db.replica")))
    });

    group.finish();
}

// ============================================================================
// Pipeline Benchmarks
// ============================================================================

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    group.throughput(Throughput::Elements(1));

    let engine = Engine::builder()
        .default_level(Severity::Warning)
        .logger(Logger::null())
        .build();
    let section = engine.default_section();

    group.bench_function("filtered", |b| {
        b.iter(|| {
            futures::executor::block_on(
                engine
                    .entry(Severity::Debug, black_box("dropped"))
                    .section(&section)
                    .send(),
            )
        })
    });

    group.bench_function("accepted_null_sink", |b| {
        b.iter(|| {
            futures::executor::block_on(
                engine
                    .entry(Severity::Error, black_box("line one\nline two"))
                    .section(&section)
                    .send(),
            )
        })
    });

    let template = Template::parse("[{level}] {section}: {message}").unwrap();
    let record = LogRecord::new(section.clone(), Severity::Error, vec!["rendered".into()]);
    group.bench_function("template_render", |b| {
        b.iter(|| template.render_record(black_box(&record)))
    });

    group.finish();
}

criterion_group!(benches, bench_pattern_matching, bench_resolve, bench_pipeline);
criterion_main!(benches);
