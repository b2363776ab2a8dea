//! Benchmarks for winget-indexer core operations.
//!
//! Run with: cargo bench
//!
//! Results include 95% confidence intervals via Criterion.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use winget_indexer::core::summary::fingerprint;
use winget_indexer::{build_command, parse_inventory, Action, CommandOptions, OutputFormat};

fn json_inventory(n: usize) -> String {
    let items: Vec<String> = (0..n)
        .map(|i| {
            format!(
                r#"{{"Id":"Vendor{i}.App{i}","Name":"Application {i}","Version":"1.{i}.0","AvailableVersion":"1.{}.0","Source":"winget"}}"#,
                i + (i % 2)
            )
        })
        .collect();
    format!("[{}]", items.join(","))
}

fn table_inventory(n: usize) -> String {
    let mut out = String::from(
        "Name                Id                      Version     Available   Source\n\
         ---------------------------------------------------------------------------\n",
    );
    for i in 0..n {
        let available = if i % 3 == 0 { format!("2.{i}") } else { String::new() };
        out.push_str(&format!(
            "{:<20}{:<24}{:<12}{:<12}winget\n",
            format!("Application {i}"),
            format!("Vendor{i}.App{i}"),
            format!("1.{i}"),
            available
        ));
    }
    out
}

fn bench_parse_json(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_json");
    for n in [10, 100, 1000] {
        let raw = json_inventory(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &raw, |b, raw| {
            b.iter(|| black_box(parse_inventory(black_box(raw)).unwrap()));
        });
    }
    group.finish();
}

fn bench_parse_table(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_table");
    for n in [10, 100, 1000] {
        let raw = table_inventory(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &raw, |b, raw| {
            b.iter(|| black_box(parse_inventory(black_box(raw)).unwrap()));
        });
    }
    group.finish();
}

fn bench_build(c: &mut Criterion) {
    let records = parse_inventory(&json_inventory(500)).unwrap();
    let options = CommandOptions {
        include_silent: true,
        use_force: false,
        output_format: OutputFormat::Powershell,
    };

    let mut group = c.benchmark_group("build_command");
    for action in [Action::Install, Action::Upgrade, Action::Import] {
        group.bench_with_input(BenchmarkId::from_parameter(action), &action, |b, &action| {
            b.iter(|| black_box(build_command(action, black_box(&records), &options).unwrap()));
        });
    }
    group.finish();
}

fn bench_fingerprint(c: &mut Criterion) {
    let records = parse_inventory(&json_inventory(1000)).unwrap();
    c.bench_function("fingerprint_1000", |b| {
        b.iter(|| black_box(fingerprint(black_box(&records))));
    });
}

criterion_group!(
    benches,
    bench_parse_json,
    bench_parse_table,
    bench_build,
    bench_fingerprint
);
criterion_main!(benches);
