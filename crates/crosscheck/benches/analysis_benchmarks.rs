//! Analysis performance benchmarks.
//!
//! Measures the cross-dataset checks and the full pipeline across
//! different collection sizes.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::io::Write;
use tempfile::NamedTempFile;

use crosscheck::checks::{check_duplicates, check_orphans, DedupeConfig};
use crosscheck::joins::{infer_join_candidates, JoinConfig};
use crosscheck::{Crosscheck, Dataset, DatasetCollection, Parser};

/// Generate synthetic CSV data with the given number of rows.
fn generate_csv_data(rows: usize) -> String {
    let mut data = String::from("order_id,customer_id,amount,created_at\n");
    for row in 0..rows {
        data.push_str(&format!(
            "{},{},{:.2},2024-{:02}-{:02}\n",
            row,
            row % (rows / 2 + 1),
            row as f64 * 1.5,
            (row % 12) + 1,
            (row % 28) + 1,
        ));
    }
    data
}

/// Orders referencing a customer range wider than the customer file covers.
fn generate_linked_collection(rows: usize) -> DatasetCollection {
    let orders = Dataset::new(
        "orders",
        vec![
            "order_id".to_string(),
            "customer_id".to_string(),
            "amount".to_string(),
        ],
        (0..rows)
            .map(|i| {
                vec![
                    i.to_string(),
                    (i % (rows + rows / 5)).to_string(),
                    format!("{:.2}", i as f64 * 2.5),
                ]
            })
            .collect(),
    );
    let customers = Dataset::new(
        "customers",
        vec!["customer_id".to_string(), "customer_name".to_string()],
        (0..rows)
            .map(|i| vec![i.to_string(), format!("Customer {}", i % (rows / 2 + 1))])
            .collect(),
    );
    let invoices = Dataset::new(
        "invoices",
        vec!["order_id".to_string()],
        (0..rows * 4 / 5).map(|i| vec![i.to_string()]).collect(),
    );
    DatasetCollection::from_datasets(vec![orders, customers, invoices])
}

/// Benchmark parsing CSV files of various sizes.
fn bench_parse_csv(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_csv");

    for rows in [100, 1_000, 10_000].iter() {
        let data = generate_csv_data(*rows);
        let bytes = data.len();

        group.throughput(Throughput::Bytes(bytes as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &data, |b, data| {
            b.iter_with_setup(
                || {
                    let mut temp = NamedTempFile::with_suffix(".csv").unwrap();
                    temp.write_all(data.as_bytes()).unwrap();
                    temp
                },
                |temp| {
                    let parser = Parser::new();
                    black_box(parser.parse_file(temp.path()).unwrap())
                },
            )
        });
    }

    group.finish();
}

/// Benchmark orphan detection over increasingly large key sets.
fn bench_orphan_check(c: &mut Criterion) {
    let mut group = c.benchmark_group("orphan_check");

    for rows in [100, 1_000, 10_000].iter() {
        let collection = generate_linked_collection(*rows);
        let candidates = infer_join_candidates(&collection, &JoinConfig::default());

        group.throughput(Throughput::Elements(*rows as u64));
        group.bench_with_input(
            BenchmarkId::new("rows", rows),
            &(&collection, &candidates),
            |b, (collection, candidates)| {
                b.iter(|| black_box(check_orphans(collection, candidates)))
            },
        );
    }

    group.finish();
}

/// Benchmark duplicate detection, which is dominated by the fuzzy
/// windowed name scan.
fn bench_duplicate_check(c: &mut Criterion) {
    let mut group = c.benchmark_group("duplicate_check");

    for names in [100, 1_000, 5_000].iter() {
        let customers = Dataset::new(
            "customers",
            vec!["customer_id".to_string(), "customer_name".to_string()],
            (0..*names)
                .map(|i| {
                    // Clusters of near-identical names to exercise the
                    // similarity path, not just the length gate.
                    vec![i.to_string(), format!("Vendor Group {} Inc", i / 3)]
                })
                .collect(),
        );
        let collection = DatasetCollection::from_datasets(vec![customers]);

        group.throughput(Throughput::Elements(*names as u64));
        group.bench_with_input(
            BenchmarkId::new("names", names),
            &collection,
            |b, collection| {
                b.iter(|| black_box(check_duplicates(collection, &DedupeConfig::default())))
            },
        );
    }

    group.finish();
}

/// Benchmark the full analysis pipeline end to end.
fn bench_full_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_analysis");
    group.sample_size(20);

    for rows in [100, 1_000, 10_000].iter() {
        let collection = generate_linked_collection(*rows);

        group.throughput(Throughput::Elements(*rows as u64));
        group.bench_with_input(
            BenchmarkId::new("rows", rows),
            &collection,
            |b, collection| {
                let engine = Crosscheck::new();
                b.iter(|| black_box(engine.analyze(collection)))
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_parse_csv,
    bench_orphan_check,
    bench_duplicate_check,
    bench_full_analysis,
);
criterion_main!(benches);
