//! Benchmarks for tabpdf assembly performance.
//!
//! Run with: cargo bench
//!
//! These benchmarks assemble synthetic datasets of increasing size.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tabpdf::{Assembler, CellValue, DataTable, Dataset, FontMetrics, FontSpec, LayoutOptions, Row};

/// Creates a synthetic dataset with one table of the given number of rows.
fn create_dataset(rows: usize) -> Dataset {
    let mut table = DataTable::new("Orders", ["Id", "Customer", "Notes", "Amount"]);
    for i in 0..rows {
        table.add_row(Row::new(vec![
            CellValue::Integer(i as i64),
            CellValue::Text(format!("Customer {}", i % 97)),
            CellValue::Text("Delivered to the side entrance, signed by reception. ".repeat(i % 4)),
            CellValue::Number(i as f64 * 1.25),
        ]));
    }

    let mut dataset = Dataset::new("Benchmark");
    dataset.add_table(table);
    dataset
}

/// Benchmark text measurement.
fn bench_measure_width(c: &mut Criterion) {
    let metrics = FontMetrics::builtin();
    let font = FontSpec::helvetica(9.0);
    let text = "The quick brown fox jumps over the lazy dog";

    c.bench_function("measure_width", |b| {
        b.iter(|| metrics.measure_width(black_box(text), &font).unwrap());
    });
}

/// Benchmark full assembly at various sizes.
fn bench_assembly(c: &mut Criterion) {
    let mut group = c.benchmark_group("assembly");

    for rows in [10, 1_000, 10_000].iter() {
        let dataset = create_dataset(*rows);

        group.bench_function(format!("{}_rows_parallel", rows), |b| {
            let assembler = Assembler::new(LayoutOptions::new());
            b.iter(|| assembler.assemble(black_box(&dataset)).unwrap());
        });

        group.bench_function(format!("{}_rows_sequential", rows), |b| {
            let assembler = Assembler::new(LayoutOptions::new().sequential());
            b.iter(|| assembler.assemble(black_box(&dataset)).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_measure_width, bench_assembly);
criterion_main!(benches);
