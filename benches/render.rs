//! Table Rendering Benchmarks
//!
//! Measures `render_table` on result sets shaped like the employee views.
//! No database is needed.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use employee_tracker::output::render_table;
use employee_tracker::QueryResult;
use serde_json::json;

fn employee_result(rows: usize) -> QueryResult {
    let columns = ["id", "first_name", "last_name", "title", "department", "salary", "manager"]
        .iter()
        .map(|c| (*c).to_string())
        .collect();

    let rows = (1..=rows)
        .map(|i| {
            let manager = if i % 10 == 0 { json!(null) } else { json!(format!("Manager {}", i / 10)) };
            vec![
                json!(i),
                json!(format!("First{i}")),
                json!(format!("Last{i}")),
                json!("Engineer"),
                json!("Engineering"),
                json!("90000.00"),
                manager,
            ]
        })
        .collect();

    QueryResult::new(columns, rows)
}

fn bench_render_small(c: &mut Criterion) {
    let result = employee_result(20);
    c.bench_function("render_table_20_rows", |b| b.iter(|| render_table(black_box(&result))));
}

fn bench_render_large(c: &mut Criterion) {
    let result = employee_result(2_000);
    c.bench_function("render_table_2000_rows", |b| b.iter(|| render_table(black_box(&result))));
}

criterion_group!(benches, bench_render_small, bench_render_large);
criterion_main!(benches);
