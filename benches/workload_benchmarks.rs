//! Performance benchmarks for the workload engine.
//!
//! This benchmark suite measures:
//! - A single-row request through the HTTP router
//! - Batch runs of 100 and 1000 rows, direct and through the router
//! - Scaling of the run with the number of rows
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use workload_engine::api::{AppState, WorkloadRequest, create_router};
use workload_engine::calculation::WorkloadRun;
use workload_engine::config::ConfigLoader;
use workload_engine::models::RawRecord;

use axum::{Router, body::Body, http::Request};
use tower::ServiceExt;

/// Creates a test state with loaded configuration.
fn create_test_state() -> AppState {
    AppState::from_dir("./config/workload").expect("Failed to load config")
}

/// Creates a run from the bundled configuration.
fn create_run() -> WorkloadRun {
    let config = ConfigLoader::load("./config/workload").expect("Failed to load config");
    WorkloadRun::new(
        config.policy().clone(),
        config.tracks().clone(),
        config.special_courses().clone(),
    )
}

/// Generates a schedule of `row_count` rows.
///
/// Every fifth row shares its meeting with the previous row under a second
/// catalog number, and every seventh row adds a second instructor, so the
/// batch exercises both adjustment passes.
fn create_rows(row_count: usize) -> Vec<RawRecord> {
    let times = ["08:00", "09:10", "10:20", "11:30", "13:10", "14:20", "15:30"];
    let categories = ["Lecture", "Laboratory", "Seminar", "Lecture", "Independent Study"];

    (0..row_count)
        .map(|i| {
            let slot = if i % 5 == 4 { i - 1 } else { i };
            let instructor = if i % 7 == 6 {
                1001 + ((slot + 1) % 4)
            } else {
                1001 + (slot % 4)
            };
            let catalog = if i % 5 == 4 { 500 + i % 100 } else { 100 + i % 400 };
            let row = serde_json::json!({
                "Instructor Role": "PI",
                "Instructor Emplid": instructor,
                "Instructor": format!("Instructor {}", instructor),
                "Instructor Email": format!("i{}@example.edu", instructor),
                "Course Category (CCAT)": (categories[slot % categories.len()]),
                "Max Units": 1 + slot % 4,
                "Enroll Total": 10 + (i * 37) % 240,
                "Start Date": "2025-01-13",
                "Start Time": (times[slot % times.len()]),
                "Facility Building": "SCI",
                "Facility Room": format!("{}", 100 + slot / times.len()),
                "Term": "1251",
                "Subject": (["BIO", "CHM", "PHY", "MAT"][slot % 4]),
                "Cat Nbr": catalog.to_string(),
                "Section": format!("{:03}", 1 + i % 9),
                "Unit": (["BIO", "CHM", "PHY", "MAT"][slot % 4]),
                "Class Description": "general topics"
            });
            serde_json::from_value(row).expect("generated row must deserialize")
        })
        .collect()
}

fn request_body(row_count: usize) -> String {
    let request = WorkloadRequest {
        records: create_rows(row_count),
        ..WorkloadRequest::default()
    };
    serde_json::to_string(&request).unwrap()
}

async fn post_workload(router: Router, body: String) -> axum::response::Response {
    router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/workload")
                .header("Content-Type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap()
}

/// Benchmark: single row through the router.
fn bench_single_row(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let router = create_router(create_test_state());
    let body = request_body(1);

    c.bench_function("single_row", |b| {
        b.to_async(&rt).iter(|| async {
            let response = post_workload(router.clone(), body.clone()).await;
            black_box(response)
        })
    });
}

/// Benchmark: direct batch runs without HTTP overhead.
fn bench_run(c: &mut Criterion) {
    let run = create_run();
    let mut group = c.benchmark_group("run");

    for row_count in [100usize, 1000] {
        let rows = create_rows(row_count);
        group.throughput(Throughput::Elements(row_count as u64));
        group.bench_with_input(BenchmarkId::new("rows", row_count), &rows, |b, rows| {
            b.iter(|| black_box(run.run(rows.clone()).unwrap()))
        });
    }

    group.finish();
}

/// Benchmark: batch requests through the router.
fn bench_batch_requests(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let router = create_router(create_test_state());
    let mut group = c.benchmark_group("batch_request");
    group.sample_size(20);

    for row_count in [100usize, 1000] {
        let body = request_body(row_count);
        group.throughput(Throughput::Elements(row_count as u64));
        group.bench_with_input(BenchmarkId::new("rows", row_count), &body, |b, body| {
            b.to_async(&rt).iter(|| async {
                let response = post_workload(router.clone(), body.clone()).await;
                black_box(response)
            })
        });
    }

    group.finish();
}

/// Benchmark: how the run scales with the row count.
fn bench_scaling(c: &mut Criterion) {
    let run = create_run();
    let mut group = c.benchmark_group("scaling");

    for row_count in [10usize, 50, 250, 500] {
        let rows = create_rows(row_count);
        group.throughput(Throughput::Elements(row_count as u64));
        group.bench_with_input(BenchmarkId::new("rows", row_count), &rows, |b, rows| {
            b.iter(|| black_box(run.run(rows.clone()).unwrap()))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_single_row,
    bench_run,
    bench_batch_requests,
    bench_scaling,
);
criterion_main!(benches);
