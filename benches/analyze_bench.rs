use std::collections::HashMap;
use std::hint::black_box;

use chrono::{Duration, Local, TimeZone};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use hostpulse::analyze::analyze;
use hostpulse::system::collector::SampleRecord;
use hostpulse::system::snapshot::ProcessObservation;

fn make_series(n: usize) -> Vec<SampleRecord> {
    let base = Local.with_ymd_and_hms(2026, 8, 6, 0, 0, 0).unwrap();
    (0..n)
        .map(|i| {
            let processes: Vec<ProcessObservation> = (0..10)
                .map(|p| ProcessObservation {
                    pid: (p + 1) as u32 + ((i % 3) as u32) * 10,
                    name: format!("proc_{p}"),
                    memory_percent: ((i + p) % 17) as f32 / 2.0,
                })
                .collect();
            SampleRecord {
                timestamp: base + Duration::seconds(i as i64 * 60),
                cpu_usage: (i % 100) as f32,
                total_memory_usage: processes.iter().map(|p| p.memory_percent).sum(),
                free_disk_gb: 100.0 - (i % 50) as f64 / 10.0,
                processes,
                per_process_avg_memory: HashMap::new(),
            }
        })
        .collect()
}

fn bench_analyze(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyze_series");
    for n in [60usize, 600, 3600] {
        let series = make_series(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &series, |b, series| {
            b.iter(|| analyze(black_box(series)).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_analyze);
criterion_main!(benches);
