use chrono::{Duration, NaiveDate, NaiveDateTime};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use era5_aermet::models::{PointTable, SiteConfig};
use era5_aermet::processors::{SoundingProcessor, SurfaceProcessor};
use era5_aermet::readers::{extract_point, InMemoryDataset};
use era5_aermet::writers::{SurfaceWriter, UpperAirWriter};

const LEVELS: [f64; 7] = [1000.0, 925.0, 850.0, 700.0, 600.0, 500.0, 300.0];

fn hourly_times(hours: usize) -> Vec<NaiveDateTime> {
    let start = NaiveDate::from_ymd_opt(2025, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    (0..hours)
        .map(|h| start + Duration::hours(h as i64))
        .collect()
}

// Create a surface point table with a smooth diurnal cycle
fn create_surface_table(hours: usize) -> PointTable {
    let times = hourly_times(hours);
    let t2m = (0..hours)
        .map(|h| 270.0 + 5.0 * (h as f64 / 24.0 * std::f64::consts::TAU).sin())
        .collect();
    let u10 = (0..hours).map(|h| (h % 7) as f64 - 3.0).collect();
    let v10 = (0..hours).map(|h| (h % 5) as f64 - 2.0).collect();

    PointTable::new(49.5, 25.5, times)
        .with_column("t2m", t2m)
        .unwrap()
        .with_column("u10", u10)
        .unwrap()
        .with_column("v10", v10)
        .unwrap()
}

fn create_upper_table(hours: usize) -> PointTable {
    let mut times = Vec::with_capacity(hours * LEVELS.len());
    let mut levels = Vec::with_capacity(hours * LEVELS.len());
    for time in hourly_times(hours) {
        for level in LEVELS {
            times.push(time);
            levels.push(level);
        }
    }
    let rows = times.len();
    let t = levels.iter().map(|p| 200.0 + p / 12.0).collect();
    let z = levels.iter().map(|p| (1000.0 - p) * 98.0).collect();
    let u = (0..rows).map(|i| (i % 11) as f64).collect();
    let v = (0..rows).map(|i| (i % 13) as f64 - 6.0).collect();

    PointTable::new(49.5, 25.5, times)
        .with_column("pressure_level", levels)
        .unwrap()
        .with_column("t", t)
        .unwrap()
        .with_column("z", z)
        .unwrap()
        .with_column("u", u)
        .unwrap()
        .with_column("v", v)
        .unwrap()
}

fn benchmark_surface_encoding(c: &mut Criterion) {
    let table = create_surface_table(24 * 31);
    let writer = SurfaceWriter::new();

    c.bench_function("surface_cd144_month", |b| {
        b.iter(|| {
            let mut processor = SurfaceProcessor::new("99999");
            let records = processor.process(&table).unwrap();
            let bytes: usize = records.iter().map(|r| writer.format_record(r).len()).sum();
            black_box(bytes)
        })
    });
}

fn benchmark_sounding_grouping(c: &mut Criterion) {
    let site = SiteConfig::new("999999", "Ternopil", 49.55, 25.60, 324.0);
    let writer = UpperAirWriter::new();
    let mut group = c.benchmark_group("upper_air_by_hours");

    for &hours in &[24usize, 24 * 7, 24 * 31] {
        let table = create_upper_table(hours);
        group.bench_with_input(BenchmarkId::new("hours", hours), &table, |b, table| {
            b.iter(|| {
                let mut processor = SoundingProcessor::new(&site);
                let soundings = processor.process(table).unwrap();
                let bytes: usize = soundings.iter().map(|s| writer.format_sounding(s).len()).sum();
                black_box(bytes)
            })
        });
    }

    group.finish();
}

fn benchmark_nearest_point(c: &mut Criterion) {
    // 0.25 degree grid over Europe
    let lats: Vec<f64> = (0..161).map(|i| 72.0 - i as f64 * 0.25).collect();
    let lons: Vec<f64> = (0..241).map(|i| -10.0 + i as f64 * 0.25).collect();
    let cells = lats.len() * lons.len();
    let dataset = InMemoryDataset::new(lats, lons, hourly_times(1))
        .with_variable("t2m", vec![273.15; cells])
        .unwrap();

    c.bench_function("nearest_point_extract", |b| {
        b.iter(|| {
            let table = extract_point(&dataset, black_box(49.55), black_box(25.60)).unwrap();
            black_box(table.len())
        })
    });
}

criterion_group!(
    benches,
    benchmark_surface_encoding,
    benchmark_sounding_grouping,
    benchmark_nearest_point
);
criterion_main!(benches);
