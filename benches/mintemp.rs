use chrono::{TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mintemp::{rolling_average, threshold_table, TemperatureSeries, ThresholdRange};

fn ten_years() -> TemperatureSeries {
    let start = Utc.with_ymd_and_hms(2014, 1, 1, 0, 0, 0).unwrap();
    let values = (0..3652).map(|day| {
        let season = (day as f64 / 365.25 * std::f64::consts::TAU).cos();
        if day % 97 == 0 {
            None
        } else {
            Some(30.0 - 25.0 * season + (day % 11) as f64)
        }
    });
    TemperatureSeries::daily(start, values)
}

fn bench_aggregation(c: &mut Criterion) {
    let series = ten_years();
    let range = ThresholdRange::new(-20, 40).unwrap();

    c.bench_function("rolling_average_weekly", |b| {
        b.iter(|| rolling_average(black_box(&series), 7))
    });
    c.bench_function("rolling_average_monthly", |b| {
        b.iter(|| rolling_average(black_box(&series), 30))
    });
    c.bench_function("threshold_table", |b| {
        b.iter(|| threshold_table(black_box(&series), black_box(range)))
    });
}

criterion_group!(benches, bench_aggregation);
criterion_main!(benches);
