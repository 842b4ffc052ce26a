/// Pure Rust core benchmarks for tercile verification and plot preparation.
///
/// Uses std::time::Instant for timing, a deterministic LCG PRNG for data generation,
/// and std::hint::black_box to prevent dead-code elimination.
use std::hint::black_box;
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use visualizer_core::aggregate::{YearlyEnsemble, YearlySeries};
use visualizer_core::series::{Ensemble, Field};
use visualizer_core::temporal::{temporal_plot, LabeledSeries, TemporalOptions};
use visualizer_core::tercile::{verify_yearly, VerificationOptions};

const REPEATS: usize = 7;
const MEMBERS: usize = 25;

/// Simple LCG PRNG for deterministic data generation.
fn make_values(n: usize, seed: u64) -> Vec<f64> {
    let mut state = seed;
    let mut next_f64 = || -> f64 {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (state >> 33) as f64 / (1u64 << 31) as f64
    };
    (0..n).map(|_| next_f64() * 10.0).collect()
}

/// Run a closure `REPEATS` times, return the median duration.
fn median_time<F: FnMut()>(mut f: F) -> Duration {
    let mut times: Vec<Duration> = (0..REPEATS)
        .map(|_| {
            let start = Instant::now();
            f();
            start.elapsed()
        })
        .collect();
    times.sort();
    times[REPEATS / 2]
}

fn bench_verify(sizes: &[usize]) -> Vec<(&'static str, usize, Duration)> {
    let options = VerificationOptions::default().with_detrend(true);
    let mut results = Vec::new();

    for &n in sizes {
        let years: Vec<i32> = (0..n as i32).map(|y| 1900 + y).collect();
        let members: Vec<Vec<f64>> = (0..MEMBERS as u64).map(|m| make_values(n, m)).collect();
        let Ok(hindcast) = YearlyEnsemble::new(years.clone(), members) else {
            continue;
        };
        let Ok(obs) = YearlySeries::new(years, make_values(n, 42)) else {
            continue;
        };

        // Warmup
        let _ = black_box(verify_yearly(&hindcast, &obs, None, &options));

        let dur = median_time(|| {
            let _ = black_box(verify_yearly(&hindcast, &obs, None, &options));
        });
        results.push(("verify_yearly", n, dur));
    }
    results
}

fn bench_temporal(sizes: &[usize]) -> Vec<(&'static str, usize, Duration)> {
    let options = TemporalOptions::default();
    let mut results = Vec::new();
    let Some(start) = NaiveDate::from_ymd_opt(1950, 1, 1) else {
        return results;
    };

    for &n in sizes {
        let dates: Vec<NaiveDate> = start.iter_days().take(n).collect();
        let members: Vec<Vec<f64>> = (0..MEMBERS as u64).map(|m| make_values(n, m)).collect();
        let (Ok(obs), Ok(hindcast)) = (
            Field::series(dates.clone(), make_values(n, 42)),
            Ensemble::from_series(dates, members),
        ) else {
            continue;
        };
        let series = [
            LabeledSeries::new("obs", obs),
            LabeledSeries::new("hindcast", hindcast),
        ];

        // Warmup
        let _ = black_box(temporal_plot(&series, &options));

        let dur = median_time(|| {
            let _ = black_box(temporal_plot(&series, &options));
        });
        results.push(("temporal_plot", n, dur));
    }
    results
}

fn main() {
    println!("Pure Rust Core Benchmarks");
    println!("============================================================");
    println!("{:<18} {:>6}   {:>12}", "Operation", "N", "Median (ms)");
    println!("--------------------------------------------");

    let mut all_results: Vec<(&str, usize, Duration)> = Vec::new();

    all_results.extend(bench_verify(&[30, 300, 3000]));
    all_results.extend(bench_temporal(&[3650, 36500]));

    for (op, n, dur) in &all_results {
        let ms = dur.as_secs_f64() * 1000.0;
        println!("{:<18} {:>6}      {:>8.2}", op, n, ms);
    }

    println!("============================================================");
}
