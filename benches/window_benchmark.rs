//! Benchmark for the peak-hold window strategies
//!
//! Compares the plain rescanning `PeakWindow`, the monotonic-deque
//! `MonotonicPeakWindow` and the `peak_hold` entry point on recordings of
//! increasing length, followed by the full analysis pipeline.

use escapement::operations::windows::{MonotonicPeakWindow, PeakWindow, peak_hold, run_window};
use escapement::{DetectorConfig, analyze, utils::generation::ringing_ticks};
use std::time::Instant;

/// Time `f` over a few runs and print mean and range in milliseconds.
fn time_runs<F: FnMut() -> usize>(label: &str, mut f: F) {
    // Warm up
    for _ in 0..2 {
        std::hint::black_box(f());
    }

    let num_runs = 10;
    let mut times = Vec::with_capacity(num_runs);
    for _ in 0..num_runs {
        let start = Instant::now();
        std::hint::black_box(f());
        times.push(start.elapsed().as_secs_f64() * 1000.0);
    }

    times.sort_by(f64::total_cmp);
    let mean = times.iter().sum::<f64>() / times.len() as f64;
    println!(
        "  {:<22} {:>9.3}ms (median: {:.3}ms, range: {:.3}-{:.3}ms)",
        label,
        mean,
        times[times.len() / 2],
        times[0],
        times[times.len() - 1]
    );
}

fn benchmark_recording(seconds: usize, width: usize) {
    let sample_rate = 44_100;
    let period = sample_rate / 6;
    let count = seconds * 6;
    let recording = ringing_ticks(sample_rate as u32, count, period, 400.0, 3000.0, 20_000, 0)
        .expect("synthetic recording");
    let rectified: Vec<u16> = recording.samples().iter().map(|s| s.unsigned_abs()).collect();

    println!(
        "{}s of 21600 BPH ticks, {} samples, peak width {}",
        seconds,
        rectified.len(),
        width
    );

    time_runs("PeakWindow", || {
        let mut window = PeakWindow::<u16>::new(width).expect("width");
        run_window(&mut window, rectified.iter().copied()).len()
    });
    time_runs("MonotonicPeakWindow", || {
        let mut window = MonotonicPeakWindow::<u16>::new(width).expect("width");
        run_window(&mut window, rectified.iter().copied()).len()
    });
    time_runs("peak_hold", || {
        peak_hold(&rectified, width).expect("width").len()
    });

    let config = DetectorConfig::for_movement(sample_rate as u32, 21_600.0)
        .expect("config")
        .with_peak_width(width);
    time_runs("full analysis", || {
        analyze(&recording, &config).expect("analysis").edges.len()
    });
    println!();
}

fn main() {
    println!("Escapement Window Benchmark");
    println!("===========================");

    println!("Features enabled:");
    if cfg!(feature = "parallel-processing") {
        println!("  parallel peak window (rayon)");
    } else {
        println!("  sequential peak window");
    }
    println!();

    for (seconds, width) in [(10, 10), (60, 10), (60, 100), (300, 10)] {
        benchmark_recording(seconds, width);
    }

    println!("Benchmark complete");
}
