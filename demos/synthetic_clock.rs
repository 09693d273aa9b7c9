//! Analyse a synthetic movement with a deliberate beat error.
//!
//! Run with `cargo run --example synthetic_clock --features serialization`
//! to also print the JSON report.

use escapement::{
    BeatDetector, BeatReport, DetectorConfig, EscapementResult,
    utils::generation::alternating_pulse_train,
};

fn main() -> EscapementResult<()> {
    let sample_rate = 44_100;

    // A 18000 BPH movement (0.2 s per beat) running out of beat:
    // tic 0.19 s, tok 0.21 s.
    let recording = alternating_pulse_train(sample_rate, 40, 8379, 9261, 80, 18_000, 2000)?;

    let config = DetectorConfig::for_movement(sample_rate, 18_000.0)?.with_target_bph(18_000.0);
    let analysis = BeatDetector::new(config)?.analyze(&recording)?;
    let report = BeatReport::new("synthetic 18000 BPH", &analysis);

    println!("{}", report.title());
    println!("{}", report.subtitle());
    println!("beats: {}", report.beats);

    if let Some(summary) = report.beat_error {
        println!("mean even delta: {:.4} s", summary.mean_even);
        println!("mean odd delta:  {:.4} s", summary.mean_odd);
        println!("beat error:      {:.2} ms", summary.beat_error_ms);
    }

    #[cfg(feature = "serialization")]
    println!("{}", report.to_json()?);

    Ok(())
}
