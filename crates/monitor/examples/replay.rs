//! Replays a synthetic session through a full monitor: warmup, a drowsy
//! episode, recovery, then a lost face. Prints each alert transition.
//!
//! Run with: cargo run --example replay

use alerting::AlertSink;
use drowsiness::{EvaluatorConfig, Measurement};
use monitor::DrowsinessMonitor;

struct ConsoleSink;

impl AlertSink for ConsoleSink {
    fn play_warning(&mut self) {
        println!(">> warning chime");
    }
    fn play_alarm(&mut self) {
        println!(">> ALARM");
    }
    fn stop(&mut self) {
        println!(">> silence");
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let mut monitor = DrowsinessMonitor::new(EvaluatorConfig::default(), ConsoleSink).unwrap();
    monitor.start(0.0);

    let mut t = 0.0;
    let mut step = |monitor: &mut DrowsinessMonitor<ConsoleSink>, secs: f64, closedness: f32| {
        let frames = (secs * 30.0).round() as usize;
        for _ in 0..frames {
            t += 1.0 / 30.0;
            monitor.handle_measurement(Measurement::new(t, closedness, closedness));
        }
        t
    };

    // calibration warmup with open eyes
    step(&mut monitor, 8.0, 0.05);
    println!("calibrated: {:?}", monitor.state());

    // drowsy episode: long closures
    step(&mut monitor, 30.0, 0.92);
    println!("drowsy: {:?}", monitor.state());

    // recovery
    step(&mut monitor, 10.0, 0.05);
    println!("recovered: {:?}", monitor.state());

    // face leaves the frame; heartbeat ticks at 10 Hz
    let gone_at = t;
    for i in 1..=20 {
        monitor.handle_face_lost(gone_at + i as f64 / 10.0);
    }
    println!("face lost: {:?}", monitor.state());

    monitor.stop();
}
