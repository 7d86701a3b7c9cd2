//! Property tests over randomized measurement streams

use drowsiness::{AlertLevel, DrowsinessEvaluator, Measurement};
use proptest::prelude::*;

/// Closedness values including out-of-range and non-finite garbage
fn closedness() -> impl Strategy<Value = f32> {
    prop_oneof![
        8 => -0.5f32..1.5f32,
        1 => Just(f32::NAN),
        1 => Just(f32::INFINITY),
    ]
}

fn assert_bounded(value: f64, name: &str) {
    assert!((0.0..=1.0).contains(&value), "{name} out of bounds: {value}");
}

proptest! {
    /// Every emitted snapshot stays within [0, 1] on all reported ratios,
    /// for arbitrary (even degenerate) input streams.
    #[test]
    fn snapshot_fields_always_bounded(
        frames in prop::collection::vec((0.0f64..0.5, closedness(), closedness()), 1..300),
    ) {
        let mut eval = DrowsinessEvaluator::default();
        eval.reset(0.0);

        let mut now = 0.0;
        for (i, (dt, left, right)) in frames.into_iter().enumerate() {
            now += dt;
            let state = eval.ingest(Measurement::new(now, left, right));
            assert_bounded(state.perclos, "perclos");
            assert_bounded(state.calibration_progress, "calibration_progress");
            assert_bounded(state.continuous_closure_progress, "continuous_closure_progress");

            // interleave heartbeats the way a tracking loop would
            if i % 7 == 0 {
                let state = eval.ingest_face_lost(now);
                assert_bounded(state.perclos, "perclos");
                assert_bounded(state.calibration_progress, "calibration_progress");
                assert_bounded(state.continuous_closure_progress, "continuous_closure_progress");
            }
        }
    }

    /// Raw values oscillating strictly inside the hysteresis dead zone never
    /// flip the eye state: open eyes stay open.
    #[test]
    fn dead_zone_never_closes_open_eyes(
        values in prop::collection::vec((0.551f32..0.799, 0.551f32..0.799), 1..400),
    ) {
        let mut eval = DrowsinessEvaluator::default();
        eval.reset(0.0);

        for (i, (left, right)) in values.into_iter().enumerate() {
            let t = (i + 1) as f64 / 30.0;
            let state = eval.ingest(Measurement::new(t, left, right));
            // smoothed values stay below the close threshold, so the state
            // machine never leaves Open
            assert_eq!(state.continuous_closure_progress, 0.0);
            assert_ne!(state.alert, AlertLevel::Alarm);
        }
    }

    /// The mirror case: once closed, dead-zone values keep the eyes closed.
    #[test]
    fn dead_zone_never_opens_closed_eyes(
        values in prop::collection::vec((0.551f32..0.799, 0.551f32..0.799), 1..200),
    ) {
        let mut eval = DrowsinessEvaluator::default();
        eval.reset(0.0);

        // drive the state to Closed first
        let mut t = 0.0;
        for i in 1..=30 {
            t = i as f64 / 30.0;
            eval.ingest(Measurement::new(t, 0.98, 0.98));
        }
        let state = eval.ingest_face_lost(t);
        assert!(state.perclos > 0.0, "precondition: eyes closed");

        for (left, right) in values {
            t += 1.0 / 30.0;
            let state = eval.ingest(Measurement::new(t, left, right));
            // smoothed values stay above the open threshold, so the closure
            // timer keeps running
            assert!(state.continuous_closure_progress > 0.0);
        }
    }
}
