use super::*;

fn fps30() -> Fps {
    Fps::new(30, 1).unwrap()
}

#[test]
fn half_beat_at_128_bpm_clamps_to_minimum() {
    // (60/128*30)/2 = 7.03 -> 7 -> clamped to 8.
    assert_eq!(
        transition_frames(Some(128.0), fps30(), &BeatOpts::default()),
        8
    );
}

#[test]
fn slow_tempo_gives_longer_transition() {
    // (60/80*30)/2 = 11.25 -> 11.
    assert_eq!(
        transition_frames(Some(80.0), fps30(), &BeatOpts::default()),
        11
    );
    // (60/40*30)/2 = 22.5 -> 23 -> clamped to 18.
    assert_eq!(
        transition_frames(Some(40.0), fps30(), &BeatOpts::default()),
        18
    );
}

#[test]
fn transition_stays_in_bounds_across_valid_band() {
    let opts = BeatOpts::default();
    for bpm in 80..=200 {
        let tf = transition_frames(Some(f64::from(bpm)), fps30(), &opts);
        assert!((8..=18).contains(&tf), "bpm {bpm} -> {tf}");
    }
}

#[test]
fn degenerate_tempo_falls_back_to_default() {
    let opts = BeatOpts::default();
    for bpm in [None, Some(0.0), Some(-120.0), Some(f64::NAN), Some(f64::INFINITY)] {
        assert_eq!(transition_frames(bpm, fps30(), &opts), 10, "{bpm:?}");
    }
}

#[test]
fn custom_bounds_are_honoured() {
    let opts = BeatOpts {
        min_transition_frames: 4,
        max_transition_frames: 6,
        default_transition_frames: 5,
    };
    assert_eq!(transition_frames(Some(200.0), fps30(), &opts), 5);
    assert_eq!(transition_frames(Some(60.0), fps30(), &opts), 6);
    assert!(
        BeatOpts {
            min_transition_frames: 9,
            max_transition_frames: 3,
            ..BeatOpts::default()
        }
        .validate()
        .is_err()
    );
}

#[test]
fn quantize_keeps_strict_monotonicity() {
    // 0ms, 10ms and 20ms all land near frame 0/1; 469ms -> 14, 938ms -> 28.
    let frames = quantize_beats(&[0.0, 10.0, 20.0, 469.0, 470.0, 938.0], fps30());
    assert_eq!(frames, vec![0, 1, 14, 28]);
    assert!(frames.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn quantize_skips_invalid_and_out_of_order_beats() {
    let frames = quantize_beats(&[-5.0, f64::NAN, 1000.0, 500.0, 2000.0], fps30());
    assert_eq!(frames, vec![30, 60]);
}

#[test]
fn quantize_tolerates_empty_input() {
    assert!(quantize_beats(&[], fps30()).is_empty());
}
