use super::*;

fn frames(env: &VolumeEnvelope) -> Vec<u64> {
    env.points().iter().map(|p| p.frame).collect()
}

fn assert_well_formed(env: &VolumeEnvelope) {
    let pts = env.points();
    assert!(!pts.is_empty());
    assert!(pts.windows(2).all(|w| w[0].frame < w[1].frame), "{pts:?}");
    assert!(pts.iter().all(|p| (0.0..=1.0).contains(&p.volume)), "{pts:?}");
}

#[test]
fn music_envelope_matches_reference_shape() {
    let env = schedule_music(298, false, Fps::default(), &EnvelopeOpts::default());
    assert_eq!(frames(&env), vec![0, 15, 268, 298]);
    let vols: Vec<f32> = env.points().iter().map(|p| p.volume).collect();
    assert_eq!(vols, vec![0.0, 0.8, 0.8, 0.0]);
}

#[test]
fn narration_envelope_uses_quicker_fades() {
    let env = schedule_narration(298, Fps::default(), &EnvelopeOpts::default());
    assert_eq!(frames(&env), vec![0, 9, 283, 298]);
    assert_eq!(env.peak_volume(), 0.9);
}

#[test]
fn narration_ducks_the_music() {
    let opts = EnvelopeOpts::default();
    for total in [2, 10, 16, 40, 298, 900] {
        let ducked = schedule_music(total, true, Fps::default(), &opts);
        let solo = schedule_music(total, false, Fps::default(), &opts);
        assert!(ducked.peak_volume() < solo.peak_volume(), "total={total}");
    }
    assert_eq!(
        schedule_music(298, true, Fps::default(), &opts).peak_volume(),
        0.25
    );
}

#[test]
fn short_timelines_keep_breakpoints_increasing() {
    let opts = EnvelopeOpts::default();
    for total in 0..120 {
        for narration in [false, true] {
            assert_well_formed(&schedule_music(total, narration, Fps::default(), &opts));
        }
        assert_well_formed(&schedule_narration(total, Fps::default(), &opts));
    }
}

#[test]
fn fade_windows_do_not_cross() {
    // Fade-out start (20 - 30) would precede the fade-in end; the hold collapses to one frame.
    let env = schedule_music(20, false, Fps::default(), &EnvelopeOpts::default());
    assert_eq!(frames(&env), vec![0, 15, 16, 20]);
}

#[test]
fn degenerate_totals() {
    let opts = EnvelopeOpts::default();
    assert_eq!(frames(&schedule_music(0, false, Fps::default(), &opts)), vec![0]);
    assert_eq!(frames(&schedule_music(1, false, Fps::default(), &opts)), vec![0, 1]);
    assert_eq!(
        frames(&schedule_music(16, false, Fps::default(), &opts)),
        vec![0, 8, 16]
    );
    assert_eq!(
        schedule_music(1, false, Fps::default(), &opts).peak_volume(),
        0.0
    );
}

#[test]
fn zero_length_fades_still_span_a_frame() {
    let mut opts = EnvelopeOpts::default();
    opts.music.fade_in_secs = 0.0;
    opts.music.fade_out_secs = 0.0;
    let env = schedule_music(100, false, Fps::default(), &opts);
    assert_eq!(frames(&env), vec![0, 1, 99, 100]);
}

#[test]
fn volume_at_interpolates_and_clamps() {
    let env = schedule_music(298, false, Fps::default(), &EnvelopeOpts::default());
    assert_eq!(env.volume_at(-5.0), 0.0);
    assert!((env.volume_at(7.5) - 0.4).abs() < 1e-6);
    assert_eq!(env.volume_at(100.0), 0.8);
    assert!((env.volume_at(283.0) - 0.4).abs() < 1e-6);
    assert_eq!(env.volume_at(298.0), 0.0);
    assert_eq!(env.volume_at(10_000.0), 0.0);
    assert_eq!(env.end_frame(), 298);
}

#[test]
fn scheduling_is_deterministic() {
    let opts = EnvelopeOpts::default();
    let fps = Fps::new(30_000, 1001).unwrap();
    assert_eq!(
        schedule_music(451, true, fps, &opts),
        schedule_music(451, true, fps, &opts)
    );
    assert_eq!(
        schedule_narration(451, fps, &opts),
        schedule_narration(451, fps, &opts)
    );
}

#[test]
fn envelope_rejects_bad_breakpoints() {
    let bp = |frame, volume| Breakpoint { frame, volume };
    assert!(VolumeEnvelope::new(vec![]).is_err());
    assert!(VolumeEnvelope::new(vec![bp(0, 0.0), bp(0, 1.0)]).is_err());
    assert!(VolumeEnvelope::new(vec![bp(0, 0.0), bp(5, 1.5)]).is_err());
    assert!(VolumeEnvelope::new(vec![bp(0, 0.0), bp(5, 1.0)]).is_ok());

    let err = serde_json::from_str::<VolumeEnvelope>(
        r#"[{"frame":3,"volume":0.5},{"frame":2,"volume":0.5}]"#,
    );
    assert!(err.is_err());
}

#[test]
fn opts_validation() {
    assert!(EnvelopeOpts::default().validate().is_ok());

    let mut o = EnvelopeOpts::default();
    o.ducked_music_peak = 1.2;
    assert!(o.validate().is_err());

    let mut o = EnvelopeOpts::default();
    o.narration.fade_out_secs = f64::NAN;
    assert!(o.validate().is_err());
}
