use super::*;
use serde_json::{Value, json};

fn scene(kind: &str, frames: u64) -> Value {
    match kind {
        "hook" => json!({ "type": "hook", "durationInFrames": frames, "brandName": "Acme", "tagline": "Ship faster" }),
        "problem" => json!({ "type": "problem", "durationInFrames": frames, "headline": "Slow tools?", "painPoints": ["Manual steps", "Lost hours"] }),
        "solution" => json!({ "type": "solution", "durationInFrames": frames, "headline": "Meet Acme", "features": [{ "title": "Fast search" }] }),
        "use-cases" => json!({ "type": "use-cases", "durationInFrames": frames, "headline": "For teams", "cases": [{ "title": "Startups" }] }),
        "results" => json!({ "type": "results", "durationInFrames": frames, "stats": [{ "value": 50000, "suffix": "+", "label": "Users" }] }),
        "cta" => json!({ "type": "cta", "durationInFrames": frames, "headline": "Try it now", "buttonText": "Get Started", "url": "https://acme.test" }),
        other => panic!("no fixture for {other}"),
    }
}

fn raw_with(scenes: Vec<Value>) -> Value {
    json!({
        "scenes": scenes,
        "colorTheme": {
            "primary": "#FF97EA",
            "secondary": "#1A1A1A",
            "accent": "#00E0FF",
            "background": "#0A0A0A",
            "text": "#FAFAFA",
            "textSecondary": "#A1A1AA"
        },
        "audioMood": "cinematic-pop",
        "audioBpm": 120,
        "productUrl": "https://acme.test",
        "audioPrompt": "upbeat pop anthem with punchy drums at 120 BPM",
        "audioLyrics": "[Verse 1]\nWe ship it fast",
        "narrationScript": "Tired of slow tools? Meet Acme."
    })
}

fn standard() -> Value {
    raw_with(vec![
        scene("hook", 65),
        scene("problem", 65),
        scene("solution", 80),
        scene("results", 65),
        scene("cta", 55),
    ])
}

fn run(v: Value) -> SyncResult<Normalized> {
    normalize(
        StoryboardDef::from_value(v).unwrap(),
        None,
        &NormalizeOpts::default(),
    )
}

#[test]
fn well_formed_storyboard_passes_through_without_warnings() {
    let n = run(standard()).unwrap();
    assert!(n.warnings.is_empty(), "{:?}", n.warnings);
    let sb = &n.storyboard;
    assert_eq!(sb.content_frames(), 330);
    assert_eq!(sb.bpm, 120.0);
    assert_eq!(sb.audio_mood, AudioMood::CinematicPop);
    assert_eq!(
        sb.kinds(),
        vec![
            SceneKind::Hook,
            SceneKind::Problem,
            SceneKind::Solution,
            SceneKind::Results,
            SceneKind::Cta
        ]
    );
    assert!(sb.has_narration_script());
}

#[test]
fn missing_required_fields_are_fatal() {
    let mut v = standard();
    v.as_object_mut().unwrap().remove("scenes");
    assert!(matches!(run(v), Err(SyncError::Validation(_))));

    let v = raw_with(vec![]);
    assert!(matches!(run(v), Err(SyncError::Validation(_))));

    let mut v = standard();
    v["colorTheme"].as_object_mut().unwrap().remove("primary");
    let err = run(v).unwrap_err();
    assert!(err.to_string().contains("primary"), "{err}");

    let mut v = standard();
    v.as_object_mut().unwrap().remove("audioMood");
    let err = run(v).unwrap_err();
    assert!(err.to_string().contains("audioMood"), "{err}");
}

#[test]
fn legacy_transition_markers_are_dropped() {
    let v = raw_with(vec![
        scene("hook", 60),
        json!({ "type": "transition", "durationInFrames": 15, "style": "wipe" }),
        scene("cta", 60),
        json!({ "type": "Transition", "durationInFrames": 15, "style": "fade" }),
    ]);
    let n = run(v).unwrap();
    assert_eq!(n.storyboard.scenes.len(), 2);
    assert!(
        n.warnings
            .contains(&NormalizeWarning::LegacyTransitionsDropped { count: 2 })
    );
}

#[test]
fn only_transition_markers_is_fatal() {
    let v = raw_with(vec![
        json!({ "type": "transition", "durationInFrames": 15, "style": "wipe" }),
    ]);
    assert!(matches!(run(v), Err(SyncError::Validation(_))));
}

#[test]
fn narrative_shape_only_warns() {
    let v = raw_with(vec![scene("problem", 60), scene("hook", 60), scene("results", 60)]);
    let n = run(v).unwrap();
    assert_eq!(
        n.storyboard.kinds(),
        vec![SceneKind::Problem, SceneKind::Hook, SceneKind::Results]
    );
    assert!(n.warnings.contains(&NormalizeWarning::UnexpectedOpening {
        found: SceneKind::Problem,
        expected: SceneKind::Hook,
    }));
    assert!(n.warnings.contains(&NormalizeWarning::UnexpectedClosing {
        found: SceneKind::Results,
        expected: SceneKind::Cta,
    }));
}

#[test]
fn out_of_band_bpm_is_replaced_silently() {
    for bad in [json!(null), json!(40), json!(250)] {
        let mut v = standard();
        v["audioBpm"] = bad;
        let n = run(v).unwrap();
        assert_eq!(n.storyboard.bpm, 128.0);
        assert!(
            n.warnings
                .iter()
                .any(|w| matches!(w, NormalizeWarning::BpmReplaced { .. }))
        );
    }

    let mut v = standard();
    v.as_object_mut().unwrap().remove("audioBpm");
    v["bpm"] = json!(200);
    assert_eq!(run(v).unwrap().storyboard.bpm, 200.0);
}

#[test]
fn oversized_storyboard_is_scaled_proportionally() {
    let v = raw_with(vec![
        scene("hook", 150),
        scene("problem", 150),
        scene("solution", 150),
        scene("use-cases", 150),
        scene("results", 150),
        scene("cta", 150),
    ]);
    let n = run(v).unwrap();
    for s in &n.storyboard.scenes {
        assert_eq!(s.duration_in_frames, 80);
    }
    assert_eq!(n.storyboard.content_frames(), 480);
    assert!(n.warnings.contains(&NormalizeWarning::DurationScaled {
        from_frames: 900,
        to_frames: 480,
    }));
}

#[test]
fn scaled_scenes_never_drop_below_floor() {
    let v = raw_with(vec![scene("hook", 40), scene("solution", 700), scene("cta", 40)]);
    let n = run(v).unwrap();
    let durations: Vec<u64> = n
        .storyboard
        .scenes
        .iter()
        .map(|s| s.duration_in_frames)
        .collect();
    // 480/780 scale: 40 -> 25 (floored to 30), 700 -> 431.
    assert_eq!(durations, vec![30, 431, 30]);
    assert!(durations.iter().all(|&d| d >= 30));
    // The floor is applied after scaling, so the sum may land above the budget.
    assert_eq!(n.storyboard.content_frames(), 491);
}

#[test]
fn budget_at_limit_is_not_scaled() {
    let v = raw_with(vec![scene("hook", 240), scene("cta", 240)]);
    let n = run(v).unwrap();
    assert_eq!(n.storyboard.content_frames(), 480);
    assert!(
        !n.warnings
            .iter()
            .any(|w| matches!(w, NormalizeWarning::DurationScaled { .. }))
    );
}

#[test]
fn independent_rounding_leaves_documented_drift() {
    let scenes = (0..7).map(|_| scene("solution", 100)).collect();
    let opts = NormalizeOpts {
        scale_target_frames: 450,
        ..NormalizeOpts::default()
    };
    let n = normalize(
        StoryboardDef::from_value(raw_with(scenes)).unwrap(),
        None,
        &opts,
    )
    .unwrap();
    // 100 * 450/700 = 64.29 -> 64 per scene; no corrective pass.
    assert_eq!(n.storyboard.content_frames(), 448);
}

#[test]
fn mood_override_wins_and_drives_prompt_fallback() {
    let mut v = standard();
    v["audioPrompt"] = json!("short");
    let n = normalize(
        StoryboardDef::from_value(v).unwrap(),
        Some(AudioMood::CinematicEpic),
        &NormalizeOpts::default(),
    )
    .unwrap();
    assert_eq!(n.storyboard.audio_mood, AudioMood::CinematicEpic);
    assert_eq!(
        n.storyboard.audio_prompt,
        AudioMood::CinematicEpic.default_prompt()
    );
    assert!(n.warnings.contains(&NormalizeWarning::AudioPromptDefaulted));
}

#[test]
fn unknown_mood_falls_back_to_default() {
    let mut v = standard();
    v["audioMood"] = json!("lofi-chill");
    let n = run(v).unwrap();
    assert_eq!(n.storyboard.audio_mood, AudioMood::CinematicClassical);
    assert!(n.warnings.contains(&NormalizeWarning::UnknownMood {
        found: "lofi-chill".to_string(),
        replacement: AudioMood::CinematicClassical,
    }));
}

#[test]
fn short_creative_fields_get_defaults() {
    let mut v = standard();
    v["audioLyrics"] = json!("la la");
    v["narrationScript"] = json!("   ");
    let n = run(v).unwrap();
    assert_eq!(n.storyboard.audio_lyrics, DEFAULT_AUDIO_LYRICS);
    assert_eq!(n.storyboard.narration_script, "");
    assert!(!n.storyboard.has_narration_script());
    assert!(n.warnings.contains(&NormalizeWarning::NarrationDisabled));
}

#[test]
fn scene_durations_are_rounded_and_validated() {
    let mut hook = scene("hook", 0);
    hook["durationInFrames"] = json!(64.6);
    let n = run(raw_with(vec![hook, scene("cta", 60)])).unwrap();
    assert_eq!(n.storyboard.scenes[0].duration_in_frames, 65);

    let err = run(raw_with(vec![scene("hook", 0), scene("cta", 60)])).unwrap_err();
    assert!(err.to_string().contains("scene 0 (hook)"), "{err}");

    let mut cta = scene("cta", 60);
    cta.as_object_mut().unwrap().remove("durationInFrames");
    assert!(matches!(
        run(raw_with(vec![scene("hook", 60), cta])),
        Err(SyncError::Validation(_))
    ));
}

#[test]
fn malformed_content_scene_is_fatal_with_index() {
    let mut problem = scene("problem", 60);
    problem.as_object_mut().unwrap().remove("painPoints");
    let err = run(raw_with(vec![scene("hook", 60), problem])).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("scene 1 (problem)"), "{msg}");
    assert!(msg.contains("painPoints"), "{msg}");

    let untagged = json!({ "durationInFrames": 60, "headline": "?" });
    assert!(matches!(
        run(raw_with(vec![untagged])),
        Err(SyncError::Validation(_))
    ));
}

#[test]
fn unknown_scene_kind_is_dropped_with_warning() {
    let pricing = json!({ "type": "pricing", "durationInFrames": 60, "tiers": [] });
    let n = run(raw_with(vec![scene("hook", 60), pricing, scene("cta", 60)])).unwrap();
    assert_eq!(n.storyboard.scenes.len(), 2);
    assert!(n.warnings.contains(&NormalizeWarning::UnknownSceneDropped {
        index: 1,
        tag: "pricing".to_string(),
    }));
}

#[test]
fn theme_secondary_colors_are_completed() {
    let mut v = standard();
    v["colorTheme"] = json!({ "primary": "#336699", "accent": "not-a-color" });
    let n = run(v).unwrap();
    let theme = &n.storyboard.color_theme;
    assert_eq!(theme.accent.as_str(), "#336699");
    assert_eq!(theme.background.as_str(), "#0A0A0A");
    let replaced = n
        .warnings
        .iter()
        .filter(|w| matches!(w, NormalizeWarning::ThemeColorReplaced { .. }))
        .count();
    assert_eq!(replaced, 5);

    let mut v = standard();
    v["colorTheme"]["primary"] = json!("pink");
    assert!(matches!(run(v), Err(SyncError::Validation(_))));
}

#[test]
fn passthrough_attributes_survive_normalization() {
    let mut hook = scene("hook", 60);
    hook["particleCount"] = json!(40);
    let n = run(raw_with(vec![hook, scene("cta", 60)])).unwrap();
    assert_eq!(
        n.storyboard.scenes[0].content.extra().get("particleCount"),
        Some(&json!(40))
    );
    assert!(
        n.storyboard.scenes[0]
            .content
            .extra()
            .get("durationInFrames")
            .is_none()
    );
}

#[test]
fn opts_validation_rejects_inverted_band() {
    let opts = NormalizeOpts {
        bpm_min: 200.0,
        bpm_max: 80.0,
        ..NormalizeOpts::default()
    };
    assert!(opts.validate().is_err());
    assert!(NormalizeOpts::default().validate().is_ok());
}

#[test]
fn invalid_opts_are_rejected_before_scaling() {
    let v = raw_with(vec![scene("hook", 1), scene("cta", 10_000)]);
    let opts = NormalizeOpts {
        min_scene_frames: 0,
        ..NormalizeOpts::default()
    };
    let err = normalize(StoryboardDef::from_value(v).unwrap(), None, &opts).unwrap_err();
    assert!(matches!(err, SyncError::Validation(_)), "{err}");
    assert!(err.to_string().contains("min_scene_frames"), "{err}");
}

#[test]
fn default_target_rounding_can_overshoot_the_budget() {
    let scenes = (0..7).map(|_| scene("solution", 100)).collect();
    let n = run(raw_with(scenes)).unwrap();
    // 100 * 480/700 = 68.57 -> 69 per scene, no floor involved.
    assert!(n.storyboard.scenes.iter().all(|s| s.duration_in_frames == 69));
    assert_eq!(n.storyboard.content_frames(), 483);
    assert!(n.warnings.contains(&NormalizeWarning::DurationScaled {
        from_frames: 700,
        to_frames: 483,
    }));
}

#[test]
fn mood_override_suppresses_unknown_mood_warning() {
    let mut v = standard();
    v["audioMood"] = json!("lofi-chill");
    let n = normalize(
        StoryboardDef::from_value(v).unwrap(),
        Some(AudioMood::CinematicEpic),
        &NormalizeOpts::default(),
    )
    .unwrap();
    assert_eq!(n.storyboard.audio_mood, AudioMood::CinematicEpic);
    assert!(
        !n.warnings
            .iter()
            .any(|w| matches!(w, NormalizeWarning::UnknownMood { .. })),
        "{:?}",
        n.warnings
    );
}
