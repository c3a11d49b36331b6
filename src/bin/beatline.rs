use std::io::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use beatline::{
    AudioMood, AudioOutcome, EngineConfig, StoryboardDef, TempoData, build_plan, normalize,
};
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "beatline", version)]
struct Cli {
    /// Log debug detail to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the render sync plan (timeline + audio envelopes) as JSON.
    Plan(PlanArgs),
    /// Normalize a storyboard and report what had to be repaired.
    Check(CheckArgs),
}

#[derive(Parser, Debug)]
struct CommonArgs {
    /// Storyboard JSON from the planner.
    #[arg(long)]
    storyboard: PathBuf,

    /// Override the planned audio mood.
    #[arg(long)]
    mood: Option<String>,

    /// Engine config JSON; unset values keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct PlanArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Tempo estimate JSON (`{ "bpm": .., "beatTimesMs": [..] }`) for the generated track.
    #[arg(long)]
    tempo: Option<PathBuf>,

    /// Generated music track; defaults to the storyboard's `audioTrackFile`.
    #[arg(long)]
    audio_track: Option<String>,

    /// How the music job ended. Defaults to `generated` when a track is known, else `skipped`.
    #[arg(long, value_enum)]
    audio_status: Option<AudioStatus>,

    /// Failure reason recorded with `--audio-status failed`.
    #[arg(long)]
    audio_error: Option<String>,

    /// Output path; stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct CheckArgs {
    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum AudioStatus {
    Generated,
    TimedOut,
    Failed,
    Skipped,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        })
        .init();

    match cli.cmd {
        Command::Plan(args) => cmd_plan(args),
        Command::Check(args) => cmd_check(args),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<EngineConfig> {
    match path {
        Some(p) => {
            EngineConfig::from_path(p).with_context(|| format!("load config '{}'", p.display()))
        }
        None => Ok(EngineConfig::default()),
    }
}

fn parse_mood(mood: Option<&str>) -> anyhow::Result<Option<AudioMood>> {
    mood.map(|m| m.parse::<AudioMood>().map_err(anyhow::Error::msg))
        .transpose()
}

fn load_storyboard(path: &Path) -> anyhow::Result<StoryboardDef> {
    StoryboardDef::from_path(path).with_context(|| format!("load storyboard '{}'", path.display()))
}

fn cmd_plan(args: PlanArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.common.config.as_deref())?;
    let mood = parse_mood(args.common.mood.as_deref())?;
    let raw = load_storyboard(&args.common.storyboard)?;
    let normalized = normalize(raw, mood, &cfg.normalize)?;

    let track = args
        .audio_track
        .or_else(|| normalized.storyboard.audio_track_file.clone());
    let status = args.audio_status.unwrap_or(if track.is_some() {
        AudioStatus::Generated
    } else {
        AudioStatus::Skipped
    });
    let outcome = match status {
        AudioStatus::Generated => {
            let track_file = track.context(
                "--audio-status generated needs --audio-track or a storyboard audioTrackFile",
            )?;
            let tempo = args
                .tempo
                .as_deref()
                .map(|p| {
                    TempoData::from_path(p)
                        .with_context(|| format!("load tempo '{}'", p.display()))
                })
                .transpose()?;
            AudioOutcome::Generated { track_file, tempo }
        }
        AudioStatus::TimedOut => AudioOutcome::TimedOut,
        AudioStatus::Failed => AudioOutcome::Failed(
            args.audio_error
                .unwrap_or_else(|| "music generation failed".to_owned()),
        ),
        AudioStatus::Skipped => AudioOutcome::Skipped,
    };

    let plan = build_plan(normalized, outcome, &cfg)?;
    let json = serde_json::to_string_pretty(&plan).context("serialize sync plan")?;

    match args.out {
        Some(out) => {
            if let Some(parent) = out.parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create output dir '{}'", parent.display()))?;
            }
            std::fs::write(&out, json.as_bytes())
                .with_context(|| format!("write plan '{}'", out.display()))?;
            eprintln!(
                "wrote {} ({} frames, transition {} frames, fingerprint {})",
                out.display(),
                plan.total_frames(),
                plan.timeline.transition_frames,
                plan.fingerprint
            );
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}").context("write plan to stdout")?;
        }
    }
    Ok(())
}

fn cmd_check(args: CheckArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.common.config.as_deref())?;
    let mood = parse_mood(args.common.mood.as_deref())?;
    let raw = load_storyboard(&args.common.storyboard)?;
    let normalized = normalize(raw, mood, &cfg.normalize)?;

    let mut stdout = std::io::stdout().lock();
    for w in &normalized.warnings {
        writeln!(stdout, "warning: {w}")?;
    }
    writeln!(stdout, "{}", normalized.storyboard.summary(cfg.fps))?;
    writeln!(
        stdout,
        "{} warning(s), mood {}, bpm {}",
        normalized.warnings.len(),
        normalized.storyboard.audio_mood,
        normalized.storyboard.bpm
    )?;
    Ok(())
}
