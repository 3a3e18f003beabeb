use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use pose_match::challenge::{ChallengeEvent, ChallengeSession};
use pose_match::config::Config;
use pose_match::logging;
use pose_match::pose::{load_keypoints, Keypoint, PoseName};
use pose_match::replay::{load_frames, replay, ReplayEvent};
use pose_match::scoring::{align, normalize, similarity, MatchScore};

/// Score body poses against the reference pose library.
#[derive(Parser, Debug)]
#[command(author, version = env!("GIT_VERSION"), about, long_about = None)]
struct Cli {
    /// Config file (missing file means defaults)
    #[arg(short, long, global = true, default_value = "config.toml")]
    config: PathBuf,

    /// Log level, overrides the config file (RUST_LOG still wins)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the reference poses
    List,
    /// Compare a pose against a target pose
    Score {
        /// Pose name (e.g. tPose) or JSON keypoint file
        #[arg(short, long)]
        user: String,
        /// Pose name or JSON keypoint file
        #[arg(short, long, default_value = "tPose")]
        target: String,
    },
    /// Run a timed challenge over recorded frames (JSON lines)
    Replay {
        /// Frame log, one {"t": .., "keypoints": [..]} object per line
        #[arg(short, long)]
        frames: PathBuf,
        /// Target pose, defaults to challenge.default_pose
        #[arg(short, long)]
        pose: Option<String>,
    },
}

/// 名前ならライブラリから、そうでなければファイルから読む
fn resolve_keypoints(arg: &str) -> Result<(String, Vec<Keypoint>)> {
    if let Ok(name) = arg.parse::<PoseName>() {
        return Ok((name.label().to_string(), name.pose().as_slice().to_vec()));
    }
    let keypoints = load_keypoints(arg)
        .with_context(|| format!("'{}' is neither a pose name nor a readable pose file", arg))?;
    Ok((arg.to_string(), keypoints))
}

fn list() {
    println!("{:<10} {:<14} keypoints", "key", "label");
    for name in PoseName::ALL {
        println!("{:<10} {:<14} {}", name.key(), name.label(), name.pose().keypoints.len());
    }
}

fn score(user: &str, target: &str) -> Result<()> {
    let (user_label, user_points) = resolve_keypoints(user)?;
    let (target_label, target_points) = resolve_keypoints(target)?;

    if user_points.len() != target_points.len() {
        tracing::warn!(
            user = user_points.len(),
            target = target_points.len(),
            "keypoint counts differ, poses are not comparable"
        );
    }

    let sim = similarity(&user_points, &target_points);
    let score = MatchScore::from_similarity(sim);

    println!("User:       {}", user_label);
    println!("Target:     {}", target_label);
    println!("Similarity: {:.6}", sim);
    if let (Some(u), Some(t)) = (normalize(&user_points), normalize(&target_points)) {
        if u.len() == t.len() {
            println!("Rotation:   {:.2} deg", align(&u, &t).angle().to_degrees());
        }
    }
    println!("Match:      {}%", score.percentage);
    println!("Distance:   {}", score.distance);
    Ok(())
}

fn run_replay(config: &Config, frames: &Path, pose: Option<&str>) -> Result<()> {
    let mut session = ChallengeSession::from_config(config)?;
    if let Some(pose) = pose {
        session.select_pose(pose.parse()?);
    }
    let frames = load_frames(frames)?;

    println!("Replaying {} frames against {}", frames.len(), session.target());
    println!();

    for event in replay(&mut session, &frames) {
        match event {
            ReplayEvent::Scored { t, score } => {
                println!("[{:>6.2}s] distance {:>3} (similarity {:.4})", t, score.distance, score.similarity);
            }
            ReplayEvent::Challenge { t, event: ChallengeEvent::Warning { remaining } } => {
                println!("[{:>6.2}s] {} seconds left", t, remaining);
            }
            ReplayEvent::Challenge { t, event: ChallengeEvent::Finished(result) } => {
                println!();
                println!("[{:>6.2}s] Time's up!", t);
                println!("Final Score: {}%{}", result.peak, if result.won { " - YOU WIN!" } else { "" });
            }
            ReplayEvent::Challenge { event: ChallengeEvent::Tick { .. }, .. } => {}
        }
    }
    println!("Frames scored: {}", session.frames_scored());
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // 設定ファイルが無いのは正常、壊れていれば警告して既定値
    let loaded = cli.config.exists().then(|| Config::load(&cli.config));
    let config = match &loaded {
        Some(Ok(config)) => config.clone(),
        _ => Config::default(),
    };

    let level = cli.log_level.as_deref().unwrap_or(&config.log.level);
    logging::init(level)?;
    match loaded {
        Some(Ok(_)) => tracing::debug!(config = %cli.config.display(), "config loaded"),
        Some(Err(e)) => tracing::warn!("{:#}; using defaults", e),
        None => tracing::debug!(config = %cli.config.display(), "no config file, using defaults"),
    }

    match &cli.command {
        Commands::List => list(),
        Commands::Score { user, target } => score(user, target)?,
        Commands::Replay { frames, pose } => run_replay(&config, frames, pose.as_deref())?,
    }

    Ok(())
}
