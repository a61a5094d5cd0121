//! Hovercraft - headless game core
//!
//! Player movement, streaming track and chase camera in `game`, persisted
//! settings and leaderboard in `storage`, and `App` tying them together.
//! `run` drives a scripted session for the command-line binary.

mod app;
pub mod game;
pub mod storage;

pub use app::App;

use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use game::{GameConfig, GameState, PanPhase};
use storage::JsonFileStore;

/// Fixed frame step used by the headless runner
const FRAME_DT: f32 = 1.0 / 60.0;
/// Give up after this many simulated frames
const MAX_FRAMES: u32 = 60 * 60 * 5;

/// Command-line options for the headless runner
#[derive(Debug, Default)]
struct RunOptions {
    config_path: Option<PathBuf>,
    data_dir: Option<PathBuf>,
    seed: Option<u64>,
}

impl RunOptions {
    fn parse(args: impl Iterator<Item = String>) -> anyhow::Result<Self> {
        let mut options = Self::default();
        let mut args = args.skip(1);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => options.config_path = args.next().map(PathBuf::from),
                "--data-dir" => options.data_dir = args.next().map(PathBuf::from),
                "--seed" => {
                    let value = args.next().context("--seed needs a value")?;
                    options.seed = Some(value.parse().with_context(|| format!("invalid seed {value}"))?);
                }
                other => anyhow::bail!("unknown argument {other}"),
            }
        }

        if options.data_dir.is_none() {
            options.data_dir = env::var_os("HOVERCRAFT_DATA_DIR").map(PathBuf::from);
        }
        Ok(options)
    }
}

/// Steer away from the nearest obstacle ahead and boost on open track
fn autopilot<S: storage::KeyValueStore>(app: &mut App<S>) {
    let scene = app.scene();
    let craft = scene.body().position;
    let threat = scene
        .track()
        .obstacles_near(craft.z, craft.z + 15.0)
        .map(|(_, position)| position)
        .min_by(|a, b| a.z.total_cmp(&b.z));

    match threat {
        Some(position) => {
            let away = if position.x > craft.x { -1.0 } else { 1.0 };
            app.pan(PanPhase::Changed, away * 80.0);
        }
        None => {
            app.pan(PanPhase::Ended, 0.0);
            app.boost();
        }
    }
}

/// Play one scripted run and print the outcome
pub fn run() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let options = RunOptions::parse(env::args())?;

    let mut config = match &options.config_path {
        Some(path) => {
            let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
            GameConfig::from_json(&text).with_context(|| format!("parsing {}", path.display()))?
        }
        None => GameConfig::default(),
    };
    if options.seed.is_some() {
        config.seed = options.seed;
    }

    let data_dir = options.data_dir.unwrap_or_else(|| PathBuf::from(".hovercraft"));
    let mut app = App::new(
        config,
        JsonFileStore::open(data_dir.join("settings.json")),
        JsonFileStore::open(data_dir.join("leaderboard.json")),
    );
    log::info!("Hovercraft initialized, data in {}", data_dir.display());

    app.start_run();
    app.pan(PanPhase::Began, 0.0);

    let mut frames = 0;
    let mut snapshot = loop {
        autopilot(&mut app);
        let snapshot = app.update(FRAME_DT);
        frames += 1;
        if snapshot.state == GameState::GameOver || frames >= MAX_FRAMES {
            break snapshot;
        }
    };

    if snapshot.state != GameState::GameOver {
        app.end_run();
        snapshot = app.scene().snapshot();
        println!("Run cut off after {} frames", frames);
    }

    log::info!("Run finished after {} frames: {:?}", frames, app.scene().stats());
    println!("{}", serde_json::to_string_pretty(&snapshot)?);

    match app.finish_run() {
        Some(position) => println!("New high score: {} (#{})", snapshot.score, position),
        None => println!("Score: {}", snapshot.score),
    }
    for (i, entry) in app.leaderboard().entries().iter().enumerate() {
        println!("{:>2}. {:<16} {:>8}", i + 1, entry.name, entry.score);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> impl Iterator<Item = String> {
        std::iter::once("hovercraft".to_string())
            .chain(list.iter().map(|s| s.to_string()))
            .collect::<Vec<_>>()
            .into_iter()
    }

    #[test]
    fn parses_options() {
        let options = RunOptions::parse(args(&["--seed", "42", "--data-dir", "/tmp/hc"])).expect("valid args");
        assert_eq!(options.seed, Some(42));
        assert_eq!(options.data_dir, Some(PathBuf::from("/tmp/hc")));
        assert!(options.config_path.is_none());
    }

    #[test]
    fn rejects_bad_options() {
        assert!(RunOptions::parse(args(&["--seed", "many"])).is_err());
        assert!(RunOptions::parse(args(&["--fly"])).is_err());
    }

    #[test]
    fn autopilot_boosts_on_open_track() {
        let mut app = App::new(
            GameConfig::default().with_seed(5),
            storage::MemoryStore::new(),
            storage::MemoryStore::new(),
        );
        app.start_run();
        autopilot(&mut app);
        assert!(app.scene().player().state().is_boosting);
        assert!(!app.scene().player().state().is_drifting);
    }
}
