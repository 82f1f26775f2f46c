//! Command-line playback of a saved play.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use courtboard_core::animation::{Clock, FrameFlag, SystemClock};
use courtboard_core::storage::FileStorage;
use courtboard_core::{AnimationEngine, Editor, PlayDocument, Storage, StorageError};
use thiserror::Error;

use crate::demo::demo_document;

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid play file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Where the play to run comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaySource {
    /// The built-in demo play.
    Demo,
    /// A play document JSON file.
    File(PathBuf),
    /// A play in storage, by id.
    Stored(String),
    /// List stored plays instead of playing one.
    List,
}

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "courtboard", about = "Play back saved basketball plays")]
pub struct Cli {
    /// Playback frames per second.
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u32).range(1..))]
    pub fps: u32,

    /// Storage directory [default: platform data directory]
    #[arg(long, value_name = "DIR")]
    pub storage: Option<PathBuf>,

    /// Save the demo play to storage before playing it.
    #[arg(long)]
    pub save: bool,

    /// List stored plays instead of playing one.
    #[arg(long, conflicts_with = "play")]
    pub list: bool,

    /// Stored play id, or a play document ending in `.json`.
    #[arg(value_name = "PLAY")]
    pub play: Option<String>,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub source: PlaySource,
    /// Playback frames per second.
    pub fps: u32,
    /// Storage directory; the platform data directory when `None`.
    pub storage_dir: Option<PathBuf>,
    /// Save the demo play to storage before playing it.
    pub save_demo: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            source: PlaySource::Demo,
            fps: 30,
            storage_dir: None,
            save_demo: false,
        }
    }
}

impl From<Cli> for AppConfig {
    fn from(cli: Cli) -> Self {
        let source = match cli.play {
            _ if cli.list => PlaySource::List,
            None => PlaySource::Demo,
            Some(file) if file.ends_with(".json") => PlaySource::File(PathBuf::from(file)),
            Some(id) => PlaySource::Stored(id),
        };
        Self {
            source,
            fps: cli.fps,
            storage_dir: cli.storage,
            save_demo: cli.save,
        }
    }
}

impl AppConfig {
    fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.fps.max(1)))
    }
}

/// What a playback run produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaybackSummary {
    pub frames: usize,
    pub events: Vec<String>,
    pub duration: f64,
}

/// Main application struct.
pub struct App {
    config: AppConfig,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    pub fn with_config(config: AppConfig) -> Self {
        Self { config }
    }

    fn open_storage(&self) -> Result<FileStorage, StorageError> {
        match &self.config.storage_dir {
            Some(dir) => FileStorage::new(dir.clone()),
            None => FileStorage::default_location(),
        }
    }

    /// Resolve the configured source and play it in real time.
    pub async fn run(self) -> Result<(), AppError> {
        let document = match &self.config.source {
            PlaySource::List => {
                let storage = self.open_storage()?;
                let mut ids = storage.list().await?;
                ids.sort();
                for id in ids {
                    let document = storage.load(&id).await?;
                    println!("{}\t{}", document.id, document.name);
                }
                return Ok(());
            }
            PlaySource::Demo => {
                let document = demo_document();
                if self.config.save_demo {
                    self.open_storage()?.save(&document).await?;
                    log::info!("Saved demo play as {}", document.id);
                }
                document
            }
            PlaySource::File(path) => PlayDocument::from_json(&std::fs::read_to_string(path)?)?,
            PlaySource::Stored(id) => self.open_storage()?.load(id).await?,
        };

        let interval = self.config.frame_interval();
        self.play(document, SystemClock::default(), |_| std::thread::sleep(interval));
        Ok(())
    }

    /// Play `document` from start to end.
    ///
    /// `wait` is called once per frame and must let `clock` move forward.
    pub fn play(
        &self,
        document: PlayDocument,
        clock: impl Clock + 'static,
        mut wait: impl FnMut(Duration),
    ) -> PlaybackSummary {
        log::info!(
            "Playing '{}': {} players, {} paths",
            document.name,
            document.board.elements.players.len(),
            document.board.elements.paths.len()
        );
        let flag = FrameFlag::new();
        let mut editor =
            Editor::open(document).with_animation(AnimationEngine::with_clock(clock, flag.clone()));
        let animation = editor.animation_mut();

        let mut summary = PlaybackSummary {
            duration: animation.duration(),
            ..Default::default()
        };
        if animation.keyframes().is_empty() {
            log::warn!("Play has no animation");
            return summary;
        }

        let interval = self.config.frame_interval();
        animation.play();
        while flag.take() {
            wait(interval);
            let Some(update) = animation.on_frame() else {
                break;
            };
            summary.frames += 1;
            log::debug!(
                "Frame {} at {:.0} ms, {} elements",
                summary.frames,
                update.time,
                update.positions.len()
            );
            for event in update.events {
                log::info!("{:>6.0} ms  {}", update.time, event.kind);
                summary.events.push(event.kind);
            }
            if update.finished {
                break;
            }
        }
        log::info!("Played {} frames over {:.0} ms", summary.frames, summary.duration);
        summary
    }
}
