// Copyright (C) 2025 Marcus L. Hanestad <marlhan@proton.me>
//
// This file is part of CastPlay.
//
// CastPlay is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// CastPlay is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with CastPlay.  If not, see <https://www.gnu.org/licenses/>.

use std::cell::RefCell;
use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

use anyhow::{Context, Result};
use cast_session::{CastDevice, SessionManager};
use clap::Parser;
use console::{parse_line, ConsoleUi, Input, HELP};
use log::{debug, error};
use player_core::analytics::LogAnalytics;
use player_core::store::MemoryStore;
use player_core::{Command, ControlSurface, Coordinator, PlayerConfig, Video};
use sim::{SimEngine, SimTransport};
use tokio::sync::mpsc;

mod console;
mod sim;

#[derive(Parser)]
#[command(version, about = "Play a course video locally or on a simulated receiver")]
struct CliArgs {
    /// Player configuration (JSON).
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(long, default_value = "https://cdn.example.com/courses/intro.mp4")]
    url: String,
    #[arg(long, default_value = "Introduction")]
    title: String,
    /// Downloaded copy of the video, without the `.mp4` extension.
    #[arg(long)]
    local_path: Option<PathBuf>,
    /// Playback progress is loaded from and saved to this file.
    #[arg(long)]
    store: Option<PathBuf>,
    /// Overrides `readiness_timeout_secs` from the config.
    #[arg(long)]
    readiness_timeout: Option<f64>,
    /// How long the simulated engine takes to become ready.
    #[arg(long, default_value_t = 500)]
    load_delay_ms: u64,
    /// Length of the simulated video in seconds.
    #[arg(long, default_value_t = 300.0)]
    duration: f64,
}

fn load_store(path: Option<&Path>) -> Result<MemoryStore> {
    let Some(path) = path.filter(|path| path.exists()) else {
        return Ok(MemoryStore::default());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read store {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid store {}", path.display()))
}

fn save_store(path: &Path, store: &MemoryStore) -> Result<()> {
    let raw = serde_json::to_string_pretty(store)?;
    std::fs::write(path, raw).with_context(|| format!("failed to write store {}", path.display()))
}

fn video(args: &CliArgs) -> Video {
    let mut video = Video::new("cli", args.title.clone(), args.url.clone());
    if let Some(local_path) = &args.local_path {
        video.local_path = Some(local_path.clone());
        video.download_state = player_core::video::DownloadState::Complete;
    }
    video
}

/// Read the prompt on its own thread and forward every line to the loop.
fn spawn_console(surface: ControlSurface, video: Video, device: CastDevice) {
    std::thread::spawn(move || {
        println!("{HELP}");
        for line in std::io::stdin().lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    error!("Failed to read stdin: {err}");
                    break;
                }
            };

            let delivered = match parse_line(&line) {
                Ok(Input::PlayVideo) => surface.play(video.clone()),
                Ok(Input::Cast) => surface.command(Command::Connect(device.clone())),
                Ok(Input::Command(command)) => surface.command(command),
                Ok(Input::Help) => {
                    println!("{HELP}");
                    true
                }
                Ok(Input::Quit) => break,
                Ok(Input::Empty) => true,
                Err(err) => {
                    eprintln!("{err}");
                    true
                }
            };
            if !delivered {
                return;
            }
        }
        surface.quit();
    });
}

async fn run(args: CliArgs, config: PlayerConfig, store: MemoryStore) -> Result<MemoryStore> {
    let (event_tx, event_rx) = mpsc::unbounded_channel();

    let engine = Rc::new(RefCell::new(SimEngine::new(
        event_tx.clone(),
        Duration::from_millis(args.load_delay_ms),
        args.duration,
    )));
    let session = Rc::new(RefCell::new(SessionManager::new(Box::new(
        SimTransport::new(event_tx.clone(), args.duration),
    ))));
    let store = Rc::new(RefCell::new(store));

    let coordinator = Coordinator::new(
        config,
        session.clone(),
        engine,
        store.clone(),
        Box::new(LogAnalytics),
        Box::new(ConsoleUi::default()),
    );
    coordinator.listen_for_session(event_tx.clone());

    let device = session
        .borrow()
        .available_devices()
        .into_iter()
        .next()
        .unwrap_or_else(SimTransport::device);
    debug!("Casting to {}", device.friendly_name);
    spawn_console(ControlSurface::new(event_tx), video(&args), device);
    coordinator.run_event_loop(event_rx).await?;

    session.borrow_mut().disconnect();
    let store = store.borrow().clone();
    Ok(store)
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_module("player_cli", player_core::default_log_level())
        .filter_module("player_core", player_core::default_log_level())
        .filter_module("cast_session", player_core::default_log_level())
        .filter_module("analytics", log::LevelFilter::Info)
        .init();

    let args = CliArgs::parse();
    let mut config = match &args.config {
        Some(path) => PlayerConfig::load(path)?,
        None => PlayerConfig::default(),
    };
    if let Some(timeout) = args.readiness_timeout {
        anyhow::ensure!(
            timeout.is_finite() && timeout > 0.0,
            "readiness timeout must be positive"
        );
        config.readiness_timeout_secs = timeout;
    }
    debug!("Config: {config:?}");

    let store_path = args.store.clone();
    let store = load_store(store_path.as_deref())?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let store = runtime.block_on(run(args, config, store))?;

    if let Some(path) = store_path {
        save_store(&path, &store)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_survives_a_round_trip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        assert!(load_store(Some(&path)).is_ok());

        let mut store = MemoryStore::default();
        player_core::store::PlaybackStore::save_last_played_position(
            &mut store,
            &"cli".into(),
            12.0,
        );
        save_store(&path, &store).unwrap();

        let loaded = load_store(Some(&path)).unwrap();
        assert_eq!(
            player_core::store::PlaybackStore::last_played_position(&loaded, &"cli".into()),
            Some(12.0)
        );
    }

    #[test]
    fn local_path_marks_download_complete() {
        let args = CliArgs::parse_from(["player-cli", "--local-path", "/tmp/intro"]);
        let video = video(&args);
        assert_eq!(
            video.download_state,
            player_core::video::DownloadState::Complete
        );
    }
}
