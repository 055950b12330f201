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

use std::time::Duration;

/// Readiness of the engine's current item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadyState {
    #[default]
    Unknown,
    ReadyToPlay,
    Failed,
}

/// How far before and after the target a seek may land.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeekTolerance {
    pub before: Duration,
    pub after: Duration,
}

impl SeekTolerance {
    pub const ZERO: Self = Self {
        before: Duration::ZERO,
        after: Duration::ZERO,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekPurpose {
    /// Seek issued by a resume, followed by play on completion.
    Resume,
    /// Seek requested by the user.
    Scrub,
}

/// Echoed back by the engine in [`EngineEvent::SeekCompleted`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeekToken {
    pub generation: u64,
    pub purpose: SeekPurpose,
}

pub type ObserverId = u64;

/// Signals from the local engine. Delivered on the event loop.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    ReadyStateChanged(ReadyState),
    /// `false` when playback is stalling on the buffer.
    LikelyToKeepUp(bool),
    SeekCompleted { token: SeekToken, finished: bool },
    PeriodicTick { observer: ObserverId, elapsed: f64 },
    PlayedToEnd,
}

/// On-device media engine. Rendering and decode sit behind this trait.
pub trait LocalEngine {
    /// Replace the current item with `url`.
    fn load(&mut self, url: &str);

    /// Detach the current item.
    fn unload(&mut self);

    fn has_item(&self) -> bool;

    fn play(&mut self);

    fn pause(&mut self);

    fn rate(&self) -> f64;

    fn set_rate(&mut self, rate: f64);

    /// Start a seek. Completion arrives as [`EngineEvent::SeekCompleted`]
    /// carrying `token`.
    fn seek(&mut self, to: f64, tolerance: SeekTolerance, token: SeekToken);

    fn current_position(&self) -> f64;

    /// `None` until the item's duration is known.
    fn duration(&self) -> Option<f64>;

    fn ready_state(&self) -> ReadyState;

    /// Deliver an [`EngineEvent::PeriodicTick`] every `interval` until removed.
    fn add_periodic_observer(&mut self, interval: Duration) -> ObserverId;

    fn remove_periodic_observer(&mut self, observer: ObserverId);
}
