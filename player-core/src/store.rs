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

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::video::VideoId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WatchedState {
    #[default]
    Unwatched,
    PartiallyWatched,
    Watched,
}

impl WatchedState {
    const EPSILON: f64 = 1e-3;

    /// State implied by stopping at `position` of something `duration` long.
    pub fn at(position: f64, duration: Option<f64>) -> Self {
        match duration {
            Some(duration) if (duration - position).abs() < Self::EPSILON => Self::Watched,
            _ => Self::PartiallyWatched,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlaybackSpeed {
    Slow,
    #[default]
    Default,
    Fast,
    XFast,
}

impl PlaybackSpeed {
    pub fn rate(self) -> f64 {
        match self {
            Self::Slow => 0.5,
            Self::Default => 1.0,
            Self::Fast => 1.5,
            Self::XFast => 2.0,
        }
    }

    pub fn from_rate(rate: f64) -> Option<Self> {
        [Self::Slow, Self::Default, Self::Fast, Self::XFast]
            .into_iter()
            .find(|speed| (speed.rate() - rate).abs() < f64::EPSILON)
    }
}

/// Persisted per-video playback progress and viewer preferences.
pub trait PlaybackStore {
    fn last_played_position(&self, video: &VideoId) -> Option<f64>;

    fn save_last_played_position(&mut self, video: &VideoId, position: f64);

    fn mark_watched_state(&mut self, video: &VideoId, state: WatchedState);

    fn playback_speed(&self) -> PlaybackSpeed;

    fn set_playback_speed(&mut self, speed: PlaybackSpeed);
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct MemoryStore {
    positions: HashMap<VideoId, f64>,
    watched: HashMap<VideoId, WatchedState>,
    speed: PlaybackSpeed,
}

impl MemoryStore {
    pub fn watched_state(&self, video: &VideoId) -> WatchedState {
        self.watched.get(video).copied().unwrap_or_default()
    }
}

impl PlaybackStore for MemoryStore {
    fn last_played_position(&self, video: &VideoId) -> Option<f64> {
        self.positions.get(video).copied()
    }

    fn save_last_played_position(&mut self, video: &VideoId, position: f64) {
        self.positions.insert(video.clone(), position);
    }

    fn mark_watched_state(&mut self, video: &VideoId, state: WatchedState) {
        self.watched.insert(video.clone(), state);
    }

    fn playback_speed(&self) -> PlaybackSpeed {
        self.speed
    }

    fn set_playback_speed(&mut self, speed: PlaybackSpeed) {
        self.speed = speed;
    }
}
