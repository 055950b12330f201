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

use serde::Serialize;

/// Which endpoint drives playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PlaybackEndpoint {
    Local,
    Remote,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
    /// Waiting for the local engine to become ready before resuming.
    Resuming,
    PlayingRemote,
    PausedRemote,
    /// A remote playback finished. Local resources are torn down and the next
    /// play starts a new remote attempt.
    ReadyForRemotePlay,
}

impl PlaybackState {
    pub fn endpoint(self) -> PlaybackEndpoint {
        match self {
            Self::PlayingRemote | Self::PausedRemote => PlaybackEndpoint::Remote,
            _ => PlaybackEndpoint::Local,
        }
    }

    pub fn is_playing(self) -> bool {
        matches!(self, Self::Playing | Self::PlayingRemote)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PlaybackPosition {
    pub elapsed: f64,
    pub duration: Option<f64>,
}

/// What a control surface renders.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlayerSnapshot {
    pub state: PlaybackState,
    pub endpoint: PlaybackEndpoint,
    pub is_playing: bool,
    pub position: PlaybackPosition,
}
