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

use log::info;

use crate::store::PlaybackSpeed;
use crate::video::VideoId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekKind {
    /// Fixed skip backwards.
    Skip,
    /// Slider drag.
    Slide,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnalyticsEvent {
    Play {
        video: VideoId,
        time: f64,
    },
    Pause {
        video: VideoId,
        time: f64,
    },
    Seek {
        video: VideoId,
        kind: SeekKind,
        old_time: f64,
        new_time: f64,
        requested: f64,
    },
    SpeedChange {
        video: VideoId,
        time: f64,
        old: f64,
        new: PlaybackSpeed,
    },
}

/// Fire-and-forget analytics. Never influences playback.
pub trait AnalyticsSink {
    fn track(&mut self, event: AnalyticsEvent);
}

/// Writes every event to the log.
#[derive(Debug, Default)]
pub struct LogAnalytics;

impl AnalyticsSink for LogAnalytics {
    fn track(&mut self, event: AnalyticsEvent) {
        info!(target: "analytics", "{event:?}");
    }
}
