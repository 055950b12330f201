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

use serde::{Deserialize, Serialize};

use crate::status::{IdleReason, RemotePlayerState};

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StreamKind {
    #[default]
    Buffered,
    Live,
}

/// What a receiver is asked to play. Built fresh for every play attempt.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct MediaDescriptor {
    #[serde(rename = "contentId")]
    pub content_url: String,
    pub title: String,
    pub description: String,
    pub studio: String,
    #[serde(rename = "thumbnailUrl")]
    pub thumbnail_url: Option<String>,
    #[serde(rename = "streamType")]
    pub stream_kind: StreamKind,
    pub duration: Option<f64>,
}

impl MediaDescriptor {
    pub fn new(content_url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            content_url: content_url.into(),
            title: title.into(),
            description: String::new(),
            studio: String::new(),
            thumbnail_url: None,
            stream_kind: StreamKind::Buffered,
            duration: None,
        }
    }

    pub fn with_thumbnail(mut self, thumbnail_url: Option<String>) -> Self {
        self.thumbnail_url = thumbnail_url;
        self
    }

    pub fn with_stream_kind(mut self, stream_kind: StreamKind) -> Self {
        self.stream_kind = stream_kind;
        self
    }

    pub fn with_studio(mut self, studio: impl Into<String>) -> Self {
        self.studio = studio.into();
        self
    }
}

/// A receiver found by discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CastDevice {
    pub id: String,
    pub friendly_name: String,
    pub category: String,
}

/// One media status update from the receiver.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MediaStatus {
    pub player_state: RemotePlayerState,
    pub idle_reason: IdleReason,
    pub stream_position: f64,
    pub media: Option<MediaDescriptor>,
}

/// What the receiver should do once a seek has completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeState {
    Play,
    Pause,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeekRequest {
    pub position: f64,
    pub resume: ResumeState,
}
