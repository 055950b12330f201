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

use crate::media::{CastDevice, MediaDescriptor, MediaStatus, SeekRequest};

/// Session and media events produced by the cast transport, in the order the
/// transport produced them.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    SessionStarting,
    SessionStarted,
    SessionResuming,
    SessionResumed,
    SessionSuspended { reason: String },
    SessionEnded { error: Option<String> },
    SessionStartFailed { error: String },
    MediaStatusUpdated(MediaStatus),
}

/// The vendor cast stack. Discovery and the wire protocol live behind this
/// trait; [`crate::SessionManager`] only drives it.
pub trait CastTransport {
    fn devices(&self) -> Vec<CastDevice>;

    fn has_connected_session(&self) -> bool;

    /// Device of the current session, if any.
    fn connected_device(&self) -> Option<CastDevice>;

    /// Ask for a session with `device`. The outcome arrives later as a
    /// [`TransportEvent`].
    fn start_session(&mut self, device: &CastDevice);

    fn end_session(&mut self);

    fn add_media_listener(&mut self);

    fn remove_media_listener(&mut self);

    fn load_media(&mut self, media: &MediaDescriptor, start: f64) -> Result<(), String>;

    fn play(&mut self) -> Result<(), String>;

    fn pause(&mut self) -> Result<(), String>;

    fn seek(&mut self, request: SeekRequest) -> Result<(), String>;

    fn approximate_stream_position(&self) -> Option<f64>;

    fn media_status(&self) -> Option<MediaStatus>;
}
