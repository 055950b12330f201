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

use log::{debug, trace, warn};

use crate::error::{Result, SessionError};
use crate::media::{CastDevice, MediaDescriptor, ResumeState, SeekRequest, StreamKind};
use crate::status::{normalize_media_state, RemotePlayerState, SessionStatus};
use crate::transport::{CastTransport, TransportEvent};

pub type StatusListener = Box<dyn FnMut(SessionStatus)>;

/// Owns the remote session lifecycle and turns transport events into a
/// [`SessionStatus`] stream.
pub struct SessionManager {
    transport: Box<dyn CastTransport>,
    status: SessionStatus,
    listener: Option<StatusListener>,
    media_listener_attached: bool,
    current_media: Option<MediaDescriptor>,
    /// Last position read from the receiver. Kept after the session ends.
    last_position: Option<f64>,
}

impl SessionManager {
    pub fn new(transport: Box<dyn CastTransport>) -> Self {
        Self {
            transport,
            status: SessionStatus::Initial,
            listener: None,
            media_listener_attached: false,
            current_media: None,
            last_position: None,
        }
    }

    pub fn status(&self) -> &SessionStatus {
        &self.status
    }

    pub fn is_connected(&self) -> bool {
        self.transport.has_connected_session()
    }

    pub fn available_devices(&self) -> Vec<CastDevice> {
        self.transport.devices()
    }

    /// Media the receiver last reported as loaded.
    pub fn current_media(&self) -> Option<&MediaDescriptor> {
        self.current_media.as_ref()
    }

    /// Register the status listener. Replaces any previous one.
    pub fn subscribe_to_status(&mut self, listener: StatusListener) {
        if self.listener.is_some() {
            debug!("Replacing session status listener");
        }
        self.listener = Some(listener);
    }

    pub fn clear_status_listener(&mut self) {
        self.listener = None;
    }

    fn set_status(&mut self, status: SessionStatus) {
        debug!("Session status: {:?} -> {status:?}", self.status);
        self.status = status.clone();
        if let Some(listener) = self.listener.as_mut() {
            listener(status);
        }
    }

    pub fn connect(&mut self, device: &CastDevice) {
        if self.transport.devices().is_empty() && self.is_connected() {
            debug!("Already connected and no devices to switch to");
            return;
        }

        debug!("Starting session with {}", device.friendly_name);
        self.transport.start_session(device);
    }

    pub fn disconnect(&mut self) {
        if !self.is_connected() {
            return;
        }

        self.remember_position();
        self.detach_media_listener();
        self.transport.end_session();
    }

    fn attach_media_listener(&mut self) {
        if !self.media_listener_attached {
            self.transport.add_media_listener();
            self.media_listener_attached = true;
        }
    }

    fn detach_media_listener(&mut self) {
        if self.media_listener_attached {
            self.transport.remove_media_listener();
            self.media_listener_attached = false;
        }
    }

    /// Build the descriptor for `content_url`, crediting the connected device.
    pub fn describe_media(
        &self,
        content_url: impl Into<String>,
        title: impl Into<String>,
        thumbnail_url: Option<String>,
        stream_kind: StreamKind,
    ) -> MediaDescriptor {
        let media = MediaDescriptor::new(content_url, title)
            .with_thumbnail(thumbnail_url)
            .with_stream_kind(stream_kind);
        match self.transport.connected_device() {
            Some(device) => media.with_studio(device.friendly_name),
            None => media,
        }
    }

    pub fn load_media(&mut self, media: &MediaDescriptor, start: f64) -> Result<()> {
        if !self.is_connected() {
            return Err(SessionError::NotConnected);
        }

        debug!("Loading {} at {start:.2}s on receiver", media.content_url);
        self.transport
            .load_media(media, start)
            .map_err(SessionError::Transport)?;
        self.set_status(SessionStatus::Connected);

        Ok(())
    }

    /// Continue playback, seeking first when `position` is given.
    pub fn play(&mut self, position: Option<f64>) -> Result<()> {
        self.command(position, ResumeState::Play)
    }

    /// Pause playback, seeking first when `position` is given.
    pub fn pause(&mut self, position: Option<f64>) -> Result<()> {
        self.command(position, ResumeState::Pause)
    }

    fn command(&mut self, position: Option<f64>, resume: ResumeState) -> Result<()> {
        if !self.is_connected() {
            return Err(SessionError::NotConnected);
        }

        let res = match (position, resume) {
            (Some(position), resume) => self.transport.seek(SeekRequest { position, resume }),
            (None, ResumeState::Play) => self.transport.play(),
            (None, ResumeState::Pause) => self.transport.pause(),
        };

        res.map_err(SessionError::Transport)
    }

    pub fn current_position(&self) -> Option<f64> {
        if !self.is_connected() {
            return None;
        }
        self.transport.approximate_stream_position()
    }

    /// The live position while connected, otherwise the last one the
    /// receiver reported.
    pub fn last_known_position(&self) -> Option<f64> {
        self.current_position().or(self.last_position)
    }

    fn remember_position(&mut self) {
        if let Some(position) = self.current_position() {
            self.last_position = Some(position);
        }
    }

    pub fn current_player_state(&self) -> RemotePlayerState {
        if !self.is_connected() {
            return RemotePlayerState::Unknown;
        }
        self.transport
            .media_status()
            .map(|status| status.player_state)
            .unwrap_or_default()
    }

    pub fn handle_transport_event(&mut self, event: TransportEvent) {
        match event {
            TransportEvent::SessionStarting => self.set_status(SessionStatus::Starting),
            TransportEvent::SessionStarted => {
                self.last_position = None;
                self.set_status(SessionStatus::Started);
                self.attach_media_listener();
            }
            TransportEvent::SessionResuming => self.set_status(SessionStatus::Resuming),
            TransportEvent::SessionResumed => {
                self.set_status(SessionStatus::Resumed);
                self.attach_media_listener();
            }
            TransportEvent::SessionSuspended { reason } => {
                debug!("Session suspended: {reason}");
                self.set_status(SessionStatus::Suspended);
            }
            TransportEvent::SessionEnded { error } => {
                if let Some(error) = error {
                    warn!("Session ended with error: {error}");
                }
                self.media_listener_attached = false;
                self.set_status(SessionStatus::Ended);
            }
            TransportEvent::SessionStartFailed { error } => {
                self.media_listener_attached = false;
                self.set_status(SessionStatus::Failed(error));
            }
            TransportEvent::MediaStatusUpdated(media_status) => {
                if !self.media_listener_attached {
                    trace!("Dropping media status, no listener attached");
                    return;
                }

                self.current_media = media_status.media.clone();
                self.last_position = self
                    .current_position()
                    .or(Some(media_status.stream_position));
                match normalize_media_state(media_status.player_state, media_status.idle_reason) {
                    Some(status) => self.set_status(status),
                    None => trace!("Receiver reported unknown player state"),
                }
            }
        }
    }
}
