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

//! Remote (cast) session lifecycle for the playback coordinator.
//!
//! [`SessionManager`] drives a [`CastTransport`] and reports every session or
//! receiver media change as a normalized [`SessionStatus`] to a single
//! listener.

pub mod error;
pub mod manager;
pub mod media;
pub mod status;
pub mod transport;

pub use error::SessionError;
pub use manager::{SessionManager, StatusListener};
pub use media::{CastDevice, MediaDescriptor, MediaStatus, ResumeState, SeekRequest, StreamKind};
pub use status::{normalize_media_state, IdleReason, RemotePlayerState, SessionStatus};
pub use transport::{CastTransport, TransportEvent};
