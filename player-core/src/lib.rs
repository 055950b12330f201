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

//! Playback coordination between an on-device engine and a cast receiver.
//!
//! Everything runs on one cooperative event loop. Commands, transport
//! callbacks, engine signals and session status changes are all funneled
//! through an [`Event`] channel into [`Coordinator::handle_event`].

use cast_session::{SessionStatus, TransportEvent};

pub mod analytics;
pub mod config;
pub mod coordinator;
pub mod engine;
pub mod error;
mod event_loop;
pub mod router;
pub mod state;
pub mod store;
pub mod ui;
pub mod video;

#[cfg(test)]
mod testing;

pub use config::PlayerConfig;
pub use coordinator::{Coordinator, Shared};
pub use engine::{EngineEvent, LocalEngine};
pub use error::PlayerError;
pub use router::{Command, ControlSurface};
pub use state::{PlaybackEndpoint, PlaybackState, PlayerSnapshot};
pub use video::{Video, VideoId};

#[macro_export]
macro_rules! log_if_err {
    ($res:expr) => {
        if let Err(err) = $res {
            log::error!("{err}");
        }
    };
}

#[derive(Debug)]
pub enum Event {
    Command(Command),
    Transport(TransportEvent),
    SessionStatus(SessionStatus),
    Engine(EngineEvent),
    /// The local item armed under `generation` did not become ready in time.
    ReadinessTimeout { generation: u64 },
    Quit,
}

pub fn default_log_level() -> log::LevelFilter {
    if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    }
}
