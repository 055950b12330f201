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

use cast_session::CastDevice;
use log::error;
use tokio::sync::mpsc::UnboundedSender;

use crate::store::PlaybackSpeed;
use crate::video::Video;
use crate::Event;

/// User intents accepted by the coordinator.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Play(Video),
    PlayPause,
    Pause,
    Resume,
    ResumeAt(f64),
    Seek(f64),
    SkipBackward,
    ScrubBegan,
    /// Slider released at a fraction of the duration.
    ScrubEnded(f64),
    SetSpeed(PlaybackSpeed),
    Stop,
    Connect(CastDevice),
    Disconnect,
    AppWillResignActive,
}

/// Handle given to control surfaces. Every call becomes an event on the loop.
#[derive(Debug, Clone)]
pub struct ControlSurface {
    event_tx: UnboundedSender<Event>,
}

impl ControlSurface {
    pub fn new(event_tx: UnboundedSender<Event>) -> Self {
        Self { event_tx }
    }

    fn send(&self, event: Event) -> bool {
        match self.event_tx.send(event) {
            Ok(()) => true,
            Err(err) => {
                error!("Event loop is gone, dropping {:?}", err.0);
                false
            }
        }
    }

    /// Returns `false` once the event loop has exited.
    pub fn command(&self, command: Command) -> bool {
        self.send(Event::Command(command))
    }

    pub fn play(&self, video: Video) -> bool {
        self.command(Command::Play(video))
    }

    pub fn play_pause(&self) -> bool {
        self.command(Command::PlayPause)
    }

    pub fn skip_backward(&self) -> bool {
        self.command(Command::SkipBackward)
    }

    pub fn quit(&self) -> bool {
        self.send(Event::Quit)
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;

    use super::*;

    #[test]
    fn commands_arrive_in_order() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let surface = ControlSurface::new(tx);
        assert!(surface.play_pause());
        assert!(surface.command(Command::Seek(12.0)));
        assert!(surface.quit());

        assert!(matches!(
            rx.try_recv(),
            Ok(Event::Command(Command::PlayPause))
        ));
        assert!(matches!(
            rx.try_recv(),
            Ok(Event::Command(Command::Seek(t))) if t == 12.0
        ));
        assert!(matches!(rx.try_recv(), Ok(Event::Quit)));
    }

    #[test]
    fn closed_loop_is_reported() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        assert!(!ControlSurface::new(tx).skip_backward());
    }
}
