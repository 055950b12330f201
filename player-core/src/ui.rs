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

use crate::state::PlaybackState;

/// Out-of-band failures shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The local engine did not become ready in time.
    Timeout,
    /// A completed download is missing from disk.
    ContentUnavailable,
    /// The remote session failed to start or dropped.
    RemoteSession,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlsVisibility {
    All,
    /// Everything but play/pause is hidden.
    PlayPauseOnly,
    Hidden,
}

/// Callbacks into the presentation layer. Invoked on the event loop.
pub trait PlayerUi {
    fn on_state_changed(&mut self, state: PlaybackState);

    fn on_position_updated(&mut self, elapsed: f64, duration: f64);

    fn on_failure(&mut self, kind: FailureKind, message: &str);

    fn on_transcript_visibility_changed(&mut self, visible: bool);

    fn on_casting_overlay_changed(&mut self, _visible: bool) {}

    fn on_controls_visibility_changed(&mut self, _visibility: ControlsVisibility) {}

    fn on_loading_changed(&mut self, _loading: bool) {}

    /// Whether the controls accept taps; disabled until the item is ready.
    fn on_controls_enabled(&mut self, _enabled: bool) {}

    fn on_controls_auto_hide(&mut self) {}

    fn on_playback_finished(&mut self) {}
}
