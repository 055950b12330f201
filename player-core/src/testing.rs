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

//! In-memory collaborators for driving a [`Coordinator`] in tests.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use cast_session::{
    CastDevice, CastTransport, MediaDescriptor, MediaStatus, SeekRequest, SessionManager,
};
use tokio::sync::mpsc::UnboundedSender;

use crate::analytics::{AnalyticsEvent, AnalyticsSink};
use crate::config::PlayerConfig;
use crate::coordinator::{Coordinator, Shared};
use crate::engine::{LocalEngine, ObserverId, ReadyState, SeekTolerance, SeekToken};
use crate::state::PlaybackState;
use crate::store::MemoryStore;
use crate::ui::{ControlsVisibility, FailureKind, PlayerUi};
use crate::video::Video;
use crate::Event;

#[derive(Debug, Default)]
pub struct MockEngine {
    pub has_item: bool,
    pub loads: Vec<String>,
    pub playing: bool,
    pub rate: f64,
    pub position: f64,
    pub duration: Option<f64>,
    pub ready: ReadyState,
    /// Readiness a freshly loaded item starts with.
    pub ready_on_load: ReadyState,
    pub seeks: Vec<(f64, SeekToken)>,
    pub observers: Vec<(ObserverId, Duration)>,
    next_observer: ObserverId,
}

impl MockEngine {
    pub fn last_seek(&self) -> Option<(f64, SeekToken)> {
        self.seeks.last().copied()
    }
}

impl LocalEngine for MockEngine {
    fn load(&mut self, url: &str) {
        self.has_item = true;
        self.loads.push(url.to_owned());
        self.position = 0.0;
        self.ready = self.ready_on_load;
    }

    fn unload(&mut self) {
        self.has_item = false;
        self.playing = false;
        self.ready = ReadyState::Unknown;
    }

    fn has_item(&self) -> bool {
        self.has_item
    }

    fn play(&mut self) {
        self.playing = true;
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn rate(&self) -> f64 {
        if self.playing {
            self.rate
        } else {
            0.0
        }
    }

    fn set_rate(&mut self, rate: f64) {
        self.rate = rate;
    }

    fn seek(&mut self, to: f64, _tolerance: SeekTolerance, token: SeekToken) {
        self.position = to;
        self.seeks.push((to, token));
    }

    fn current_position(&self) -> f64 {
        self.position
    }

    fn duration(&self) -> Option<f64> {
        self.duration.filter(|_| self.has_item)
    }

    fn ready_state(&self) -> ReadyState {
        self.ready
    }

    fn add_periodic_observer(&mut self, interval: Duration) -> ObserverId {
        self.next_observer += 1;
        self.observers.push((self.next_observer, interval));
        self.next_observer
    }

    fn remove_periodic_observer(&mut self, observer: ObserverId) {
        self.observers.retain(|(id, _)| *id != observer);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RemoteCall {
    Start(String),
    End,
    Load(String, f64),
    Play,
    Pause,
    Seek(SeekRequest),
}

#[derive(Debug, Default)]
pub struct Wire {
    pub connected: bool,
    pub calls: Vec<RemoteCall>,
    pub position: Option<f64>,
    pub fail_commands: bool,
}

impl Wire {
    pub fn loads(&self) -> Vec<(String, f64)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                RemoteCall::Load(url, start) => Some((url.clone(), *start)),
                _ => None,
            })
            .collect()
    }
}

pub struct MockTransport(pub Shared<Wire>);

impl MockTransport {
    fn command(&self, call: RemoteCall) -> Result<(), String> {
        let mut wire = self.0.borrow_mut();
        wire.calls.push(call);
        if wire.fail_commands {
            return Err("receiver rejected the command".to_owned());
        }
        Ok(())
    }
}

impl CastTransport for MockTransport {
    fn devices(&self) -> Vec<CastDevice> {
        vec![Harness::device()]
    }

    fn has_connected_session(&self) -> bool {
        self.0.borrow().connected
    }

    fn connected_device(&self) -> Option<CastDevice> {
        self.has_connected_session().then(Harness::device)
    }

    fn start_session(&mut self, device: &CastDevice) {
        self.0
            .borrow_mut()
            .calls
            .push(RemoteCall::Start(device.id.clone()));
    }

    fn end_session(&mut self) {
        let mut wire = self.0.borrow_mut();
        wire.calls.push(RemoteCall::End);
        wire.connected = false;
    }

    fn add_media_listener(&mut self) {}

    fn remove_media_listener(&mut self) {}

    fn load_media(&mut self, media: &MediaDescriptor, start: f64) -> Result<(), String> {
        self.command(RemoteCall::Load(media.content_url.clone(), start))
    }

    fn play(&mut self) -> Result<(), String> {
        self.command(RemoteCall::Play)
    }

    fn pause(&mut self) -> Result<(), String> {
        self.command(RemoteCall::Pause)
    }

    fn seek(&mut self, request: SeekRequest) -> Result<(), String> {
        self.command(RemoteCall::Seek(request))
    }

    fn approximate_stream_position(&self) -> Option<f64> {
        self.0.borrow().position
    }

    fn media_status(&self) -> Option<MediaStatus> {
        None
    }
}

#[derive(Debug, Default)]
pub struct UiLog {
    pub states: Vec<PlaybackState>,
    pub positions: Vec<(f64, f64)>,
    pub failures: Vec<FailureKind>,
    pub transcripts_visible: Option<bool>,
    pub casting_overlay: Option<bool>,
    pub controls: Option<ControlsVisibility>,
    pub loading: bool,
    pub controls_enabled: bool,
    pub auto_hides: usize,
    pub finished: usize,
}

pub struct RecordingUi(pub Shared<UiLog>);

impl PlayerUi for RecordingUi {
    fn on_state_changed(&mut self, state: PlaybackState) {
        self.0.borrow_mut().states.push(state);
    }

    fn on_position_updated(&mut self, elapsed: f64, duration: f64) {
        self.0.borrow_mut().positions.push((elapsed, duration));
    }

    fn on_failure(&mut self, kind: FailureKind, _message: &str) {
        self.0.borrow_mut().failures.push(kind);
    }

    fn on_transcript_visibility_changed(&mut self, visible: bool) {
        self.0.borrow_mut().transcripts_visible = Some(visible);
    }

    fn on_casting_overlay_changed(&mut self, visible: bool) {
        self.0.borrow_mut().casting_overlay = Some(visible);
    }

    fn on_controls_visibility_changed(&mut self, visibility: ControlsVisibility) {
        self.0.borrow_mut().controls = Some(visibility);
    }

    fn on_loading_changed(&mut self, loading: bool) {
        self.0.borrow_mut().loading = loading;
    }

    fn on_controls_enabled(&mut self, enabled: bool) {
        self.0.borrow_mut().controls_enabled = enabled;
    }

    fn on_controls_auto_hide(&mut self) {
        self.0.borrow_mut().auto_hides += 1;
    }

    fn on_playback_finished(&mut self) {
        self.0.borrow_mut().finished += 1;
    }
}

pub struct RecordingAnalytics(pub Shared<Vec<AnalyticsEvent>>);

impl AnalyticsSink for RecordingAnalytics {
    fn track(&mut self, event: AnalyticsEvent) {
        self.0.borrow_mut().push(event);
    }
}

/// Shared handles to every collaborator of one coordinator.
pub struct Harness {
    pub config: PlayerConfig,
    pub engine: Shared<MockEngine>,
    pub wire: Shared<Wire>,
    pub session: Shared<SessionManager>,
    pub store: Shared<MemoryStore>,
    pub ui: Shared<UiLog>,
    pub analytics: Shared<Vec<AnalyticsEvent>>,
}

impl Harness {
    pub fn new() -> Self {
        let engine = MockEngine {
            rate: 1.0,
            duration: Some(600.0),
            ..Default::default()
        };
        let wire = Rc::new(RefCell::new(Wire::default()));
        let session = SessionManager::new(Box::new(MockTransport(wire.clone())));

        Self {
            config: PlayerConfig::default(),
            engine: Rc::new(RefCell::new(engine)),
            wire,
            session: Rc::new(RefCell::new(session)),
            store: Rc::new(RefCell::new(MemoryStore::default())),
            ui: Rc::default(),
            analytics: Rc::default(),
        }
    }

    pub fn video() -> Video {
        Video::new("lesson-1", "Lesson 1", "https://cdn.example.com/lesson-1.mp4")
    }

    pub fn device() -> CastDevice {
        CastDevice {
            id: "tv".to_owned(),
            friendly_name: "Living room".to_owned(),
            category: "tv".to_owned(),
        }
    }

    pub fn coordinator(&self, event_tx: UnboundedSender<Event>) -> Coordinator {
        let coordinator = Coordinator::new(
            self.config.clone(),
            self.session.clone(),
            self.engine.clone(),
            self.store.clone(),
            Box::new(RecordingAnalytics(self.analytics.clone())),
            Box::new(RecordingUi(self.ui.clone())),
        );
        coordinator.listen_for_session(event_tx);
        coordinator
    }

    pub fn state(&self) -> Option<PlaybackState> {
        self.ui.borrow().states.last().copied()
    }
}
