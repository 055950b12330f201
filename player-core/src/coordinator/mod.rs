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

//! The dual-endpoint playback state machine.
//!
//! [`Coordinator`] is the single owner of [`PlaybackState`] and of the active
//! [`PlaybackEndpoint`]. It routes commands to the local engine or the cast
//! session and reacts to [`SessionStatus`] changes by handing playback over
//! between them.

use std::cell::RefCell;
use std::rc::Rc;

use cast_session::{SessionManager, SessionStatus, StreamKind};
use log::{debug, error, trace, warn};
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::Instant;
use url::Url;

use crate::analytics::{AnalyticsEvent, AnalyticsSink, SeekKind};
use crate::config::PlayerConfig;
use crate::engine::{EngineEvent, LocalEngine, ObserverId, ReadyState, SeekPurpose, SeekTolerance, SeekToken};
use crate::error::{PlayerError, Result};
use crate::router::Command;
use crate::state::{PlaybackEndpoint, PlaybackPosition, PlaybackState, PlayerSnapshot};
use crate::store::{PlaybackSpeed, PlaybackStore, WatchedState};
use crate::ui::{ControlsVisibility, FailureKind, PlayerUi};
use crate::video::Video;
use crate::Event;


pub type Shared<T> = Rc<RefCell<T>>;

/// Periodic readiness check armed by a deferred resume.
#[derive(Debug, Clone, Copy)]
struct ResumePoll {
    observer: ObserverId,
    at: f64,
}

pub struct Coordinator {
    config: PlayerConfig,
    base_url: Option<Url>,
    session: Shared<SessionManager>,
    engine: Shared<dyn LocalEngine>,
    store: Shared<dyn PlaybackStore>,
    analytics: Box<dyn AnalyticsSink>,
    ui: Box<dyn PlayerUi>,
    state: PlaybackState,
    endpoint: PlaybackEndpoint,
    video: Option<Video>,
    last_elapsed: f64,
    time_before_scrub: f64,
    last_remote_position: Option<f64>,
    /// Bumped whenever the local item is discarded. Completions and timers
    /// issued under an older generation are stale.
    generation: u64,
    readiness_deadline: Option<Instant>,
    progress_observer: Option<ObserverId>,
    resume_poll: Option<ResumePoll>,
    torn_down: bool,
}

impl Coordinator {
    pub fn new(
        config: PlayerConfig,
        session: Shared<SessionManager>,
        engine: Shared<dyn LocalEngine>,
        store: Shared<dyn PlaybackStore>,
        analytics: Box<dyn AnalyticsSink>,
        ui: Box<dyn PlayerUi>,
    ) -> Self {
        Self {
            base_url: config.base_url(),
            config,
            session,
            engine,
            store,
            analytics,
            ui,
            state: PlaybackState::Stopped,
            endpoint: PlaybackEndpoint::Local,
            video: None,
            last_elapsed: 0.0,
            time_before_scrub: 0.0,
            last_remote_position: None,
            generation: 0,
            readiness_deadline: None,
            progress_observer: None,
            resume_poll: None,
            torn_down: false,
        }
    }

    /// Route session status changes onto the event loop behind `event_tx`.
    pub fn listen_for_session(&self, event_tx: UnboundedSender<Event>) {
        self.session
            .borrow_mut()
            .subscribe_to_status(Box::new(move |status| {
                if let Err(err) = event_tx.send(Event::SessionStatus(status)) {
                    error!("Failed to forward session status: {err}");
                }
            }));
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn endpoint(&self) -> PlaybackEndpoint {
        self.endpoint
    }

    /// Deadline for the local item to become ready, with the generation it
    /// was armed under.
    pub fn readiness_deadline(&self) -> Option<(u64, Instant)> {
        self.readiness_deadline.map(|at| (self.generation, at))
    }

    pub fn snapshot(&self) -> PlayerSnapshot {
        let position = match self.endpoint {
            PlaybackEndpoint::Local => {
                let engine = self.engine.borrow();
                PlaybackPosition {
                    elapsed: if engine.has_item() {
                        engine.current_position()
                    } else {
                        self.last_elapsed
                    },
                    duration: engine.duration(),
                }
            }
            PlaybackEndpoint::Remote => {
                let session = self.session.borrow();
                PlaybackPosition {
                    elapsed: session
                        .current_position()
                        .or(self.last_remote_position)
                        .unwrap_or_default(),
                    duration: session.current_media().and_then(|media| media.duration),
                }
            }
        };

        PlayerSnapshot {
            state: self.state,
            endpoint: self.endpoint,
            is_playing: self.state.is_playing(),
            position,
        }
    }

    fn set_state(&mut self, state: PlaybackState) {
        if self.state == state {
            return;
        }
        debug!("Playback state: {:?} -> {state:?}", self.state);
        self.state = state;
        self.endpoint = state.endpoint();
        self.ui.on_state_changed(state);
    }

    fn current_time(&self) -> f64 {
        self.snapshot().position.elapsed
    }

    fn track(&mut self, event: impl FnOnce(crate::video::VideoId, f64) -> AnalyticsEvent) {
        if let Some(video) = &self.video {
            let time = self.current_time();
            self.analytics.track(event(video.id.clone(), time));
        }
    }

    /// Returns `true` if the event loop should exit.
    pub fn handle_event(&mut self, event: Event) -> anyhow::Result<bool> {
        match event {
            Event::Command(command) => self.handle_command(command)?,
            Event::Transport(event) => self.session.borrow_mut().handle_transport_event(event),
            Event::SessionStatus(status) => self.handle_session_status(status),
            Event::Engine(event) => self.handle_engine_event(event),
            Event::ReadinessTimeout { generation } => self.readiness_timed_out(generation),
            Event::Quit => return Ok(true),
        }

        Ok(false)
    }

    pub fn handle_command(&mut self, command: Command) -> Result<()> {
        trace!("Command: {command:?}");
        match command {
            Command::Play(video) => self.play(video),
            Command::PlayPause => self.play_pause(),
            Command::Pause => self.pause(),
            Command::Resume => self.resume(),
            Command::ResumeAt(at) => self.resume_at(at),
            Command::Seek(to) => self.seek(to),
            Command::SkipBackward => self.skip_backward(),
            Command::ScrubBegan => {
                self.scrub_began();
                Ok(())
            }
            Command::ScrubEnded(fraction) => self.scrub_ended(fraction),
            Command::SetSpeed(speed) => self.set_speed(speed),
            Command::Stop => {
                self.stop();
                Ok(())
            }
            Command::Connect(device) => {
                self.session.borrow_mut().connect(&device);
                Ok(())
            }
            Command::Disconnect => {
                if self.endpoint == PlaybackEndpoint::Remote {
                    self.remember_remote_position();
                }
                self.session.borrow_mut().disconnect();
                Ok(())
            }
            Command::AppWillResignActive => {
                if matches!(self.state, PlaybackState::Playing | PlaybackState::Resuming) {
                    self.pause()?;
                }
                Ok(())
            }
        }
    }

    /// Play `video` on whichever endpoint is available.
    pub fn play(&mut self, video: Video) -> Result<()> {
        if self.session.borrow().is_connected() {
            return self.play_remotely(video, None);
        }

        self.ui.on_controls_visibility_changed(ControlsVisibility::All);
        self.ui.on_transcript_visibility_changed(true);
        let start = self.resolved_start(&video);
        self.play_locally(video, start)
    }

    fn resolved_start(&self, video: &Video) -> f64 {
        self.store
            .borrow()
            .last_played_position(&video.id)
            .unwrap_or_default()
    }

    fn play_locally(&mut self, video: Video, at: f64) -> Result<()> {
        let url = match video.local_content_url() {
            Ok(url) => url,
            Err(err) => {
                if let PlayerError::ContentUnavailable(_) = err {
                    self.ui
                        .on_failure(FailureKind::ContentUnavailable, &err.to_string());
                }
                self.ui.on_loading_changed(false);
                self.video = Some(video);
                return Err(err);
            }
        };

        debug!("Playing {} locally from {at:.2}s", video.id);
        self.release_local();
        self.video = Some(video);

        {
            let mut engine = self.engine.borrow_mut();
            engine.load(&url);
            if self.progress_observer.is_none() {
                self.progress_observer =
                    Some(engine.add_periodic_observer(self.config.progress_interval()));
            }
            engine.play();
        }

        self.ui.on_loading_changed(true);
        self.ui.on_casting_overlay_changed(false);
        self.ui.on_controls_enabled(false);

        self.last_elapsed = at;
        self.arm_resume_poll(at);
        self.readiness_deadline = Some(Instant::now() + self.config.readiness_timeout());
        self.set_state(PlaybackState::Playing);

        Ok(())
    }

    fn play_remotely(&mut self, video: Video, start: Option<f64>) -> Result<()> {
        let content_url = video.content_url()?;
        let start = start.unwrap_or_else(|| self.resolved_start(&video));
        let media = self.session.borrow().describe_media(
            content_url,
            video.title.clone(),
            video.thumbnail(self.base_url.as_ref()),
            StreamKind::Buffered,
        );

        self.session.borrow_mut().load_media(&media, start)?;

        debug!("Casting {} from {start:.2}s", video.id);
        self.release_local();
        self.video = Some(video);
        self.last_remote_position = Some(start);
        self.ui.on_loading_changed(false);
        self.set_state(PlaybackState::PlayingRemote);

        Ok(())
    }

    fn continue_remote(&mut self) -> Result<()> {
        let res = self.session.borrow_mut().play(None);
        match res {
            Ok(()) => {
                self.set_state(PlaybackState::PlayingRemote);
                Ok(())
            }
            Err(err) => {
                warn!("Failed to continue remote playback: {err}");
                self.set_state(PlaybackState::Paused);
                Err(err.into())
            }
        }
    }

    /// Toggle between playing and paused, the way the play/pause button does.
    pub fn play_pause(&mut self) -> Result<()> {
        match self.state {
            PlaybackState::ReadyForRemotePlay => {
                let video = self.video.clone().ok_or(PlayerError::NoVideo)?;
                self.ui.on_controls_visibility_changed(ControlsVisibility::Hidden);
                self.play_remotely(video, None)?;
                self.track(|video, time| AnalyticsEvent::Play { video, time });
            }
            PlaybackState::Playing | PlaybackState::PlayingRemote | PlaybackState::Resuming => {
                self.track(|video, time| AnalyticsEvent::Pause { video, time });
                self.pause()?;
            }
            PlaybackState::Paused | PlaybackState::PausedRemote | PlaybackState::Stopped => {
                self.resume()?;
                self.track(|video, time| AnalyticsEvent::Play { video, time });
            }
        }
        Ok(())
    }

    pub fn pause(&mut self) -> Result<()> {
        match self.state {
            PlaybackState::Playing | PlaybackState::Resuming => {
                self.disarm_resume_poll();
                self.engine.borrow_mut().pause();
                self.save_current_time();
                self.set_state(PlaybackState::Paused);
                Ok(())
            }
            PlaybackState::PlayingRemote => {
                self.remember_remote_position();
                let res = self.session.borrow_mut().pause(None);
                match res {
                    Ok(()) => {
                        self.set_state(PlaybackState::PausedRemote);
                        Ok(())
                    }
                    Err(err) => {
                        warn!("Remote pause failed, falling back to local pause: {err}");
                        self.set_state(PlaybackState::Paused);
                        Err(err.into())
                    }
                }
            }
            state => Err(PlayerError::InvalidState("pause", state)),
        }
    }

    pub fn resume(&mut self) -> Result<()> {
        if self.state == PlaybackState::PausedRemote {
            return self.continue_remote();
        }
        self.resume_at(self.last_elapsed)
    }

    pub fn resume_at(&mut self, at: f64) -> Result<()> {
        match self.state {
            PlaybackState::PausedRemote => self.continue_remote(),
            PlaybackState::Paused | PlaybackState::Resuming | PlaybackState::Stopped => {
                if !self.engine.borrow().has_item() {
                    let video = self.video.clone().ok_or(PlayerError::NoVideo)?;
                    if self.session.borrow().is_connected() {
                        return self.play_remotely(video, Some(at));
                    }
                    debug!("No local item to resume, reloading {}", video.id);
                    return self.play_locally(video, at);
                }

                self.last_elapsed = at;
                self.set_state(PlaybackState::Resuming);
                if !self.seek_and_play(at) {
                    debug!("Engine not ready, deferring resume to {at:.2}s");
                    self.arm_resume_poll(at);
                }
                Ok(())
            }
            state => Err(PlayerError::InvalidState("resume", state)),
        }
    }

    /// Issue the seek that resumes playback at `at`. Returns `false` when the
    /// engine is not ready for it yet.
    fn seek_and_play(&mut self, at: f64) -> bool {
        let mut engine = self.engine.borrow_mut();
        if engine.ready_state() != ReadyState::ReadyToPlay {
            return false;
        }

        engine.seek(
            at,
            SeekTolerance::ZERO,
            SeekToken {
                generation: self.generation,
                purpose: SeekPurpose::Resume,
            },
        );
        true
    }

    fn arm_resume_poll(&mut self, at: f64) {
        match self.resume_poll.as_mut() {
            Some(poll) => poll.at = at,
            None => {
                let observer = self
                    .engine
                    .borrow_mut()
                    .add_periodic_observer(self.config.resume_poll_interval());
                self.resume_poll = Some(ResumePoll { observer, at });
            }
        }
    }

    fn disarm_resume_poll(&mut self) {
        if let Some(poll) = self.resume_poll.take() {
            self.engine
                .borrow_mut()
                .remove_periodic_observer(poll.observer);
        }
    }

    pub fn seek(&mut self, to: f64) -> Result<()> {
        match self.state {
            PlaybackState::PlayingRemote => {
                self.session.borrow_mut().play(Some(to))?;
                self.last_remote_position = Some(to);
                Ok(())
            }
            PlaybackState::PausedRemote => {
                self.session.borrow_mut().pause(Some(to))?;
                self.last_remote_position = Some(to);
                Ok(())
            }
            _ => {
                let mut engine = self.engine.borrow_mut();
                if engine.ready_state() != ReadyState::ReadyToPlay {
                    return Err(PlayerError::EngineNotReady);
                }
                engine.seek(
                    to,
                    SeekTolerance::ZERO,
                    SeekToken {
                        generation: self.generation,
                        purpose: SeekPurpose::Scrub,
                    },
                );
                Ok(())
            }
        }
    }

    pub fn skip_backward(&mut self) -> Result<()> {
        let old_time = self.current_time();
        let skip = self.config.skip_backward_secs;
        let back = if old_time > skip { old_time - skip } else { 0.0 };
        if let Some(duration) = self.snapshot().position.duration.filter(|d| d.is_finite()) {
            self.ui.on_position_updated(back, duration);
        }
        self.seek(back)?;
        self.track(|video, _| AnalyticsEvent::Seek {
            video,
            kind: SeekKind::Skip,
            old_time,
            new_time: back,
            requested: -skip,
        });
        Ok(())
    }

    pub fn scrub_began(&mut self) {
        self.time_before_scrub = self.current_time();
        if self.endpoint == PlaybackEndpoint::Local {
            self.engine.borrow_mut().pause();
        }
    }

    /// Seek to `fraction` of the duration once the slider is released.
    pub fn scrub_ended(&mut self, fraction: f64) -> Result<()> {
        let duration = self
            .snapshot()
            .position
            .duration
            .filter(|d| d.is_finite())
            .ok_or(PlayerError::EngineNotReady);
        let duration = match duration {
            Ok(duration) => duration,
            Err(err) => {
                self.restore_after_scrub();
                return Err(err);
            }
        };

        let target = duration * fraction.clamp(0.0, 1.0);
        self.ui.on_position_updated(target, duration);
        if let Err(err) = self.seek(target) {
            self.restore_after_scrub();
            return Err(err);
        }

        let old_time = self.time_before_scrub;
        self.track(|video, _| AnalyticsEvent::Seek {
            video,
            kind: SeekKind::Slide,
            old_time,
            new_time: target,
            requested: target - old_time,
        });
        Ok(())
    }

    fn restore_after_scrub(&mut self) {
        if self.state == PlaybackState::Playing {
            self.engine.borrow_mut().play();
        }
    }

    pub fn set_speed(&mut self, speed: PlaybackSpeed) -> Result<()> {
        let old = self.engine.borrow().rate();
        let was_playing = self.endpoint == PlaybackEndpoint::Local
            && matches!(self.state, PlaybackState::Playing | PlaybackState::Resuming);

        if was_playing {
            self.pause()?;
        }
        self.store.borrow_mut().set_playback_speed(speed);
        if was_playing {
            self.resume()?;
        }

        self.track(|video, time| AnalyticsEvent::SpeedChange {
            video,
            time,
            old,
            new: speed,
        });
        Ok(())
    }

    /// Stop local playback. Safe to call in any state.
    pub fn stop(&mut self) {
        self.release_local();
        self.set_state(PlaybackState::Stopped);
    }

    /// Persist and detach the local item, cancel its timers and invalidate
    /// its pending completions.
    fn release_local(&mut self) {
        self.save_current_time();
        self.disarm_resume_poll();
        self.readiness_deadline = None;
        {
            let mut engine = self.engine.borrow_mut();
            if engine.has_item() {
                engine.pause();
                engine.unload();
            }
        }
        self.generation += 1;
    }

    fn save_current_time(&mut self) {
        let (position, duration) = {
            let engine = self.engine.borrow();
            if !engine.has_item() {
                return;
            }
            (engine.current_position(), engine.duration())
        };

        self.last_elapsed = position;
        if let Some(video) = &self.video {
            let mut store = self.store.borrow_mut();
            store.save_last_played_position(&video.id, position);
            store.mark_watched_state(&video.id, WatchedState::at(position, duration));
        }
    }

    fn remember_remote_position(&mut self) {
        if let Some(position) = self.session.borrow().last_known_position() {
            self.last_remote_position = Some(position);
        }
    }

    fn handle_session_status(&mut self, status: SessionStatus) {
        debug!("Session status {status:?} in {:?}", self.state);
        if self.endpoint == PlaybackEndpoint::Remote {
            self.remember_remote_position();
        }

        match status {
            SessionStatus::Started => {
                self.enter_remote_ui();
                self.release_local();
                match self.video.clone() {
                    // A fresh session starts the video over.
                    Some(video) => {
                        if let Err(err) = self.play_remotely(video, Some(0.0)) {
                            self.remote_takeover_failed(err);
                        }
                    }
                    None => {
                        debug!("Session started with nothing to cast");
                        self.set_state(PlaybackState::Stopped);
                    }
                }
            }
            SessionStatus::Resumed => {
                self.enter_remote_ui();
                self.release_local();
                if let Err(err) = self.continue_remote() {
                    self.remote_takeover_failed(err);
                }
            }
            SessionStatus::Ended | SessionStatus::Failed(_) => {
                if let SessionStatus::Failed(reason) = &status {
                    self.ui.on_failure(FailureKind::RemoteSession, reason);
                }
                self.ui.on_transcript_visibility_changed(true);
                self.ui.on_casting_overlay_changed(false);
                self.ui
                    .on_controls_visibility_changed(ControlsVisibility::PlayPauseOnly);
                self.hand_back_to_local();
            }
            SessionStatus::FinishedPlaying => {
                self.release_local();
                self.set_state(PlaybackState::ReadyForRemotePlay);
                self.ui.on_casting_overlay_changed(false);
                self.ui
                    .on_controls_visibility_changed(ControlsVisibility::PlayPauseOnly);
            }
            SessionStatus::Playing => {
                self.ui.on_transcript_visibility_changed(false);
                self.ui.on_casting_overlay_changed(true);
            }
            _ => (),
        }
    }

    fn enter_remote_ui(&mut self) {
        self.ui.on_transcript_visibility_changed(false);
        self.ui.on_controls_visibility_changed(ControlsVisibility::Hidden);
        self.ui.on_casting_overlay_changed(true);
    }

    /// The receiver refused to take over. Undo the casting UI and wait for
    /// the user, the local item is already released.
    fn remote_takeover_failed(&mut self, err: PlayerError) {
        error!("Failed to start remote playback: {err}");
        self.ui.on_casting_overlay_changed(false);
        self.ui.on_transcript_visibility_changed(true);
        self.ui
            .on_controls_visibility_changed(ControlsVisibility::PlayPauseOnly);
        self.ui
            .on_failure(FailureKind::RemoteSession, &err.to_string());
        self.set_state(PlaybackState::Paused);
    }

    /// The remote session is gone. Continue locally where the receiver left
    /// off if it was driving playback.
    fn hand_back_to_local(&mut self) {
        if self.endpoint != PlaybackEndpoint::Remote {
            if matches!(self.state, PlaybackState::Playing | PlaybackState::Resuming) {
                self.disarm_resume_poll();
                self.engine.borrow_mut().pause();
                self.save_current_time();
            }
            self.set_state(PlaybackState::Paused);
            return;
        }

        let at = self.last_remote_position.unwrap_or_default();
        let Some(video) = self.video.clone() else {
            self.set_state(PlaybackState::Paused);
            return;
        };

        self.store
            .borrow_mut()
            .save_last_played_position(&video.id, at);
        debug!("Handing {} back to the local engine at {at:.2}s", video.id);
        if let Err(err) = self.play_locally(video, at) {
            error!("Failed to resume locally: {err}");
            self.set_state(PlaybackState::Paused);
        }
    }

    fn handle_engine_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::ReadyStateChanged(ReadyState::ReadyToPlay) => {
                // Queued signals may belong to an item that was replaced since.
                if self.engine.borrow().ready_state() != ReadyState::ReadyToPlay {
                    debug!("Dropping ready signal, current item is not ready");
                    return;
                }
                if self.readiness_deadline.take().is_some() {
                    debug!("Local item ready, readiness deadline cancelled");
                }
                self.ui.on_controls_enabled(true);
            }
            EngineEvent::ReadyStateChanged(state) => {
                if state == ReadyState::Failed {
                    warn!("Local item failed to load");
                }
                self.ui.on_controls_enabled(false);
            }
            EngineEvent::LikelyToKeepUp(keeping_up) => self.ui.on_loading_changed(!keeping_up),
            EngineEvent::SeekCompleted { token, finished } => self.seek_completed(token, finished),
            EngineEvent::PeriodicTick { observer, elapsed } => {
                if let Some(poll) = self.resume_poll.filter(|poll| poll.observer == observer) {
                    self.poll_resume(poll);
                } else if self.progress_observer == Some(observer) {
                    self.progress(elapsed);
                } else {
                    trace!("Tick from unknown observer {observer}");
                }
            }
            EngineEvent::PlayedToEnd => {
                self.save_current_time();
                self.ui.on_playback_finished();
            }
        }
    }

    fn poll_resume(&mut self, poll: ResumePoll) {
        if self.engine.borrow().ready_state() != ReadyState::ReadyToPlay {
            return;
        }

        self.disarm_resume_poll();
        if self.state == PlaybackState::Paused {
            self.set_state(PlaybackState::Resuming);
        }
        self.seek_and_play(poll.at);
    }

    fn progress(&mut self, elapsed: f64) {
        if self.endpoint != PlaybackEndpoint::Local {
            return;
        }
        if let Some(duration) = self.engine.borrow().duration().filter(|d| d.is_finite()) {
            self.ui.on_position_updated(elapsed, duration);
        }
    }

    fn seek_completed(&mut self, token: SeekToken, finished: bool) {
        if token.generation != self.generation {
            debug!("Dropping seek completion from an older item");
            return;
        }
        if !finished {
            trace!("Seek was interrupted");
        }

        match token.purpose {
            SeekPurpose::Resume => {
                if !matches!(self.state, PlaybackState::Playing | PlaybackState::Resuming) {
                    debug!("Dropping resume seek completion in {:?}", self.state);
                    return;
                }
                let rate = self.store.borrow().playback_speed().rate();
                {
                    let mut engine = self.engine.borrow_mut();
                    engine.play();
                    engine.set_rate(rate);
                }
                self.set_state(PlaybackState::Playing);
            }
            SeekPurpose::Scrub => match self.state {
                PlaybackState::Playing => {
                    self.ui.on_controls_auto_hide();
                    self.engine.borrow_mut().play();
                }
                PlaybackState::Paused | PlaybackState::Resuming => self.save_current_time(),
                state => debug!("Dropping seek completion in {state:?}"),
            },
        }
    }

    fn readiness_timed_out(&mut self, generation: u64) {
        if generation != self.generation || self.readiness_deadline.is_none() {
            debug!("Dropping stale readiness timeout");
            return;
        }

        warn!("Local item did not become ready in time");
        self.readiness_deadline = None;
        self.stop();
        self.ui.on_loading_changed(false);
        self.ui.on_failure(
            FailureKind::Timeout,
            "The video took too long to start. Please try again.",
        );
    }

    /// Release the status listener and engine observers.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.readiness_deadline = None;

        if let Ok(mut session) = self.session.try_borrow_mut() {
            session.clear_status_listener();
        }
        if let Ok(mut engine) = self.engine.try_borrow_mut() {
            if let Some(poll) = self.resume_poll.take() {
                engine.remove_periodic_observer(poll.observer);
            }
            if let Some(observer) = self.progress_observer.take() {
                engine.remove_periodic_observer(observer);
            }
        }
    }
}

impl Drop for Coordinator {
    fn drop(&mut self) {
        self.teardown();
    }
}
