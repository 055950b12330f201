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

//! Timer-driven stand-ins for the on-device engine and the cast receiver.
//!
//! Both post their signals onto the coordinator's event channel from tokio
//! tasks, like the real stacks would from their own callback threads.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use cast_session::{
    CastDevice, CastTransport, IdleReason, MediaDescriptor, MediaStatus, RemotePlayerState,
    ResumeState, SeekRequest, TransportEvent,
};
use log::{debug, trace};
use player_core::engine::{EngineEvent, LocalEngine, ObserverId, ReadyState, SeekTolerance, SeekToken};
use player_core::Event;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::Instant;

const SEEK_LATENCY: Duration = Duration::from_millis(150);
const CONNECT_LATENCY: Duration = Duration::from_millis(400);
const BUFFER_LATENCY: Duration = Duration::from_millis(250);

fn post(event_tx: &UnboundedSender<Event>, event: Event) {
    if let Err(err) = event_tx.send(event) {
        debug!("Event loop is gone, dropping {:?}", err.0);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|err| err.into_inner())
}

/// Position that advances with wall time while running.
#[derive(Debug, Clone, Copy)]
struct Playhead {
    base: f64,
    since: Option<Instant>,
    rate: f64,
    duration: f64,
}

impl Playhead {
    fn new(duration: f64) -> Self {
        Self {
            base: 0.0,
            since: None,
            rate: 1.0,
            duration,
        }
    }

    fn position(&self) -> f64 {
        let position = match self.since {
            Some(since) => self.base + since.elapsed().as_secs_f64() * self.rate,
            None => self.base,
        };
        position.min(self.duration)
    }

    fn is_running(&self) -> bool {
        self.since.is_some()
    }

    fn start(&mut self) {
        if self.since.is_none() {
            self.since = Some(Instant::now());
        }
    }

    fn stop(&mut self) {
        self.base = self.position();
        self.since = None;
    }

    fn jump(&mut self, to: f64) {
        self.base = to.clamp(0.0, self.duration);
        if self.since.is_some() {
            self.since = Some(Instant::now());
        }
    }

    fn set_rate(&mut self, rate: f64) {
        self.jump(self.position());
        self.rate = rate;
    }

    /// Wall time until the end is reached at the current rate.
    fn remaining(&self) -> Option<Duration> {
        if !self.is_running() || self.rate <= 0.0 {
            return None;
        }
        Some(Duration::from_secs_f64(
            (self.duration - self.position()).max(0.0) / self.rate,
        ))
    }
}

pub struct SimEngine {
    event_tx: UnboundedSender<Event>,
    load_delay: Duration,
    duration: f64,
    item: Option<String>,
    ready_at: Option<Instant>,
    playhead: Arc<Mutex<Playhead>>,
    playing: bool,
    rate: f64,
    observers: HashMap<ObserverId, JoinHandle<()>>,
    next_observer: ObserverId,
    item_tasks: Vec<JoinHandle<()>>,
    end_task: Option<JoinHandle<()>>,
}

impl SimEngine {
    pub fn new(event_tx: UnboundedSender<Event>, load_delay: Duration, duration: f64) -> Self {
        Self {
            event_tx,
            load_delay,
            duration,
            item: None,
            ready_at: None,
            playhead: Arc::new(Mutex::new(Playhead::new(duration))),
            playing: false,
            rate: 1.0,
            observers: HashMap::new(),
            next_observer: 0,
            item_tasks: Vec::new(),
            end_task: None,
        }
    }

    fn abort_item_tasks(&mut self) {
        for task in self.item_tasks.drain(..) {
            task.abort();
        }
        if let Some(task) = self.end_task.take() {
            task.abort();
        }
    }

    fn rearm_end(&mut self) {
        if let Some(task) = self.end_task.take() {
            task.abort();
        }
        let Some(remaining) = lock(&self.playhead).remaining() else {
            return;
        };

        let event_tx = self.event_tx.clone();
        self.end_task = Some(tokio::spawn(async move {
            tokio::time::sleep(remaining).await;
            post(&event_tx, Event::Engine(EngineEvent::PlayedToEnd));
        }));
    }
}

impl LocalEngine for SimEngine {
    fn load(&mut self, url: &str) {
        self.abort_item_tasks();
        debug!("Loading {url}");
        self.item = Some(url.to_owned());
        self.ready_at = Some(Instant::now() + self.load_delay);
        *lock(&self.playhead) = Playhead::new(self.duration);

        let event_tx = self.event_tx.clone();
        let load_delay = self.load_delay;
        self.item_tasks.push(tokio::spawn(async move {
            post(&event_tx, Event::Engine(EngineEvent::LikelyToKeepUp(false)));
            tokio::time::sleep(load_delay).await;
            post(
                &event_tx,
                Event::Engine(EngineEvent::ReadyStateChanged(ReadyState::ReadyToPlay)),
            );
            post(&event_tx, Event::Engine(EngineEvent::LikelyToKeepUp(true)));
        }));
    }

    fn unload(&mut self) {
        self.abort_item_tasks();
        self.item = None;
        self.ready_at = None;
        self.playing = false;
        lock(&self.playhead).stop();
    }

    fn has_item(&self) -> bool {
        self.item.is_some()
    }

    fn play(&mut self) {
        self.playing = true;
        if self.ready_state() == ReadyState::ReadyToPlay {
            lock(&self.playhead).start();
            self.rearm_end();
        }
    }

    fn pause(&mut self) {
        self.playing = false;
        lock(&self.playhead).stop();
        self.rearm_end();
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
        lock(&self.playhead).set_rate(rate);
        self.rearm_end();
    }

    fn seek(&mut self, to: f64, tolerance: SeekTolerance, token: SeekToken) {
        trace!("Seeking to {to:.2}s within {tolerance:?}");
        lock(&self.playhead).jump(to);
        self.rearm_end();

        let event_tx = self.event_tx.clone();
        self.item_tasks.push(tokio::spawn(async move {
            tokio::time::sleep(SEEK_LATENCY).await;
            post(
                &event_tx,
                Event::Engine(EngineEvent::SeekCompleted {
                    token,
                    finished: true,
                }),
            );
        }));
    }

    fn current_position(&self) -> f64 {
        lock(&self.playhead).position()
    }

    fn duration(&self) -> Option<f64> {
        (self.ready_state() == ReadyState::ReadyToPlay).then_some(self.duration)
    }

    fn ready_state(&self) -> ReadyState {
        match (self.item.as_ref(), self.ready_at) {
            (Some(_), Some(at)) if Instant::now() >= at => ReadyState::ReadyToPlay,
            _ => ReadyState::Unknown,
        }
    }

    fn add_periodic_observer(&mut self, interval: Duration) -> ObserverId {
        self.next_observer += 1;
        let observer = self.next_observer;
        let event_tx = self.event_tx.clone();
        let playhead = self.playhead.clone();

        let task = tokio::spawn(async move {
            let mut ticks = tokio::time::interval(interval);
            ticks.tick().await;
            loop {
                ticks.tick().await;
                let elapsed = lock(&playhead).position();
                let tick = Event::Engine(EngineEvent::PeriodicTick { observer, elapsed });
                if event_tx.send(tick).is_err() {
                    break;
                }
            }
        });
        self.observers.insert(observer, task);
        observer
    }

    fn remove_periodic_observer(&mut self, observer: ObserverId) {
        if let Some(task) = self.observers.remove(&observer) {
            task.abort();
        }
    }
}

impl Drop for SimEngine {
    fn drop(&mut self) {
        self.abort_item_tasks();
        for (_, task) in self.observers.drain() {
            task.abort();
        }
    }
}

#[derive(Debug)]
struct Receiver {
    connected: bool,
    listening: bool,
    media: Option<MediaDescriptor>,
    player_state: RemotePlayerState,
    idle_reason: IdleReason,
    playhead: Playhead,
}

impl Receiver {
    fn status(&self) -> Option<MediaStatus> {
        let media = self.media.clone()?;
        Some(MediaStatus {
            player_state: self.player_state,
            idle_reason: self.idle_reason,
            stream_position: self.playhead.position(),
            media: Some(media),
        })
    }
}

/// A single simulated receiver reachable through a fake discovery.
pub struct SimTransport {
    event_tx: UnboundedSender<Event>,
    device: CastDevice,
    duration: f64,
    receiver: Arc<Mutex<Receiver>>,
    end_task: Option<JoinHandle<()>>,
}

impl SimTransport {
    pub fn new(event_tx: UnboundedSender<Event>, duration: f64) -> Self {
        Self {
            event_tx,
            device: Self::device(),
            duration,
            receiver: Arc::new(Mutex::new(Receiver {
                connected: false,
                listening: false,
                media: None,
                player_state: RemotePlayerState::Idle,
                idle_reason: IdleReason::None,
                playhead: Playhead::new(duration),
            })),
            end_task: None,
        }
    }

    pub fn device() -> CastDevice {
        CastDevice {
            id: "sim-tv".to_owned(),
            friendly_name: "Simulated TV".to_owned(),
            category: "tv".to_owned(),
        }
    }

    fn publish(event_tx: &UnboundedSender<Event>, receiver: &Receiver) {
        if !receiver.listening {
            return;
        }
        if let Some(status) = receiver.status() {
            post(
                event_tx,
                Event::Transport(TransportEvent::MediaStatusUpdated(status)),
            );
        }
    }

    fn set_player_state(&mut self, state: RemotePlayerState) {
        let mut receiver = lock(&self.receiver);
        receiver.player_state = state;
        receiver.idle_reason = IdleReason::None;
        match state {
            RemotePlayerState::Playing => receiver.playhead.start(),
            _ => receiver.playhead.stop(),
        }
        Self::publish(&self.event_tx, &receiver);
    }

    fn rearm_end(&mut self) {
        if let Some(task) = self.end_task.take() {
            task.abort();
        }
        let Some(remaining) = lock(&self.receiver).playhead.remaining() else {
            return;
        };

        let event_tx = self.event_tx.clone();
        let receiver = self.receiver.clone();
        self.end_task = Some(tokio::spawn(async move {
            tokio::time::sleep(remaining).await;
            Self::finish(&event_tx, &receiver);
        }));
    }

    fn finish(event_tx: &UnboundedSender<Event>, receiver: &Mutex<Receiver>) {
        let mut receiver = lock(receiver);
        if receiver.player_state != RemotePlayerState::Playing {
            return;
        }
        receiver.playhead.stop();
        receiver.player_state = RemotePlayerState::Idle;
        receiver.idle_reason = IdleReason::Finished;
        Self::publish(event_tx, &receiver);
    }

    fn ensure_connected(&self) -> Result<(), String> {
        if lock(&self.receiver).connected {
            Ok(())
        } else {
            Err("no receiver session".to_owned())
        }
    }
}

impl CastTransport for SimTransport {
    fn devices(&self) -> Vec<CastDevice> {
        vec![self.device.clone()]
    }

    fn has_connected_session(&self) -> bool {
        lock(&self.receiver).connected
    }

    fn connected_device(&self) -> Option<CastDevice> {
        self.has_connected_session().then(|| self.device.clone())
    }

    fn start_session(&mut self, device: &CastDevice) {
        if device.id != self.device.id {
            post(
                &self.event_tx,
                Event::Transport(TransportEvent::SessionStartFailed {
                    error: format!("unknown device {}", device.id),
                }),
            );
            return;
        }

        let event_tx = self.event_tx.clone();
        let receiver = self.receiver.clone();
        tokio::spawn(async move {
            post(&event_tx, Event::Transport(TransportEvent::SessionStarting));
            tokio::time::sleep(CONNECT_LATENCY).await;
            lock(&receiver).connected = true;
            post(&event_tx, Event::Transport(TransportEvent::SessionStarted));
        });
    }

    fn end_session(&mut self) {
        if let Some(task) = self.end_task.take() {
            task.abort();
        }
        {
            let mut receiver = lock(&self.receiver);
            receiver.connected = false;
            receiver.media = None;
            receiver.player_state = RemotePlayerState::Idle;
            receiver.playhead.stop();
        }
        post(
            &self.event_tx,
            Event::Transport(TransportEvent::SessionEnded { error: None }),
        );
    }

    fn add_media_listener(&mut self) {
        lock(&self.receiver).listening = true;
    }

    fn remove_media_listener(&mut self) {
        lock(&self.receiver).listening = false;
    }

    fn load_media(&mut self, media: &MediaDescriptor, start: f64) -> Result<(), String> {
        self.ensure_connected()?;
        debug!("Receiver loading {} at {start:.2}s", media.content_url);
        {
            let mut receiver = lock(&self.receiver);
            let mut media = media.clone();
            media.duration = Some(self.duration);
            receiver.media = Some(media);
            receiver.playhead = Playhead::new(self.duration);
            receiver.playhead.jump(start);
            receiver.player_state = RemotePlayerState::Buffering;
            receiver.idle_reason = IdleReason::None;
            Self::publish(&self.event_tx, &receiver);
        }

        if let Some(task) = self.end_task.take() {
            task.abort();
        }
        let event_tx = self.event_tx.clone();
        let receiver = self.receiver.clone();
        self.end_task = Some(tokio::spawn(async move {
            tokio::time::sleep(BUFFER_LATENCY).await;
            let remaining = {
                let mut receiver = lock(&receiver);
                if receiver.player_state != RemotePlayerState::Buffering {
                    return;
                }
                receiver.player_state = RemotePlayerState::Playing;
                receiver.playhead.start();
                Self::publish(&event_tx, &receiver);
                receiver.playhead.remaining()
            };
            if let Some(remaining) = remaining {
                tokio::time::sleep(remaining).await;
                Self::finish(&event_tx, &receiver);
            }
        }));
        Ok(())
    }

    fn play(&mut self) -> Result<(), String> {
        self.ensure_connected()?;
        self.set_player_state(RemotePlayerState::Playing);
        self.rearm_end();
        Ok(())
    }

    fn pause(&mut self) -> Result<(), String> {
        self.ensure_connected()?;
        self.set_player_state(RemotePlayerState::Paused);
        self.rearm_end();
        Ok(())
    }

    fn seek(&mut self, request: SeekRequest) -> Result<(), String> {
        self.ensure_connected()?;
        lock(&self.receiver).playhead.jump(request.position);
        match request.resume {
            ResumeState::Play => self.play(),
            ResumeState::Pause => self.pause(),
        }
    }

    fn approximate_stream_position(&self) -> Option<f64> {
        let receiver = lock(&self.receiver);
        receiver.media.as_ref().map(|_| receiver.playhead.position())
    }

    fn media_status(&self) -> Option<MediaStatus> {
        lock(&self.receiver).status()
    }
}

impl Drop for SimTransport {
    fn drop(&mut self) {
        if let Some(task) = self.end_task.take() {
            task.abort();
        }
    }
}
