use std::{
    sync::{Arc, Mutex, RwLock},
    time::Duration,
};

use flume::Sender;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::{
    audio::{
        config::AudioConfig,
        progress::TrackProgress,
        queue::{next_index, previous_index, shuffle_index},
        state::{PlaybackState, PlayerStatus, RepeatMode},
        traits::MediaElement,
    },
    catalog::{Catalog, Track},
    event::events::Event,
    util::sync::{lock, read, write},
};

struct ControllerState {
    current: Option<Track>,
    status: PlayerStatus,
    duration: Duration,
    volume: f32,
    muted: bool,
    shuffled: bool,
    repeat: RepeatMode,
    loading: bool,
    /// Bumped on every load and reset; stale load results compare against it.
    generation: u64,
}

impl Default for ControllerState {
    fn default() -> Self {
        Self {
            current: None,
            status: PlayerStatus::Stopped,
            duration: Duration::ZERO,
            volume: 1.0,
            muted: false,
            shuffled: false,
            repeat: RepeatMode::None,
            loading: false,
            generation: 0,
        }
    }
}

impl ControllerState {
    fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.volume }
    }
}

/// Owns the playback state machine and the one media element.
pub struct PlaybackController {
    element: Arc<dyn MediaElement>,
    catalog: Catalog,
    config: AudioConfig,
    state: Arc<RwLock<ControllerState>>,
    progress: Arc<TrackProgress>,
    load_task: Mutex<Option<JoinHandle<()>>>,
    monitor: JoinHandle<()>,
    event_tx: Sender<Event>,
}

impl PlaybackController {
    pub fn new(
        element: Arc<dyn MediaElement>,
        catalog: Catalog,
        config: AudioConfig,
        event_tx: Sender<Event>,
    ) -> Self {
        let state = Arc::new(RwLock::new(ControllerState {
            volume: config.volume.clamp(0.0, 1.0),
            ..ControllerState::default()
        }));
        let progress = Arc::new(TrackProgress::new());

        element.set_volume(read(&state).effective_volume());

        let monitor = Self::start_monitor(
            element.clone(),
            state.clone(),
            progress.clone(),
            config.monitor_interval,
            event_tx.clone(),
        );

        Self {
            element,
            catalog,
            config,
            state,
            progress,
            load_task: Mutex::new(None),
            monitor,
            event_tx,
        }
    }

    fn start_monitor(
        element: Arc<dyn MediaElement>,
        state: Arc<RwLock<ControllerState>>,
        progress: Arc<TrackProgress>,
        interval: Duration,
        event_tx: Sender<Event>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;

                let is_playing = {
                    let guard = read(&state);
                    guard.status == PlayerStatus::Playing && !guard.loading
                };
                if !is_playing {
                    continue;
                }

                progress.set_current_position(element.position());

                if element.has_ended() {
                    let ended = {
                        let mut guard = write(&state);
                        let ended = guard.status == PlayerStatus::Playing && !guard.loading;
                        if ended {
                            guard.status = PlayerStatus::Stopped;
                        }
                        ended
                    };
                    if ended {
                        debug!("track_ended");
                        let _ = event_tx.send(Event::TrackEnded);
                    }
                }
            }
        })
    }

    pub fn snapshot(&self) -> PlaybackState {
        let state = read(&self.state);
        PlaybackState {
            current_track: state.current.clone(),
            status: state.status,
            current_time: self.progress.current_position(),
            duration: state.duration,
            volume: state.volume,
            muted: state.muted,
            shuffled: state.shuffled,
            repeat_mode: state.repeat,
            loading: state.loading,
            buffered: self.progress.get_buffered_ratio(),
        }
    }

    pub fn current_track(&self) -> Option<Track> {
        read(&self.state).current.clone()
    }

    pub fn status(&self) -> PlayerStatus {
        read(&self.state).status
    }

    pub fn is_playing(&self) -> bool {
        self.status() == PlayerStatus::Playing
    }

    pub fn play(&self, track: Track) {
        let (same, status) = {
            let state = read(&self.state);
            let same = state.current.as_ref().is_some_and(|c| c.is_same(&track));
            (same, state.status)
        };

        if !same {
            return self.start(track);
        }

        match status {
            PlayerStatus::Paused => self.resume(),
            PlayerStatus::Playing => self.pause(),
            PlayerStatus::Stopped => self.start(track),
        }
    }

    pub fn pause(&self) {
        let mut state = write(&self.state);
        if state.status != PlayerStatus::Playing {
            return;
        }
        state.status = PlayerStatus::Paused;
        self.element.pause();
        if !state.loading {
            self.progress.set_current_position(self.element.position());
        }
    }

    pub fn resume(&self) {
        let mut state = write(&self.state);
        if state.status != PlayerStatus::Paused {
            return;
        }
        state.status = PlayerStatus::Playing;
        if !state.loading {
            self.element.play();
        }
    }

    pub fn toggle_play_pause(&self) {
        let (status, current) = {
            let state = read(&self.state);
            (state.status, state.current.clone())
        };

        match (status, current) {
            (PlayerStatus::Playing, _) => self.pause(),
            (PlayerStatus::Paused, _) => self.resume(),
            (PlayerStatus::Stopped, Some(track)) => self.start(track),
            (PlayerStatus::Stopped, None) => {}
        }
    }

    pub fn next(&self) {
        if let Some(track) = self.select_target(true) {
            self.start(track);
        }
    }

    pub fn previous(&self) {
        if let Some(track) = self.select_target(false) {
            self.start(track);
        }
    }

    fn select_target(&self, forward: bool) -> Option<Track> {
        let (current, shuffled) = {
            let state = read(&self.state);
            (state.current.clone()?, state.shuffled)
        };

        let tracks = self.catalog.tracks();
        let index = tracks.iter().position(|t| t.is_same(&current));

        let target = if shuffled {
            shuffle_index(index, tracks.len(), &mut rand::rng())
        } else if forward {
            next_index(index, tracks.len())
        } else {
            previous_index(index, tracks.len())
        }?;

        tracks.get(target).cloned()
    }

    /// Called when the output drained on its own.
    pub fn on_natural_end(&self) {
        let (repeat, current) = {
            let state = read(&self.state);
            (state.repeat, state.current.clone())
        };
        let Some(current) = current else {
            return;
        };

        match repeat {
            RepeatMode::One => self.start(current),
            RepeatMode::All => self.next(),
            RepeatMode::None if self.catalog.len() > 1 => self.next(),
            RepeatMode::None => {
                write(&self.state).status = PlayerStatus::Stopped;
                debug!(id = %current.id, "playback_finished");
            }
        }
    }

    /// `fraction` of the duration, clamped to [0, 1].
    pub fn seek_to(&self, fraction: f64) {
        if !fraction.is_finite() {
            return;
        }
        let duration = read(&self.state).duration;
        if duration.is_zero() {
            return;
        }
        self.seek(duration.mul_f64(fraction.clamp(0.0, 1.0)));
    }

    pub fn seek_relative(&self, seconds: i64) {
        let (has_track, duration) = {
            let state = read(&self.state);
            (state.current.is_some(), state.duration)
        };
        if !has_track {
            return;
        }

        let current = self.progress.current_position();
        let delta = Duration::from_secs(seconds.unsigned_abs());
        let mut target = if seconds < 0 {
            current.saturating_sub(delta)
        } else {
            current.saturating_add(delta)
        };
        if !duration.is_zero() {
            target = target.min(duration);
        }
        self.seek(target);
    }

    pub fn seek_step(&self) -> i64 {
        self.config.seek_step_secs as i64
    }

    fn seek(&self, position: Duration) {
        if let Err(e) = self.element.seek(position) {
            debug!(error = %e, ?position, "seek_failed");
        }
        self.progress.set_current_position(position);
    }

    pub fn set_volume(&self, volume: f32) {
        if !volume.is_finite() {
            return;
        }
        let mut state = write(&self.state);
        state.volume = volume.clamp(0.0, 1.0);
        state.muted = false;
        self.element.set_volume(state.effective_volume());
    }

    pub fn volume_up(&self) {
        let volume = read(&self.state).volume;
        self.set_volume(volume + self.config.volume_step);
    }

    pub fn volume_down(&self) {
        let volume = read(&self.state).volume;
        self.set_volume(volume - self.config.volume_step);
    }

    pub fn toggle_mute(&self) -> bool {
        let mut state = write(&self.state);
        state.muted = !state.muted;
        self.element.set_volume(state.effective_volume());
        state.muted
    }

    pub fn toggle_shuffle(&self) -> bool {
        let mut state = write(&self.state);
        state.shuffled = !state.shuffled;
        state.shuffled
    }

    pub fn cycle_repeat_mode(&self) -> RepeatMode {
        let mut state = write(&self.state);
        state.repeat = state.repeat.cycle();
        state.repeat
    }

    /// Stops output and restores every default.
    pub fn reset(&self) {
        self.abort_load();
        {
            let mut state = write(&self.state);
            let generation = state.generation + 1;
            *state = ControllerState {
                volume: self.config.volume.clamp(0.0, 1.0),
                generation,
                ..ControllerState::default()
            };
            self.element.stop();
            self.element.set_volume(state.effective_volume());
        }
        self.progress.reset();
        info!("playback_reset");
    }

    /// Waits for the in-flight load, if any.
    pub async fn settle(&self) {
        let task = lock(&self.load_task).take();
        if let Some(task) = task {
            let _ = task.await;
        }
    }

    fn abort_load(&self) {
        if let Some(task) = lock(&self.load_task).take() {
            task.abort();
        }
    }

    fn start(&self, track: Track) {
        self.abort_load();

        let generation = {
            let mut state = write(&self.state);
            state.generation += 1;
            state.current = Some(track.clone());
            state.status = PlayerStatus::Playing;
            state.duration = track.duration;
            state.loading = true;
            state.generation
        };

        self.element.stop();
        self.progress.reset();
        info!(id = %track.id, title = %track.title, "track_loading");

        let element = self.element.clone();
        let state = self.state.clone();
        let progress = self.progress.clone();
        let event_tx = self.event_tx.clone();

        let task = tokio::spawn(async move {
            let result = element.load(&track.url, progress).await;

            let mut guard = write(&state);
            if guard.generation != generation {
                debug!(id = %track.id, "stale_load_discarded");
                return;
            }
            guard.loading = false;

            match result {
                Ok(decoded) => {
                    if let Some(duration) = decoded.filter(|d| !d.is_zero()) {
                        guard.duration = duration;
                    }
                    element.set_volume(guard.effective_volume());
                    if guard.status == PlayerStatus::Playing {
                        element.play();
                    }
                    drop(guard);

                    info!(id = %track.id, "track_started");
                    let _ = event_tx.send(Event::TrackStarted(track));
                }
                Err(e) => {
                    guard.status = PlayerStatus::Stopped;
                    drop(guard);
                    element.stop();

                    warn!(id = %track.id, error = %e, "track_load_failed");
                    let _ = event_tx.send(Event::PlaybackFailed {
                        track_id: track.id,
                        message: e.to_string(),
                    });
                }
            }
        });

        *lock(&self.load_task) = Some(task);
    }
}

impl Drop for PlaybackController {
    fn drop(&mut self) {
        self.monitor.abort();
        self.abort_load();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::error::AudioError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[derive(Default)]
    struct FakeElement {
        loads: Mutex<Vec<String>>,
        failing: Mutex<Vec<String>>,
        playing: AtomicBool,
        ended: AtomicBool,
        position: Mutex<Duration>,
        volume: Mutex<f32>,
    }

    #[async_trait]
    impl MediaElement for FakeElement {
        async fn load(
            &self,
            url: &str,
            _progress: Arc<TrackProgress>,
        ) -> Result<Option<Duration>, AudioError> {
            self.loads.lock().unwrap().push(url.to_string());
            if self.failing.lock().unwrap().iter().any(|u| u == url) {
                return Err(AudioError::NetworkError("connection reset".into()));
            }
            Ok(None)
        }

        fn play(&self) {
            self.playing.store(true, Ordering::SeqCst);
        }

        fn pause(&self) {
            self.playing.store(false, Ordering::SeqCst);
        }

        fn stop(&self) {
            self.playing.store(false, Ordering::SeqCst);
            *self.position.lock().unwrap() = Duration::ZERO;
        }

        fn seek(&self, position: Duration) -> Result<(), AudioError> {
            *self.position.lock().unwrap() = position;
            Ok(())
        }

        fn set_volume(&self, volume: f32) {
            *self.volume.lock().unwrap() = volume;
        }

        fn position(&self) -> Duration {
            *self.position.lock().unwrap()
        }

        fn has_ended(&self) -> bool {
            self.ended.load(Ordering::SeqCst)
        }
    }

    fn track(id: &str) -> Track {
        Track {
            id: id.into(),
            title: format!("Song {id}"),
            artist: "Artist".into(),
            genre: "Pop".into(),
            album: None,
            duration: Duration::from_secs(200),
            url: format!("https://cdn.example.com/{id}.mp3"),
            thumbnail: "music.png".into(),
            format: Some("mp3".into()),
        }
    }

    struct Harness {
        controller: PlaybackController,
        element: Arc<FakeElement>,
        events: flume::Receiver<Event>,
    }

    fn harness(ids: &[&str]) -> Harness {
        let element = Arc::new(FakeElement::default());
        let catalog = Catalog::with_tracks(ids.iter().map(|id| track(id)).collect());
        let (tx, rx) = flume::unbounded();
        let config = AudioConfig {
            monitor_interval: Duration::from_millis(10),
            ..AudioConfig::default()
        };
        Harness {
            controller: PlaybackController::new(element.clone(), catalog, config, tx),
            element,
            events: rx,
        }
    }

    fn current_id(controller: &PlaybackController) -> Option<String> {
        controller.current_track().map(|t| t.id)
    }

    #[tokio::test]
    async fn play_new_track_starts_it() {
        let h = harness(&["a", "b"]);
        h.controller.play(track("a"));
        h.controller.settle().await;

        let state = h.controller.snapshot();
        assert_eq!(state.status, PlayerStatus::Playing);
        assert!(!state.loading);
        assert_eq!(state.duration, Duration::from_secs(200));
        assert!(h.element.playing.load(Ordering::SeqCst));
        assert!(matches!(h.events.try_recv(), Ok(Event::TrackStarted(t)) if t.id == "a"));
    }

    #[tokio::test]
    async fn play_same_track_toggles_pause() {
        let h = harness(&["a"]);
        h.controller.play(track("a"));
        h.controller.settle().await;

        h.controller.play(track("a"));
        assert_eq!(h.controller.status(), PlayerStatus::Paused);
        assert!(!h.element.playing.load(Ordering::SeqCst));

        h.controller.play(track("a"));
        assert_eq!(h.controller.status(), PlayerStatus::Playing);
        assert!(h.element.playing.load(Ordering::SeqCst));
        assert_eq!(h.element.loads.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn toggle_after_stop_restarts_current() {
        let h = harness(&["a"]);
        h.controller.play(track("a"));
        h.controller.settle().await;
        h.controller.on_natural_end();
        assert_eq!(h.controller.status(), PlayerStatus::Stopped);
        assert_eq!(current_id(&h.controller).as_deref(), Some("a"));

        h.controller.toggle_play_pause();
        h.controller.settle().await;
        assert_eq!(h.controller.status(), PlayerStatus::Playing);
        assert_eq!(h.element.loads.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn next_walks_catalog_cyclically() {
        let h = harness(&["a", "b", "c"]);
        h.controller.play(track("b"));

        let mut visited = Vec::new();
        for _ in 0..4 {
            h.controller.next();
            visited.push(current_id(&h.controller).unwrap());
        }
        assert_eq!(visited, vec!["c", "a", "b", "c"]);
    }

    #[tokio::test]
    async fn previous_wraps_to_last() {
        let h = harness(&["a", "b", "c"]);
        h.controller.play(track("a"));
        h.controller.previous();
        assert_eq!(current_id(&h.controller).as_deref(), Some("c"));
    }

    #[tokio::test]
    async fn next_without_current_track_is_noop() {
        let h = harness(&["a", "b"]);
        h.controller.next();
        h.controller.previous();
        assert!(h.controller.current_track().is_none());
        assert_eq!(h.controller.status(), PlayerStatus::Stopped);
    }

    #[tokio::test]
    async fn track_outside_catalog_sits_before_first() {
        let h = harness(&["a", "b", "c"]);
        h.controller.play(track("preview"));
        h.controller.next();
        assert_eq!(current_id(&h.controller).as_deref(), Some("a"));

        h.controller.play(track("preview"));
        h.controller.previous();
        assert_eq!(current_id(&h.controller).as_deref(), Some("c"));
    }

    #[tokio::test]
    async fn shuffled_next_never_repeats_current() {
        let h = harness(&["a", "b", "c", "d"]);
        h.controller.toggle_shuffle();
        h.controller.play(track("a"));

        for _ in 0..50 {
            let before = current_id(&h.controller);
            h.controller.next();
            assert_ne!(current_id(&h.controller), before);
        }
    }

    #[tokio::test]
    async fn seek_to_half_of_200s_is_100s() {
        let h = harness(&["a"]);
        h.controller.play(track("a"));
        h.controller.settle().await;

        h.controller.seek_to(0.5);
        assert_eq!(h.controller.snapshot().current_time, Duration::from_secs(100));
        assert_eq!(h.element.position(), Duration::from_secs(100));

        h.controller.seek_to(3.0);
        assert_eq!(h.controller.snapshot().current_time, Duration::from_secs(200));
    }

    #[tokio::test]
    async fn seek_without_duration_is_noop() {
        let h = harness(&[]);
        let mut silent = track("x");
        silent.duration = Duration::ZERO;
        h.controller.play(silent);
        h.controller.settle().await;

        h.controller.seek_to(0.5);
        assert_eq!(h.controller.snapshot().current_time, Duration::ZERO);
    }

    #[tokio::test]
    async fn seek_relative_clamps_at_bounds() {
        let h = harness(&["a"]);
        h.controller.play(track("a"));
        h.controller.settle().await;

        h.controller.seek_relative(-10);
        assert_eq!(h.controller.snapshot().current_time, Duration::ZERO);
        h.controller.seek_relative(500);
        assert_eq!(h.controller.snapshot().current_time, Duration::from_secs(200));
    }

    #[tokio::test]
    async fn natural_end_with_repeat_one_restarts_same() {
        let h = harness(&["a", "b"]);
        h.controller.cycle_repeat_mode();
        h.controller.play(track("a"));
        h.controller.settle().await;

        h.controller.on_natural_end();
        h.controller.settle().await;
        assert_eq!(current_id(&h.controller).as_deref(), Some("a"));
        assert_eq!(h.controller.status(), PlayerStatus::Playing);
        assert_eq!(h.element.loads.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn natural_end_advances_with_several_tracks() {
        let h = harness(&["a", "b"]);
        h.controller.play(track("a"));
        h.controller.on_natural_end();
        assert_eq!(current_id(&h.controller).as_deref(), Some("b"));
    }

    #[tokio::test]
    async fn natural_end_with_repeat_all_on_single_track_loops() {
        let h = harness(&["a"]);
        assert_eq!(h.controller.cycle_repeat_mode(), RepeatMode::One);
        assert_eq!(h.controller.cycle_repeat_mode(), RepeatMode::All);
        h.controller.play(track("a"));
        h.controller.settle().await;

        h.controller.on_natural_end();
        h.controller.settle().await;
        assert_eq!(h.controller.status(), PlayerStatus::Playing);
        assert_eq!(h.element.loads.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn failed_load_stops_and_reports() {
        let h = harness(&["a"]);
        h.element
            .failing
            .lock()
            .unwrap()
            .push(track("a").url);

        h.controller.play(track("a"));
        h.controller.settle().await;

        assert_eq!(h.controller.status(), PlayerStatus::Stopped);
        match h.events.try_recv() {
            Ok(Event::PlaybackFailed { track_id, message }) => {
                assert_eq!(track_id, "a");
                assert!(!message.is_empty());
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn monitor_reports_drained_output() {
        let h = harness(&["a"]);
        h.controller.play(track("a"));
        h.controller.settle().await;
        assert!(matches!(h.events.try_recv(), Ok(Event::TrackStarted(_))));

        h.element.ended.store(true, Ordering::SeqCst);
        let event = tokio::time::timeout(Duration::from_secs(2), h.events.recv_async())
            .await
            .expect("monitor did not fire")
            .unwrap();
        assert!(matches!(event, Event::TrackEnded));
        assert_eq!(h.controller.status(), PlayerStatus::Stopped);
    }

    #[tokio::test]
    async fn volume_is_clamped_and_mute_restores() {
        let h = harness(&[]);
        h.controller.set_volume(1.7);
        assert_eq!(h.controller.snapshot().volume, 1.0);
        h.controller.set_volume(-0.2);
        assert_eq!(h.controller.snapshot().volume, 0.0);

        h.controller.set_volume(0.5);
        assert!(h.controller.toggle_mute());
        assert_eq!(*h.element.volume.lock().unwrap(), 0.0);
        assert!(!h.controller.toggle_mute());
        assert_eq!(*h.element.volume.lock().unwrap(), 0.5);

        h.controller.volume_down();
        assert!((h.controller.snapshot().volume - 0.45).abs() < 1e-6);
    }

    #[tokio::test]
    async fn reset_restores_defaults() {
        let h = harness(&["a", "b"]);
        h.controller.play(track("a"));
        h.controller.toggle_shuffle();
        h.controller.cycle_repeat_mode();
        h.controller.set_volume(0.3);
        h.controller.reset();
        h.controller.settle().await;

        assert_eq!(h.controller.snapshot(), PlaybackState::default());
        assert!(!h.element.playing.load(Ordering::SeqCst));
    }
}
