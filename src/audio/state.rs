use std::time::Duration;

use crate::catalog::Track;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayerStatus {
    #[default]
    Stopped,
    Playing,
    Paused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RepeatMode {
    #[default]
    None,
    One,
    All,
}

impl RepeatMode {
    /// none → one → all → none
    pub fn cycle(self) -> Self {
        match self {
            RepeatMode::None => RepeatMode::One,
            RepeatMode::One => RepeatMode::All,
            RepeatMode::All => RepeatMode::None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RepeatMode::None => "off",
            RepeatMode::One => "one",
            RepeatMode::All => "all",
        }
    }
}

/// Point-in-time copy of the controller state, for rendering and tests.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    pub current_track: Option<Track>,
    pub status: PlayerStatus,
    pub current_time: Duration,
    pub duration: Duration,
    pub volume: f32,
    pub muted: bool,
    pub shuffled: bool,
    pub repeat_mode: RepeatMode,
    pub loading: bool,
    pub buffered: f64,
}

impl PlaybackState {
    pub fn is_playing(&self) -> bool {
        self.status == PlayerStatus::Playing
    }

    /// Played fraction of the track, 0 when the duration is unknown.
    pub fn ratio(&self) -> f64 {
        if self.duration.is_zero() {
            0.0
        } else {
            (self.current_time.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
        }
    }
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            current_track: None,
            status: PlayerStatus::Stopped,
            current_time: Duration::ZERO,
            duration: Duration::ZERO,
            volume: 1.0,
            muted: false,
            shuffled: false,
            repeat_mode: RepeatMode::None,
            loading: false,
            buffered: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeat_mode_cycles_through_all_three() {
        let mode = RepeatMode::default();
        assert_eq!(mode.cycle(), RepeatMode::One);
        assert_eq!(mode.cycle().cycle(), RepeatMode::All);
        assert_eq!(mode.cycle().cycle().cycle(), RepeatMode::None);
    }

    #[test]
    fn ratio_handles_unknown_duration() {
        let mut state = PlaybackState::default();
        state.current_time = Duration::from_secs(10);
        assert_eq!(state.ratio(), 0.0);
        state.duration = Duration::from_secs(40);
        assert_eq!(state.ratio(), 0.25);
    }
}
