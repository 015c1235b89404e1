use std::time::Duration;

#[derive(Debug, Clone)]
pub struct AudioConfig {
    /// Initial output volume in the `[0, 1]` range.
    pub volume: f32,
    pub volume_step: f32,
    pub seek_step_secs: u64,
    pub monitor_interval: Duration,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            volume: 1.0,
            volume_step: 0.05,
            seek_step_secs: 5,
            monitor_interval: Duration::from_millis(100),
        }
    }
}
