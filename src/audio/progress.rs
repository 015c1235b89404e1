use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Lock-free position and download counters shared between the controller,
/// the monitor task and the media element.
#[derive(Default, Debug)]
pub struct TrackProgress {
    position_millis: AtomicU64,
    total_bytes: AtomicU64,
    buffered_bytes: AtomicU64,
}

impl TrackProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_current_position(&self, position: Duration) {
        self.position_millis
            .store(position.as_millis() as u64, Ordering::Relaxed);
    }

    /// Zero while the response length is unknown.
    pub fn set_total_bytes(&self, bytes: u64) {
        self.total_bytes.store(bytes, Ordering::Relaxed);
    }

    pub fn set_buffered_bytes(&self, bytes: u64) {
        self.buffered_bytes.store(bytes, Ordering::Relaxed);
    }

    pub fn current_position(&self) -> Duration {
        Duration::from_millis(self.position_millis.load(Ordering::Relaxed))
    }

    pub fn get_buffered_ratio(&self) -> f64 {
        let total = self.total_bytes.load(Ordering::Relaxed);
        if total == 0 {
            return 0.0;
        }
        let buffered = self.buffered_bytes.load(Ordering::Relaxed);
        (buffered as f64 / total as f64).min(1.0)
    }

    pub fn reset(&self) {
        self.set_buffered_bytes(0);
        self.set_current_position(Duration::ZERO);
        self.set_total_bytes(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffered_ratio_without_length_is_zero() {
        let progress = TrackProgress::new();
        progress.set_buffered_bytes(512);
        assert_eq!(progress.get_buffered_ratio(), 0.0);
        progress.set_total_bytes(1024);
        assert_eq!(progress.get_buffered_ratio(), 0.5);
        progress.set_buffered_bytes(4096);
        assert_eq!(progress.get_buffered_ratio(), 1.0);
    }

    #[test]
    fn reset_clears_counters() {
        let progress = TrackProgress::new();
        progress.set_current_position(Duration::from_secs(3));
        progress.set_total_bytes(10);
        progress.reset();
        assert_eq!(progress.current_position(), Duration::ZERO);
        assert_eq!(progress.get_buffered_ratio(), 0.0);
    }
}
