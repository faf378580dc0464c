use std::time::Duration;

/// Fixed-capacity ring of recent frame durations.
///
/// Smooths the HUD FPS counter over the last `capacity` frames instead of
/// flickering with every frame.
#[derive(Debug)]
pub struct FrameStats {
    history: Vec<Duration>,
    capacity: usize,
    index: usize,
    filled: bool,
}

impl FrameStats {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0);
        Self {
            history: vec![Duration::ZERO; capacity],
            capacity,
            index: 0,
            filled: false,
        }
    }

    pub fn record(&mut self, dt: Duration) {
        self.history[self.index] = dt;
        self.index = (self.index + 1) % self.capacity;
        if self.index == 0 {
            self.filled = true;
        }
    }

    pub fn count(&self) -> usize {
        if self.filled { self.capacity } else { self.index }
    }

    pub fn average(&self) -> Duration {
        let count = self.count();
        if count == 0 {
            return Duration::ZERO;
        }
        let total: Duration = self.history[..count].iter().sum();
        total / count as u32
    }

    pub fn max(&self) -> Duration {
        self.history[..self.count()]
            .iter()
            .copied()
            .max()
            .unwrap_or(Duration::ZERO)
    }

    pub fn min(&self) -> Duration {
        self.history[..self.count()]
            .iter()
            .copied()
            .min()
            .unwrap_or(Duration::ZERO)
    }

    /// Smoothed frames per second; 0 until a frame has been recorded.
    pub fn fps(&self) -> f32 {
        let average = self.average().as_secs_f32();
        if average > 0.0 { 1.0 / average } else { 0.0 }
    }
}

impl Default for FrameStats {
    /// One second of history at 60 fps.
    fn default() -> Self {
        Self::new(60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_history() {
        let mut stats = FrameStats::new(3);
        stats.record(Duration::from_millis(10));
        stats.record(Duration::from_millis(20));
        stats.record(Duration::from_millis(30));

        assert_eq!(stats.count(), 3);
        assert_eq!(stats.average(), Duration::from_millis(20));
        assert_eq!(stats.max(), Duration::from_millis(30));
        assert_eq!(stats.min(), Duration::from_millis(10));
    }

    #[test]
    fn wraps_around() {
        let mut stats = FrameStats::new(2);
        stats.record(Duration::from_millis(10));
        stats.record(Duration::from_millis(20));
        stats.record(Duration::from_millis(30)); // overwrites the first

        assert_eq!(stats.count(), 2);
        assert_eq!(stats.average(), Duration::from_millis(25));
    }

    #[test]
    fn fps_from_average() {
        let mut stats = FrameStats::new(4);
        for _ in 0..4 {
            stats.record(Duration::from_micros(16_667));
        }
        let fps = stats.fps();
        assert!((fps - 60.0).abs() < 0.5);
    }

    #[test]
    fn empty_stats_report_zero() {
        let stats = FrameStats::default();
        assert_eq!(stats.count(), 0);
        assert_eq!(stats.fps(), 0.0);
        assert_eq!(stats.average(), Duration::ZERO);
    }
}
