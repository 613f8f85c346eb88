//! Frame timing for render loops

use std::time::{Duration, Instant};

/// Tracks per-frame deltas and total run time of a render loop
pub struct FrameClock {
    started: Instant,
    last_frame: Instant,
    delta: Duration,
    frames: u64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    /// Start a new clock
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            started: now,
            last_frame: now,
            delta: Duration::ZERO,
            frames: 0,
        }
    }

    /// Mark the end of a frame, returning the time since the previous one
    pub fn tick(&mut self) -> Duration {
        let now = Instant::now();
        self.delta = now.duration_since(self.last_frame);
        self.last_frame = now;
        self.frames += 1;
        self.delta
    }

    /// Duration of the last completed frame
    pub fn delta(&self) -> Duration {
        self.delta
    }

    /// Time since the clock was started
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Number of completed frames
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Average frames per second since the clock was started
    #[allow(clippy::cast_precision_loss)]
    pub fn average_fps(&self) -> f32 {
        let secs = self.elapsed().as_secs_f32();
        if secs > 0.0 {
            self.frames as f32 / secs
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_counts_frames() {
        let mut clock = FrameClock::new();
        clock.tick();
        clock.tick();
        assert_eq!(clock.frames(), 2);
        assert!(clock.elapsed() >= clock.delta());
    }
}
