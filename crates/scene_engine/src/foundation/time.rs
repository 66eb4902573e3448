//! Time management utilities

use std::time::{Duration, Instant};

/// Frame timer accumulating the paced deltas reported to the application
#[derive(Debug, Clone, Default)]
pub struct Timer {
    delta_time: f32,
    total_time: f32,
    frame_count: u64,
}

impl Timer {
    /// Create a new timer
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the delta reported before the first frame has been paced
    pub fn prime(&mut self, delta_time: f32) {
        self.delta_time = delta_time;
    }

    /// Record one finished frame (should be called once per frame)
    pub fn advance(&mut self, delta_time: f32) {
        self.delta_time = delta_time;
        self.total_time += delta_time;
        self.frame_count += 1;
    }

    /// Get the time since the last frame in seconds
    #[must_use]
    pub const fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Get the total elapsed time since timer creation
    #[must_use]
    pub const fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Get the current frame count
    #[must_use]
    pub const fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get the average FPS since timer creation
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn average_fps(&self) -> f32 {
        if self.total_time > 0.0 {
            self.frame_count as f32 / self.total_time
        } else {
            0.0
        }
    }
}

/// Enforces the minimum frame time derived from a frame-rate cap.
///
/// The delta handed out by [`FramePacer::finish_frame`] is never smaller
/// than the floor: short frames are padded with a sleep and then reported
/// as exactly `1 / max_fps`.
#[derive(Debug)]
pub struct FramePacer {
    min_frame_time: Option<Duration>,
    last_frame: Instant,
}

impl FramePacer {
    /// Create a pacer for the given cap; `None` disables the floor
    #[must_use]
    pub fn new(max_fps: Option<u32>) -> Self {
        Self {
            min_frame_time: max_fps
                .filter(|fps| *fps > 0)
                .map(|fps| Duration::from_secs_f64(1.0 / f64::from(fps))),
            last_frame: Instant::now(),
        }
    }

    /// The configured floor, if any
    #[must_use]
    pub const fn min_frame_time(&self) -> Option<Duration> {
        self.min_frame_time
    }

    /// Delta to report before any frame has completed
    #[must_use]
    pub fn initial_delta(&self) -> f32 {
        self.min_frame_time.map_or(0.0, |d| d.as_secs_f32())
    }

    /// Restart the measurement window (called when the loop starts)
    pub fn reset(&mut self) {
        self.last_frame = Instant::now();
    }

    /// Compute how long to sleep and which delta to report for a frame that
    /// took `elapsed`.
    #[must_use]
    pub fn pace(elapsed: Duration, min_frame_time: Option<Duration>) -> (Duration, Duration) {
        match min_frame_time {
            Some(min) if elapsed < min => (min - elapsed, min),
            _ => (Duration::ZERO, elapsed),
        }
    }

    /// Finish the current frame: block for the remainder of the floor and
    /// return the delta in seconds.
    pub fn finish_frame(&mut self) -> f32 {
        let elapsed = self.last_frame.elapsed();
        let (sleep, delta) = Self::pace(elapsed, self.min_frame_time);
        if !sleep.is_zero() {
            std::thread::sleep(sleep);
        }
        self.last_frame = Instant::now();
        delta.as_secs_f32()
    }
}
