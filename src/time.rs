//! Frame clock.
//!
//! Produces the `(elapsed, delta)` pair the engine expects once per frame, in
//! f64 seconds.
//!
//! # Example
//!
//! ```ignore
//! use treemorph::time::Time;
//!
//! let mut time = Time::new();
//!
//! // In your frame loop:
//! let (elapsed, delta) = time.update();
//! engine.advance_frame(elapsed, delta);
//! ```

use std::time::{Duration, Instant};

/// Time tracking for the frame loop.
///
/// Tracks elapsed time, delta time, frame count and FPS, with pause and
/// fixed-delta support.
#[derive(Debug)]
pub struct Time {
    /// When the timer was created.
    start: Instant,
    /// When the last frame occurred.
    last_frame: Instant,
    /// Total elapsed time in seconds, excluding paused time.
    elapsed_secs: f64,
    /// Time since last frame in seconds.
    delta_secs: f64,
    /// Total frames since start.
    frame_count: u64,
    /// Calculated FPS (updated periodically).
    fps: f64,
    /// Frame count at last FPS update.
    fps_frame_count: u64,
    /// Time of last FPS calculation.
    fps_update_time: Instant,
    /// How often to update FPS calculation.
    fps_update_interval: Duration,
    /// Whether time is paused.
    paused: bool,
    /// Total time spent paused.
    pause_elapsed: Duration,
    /// Fixed delta time for deterministic updates (optional).
    fixed_delta: Option<f64>,
}

impl Time {
    /// Create a new time tracker starting from now.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_frame: now,
            elapsed_secs: 0.0,
            delta_secs: 0.0,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: now,
            fps_update_interval: Duration::from_millis(500),
            paused: false,
            pause_elapsed: Duration::ZERO,
            fixed_delta: None,
        }
    }

    /// Update timing values. Call once per frame.
    ///
    /// Returns `(elapsed_time, delta_time)` for convenience.
    pub fn update(&mut self) -> (f64, f64) {
        let now = Instant::now();

        if self.paused {
            self.delta_secs = 0.0;
            return (self.elapsed_secs, self.delta_secs);
        }

        let raw_delta = now.duration_since(self.last_frame).as_secs_f64();
        self.last_frame = now;

        match self.fixed_delta {
            Some(fixed) => {
                self.delta_secs = fixed;
                self.elapsed_secs += fixed;
            }
            None => {
                self.delta_secs = raw_delta;
                let raw_elapsed = now.duration_since(self.start).saturating_sub(self.pause_elapsed);
                self.elapsed_secs = raw_elapsed.as_secs_f64();
            }
        }

        self.frame_count += 1;

        let fps_elapsed = now.duration_since(self.fps_update_time);
        if fps_elapsed >= self.fps_update_interval {
            let frames_since = self.frame_count - self.fps_frame_count;
            self.fps = frames_since as f64 / fps_elapsed.as_secs_f64();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
        }

        (self.elapsed_secs, self.delta_secs)
    }

    /// Total elapsed time in seconds since start.
    #[inline]
    pub fn elapsed(&self) -> f64 {
        self.elapsed_secs
    }

    /// Time since last frame in seconds.
    #[inline]
    pub fn delta(&self) -> f64 {
        self.delta_secs
    }

    /// Total frames since start.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Calculated frames per second.
    #[inline]
    pub fn fps(&self) -> f64 {
        self.fps
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Pause time progression.
    ///
    /// While paused, `delta()` returns 0 and `elapsed()` stops increasing.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resume time progression after pausing.
    pub fn resume(&mut self) {
        if self.paused {
            let now = Instant::now();
            self.pause_elapsed += now.duration_since(self.last_frame);
            self.last_frame = now;
            self.paused = false;
        }
    }

    /// Toggle pause state.
    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
    }

    /// Use a fixed delta per update instead of wall-clock time.
    ///
    /// Elapsed time then advances by exactly that amount each frame. Pass
    /// `None` to go back to real frame timing.
    pub fn set_fixed_delta(&mut self, delta: Option<f64>) {
        self.fixed_delta = delta;
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}
