//! The morph progress state machine.
//!
//! Progress is a single scalar in [0, 1]: 0 is the scattered cloud, 1 the
//! assembled tree. Each frame it moves toward the target of the current
//! [`MorphState`] by exponential smoothing scaled by frame time, so the morph
//! runs at the same speed regardless of frame rate:
//!
//! ```text
//! progress += (target - progress) * min(1, delta * rate)
//! ```
//!
//! Progress approaches its target asymptotically. Treat "fully assembled" as
//! [`MorphAnimator::is_settled`] within a tolerance, never as equality.

use crate::particle::MorphState;

/// Deltas larger than this (seconds) are logged as stalls.
const STALL_THRESHOLD: f64 = 0.25;

/// Owns the progress scalar and the desired state.
#[derive(Clone, Debug)]
pub struct MorphAnimator {
    state: MorphState,
    progress: f32,
    rate: f32,
}

impl MorphAnimator {
    /// Start fully scattered with the given smoothing rate (per second).
    pub fn new(rate: f32) -> Self {
        Self {
            state: MorphState::Scattered,
            progress: 0.0,
            rate,
        }
    }

    /// Current desired state.
    #[inline]
    pub fn state(&self) -> MorphState {
        self.state
    }

    /// Current progress in [0, 1].
    #[inline]
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Progress value the animator is converging toward.
    #[inline]
    pub fn target(&self) -> f32 {
        self.state.target()
    }

    #[inline]
    pub fn rate(&self) -> f32 {
        self.rate
    }

    /// Set the desired state. Returns `true` if it changed.
    ///
    /// Setting the current state again does nothing. A change never moves
    /// progress by itself; it only redirects the smoothing on later frames.
    pub fn set_state(&mut self, state: MorphState) -> bool {
        if self.state == state {
            return false;
        }
        log::debug!(
            "morph target {:?} -> {:?} at progress {:.3}",
            self.state,
            state,
            self.progress
        );
        self.state = state;
        true
    }

    /// Flip the desired state and return the new one.
    pub fn toggle(&mut self) -> MorphState {
        let next = self.state.toggled();
        self.set_state(next);
        next
    }

    /// Advance progress by one frame of `delta` seconds and return it.
    ///
    /// Zero, negative or non-finite deltas leave progress unchanged. A delta
    /// long enough to saturate the smoothing step lands exactly on the target.
    pub fn advance(&mut self, delta: f64) -> f32 {
        let step = smoothing_step(delta, self.rate);
        if delta > STALL_THRESHOLD {
            log::debug!("frame delta {:.3}s exceeds stall threshold", delta);
        }
        let target = self.target();
        let next = self.progress + (target - self.progress) * step;
        self.progress = if next.is_finite() {
            next.clamp(0.0, 1.0)
        } else {
            self.progress
        };
        self.progress
    }

    /// Whether progress is within `tolerance` of the target.
    pub fn is_settled(&self, tolerance: f32) -> bool {
        (self.target() - self.progress).abs() <= tolerance
    }
}

impl Default for MorphAnimator {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_MORPH_RATE)
    }
}

/// Blend factor for one frame: `min(1, delta * rate)`, zero for unusable deltas.
pub fn smoothing_step(delta: f64, rate: f32) -> f32 {
    if !delta.is_finite() || delta <= 0.0 {
        return 0.0;
    }
    let step = (delta * rate as f64).min(1.0) as f32;
    if step.is_finite() {
        step.max(0.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: f64 = 1.0 / 60.0;

    #[test]
    fn test_starts_scattered() {
        let animator = MorphAnimator::new(2.0);
        assert_eq!(animator.state(), MorphState::Scattered);
        assert_eq!(animator.progress(), 0.0);
        assert!(animator.is_settled(0.0));
    }

    #[test]
    fn test_set_state_idempotent() {
        let mut animator = MorphAnimator::new(2.0);
        assert!(!animator.set_state(MorphState::Scattered));
        assert!(animator.set_state(MorphState::TreeShape));
        assert!(!animator.set_state(MorphState::TreeShape));
        assert_eq!(animator.target(), 1.0);
    }

    #[test]
    fn test_repeated_set_does_not_alter_convergence() {
        let mut a = MorphAnimator::new(2.0);
        let mut b = MorphAnimator::new(2.0);
        a.set_state(MorphState::TreeShape);
        b.set_state(MorphState::TreeShape);
        for _ in 0..30 {
            b.set_state(MorphState::TreeShape);
            assert_eq!(a.advance(FRAME), b.advance(FRAME));
        }
    }

    #[test]
    fn test_monotonic_convergence() {
        let mut animator = MorphAnimator::new(2.0);
        animator.set_state(MorphState::TreeShape);
        let mut last = animator.progress();
        for _ in 0..200 {
            let p = animator.advance(FRAME);
            assert!(p > last, "progress must strictly increase");
            assert!(p <= 1.0);
            last = p;
        }
    }

    #[test]
    fn test_converges_after_1000_frames() {
        let mut animator = MorphAnimator::new(2.0);
        animator.set_state(MorphState::TreeShape);
        for _ in 0..1000 {
            animator.advance(FRAME);
        }
        assert!(animator.progress() > 0.99);
        assert!(animator.progress() <= 1.0);
        assert!(animator.is_settled(0.01));
    }

    #[test]
    fn test_reversal_mid_flight() {
        let mut animator = MorphAnimator::new(2.0);
        animator.set_state(MorphState::TreeShape);
        for _ in 0..20 {
            animator.advance(FRAME);
        }
        let peak = animator.progress();
        assert!(peak > 0.0 && peak < 1.0);

        animator.toggle();
        let next = animator.advance(FRAME);
        assert!(next < peak);
    }

    #[test]
    fn test_bad_deltas_do_not_advance() {
        let mut animator = MorphAnimator::new(2.0);
        animator.set_state(MorphState::TreeShape);
        animator.advance(FRAME);
        let p = animator.progress();
        assert_eq!(animator.advance(0.0), p);
        assert_eq!(animator.advance(-1.0), p);
        assert_eq!(animator.advance(f64::NAN), p);
        assert_eq!(animator.advance(f64::INFINITY), p);
    }

    #[test]
    fn test_delta_spike_lands_on_target() {
        let mut animator = MorphAnimator::new(2.0);
        animator.set_state(MorphState::TreeShape);
        assert_eq!(animator.advance(10.0), 1.0);
        animator.toggle();
        assert_eq!(animator.advance(0.5), 0.0);
    }

    #[test]
    fn test_smoothing_step() {
        assert!((smoothing_step(FRAME, 2.0) - (1.0 / 30.0)).abs() < 1e-6);
        assert_eq!(smoothing_step(1.0, 2.0), 1.0);
        assert_eq!(smoothing_step(0.0, 2.0), 0.0);
    }
}
