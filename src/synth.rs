//! Per-frame transform synthesis.
//!
//! For every particle, every frame:
//!
//! 1. an idle drift is added to the scatter position,
//! 2. the drifted position is blended toward the tree position by progress,
//! 3. an orientation is derived from the base rotation and a category spin,
//! 4. the base scale is applied,
//! 5. the result is written into the particle's instance slot.
//!
//! All instanced categories go through [`synthesize_category`] with their own
//! [`CategoryProfile`]; the star has its own routine because it pulses and
//! spins on a frame-delta clock.

use crate::instance::{InstanceBuffer, StarInstance, Transform};
use crate::particle::{CategoryProfile, ParticleRecord};
use glam::{EulerRot, Mat3, Quat, Vec3};
use std::f32::consts::{FRAC_PI_4, PI, TAU};

/// Amplitude of the idle drift, world units.
pub const DRIFT_AMPLITUDE: f32 = 0.5;
/// Progress above which needles snap to face the trunk.
pub const ORIENT_THRESHOLD: f32 = 0.8;
/// Amplitude of the star's drift in the XY plane.
pub const STAR_DRIFT_AMPLITUDE: f32 = 1.0;
/// Star yaw speed, radians per second of frame delta.
pub const STAR_SPIN_RATE: f32 = 0.5;
/// Angular frequency of the star's pulse.
pub const STAR_PULSE_FREQUENCY: f32 = 2.0;
/// Relative size swing of the star's pulse.
pub const STAR_PULSE_AMPLITUDE: f32 = 0.1;

/// Shared inputs of one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameInput {
    /// Seconds since the session started.
    pub elapsed: f64,
    /// Seconds since the previous frame.
    pub delta: f64,
    /// Morph progress written by the animator this frame.
    pub progress: f32,
}

impl FrameInput {
    /// Progress clamped to [0, 1]; NaN counts as 0.
    #[inline]
    pub fn blend(&self) -> f32 {
        if self.progress.is_nan() {
            0.0
        } else {
            self.progress.clamp(0.0, 1.0)
        }
    }
}

/// `elapsed * rate + offset` as an angle in [0, 2π).
///
/// Computed in f64 so long sessions keep their precision before narrowing.
#[inline]
fn angle(elapsed: f64, rate: f32, offset: f32) -> f32 {
    (elapsed * rate as f64 + offset as f64).rem_euclid(std::f64::consts::TAU) as f32
}

/// Idle drift of a particle at `elapsed` seconds.
///
/// Each particle oscillates at its own speed and phase so the cloud never
/// moves in lockstep.
pub fn drift(record: &ParticleRecord, elapsed: f64) -> Vec3 {
    let a = angle(elapsed, record.speed, record.phase);
    let b = angle(elapsed, record.speed * 0.5, record.phase);
    Vec3::new(a.sin(), a.cos(), b.sin()) * DRIFT_AMPLITUDE
}

/// Rendered position: drifting scatter position blended toward the tree
/// position. At `blend = 1` drift no longer applies.
#[inline]
pub fn blend_position(record: &ParticleRecord, drift: Vec3, blend: f32) -> Vec3 {
    (record.scatter_position + drift).lerp(record.tree_position, blend)
}

/// Base rotation plus a continuous spin on the X and Y axes.
pub fn spin_rotation(record: &ParticleRecord, elapsed: f64, spin_rate: f32) -> Quat {
    let (x, y, z) = record.rotation;
    Quat::from_euler(
        EulerRot::XYZ,
        angle(elapsed, spin_rate, x),
        angle(elapsed, spin_rate, y),
        z,
    )
}

/// Orientation of a needle at `position` once the tree has formed.
///
/// Local +Z points horizontally at the trunk, then the needle is turned half
/// a revolution about its own Y axis and pitched down by 45°. A particle on
/// the axis itself has no horizontal direction and keeps only the local turn.
pub fn axis_facing_rotation(position: Vec3) -> Quat {
    let to_axis = Vec3::new(-position.x, 0.0, -position.z);
    let facing = match to_axis.try_normalize() {
        Some(z) => {
            let x = Vec3::Y.cross(z).normalize();
            let y = z.cross(x);
            Quat::from_mat3(&Mat3::from_cols(x, y, z))
        }
        None => Quat::IDENTITY,
    };
    facing * Quat::from_rotation_y(PI) * Quat::from_rotation_x(-FRAC_PI_4)
}

/// Compute the transform of one particle for this frame.
pub fn particle_transform(
    record: &ParticleRecord,
    profile: CategoryProfile,
    frame: &FrameInput,
) -> Transform {
    let blend = frame.blend();
    let translation = blend_position(record, drift(record, frame.elapsed), blend);

    // Discrete snap, not a slerp: needles jump to face the trunk once the
    // tree is nearly formed.
    let rotation = if profile.orient_to_axis && blend > ORIENT_THRESHOLD {
        axis_facing_rotation(translation)
    } else {
        spin_rotation(record, frame.elapsed, profile.spin_rate)
    };

    Transform {
        translation,
        rotation,
        scale: record.scale,
    }
}

/// Rewrite every slot of one category's buffer and stamp it ready.
///
/// Returns the number of slots that kept their previous transform because
/// the new one was not finite.
pub fn synthesize_category(
    records: &[ParticleRecord],
    profile: CategoryProfile,
    frame: &FrameInput,
    buffer: &mut InstanceBuffer,
    frame_number: u64,
) -> usize {
    debug_assert_eq!(records.len(), buffer.len());
    let mut retained = 0;
    for (index, record) in records.iter().enumerate() {
        if !buffer.write(index, particle_transform(record, profile, frame)) {
            retained += 1;
        }
    }
    buffer.mark_ready(frame_number);
    retained
}

/// Pulse multiplier applied to the star's base scale.
#[inline]
pub fn star_pulse(elapsed: f64) -> f32 {
    1.0 + angle(elapsed, STAR_PULSE_FREQUENCY, 0.0).sin() * STAR_PULSE_AMPLITUDE
}

/// Update the star: its own drift, a yaw spin accumulated from frame delta
/// and a breathing pulse on top of the base scale.
pub fn synthesize_star(
    record: &ParticleRecord,
    frame: &FrameInput,
    star: &mut StarInstance,
    frame_number: u64,
) -> bool {
    let a = angle(frame.elapsed, record.speed, record.phase);
    let drift = Vec3::new(a.sin(), a.cos(), 0.0) * STAR_DRIFT_AMPLITUDE;
    let translation = blend_position(record, drift, frame.blend());

    if frame.delta.is_finite() && frame.delta > 0.0 {
        let spin = star.spin as f64 + frame.delta * STAR_SPIN_RATE as f64;
        star.spin = spin.rem_euclid(std::f64::consts::TAU) as f32;
    }
    let (x, y, z) = record.rotation;
    let rotation = Quat::from_euler(EulerRot::XYZ, x, (y + star.spin) % TAU, z);

    let written = star.write(Transform {
        translation,
        rotation,
        scale: record.scale * star_pulse(frame.elapsed),
    });
    star.mark_ready(frame_number);
    written
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particle::Category;

    fn record() -> ParticleRecord {
        ParticleRecord {
            scatter_position: Vec3::new(10.0, -4.0, 2.0),
            tree_position: Vec3::new(3.0, 1.0, -2.0),
            rotation: (0.3, 1.1, 2.0),
            scale: Vec3::new(0.15, 0.4, 0.05),
            speed: 0.4,
            phase: 1.3,
            color: None,
        }
    }

    fn frame(elapsed: f64, progress: f32) -> FrameInput {
        FrameInput {
            elapsed,
            delta: 1.0 / 60.0,
            progress,
        }
    }

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn test_drift_amplitude_bounded() {
        let r = record();
        for step in 0..500 {
            let d = drift(&r, step as f64 * 0.37);
            assert!(d.abs().max_element() <= DRIFT_AMPLITUDE + 1e-6);
        }
    }

    #[test]
    fn test_drift_differs_by_phase() {
        let a = record();
        let mut b = record();
        b.phase += 1.0;
        assert!(!close(drift(&a, 5.0), drift(&b, 5.0)));
    }

    #[test]
    fn test_endpoints() {
        let r = record();
        let profile = Category::Ornaments.profile();

        let scattered = particle_transform(&r, profile, &frame(2.0, 0.0));
        assert!(close(scattered.translation, r.scatter_position + drift(&r, 2.0)));

        let assembled = particle_transform(&r, profile, &frame(2.0, 1.0));
        assert!(close(assembled.translation, r.tree_position));
        assert_eq!(assembled.scale, r.scale);
    }

    #[test]
    fn test_out_of_range_progress_is_clamped() {
        let r = record();
        let profile = Category::Ribbons.profile();
        let over = particle_transform(&r, profile, &frame(1.0, 1.7));
        assert!(close(over.translation, r.tree_position));

        let under = particle_transform(&r, profile, &frame(1.0, -3.0));
        assert!(close(under.translation, r.scatter_position + drift(&r, 1.0)));

        let nan = particle_transform(&r, profile, &frame(1.0, f32::NAN));
        assert!(nan.is_finite());
    }

    #[test]
    fn test_spin_at_time_zero_is_base_rotation() {
        let r = record();
        let q = spin_rotation(&r, 0.0, 0.5);
        let base = Quat::from_euler(EulerRot::XYZ, 0.3, 1.1, 2.0);
        assert!(q.angle_between(base) < 1e-4);
    }

    #[test]
    fn test_spin_advances_with_time() {
        let r = record();
        let early = spin_rotation(&r, 1.0, 0.5);
        let late = spin_rotation(&r, 2.0, 0.5);
        assert!(early.angle_between(late) > 0.1);
    }

    #[test]
    fn test_needles_snap_above_threshold() {
        let r = record();
        let profile = Category::Needles.profile();

        let below = particle_transform(&r, profile, &frame(3.0, 0.79));
        assert!(below.rotation.angle_between(spin_rotation(&r, 3.0, profile.spin_rate)) < 1e-4);

        let above = particle_transform(&r, profile, &frame(3.0, 0.81));
        let expected = axis_facing_rotation(above.translation);
        assert!(above.rotation.angle_between(expected) < 1e-4);
    }

    #[test]
    fn test_other_categories_never_snap() {
        let r = record();
        for category in [Category::Ornaments, Category::Ribbons, Category::Confetti] {
            let profile = category.profile();
            let t = particle_transform(&r, profile, &frame(3.0, 1.0));
            let spin = spin_rotation(&r, 3.0, profile.spin_rate);
            assert!(t.rotation.angle_between(spin) < 1e-4);
        }
    }

    #[test]
    fn test_axis_facing_points_at_trunk() {
        let position = Vec3::new(4.0, 2.0, 0.0);
        let facing = axis_facing_rotation(position)
            * Quat::from_rotation_x(FRAC_PI_4)
            * Quat::from_rotation_y(-PI);
        let forward = facing * Vec3::Z;
        assert!(close(forward, Vec3::new(-1.0, 0.0, 0.0)));
    }

    #[test]
    fn test_axis_facing_on_axis_is_finite() {
        let q = axis_facing_rotation(Vec3::new(0.0, 5.0, 0.0));
        assert!(q.is_finite());
        assert!(q.is_normalized());
    }

    #[test]
    fn test_synthesize_category_writes_every_slot() {
        let records = vec![record(), record(), record()];
        let mut buffer = InstanceBuffer::new(Category::Confetti, &records);
        let retained = synthesize_category(
            &records,
            Category::Confetti.profile(),
            &frame(1.0, 1.0),
            &mut buffer,
            7,
        );
        assert_eq!(retained, 0);
        assert_eq!(buffer.ready_frame(), 7);
        for t in buffer.transforms() {
            assert!(close(t.translation, records[0].tree_position));
        }
    }

    #[test]
    fn test_non_finite_record_keeps_previous() {
        let mut bad = record();
        bad.tree_position = Vec3::new(f32::INFINITY, 0.0, 0.0);
        let records = vec![record(), bad];
        let mut buffer = InstanceBuffer::new(Category::Ornaments, &records);
        let before = buffer.transforms()[1];

        let retained = synthesize_category(
            &records,
            Category::Ornaments.profile(),
            &frame(1.0, 0.5),
            &mut buffer,
            1,
        );
        assert_eq!(retained, 1);
        assert_eq!(buffer.transforms()[1], before);
        assert!(buffer.transforms()[0].is_finite());
    }

    #[test]
    fn test_star_pulse_range() {
        for step in 0..200 {
            let p = star_pulse(step as f64 * 0.05);
            assert!(p >= 0.9 - 1e-6 && p <= 1.1 + 1e-6);
        }
    }

    #[test]
    fn test_star_spins_with_delta() {
        let mut r = record();
        r.rotation = (0.0, 0.0, 0.0);
        let mut star = StarInstance::new(&r);

        synthesize_star(&r, &frame(1.0, 1.0), &mut star, 1);
        let first = star.transform().rotation;
        synthesize_star(&r, &frame(1.0, 1.0), &mut star, 2);
        let second = star.transform().rotation;
        assert!((first.angle_between(second) - STAR_SPIN_RATE / 60.0).abs() < 1e-4);
        assert_eq!(star.ready_frame(), 2);
    }

    #[test]
    fn test_star_zero_delta_holds_spin() {
        let r = record();
        let mut star = StarInstance::new(&r);
        let still = FrameInput {
            elapsed: 1.0,
            delta: 0.0,
            progress: 1.0,
        };
        synthesize_star(&r, &still, &mut star, 1);
        assert_eq!(star.spin, 0.0);
        assert!(close(star.transform().translation, r.tree_position));
    }

    #[test]
    fn test_star_scale_pulses() {
        let r = record();
        let mut star = StarInstance::new(&r);
        synthesize_star(&r, &frame(0.25 * PI as f64, 1.0), &mut star, 1);
        // sin(2t) = 1 at t = π/4
        assert!(close(star.transform().scale, r.scale * 1.1));
    }
}
