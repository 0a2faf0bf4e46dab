//! The morph engine: one object tying store, animator and buffers together.

use crate::animator::MorphAnimator;
use crate::config::TreeConfig;
use crate::error::Result;
use crate::instance::{InstanceBuffer, InstanceSet, StarInstance};
use crate::particle::{Category, MorphState};
use crate::store::ParticleStore;
use crate::synth::{self, FrameInput};

/// Drives a whole particle tree from a toggle and a frame clock.
///
/// ```ignore
/// let mut engine = MorphEngine::new(TreeConfig::default())?;
/// engine.set_desired_state(MorphState::TreeShape);
///
/// // once per rendered frame
/// let instances = engine.advance_frame(time.elapsed(), time.delta());
/// upload(instances.needles.as_bytes());
/// ```
pub struct MorphEngine {
    config: TreeConfig,
    store: ParticleStore,
    animator: MorphAnimator,
    instances: InstanceSet,
    frame: u64,
}

impl MorphEngine {
    /// Generate every particle and prepare the instance buffers.
    pub fn new(config: TreeConfig) -> Result<Self> {
        let store = ParticleStore::generate(&config)?;
        let instances = InstanceSet {
            needles: InstanceBuffer::new(Category::Needles, store.records(Category::Needles)),
            ornaments: InstanceBuffer::new(Category::Ornaments, store.records(Category::Ornaments)),
            ribbons: InstanceBuffer::new(Category::Ribbons, store.records(Category::Ribbons)),
            confetti: InstanceBuffer::new(Category::Confetti, store.records(Category::Confetti)),
            star: StarInstance::new(store.star()),
        };

        log::info!(
            "generated {} particles (needles {}, ornaments {}, ribbons {}, confetti {}, star 1)",
            store.total(),
            store.len(Category::Needles),
            store.len(Category::Ornaments),
            store.len(Category::Ribbons),
            store.len(Category::Confetti),
        );

        Ok(Self {
            animator: MorphAnimator::new(config.morph_rate),
            config,
            store,
            instances,
            frame: 0,
        })
    }

    /// Set the desired state. Calling it with the current state is a no-op.
    pub fn set_desired_state(&mut self, state: MorphState) {
        self.animator.set_state(state);
    }

    /// Flip the desired state and return the new one.
    pub fn toggle(&mut self) -> MorphState {
        self.animator.toggle()
    }

    /// Run one frame.
    ///
    /// Progress is advanced first; then every category is fully
    /// resynthesized from that progress and stamped with the new frame
    /// number before the buffers are handed back.
    pub fn advance_frame(&mut self, elapsed: f64, delta: f64) -> &InstanceSet {
        self.frame += 1;
        let progress = self.animator.advance(delta);
        let input = FrameInput {
            elapsed: if elapsed.is_finite() { elapsed } else { 0.0 },
            delta,
            progress,
        };

        let mut retained = 0;
        for category in Category::INSTANCED {
            if let Some(buffer) = self.instances.buffer_mut(category) {
                retained += synth::synthesize_category(
                    self.store.records(category),
                    category.profile(),
                    &input,
                    buffer,
                    self.frame,
                );
            }
        }
        if !synth::synthesize_star(self.store.star(), &input, &mut self.instances.star, self.frame) {
            retained += 1;
        }

        if retained > 0 {
            log::warn!(
                "frame {}: {} transforms were not finite and kept their previous value",
                self.frame,
                retained
            );
        }
        &self.instances
    }

    pub fn instances(&self) -> &InstanceSet {
        &self.instances
    }

    pub fn store(&self) -> &ParticleStore {
        &self.store
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    pub fn state(&self) -> MorphState {
        self.animator.state()
    }

    pub fn progress(&self) -> f32 {
        self.animator.progress()
    }

    pub fn animator(&self) -> &MorphAnimator {
        &self.animator
    }

    /// Number of frames run so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> TreeConfig {
        TreeConfig::default()
            .with_needle_count(60)
            .with_ornament_count(12)
            .with_ribbon_count(24)
            .with_confetti_count(18)
            .with_seed(5)
    }

    #[test]
    fn test_engine_buffers_match_store() {
        let engine = MorphEngine::new(small_config()).unwrap();
        for category in Category::INSTANCED {
            let buffer = engine.instances().buffer(category).unwrap();
            assert_eq!(buffer.len(), engine.store().len(category));
        }
        assert!(engine.instances().buffer(Category::Star).is_none());
        assert_eq!(engine.frame(), 0);
    }

    #[test]
    fn test_advance_stamps_every_buffer() {
        let mut engine = MorphEngine::new(small_config()).unwrap();
        engine.advance_frame(0.016, 0.016);
        let instances = engine.advance_frame(0.032, 0.016);
        for category in Category::INSTANCED {
            assert_eq!(instances.buffer(category).unwrap().ready_frame(), 2);
        }
        assert_eq!(instances.star.ready_frame(), 2);
    }

    #[test]
    fn test_progress_updates_before_synthesis() {
        let mut engine = MorphEngine::new(small_config()).unwrap();
        engine.set_desired_state(MorphState::TreeShape);
        // A delta long enough to saturate the step lands on the tree at once,
        // and the same frame's transforms must already reflect it.
        engine.advance_frame(1.0, 5.0);
        assert_eq!(engine.progress(), 1.0);
        let records = engine.store().records(Category::Ornaments);
        let transforms = engine.instances().ornaments.transforms();
        for (record, t) in records.iter().zip(transforms) {
            assert!((t.translation - record.tree_position).length() < 1e-4);
        }
    }

    #[test]
    fn test_toggle_flips_state() {
        let mut engine = MorphEngine::new(small_config()).unwrap();
        assert_eq!(engine.state(), MorphState::Scattered);
        assert_eq!(engine.toggle(), MorphState::TreeShape);
        assert_eq!(engine.toggle(), MorphState::Scattered);
    }

    #[test]
    fn test_non_finite_elapsed_is_tolerated() {
        let mut engine = MorphEngine::new(small_config()).unwrap();
        let instances = engine.advance_frame(f64::NAN, f64::NAN);
        for category in Category::INSTANCED {
            for t in instances.buffer(category).unwrap().transforms() {
                assert!(t.is_finite());
            }
        }
        assert!(instances.star.transform().is_finite());
    }
}
