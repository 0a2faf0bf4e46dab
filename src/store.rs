//! The session's particle records, grouped by category.

use crate::config::TreeConfig;
use crate::error::Result;
use crate::generate;
use crate::particle::{Category, ParticleRecord};

/// Immutable collection of every particle record for one session.
///
/// Built once from a [`TreeConfig`]; records are never added, removed or
/// reordered afterwards, so slot `i` of a category's instance buffer always
/// belongs to record `i`.
#[derive(Clone, Debug)]
pub struct ParticleStore {
    needles: Vec<ParticleRecord>,
    ornaments: Vec<ParticleRecord>,
    ribbons: Vec<ParticleRecord>,
    confetti: Vec<ParticleRecord>,
    star: ParticleRecord,
}

impl ParticleStore {
    /// Generate all categories.
    ///
    /// A configured count of zero leaves that category empty instead of
    /// failing, so partial trees (for example needles only) can be built.
    pub fn generate(config: &TreeConfig) -> Result<Self> {
        config.validate()?;
        let seed = config.seed;

        let build = |category: Category| -> Result<Vec<ParticleRecord>> {
            match config.count(category) {
                0 => Ok(Vec::new()),
                count => generate::generate(category, count, config, seed),
            }
        };

        Ok(Self {
            needles: build(Category::Needles)?,
            ornaments: build(Category::Ornaments)?,
            ribbons: build(Category::Ribbons)?,
            confetti: build(Category::Confetti)?,
            star: generate::star(config, seed)?,
        })
    }

    /// Records of one category. The star category yields a single record.
    pub fn records(&self, category: Category) -> &[ParticleRecord] {
        match category {
            Category::Needles => &self.needles,
            Category::Ornaments => &self.ornaments,
            Category::Ribbons => &self.ribbons,
            Category::Confetti => &self.confetti,
            Category::Star => std::slice::from_ref(&self.star),
        }
    }

    pub fn star(&self) -> &ParticleRecord {
        &self.star
    }

    /// Number of records in a category.
    pub fn len(&self, category: Category) -> usize {
        self.records(category).len()
    }

    /// Total number of records, star included.
    pub fn total(&self) -> usize {
        Category::ALL.iter().map(|&c| self.len(c)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_store_sizes_follow_config() {
        let config = TreeConfig::default()
            .with_needle_count(100)
            .with_ornament_count(10)
            .with_ribbon_count(40)
            .with_confetti_count(20)
            .with_seed(1);
        let store = ParticleStore::generate(&config).unwrap();
        assert_eq!(store.len(Category::Needles), 100);
        assert_eq!(store.len(Category::Ornaments), 10);
        assert_eq!(store.len(Category::Ribbons), 40);
        assert_eq!(store.len(Category::Confetti), 20);
        assert_eq!(store.len(Category::Star), 1);
        assert_eq!(store.total(), config.total_count());
    }

    #[test]
    fn test_zero_count_disables_category() {
        let config = TreeConfig::default()
            .with_needle_count(4)
            .with_ornament_count(0)
            .with_ribbon_count(0)
            .with_confetti_count(0)
            .with_seed(2);
        let store = ParticleStore::generate(&config).unwrap();
        assert_eq!(store.len(Category::Needles), 4);
        assert!(store.records(Category::Ornaments).is_empty());
        assert!(store.records(Category::Ribbons).is_empty());
        assert!(store.records(Category::Confetti).is_empty());
    }

    #[test]
    fn test_invalid_config_fails() {
        let config = TreeConfig::default().with_tree_size(18.0, 0.0);
        assert!(matches!(
            ParticleStore::generate(&config),
            Err(Error::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_seeded_store_is_reproducible() {
        let config = TreeConfig::default()
            .with_needle_count(50)
            .with_ornament_count(5)
            .with_ribbon_count(6)
            .with_confetti_count(7)
            .with_seed(77);
        let a = ParticleStore::generate(&config).unwrap();
        let b = ParticleStore::generate(&config).unwrap();
        for category in Category::ALL {
            assert_eq!(a.records(category), b.records(category));
        }
    }
}
