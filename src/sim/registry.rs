//! Live-instance counters per entity kind

use std::collections::BTreeMap;

use serde::Serialize;

use super::entity::EntityKind;

/// Count of live instances per kind
///
/// Owned by the scene; there is no process-wide counter, so every session
/// (and every test) starts from zero.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SpawnableRegistry {
    counts: BTreeMap<EntityKind, u32>,
}

impl SpawnableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, kind: EntityKind) {
        *self.counts.entry(kind).or_insert(0) += 1;
    }

    /// Decrement the count for `kind`
    ///
    /// Going below zero is a bookkeeping bug: it asserts in debug builds and
    /// clamps at zero in release.
    pub fn decrement(&mut self, kind: EntityKind) {
        let count = self.counts.entry(kind).or_insert(0);
        debug_assert!(*count > 0, "active count of {kind:?} decremented below zero");
        if *count == 0 {
            log::error!("Active count of {:?} decremented below zero, clamping", kind);
            return;
        }
        *count -= 1;
    }

    pub fn active_count_of(&self, kind: EntityKind) -> u32 {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    /// Sum of active counts over every kind matching `predicate`
    pub fn aggregate(&self, predicate: impl Fn(EntityKind) -> bool) -> u32 {
        self.counts
            .iter()
            .filter(|(kind, _)| predicate(**kind))
            .map(|(_, count)| *count)
            .sum()
    }

    pub fn total(&self) -> u32 {
        self.aggregate(|_| true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_unknown_kind_is_zero() {
        let registry = SpawnableRegistry::new();
        assert_eq!(registry.active_count_of(EntityKind::Drone), 0);
    }

    #[test]
    fn test_aggregate_enemies() {
        let mut registry = SpawnableRegistry::new();
        registry.increment(EntityKind::Crasher);
        registry.increment(EntityKind::Crasher);
        registry.increment(EntityKind::Drone);
        registry.increment(EntityKind::Capsule);
        registry.increment(EntityKind::Bullet);

        assert_eq!(registry.aggregate(EntityKind::is_enemy), 3);
        assert_eq!(registry.total(), 5);
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "decremented below zero")]
    fn test_underflow_asserts_in_debug() {
        let mut registry = SpawnableRegistry::new();
        registry.decrement(EntityKind::Bullet);
    }

    proptest! {
        #[test]
        fn prop_counts_match_balance(ops in proptest::collection::vec((0usize..4, any::<bool>()), 0..200)) {
            let mut registry = SpawnableRegistry::new();
            let mut expected = [0u32; 4];
            for (index, add) in ops {
                let kind = EntityKind::ALL[index];
                if add {
                    registry.increment(kind);
                    expected[index] += 1;
                } else if expected[index] > 0 {
                    registry.decrement(kind);
                    expected[index] -= 1;
                }
            }
            for (index, kind) in EntityKind::ALL.iter().enumerate() {
                prop_assert_eq!(registry.active_count_of(*kind), expected[index]);
            }
        }
    }
}
