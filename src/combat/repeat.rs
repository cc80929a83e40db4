use std::collections::HashSet;

use crate::equipment::AttackId;

/// Per-action scratch state for chained strikes.
///
/// `count` is the number of dispatch rounds so far. An attack instance feeds
/// the chain at most once, and an enemy chosen as a chain target (or the seed
/// it chained from) is never chosen again within the same action.
#[derive(Debug, Clone, Default)]
pub struct RepeatTracker {
    pub count: u32,
    targets: HashSet<String>,
    attacks: HashSet<AttackId>,
}

impl RepeatTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.count = 0;
        self.targets.clear();
        self.attacks.clear();
    }

    /// Record that `attack` resolved. Returns false if it already had.
    pub fn record_attack(&mut self, attack: AttackId) -> bool {
        self.attacks.insert(attack)
    }

    pub fn has_attack(&self, attack: AttackId) -> bool {
        self.attacks.contains(&attack)
    }

    pub fn exclude(&mut self, entity_key: &str) {
        self.targets.insert(entity_key.to_string());
    }

    pub fn is_excluded(&self, entity_key: &str) -> bool {
        self.targets.contains(entity_key)
    }

    pub fn excluded(&self) -> &HashSet<String> {
        &self.targets
    }
}
