use serde::Deserialize;

use crate::core::Tier;
use crate::error::SimError;

/// Every priority up to and including `max_priority` lands on `tier`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PriorityClass {
    pub max_priority: i64,
    pub tier: Tier,
}

/// Ordered `{priority range -> tier}` table used for MLQ admission.
///
/// Classes are checked in order; the first class whose bound covers the
/// priority wins. Priorities above every bound fall through to `fallback`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassTable {
    classes: Vec<PriorityClass>,
    fallback: Tier,
}

impl ClassTable {
    pub fn new(classes: Vec<PriorityClass>, fallback: Tier) -> Self {
        Self { classes, fallback }
    }

    pub fn classes(&self) -> &[PriorityClass] {
        &self.classes
    }

    pub fn fallback(&self) -> Tier {
        self.fallback
    }

    /// Rejects tables that point past the last tier or whose bounds are not
    /// strictly increasing.
    pub fn validate(&self, num_tiers: usize) -> Result<(), SimError> {
        let tiers = self
            .classes
            .iter()
            .map(|class| class.tier)
            .chain(std::iter::once(self.fallback));
        for tier in tiers {
            if tier >= num_tiers {
                return Err(SimError::TierOutOfRange { tier, num_tiers });
            }
        }

        for pair in self.classes.windows(2) {
            if pair[0].max_priority >= pair[1].max_priority {
                return Err(SimError::UnsortedClasses {
                    bound: pair[1].max_priority,
                    previous: pair[0].max_priority,
                });
            }
        }

        Ok(())
    }

    pub fn classify(&self, priority: i64) -> Tier {
        self.classes
            .iter()
            .find(|class| priority <= class.max_priority)
            .map_or(self.fallback, |class| class.tier)
    }
}

impl Default for ClassTable {
    fn default() -> Self {
        Self::new(
            vec![
                PriorityClass {
                    max_priority: 1,
                    tier: 0,
                },
                PriorityClass {
                    max_priority: 3,
                    tier: 1,
                },
            ],
            2,
        )
    }
}
