//! Score ledger
//!
//! Totals never go negative: a negative adjustment larger than the total
//! bottoms out at zero.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreLedger {
    total: u64,
}

impl ScoreLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// Add points (negative subtracts, clamped at zero); returns the new total
    pub fn add_score(&mut self, points: i64) -> u64 {
        self.total = if points >= 0 {
            self.total.saturating_add(points as u64)
        } else {
            self.total.saturating_sub(points.unsigned_abs())
        };
        self.total
    }

    pub fn reset(&mut self) {
        self.total = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulates() {
        let mut ledger = ScoreLedger::new();
        ledger.add_score(20);
        assert_eq!(ledger.add_score(30), 50);
    }

    #[test]
    fn test_clamps_at_zero() {
        let mut ledger = ScoreLedger::new();
        ledger.add_score(10);
        assert_eq!(ledger.add_score(-25), 0);
        assert_eq!(ledger.add_score(i64::MIN), 0);
    }

    #[test]
    fn test_reset() {
        let mut ledger = ScoreLedger::new();
        ledger.add_score(99);
        ledger.reset();
        assert_eq!(ledger.total(), 0);
    }
}
