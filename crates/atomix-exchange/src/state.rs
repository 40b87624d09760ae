//! Fill and approval tables of the exchange.
//!
//! Both tables are keyed by `(maker, order_hash)`. A maker can only ever
//! write its own rows, so two makers can never interfere with each other's
//! bookkeeping even when hashes collide across makers.

use std::collections::{BTreeMap, BTreeSet};

use atomix_types::{Address, H256};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExchangeState {
    fills: BTreeMap<(Address, H256), u128>,
    approvals: BTreeSet<(Address, H256)>,
}

impl ExchangeState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill recorded for an order. Zero when never touched.
    pub fn fill(&self, maker: &Address, hash: &H256) -> u128 {
        self.fills.get(&(*maker, *hash)).copied().unwrap_or(0)
    }

    pub fn set_fill(&mut self, maker: Address, hash: H256, fill: u128) {
        if fill == 0 {
            self.fills.remove(&(maker, hash));
        } else {
            self.fills.insert((maker, hash), fill);
        }
    }

    pub fn is_approved(&self, maker: &Address, hash: &H256) -> bool {
        self.approvals.contains(&(*maker, *hash))
    }

    /// Record an approval. Returns `false` if it already existed.
    pub fn approve(&mut self, maker: Address, hash: H256) -> bool {
        self.approvals.insert((maker, hash))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_are_per_maker() {
        let mut state = ExchangeState::new();
        let h = H256([1; 32]);
        let (a, b) = (Address([1; 20]), Address([2; 20]));

        state.set_fill(a, h, 3);
        assert_eq!(state.fill(&a, &h), 3);
        assert_eq!(state.fill(&b, &h), 0);

        assert!(state.approve(b, h));
        assert!(!state.approve(b, h));
        assert!(state.is_approved(&b, &h));
        assert!(!state.is_approved(&a, &h));
    }

    #[test]
    fn zero_fill_clears_the_row() {
        let mut state = ExchangeState::new();
        let (a, h) = (Address([1; 20]), H256([1; 32]));
        state.set_fill(a, h, 5);
        state.set_fill(a, h, 0);
        assert_eq!(state, ExchangeState::new());
    }
}
