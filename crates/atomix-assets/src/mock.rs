//! Recording environment for unit tests.

use atomix_types::{Address, Env, Revert};

#[derive(Debug, Default)]
pub(crate) struct MockEnv {
    pub(crate) this: Address,
    pub(crate) calls: Vec<(Address, Address, u128, Vec<u8>)>,
    /// Targets whose calls fail.
    pub(crate) failing: Vec<Address>,
}

impl Env for MockEnv {
    fn this(&self) -> Address {
        self.this
    }

    fn timestamp(&self) -> u64 {
        0
    }

    fn call(&mut self, target: Address, value: u128, payload: &[u8]) -> Result<Vec<u8>, Revert> {
        if self.failing.contains(&target) {
            return Err(Revert::new("mock failure"));
        }
        self.calls.push((self.this, target, value, payload.to_vec()));
        Ok(Vec::new())
    }

    fn is_contract(&self, _address: &Address) -> bool {
        false
    }

    fn balance_of(&self, _address: &Address) -> u128 {
        0
    }
}
