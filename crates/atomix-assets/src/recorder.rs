//! A call target that accepts anything and remembers what it saw.

use std::any::Any;

use atomix_types::{Address, Contract, Env, Message, Revert};

#[derive(Debug, Clone, Default)]
pub struct Recorder {
    calls: u64,
    total_value: u128,
    last_sender: Option<Address>,
}

impl Recorder {
    pub fn calls(&self) -> u64 {
        self.calls
    }

    pub fn total_value(&self) -> u128 {
        self.total_value
    }

    pub fn last_sender(&self) -> Option<Address> {
        self.last_sender
    }
}

impl Contract for Recorder {
    fn call(&mut self, _env: &mut dyn Env, msg: &Message) -> Result<Vec<u8>, Revert> {
        self.calls += 1;
        self.total_value = self.total_value.saturating_add(msg.value);
        self.last_sender = Some(msg.sender);
        Ok(Vec::new())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockEnv;

    #[test]
    fn records_calls() {
        let mut recorder = Recorder::default();
        for value in [3, 4] {
            let msg = Message {
                sender: Address([value; 20]),
                value: u128::from(value),
                payload: Vec::new(),
            };
            recorder.call(&mut MockEnv::default(), &msg).unwrap();
        }
        assert_eq!(recorder.calls(), 2);
        assert_eq!(recorder.total_value(), 7);
        assert_eq!(recorder.last_sender(), Some(Address([4; 20])));
    }
}
