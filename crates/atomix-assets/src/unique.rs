//! A non-fungible token ledger with operator approval.

use std::any::Any;
use std::collections::{BTreeMap, BTreeSet};

use atomix_types::{Address, Contract, Env, Message, Revert, decode_payload, require};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UniqueCall {
    /// Minter only.
    Mint { to: Address, id: u128 },
    /// Owner or an approved operator of the owner.
    TransferFrom { from: Address, to: Address, id: u128 },
    SetApprovalForAll { operator: Address, approved: bool },
}

#[derive(Debug, Clone, Default)]
pub struct UniqueToken {
    minter: Address,
    owners: BTreeMap<u128, Address>,
    operators: BTreeSet<(Address, Address)>,
}

impl UniqueToken {
    #[must_use]
    pub fn new(minter: Address) -> Self {
        Self {
            minter,
            ..Self::default()
        }
    }

    pub fn owner_of(&self, id: u128) -> Option<Address> {
        self.owners.get(&id).copied()
    }

    pub fn is_approved_for_all(&self, owner: &Address, operator: &Address) -> bool {
        self.operators.contains(&(*owner, *operator))
    }
}

impl Contract for UniqueToken {
    fn call(&mut self, _env: &mut dyn Env, msg: &Message) -> Result<Vec<u8>, Revert> {
        require!(msg.value == 0, "token does not accept value");
        match decode_payload(&msg.payload)? {
            UniqueCall::Mint { to, id } => {
                require!(msg.sender == self.minter, "only the minter may mint");
                require!(!self.owners.contains_key(&id), "token already minted");
                self.owners.insert(id, to);
            }
            UniqueCall::TransferFrom { from, to, id } => {
                require!(self.owner_of(id) == Some(from), "transfer from incorrect owner");
                require!(
                    msg.sender == from || self.is_approved_for_all(&from, &msg.sender),
                    "caller is not owner nor approved"
                );
                self.owners.insert(id, to);
            }
            UniqueCall::SetApprovalForAll { operator, approved } => {
                if approved {
                    self.operators.insert((msg.sender, operator));
                } else {
                    self.operators.remove(&(msg.sender, operator));
                }
            }
        }
        Ok(Vec::new())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
