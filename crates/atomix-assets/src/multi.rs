//! A multi-token ledger: many fungible ids under one contract.

use std::any::Any;
use std::collections::{BTreeMap, BTreeSet};

use atomix_types::{Address, Contract, Env, Message, Revert, decode_payload, require};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MultiTokenCall {
    /// Minter only.
    Mint { to: Address, id: u128, amount: u128 },
    /// Owner or an approved operator of the owner.
    SafeTransferFrom {
        from: Address,
        to: Address,
        id: u128,
        amount: u128,
    },
    SetApprovalForAll { operator: Address, approved: bool },
}

#[derive(Debug, Clone, Default)]
pub struct MultiToken {
    minter: Address,
    balances: BTreeMap<(u128, Address), u128>,
    operators: BTreeSet<(Address, Address)>,
}

impl MultiToken {
    #[must_use]
    pub fn new(minter: Address) -> Self {
        Self {
            minter,
            ..Self::default()
        }
    }

    pub fn balance_of(&self, owner: &Address, id: u128) -> u128 {
        self.balances.get(&(id, *owner)).copied().unwrap_or(0)
    }

    pub fn is_approved_for_all(&self, owner: &Address, operator: &Address) -> bool {
        self.operators.contains(&(*owner, *operator))
    }

    fn credit(&mut self, to: Address, id: u128, amount: u128) -> Result<(), Revert> {
        let credited = self
            .balance_of(&to, id)
            .checked_add(amount)
            .ok_or_else(|| Revert::new("token balance overflow"))?;
        self.balances.insert((id, to), credited);
        Ok(())
    }
}

impl Contract for MultiToken {
    fn call(&mut self, _env: &mut dyn Env, msg: &Message) -> Result<Vec<u8>, Revert> {
        require!(msg.value == 0, "token does not accept value");
        match decode_payload(&msg.payload)? {
            MultiTokenCall::Mint { to, id, amount } => {
                require!(msg.sender == self.minter, "only the minter may mint");
                self.credit(to, id, amount)?;
            }
            MultiTokenCall::SafeTransferFrom {
                from,
                to,
                id,
                amount,
            } => {
                require!(
                    msg.sender == from || self.is_approved_for_all(&from, &msg.sender),
                    "caller is not owner nor approved"
                );
                let available = self.balance_of(&from, id);
                require!(available >= amount, "insufficient balance for transfer");
                self.balances.insert((id, from), available - amount);
                self.credit(to, id, amount)?;
            }
            MultiTokenCall::SetApprovalForAll { operator, approved } => {
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
