//! A fungible token ledger with allowances.

use std::any::Any;
use std::collections::BTreeMap;

use atomix_types::{Address, Contract, Env, Message, Revert, decode_payload, require};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FungibleCall {
    /// Minter only.
    Mint { to: Address, amount: u128 },
    Transfer { to: Address, amount: u128 },
    /// Spend `from`'s balance under the sender's allowance.
    TransferFrom { from: Address, to: Address, amount: u128 },
    Approve { spender: Address, amount: u128 },
}

#[derive(Debug, Clone, Default)]
pub struct FungibleToken {
    minter: Address,
    balances: BTreeMap<Address, u128>,
    allowances: BTreeMap<(Address, Address), u128>,
}

impl FungibleToken {
    #[must_use]
    pub fn new(minter: Address) -> Self {
        Self {
            minter,
            ..Self::default()
        }
    }

    pub fn balance_of(&self, owner: &Address) -> u128 {
        self.balances.get(owner).copied().unwrap_or(0)
    }

    pub fn allowance(&self, owner: &Address, spender: &Address) -> u128 {
        self.allowances.get(&(*owner, *spender)).copied().unwrap_or(0)
    }

    fn move_balance(&mut self, from: Address, to: Address, amount: u128) -> Result<(), Revert> {
        let available = self.balance_of(&from);
        require!(available >= amount, "insufficient token balance");
        self.balances.insert(from, available - amount);
        let credited = self
            .balance_of(&to)
            .checked_add(amount)
            .ok_or_else(|| Revert::new("token balance overflow"))?;
        self.balances.insert(to, credited);
        Ok(())
    }
}

impl Contract for FungibleToken {
    fn call(&mut self, _env: &mut dyn Env, msg: &Message) -> Result<Vec<u8>, Revert> {
        require!(msg.value == 0, "token does not accept value");
        match decode_payload(&msg.payload)? {
            FungibleCall::Mint { to, amount } => {
                require!(msg.sender == self.minter, "only the minter may mint");
                let credited = self
                    .balance_of(&to)
                    .checked_add(amount)
                    .ok_or_else(|| Revert::new("token balance overflow"))?;
                self.balances.insert(to, credited);
            }
            FungibleCall::Transfer { to, amount } => self.move_balance(msg.sender, to, amount)?,
            FungibleCall::TransferFrom { from, to, amount } => {
                if from != msg.sender {
                    let allowed = self.allowance(&from, &msg.sender);
                    require!(allowed >= amount, "allowance exceeded");
                    self.allowances.insert((from, msg.sender), allowed - amount);
                }
                self.move_balance(from, to, amount)?;
            }
            FungibleCall::Approve { spender, amount } => {
                self.allowances.insert((msg.sender, spender), amount);
            }
        }
        Ok(Vec::new())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
