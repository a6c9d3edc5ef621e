//! Token Ledger — fungible balance, allowance, and burn primitive
//!
//! In-process collaborator consumed by the escrow engine, the fee
//! router, and the staking pool. Custody accounts are ordinary
//! addresses; the engine's pooled stakes live under the engine's own
//! address. The ledger carries its own identity so a consumer can
//! verify it was handed the token it is configured to escrow.
//!
//! Supply bookkeeping is this component's invariant: `burn` destroys
//! from a holder's balance AND from total supply, crediting no one.

use std::collections::HashMap;

use types::address::Address;
use types::numeric::Amount;

use crate::errors::LedgerError;

/// Fungible token ledger with ERC-20-shaped surface.
///
/// All arithmetic is checked; any overflow aborts the operation with
/// no mutation.
#[derive(Debug, Clone)]
pub struct TokenLedger {
    /// Identity of this ledger (the token address).
    address: Address,
    /// Account balances in base units.
    balances: HashMap<Address, Amount>,
    /// Spending allowances: (owner, spender) -> amount.
    allowances: HashMap<(Address, Address), Amount>,
    /// Circulating supply.
    total_supply: Amount,
}

impl TokenLedger {
    /// Create an empty ledger with the given token identity.
    pub fn new(address: Address) -> Self {
        Self {
            address,
            balances: HashMap::new(),
            allowances: HashMap::new(),
            total_supply: 0,
        }
    }

    /// The token address identifying this ledger.
    pub fn address(&self) -> &Address {
        &self.address
    }

    // ───────────────────────── Supply ─────────────────────────

    /// Issue new tokens to an account.
    pub fn mint(&mut self, to: &Address, amount: Amount) -> Result<(), LedgerError> {
        let new_supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        self.credit(to, amount)?;
        self.total_supply = new_supply;
        Ok(())
    }

    /// Destroy `amount` from `owner`'s balance and from circulating
    /// supply. No account is credited.
    pub fn burn(&mut self, owner: &Address, amount: Amount) -> Result<(), LedgerError> {
        self.debit(owner, amount)?;
        // Debit succeeded, so supply >= balance >= amount.
        self.total_supply -= amount;
        Ok(())
    }

    /// Circulating supply.
    pub fn total_supply(&self) -> Amount {
        self.total_supply
    }

    // ───────────────────────── Queries ─────────────────────────

    /// Balance of an account (zero if never seen).
    pub fn balance_of(&self, account: &Address) -> Amount {
        self.balances.get(account).copied().unwrap_or(0)
    }

    /// Remaining allowance from `owner` to `spender`.
    pub fn allowance(&self, owner: &Address, spender: &Address) -> Amount {
        self.allowances
            .get(&(owner.clone(), spender.clone()))
            .copied()
            .unwrap_or(0)
    }

    // ───────────────────────── Transfers ─────────────────────────

    /// Set the allowance from `owner` to `spender`.
    pub fn approve(&mut self, owner: &Address, spender: &Address, amount: Amount) {
        self.allowances
            .insert((owner.clone(), spender.clone()), amount);
    }

    /// Move tokens from one account to another.
    pub fn transfer(
        &mut self,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        self.debit(from, amount)?;
        self.credit(to, amount)?;
        Ok(())
    }

    /// Move tokens on behalf of `owner`, consuming `spender`'s allowance.
    pub fn transfer_from(
        &mut self,
        spender: &Address,
        owner: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        let allowed = self.allowance(owner, spender);
        if allowed < amount {
            return Err(LedgerError::InsufficientAllowance {
                owner: owner.clone(),
                spender: spender.clone(),
                required: amount,
                available: allowed,
            });
        }
        self.debit(owner, amount)?;
        self.credit(to, amount)?;
        self.allowances
            .insert((owner.clone(), spender.clone()), allowed - amount);
        Ok(())
    }

    /// Check that a `transfer_from` of `amount` would succeed, without
    /// moving anything. Used by multi-transfer callers to keep their
    /// operations all-or-nothing.
    pub fn check_transfer_from(
        &self,
        spender: &Address,
        owner: &Address,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        let allowed = self.allowance(owner, spender);
        if allowed < amount {
            return Err(LedgerError::InsufficientAllowance {
                owner: owner.clone(),
                spender: spender.clone(),
                required: amount,
                available: allowed,
            });
        }
        let balance = self.balance_of(owner);
        if balance < amount {
            return Err(LedgerError::InsufficientBalance {
                account: owner.clone(),
                required: amount,
                available: balance,
            });
        }
        Ok(())
    }

    // ───────────────────────── Internal bookkeeping ─────────────────────────

    fn credit(&mut self, account: &Address, amount: Amount) -> Result<(), LedgerError> {
        let balance = self.balances.entry(account.clone()).or_insert(0);
        *balance = balance.checked_add(amount).ok_or(LedgerError::Overflow)?;
        Ok(())
    }

    fn debit(&mut self, account: &Address, amount: Amount) -> Result<(), LedgerError> {
        let balance = self.balance_of(account);
        if balance < amount {
            return Err(LedgerError::InsufficientBalance {
                account: account.clone(),
                required: amount,
                available: balance,
            });
        }
        self.balances.insert(account.clone(), balance - amount);
        Ok(())
    }
}
