//! Staking rewards pool
//!
//! Accrues token rewards linearly over time to stakers. Accrual is
//! settled lazily: every stake, unstake, and claim first folds the
//! elapsed interval into the staker's owed balance. A staker with a
//! nonzero stake accrues `rate` base units per second, never earlier
//! than `start_time`. Rewards are paid from a pool funded via
//! `top_up_rewards`; staked principal and the pool share the custody
//! address but are tracked separately.
//!
//! Time is an explicit `now` parameter: the host orders transactions
//! and supplies timestamps, so the pool itself never reads a clock.

use std::collections::HashMap;

use types::address::Address;
use types::numeric::Amount;

use crate::errors::{LedgerError, StakingError, ValidationError};
use crate::events::{ContractEvent, RewardsClaimed, RewardsToppedUp, Staked, Unstaked};
use crate::token::TokenLedger;

/// Per-staker accounting.
#[derive(Debug, Clone, Default)]
struct StakePosition {
    /// Principal currently staked.
    staked: Amount,
    /// Rewards accrued but not yet claimed.
    owed: Amount,
    /// Timestamp up to which accrual has been settled.
    last_update: u64,
}

/// Linear staking rewards pool.
#[derive(Debug)]
pub struct StakingPool {
    /// Custody account holding principal and the rewards pool.
    address: Address,
    /// Identity of the token ledger (stakes and rewards share it).
    token: Address,
    /// Reward accrual in base units per second.
    rate: Amount,
    /// Accrual never starts before this timestamp.
    start_time: u64,
    /// Portion of custody earmarked for rewards.
    rewards_pool: Amount,
    positions: HashMap<Address, StakePosition>,
    events: Vec<ContractEvent>,
}

impl StakingPool {
    /// Create a pool. Zero addresses are rejected.
    pub fn new(
        address: Address,
        token: Address,
        rate: Amount,
        start_time: u64,
    ) -> Result<Self, StakingError> {
        if address.is_zero() || token.is_zero() {
            return Err(ValidationError::ZeroAddress.into());
        }
        Ok(Self {
            address,
            token,
            rate,
            start_time,
            rewards_pool: 0,
            positions: HashMap::new(),
            events: Vec::new(),
        })
    }

    /// Fund the rewards pool from the caller's balance.
    pub fn top_up_rewards(
        &mut self,
        ledger: &mut TokenLedger,
        caller: &Address,
        amount: Amount,
    ) -> Result<(), StakingError> {
        self.check_token(ledger)?;
        if amount == 0 {
            return Err(ValidationError::ZeroAmount.into());
        }
        ledger.transfer_from(&self.address, caller, &self.address, amount)?;
        self.rewards_pool = self
            .rewards_pool
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        self.events
            .push(ContractEvent::RewardsToppedUp(RewardsToppedUp {
                from: caller.clone(),
                amount,
            }));
        Ok(())
    }

    /// Stake principal. Settles accrual up to `now` first.
    pub fn stake(
        &mut self,
        ledger: &mut TokenLedger,
        caller: &Address,
        amount: Amount,
        now: u64,
    ) -> Result<(), StakingError> {
        self.check_token(ledger)?;
        if caller.is_zero() {
            return Err(ValidationError::ZeroAddress.into());
        }
        if amount == 0 {
            return Err(ValidationError::ZeroAmount.into());
        }

        ledger.transfer_from(&self.address, caller, &self.address, amount)?;

        self.settle(caller, now)?;
        let position = self.positions.entry(caller.clone()).or_default();
        position.staked = position
            .staked
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;

        self.events.push(ContractEvent::Staked(Staked {
            staker: caller.clone(),
            amount,
        }));
        Ok(())
    }

    /// Return principal to the staker. Settles accrual up to `now`
    /// first; owed rewards survive unstaking.
    pub fn unstake(
        &mut self,
        ledger: &mut TokenLedger,
        caller: &Address,
        amount: Amount,
        now: u64,
    ) -> Result<(), StakingError> {
        self.check_token(ledger)?;
        if amount == 0 {
            return Err(ValidationError::ZeroAmount.into());
        }
        let staked = self
            .positions
            .get(caller)
            .map(|p| p.staked)
            .unwrap_or(0);
        if staked < amount {
            return Err(StakingError::InsufficientStake {
                staker: caller.clone(),
                requested: amount,
                staked,
            });
        }

        self.settle(caller, now)?;
        if let Some(position) = self.positions.get_mut(caller) {
            position.staked -= amount;
        }

        // Principal leaves custody only after the position is reduced.
        ledger.transfer(&self.address, caller, amount)?;

        self.events.push(ContractEvent::Unstaked(Unstaked {
            staker: caller.clone(),
            amount,
        }));
        Ok(())
    }

    /// Pay out all owed rewards from the pool.
    pub fn claim(
        &mut self,
        ledger: &mut TokenLedger,
        caller: &Address,
        now: u64,
    ) -> Result<Amount, StakingError> {
        self.check_token(ledger)?;
        self.settle(caller, now)?;

        let owed = self.positions.get(caller).map(|p| p.owed).unwrap_or(0);
        if owed == 0 {
            return Ok(0);
        }
        if owed > self.rewards_pool {
            return Err(StakingError::InsufficientRewardsPool {
                owed,
                available: self.rewards_pool,
            });
        }

        if let Some(position) = self.positions.get_mut(caller) {
            position.owed = 0;
        }
        self.rewards_pool -= owed;

        ledger.transfer(&self.address, caller, owed)?;

        self.events.push(ContractEvent::RewardsClaimed(RewardsClaimed {
            staker: caller.clone(),
            amount: owed,
        }));
        Ok(owed)
    }

    // ───────────────────────── Read surface ─────────────────────────

    /// Rewards owed to a staker as of `now` (settled + pending).
    pub fn owed(&self, staker: &Address, now: u64) -> Amount {
        let Some(position) = self.positions.get(staker) else {
            return 0;
        };
        position.owed + self.pending_accrual(position, now)
    }

    /// Principal currently staked by an address.
    pub fn staked(&self, staker: &Address) -> Amount {
        self.positions.get(staker).map(|p| p.staked).unwrap_or(0)
    }

    /// Unclaimed rewards funding currently available.
    pub fn rewards_pool(&self) -> Amount {
        self.rewards_pool
    }

    pub fn rate(&self) -> Amount {
        self.rate
    }

    pub fn start_time(&self) -> u64 {
        self.start_time
    }

    pub fn token(&self) -> &Address {
        &self.token
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn events(&self) -> &[ContractEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<ContractEvent> {
        std::mem::take(&mut self.events)
    }

    // ───────────────────────── Internal accrual ─────────────────────────

    /// Accrual since the position's last settlement, clamped to
    /// `start_time` and to non-negative elapsed time.
    fn pending_accrual(&self, position: &StakePosition, now: u64) -> Amount {
        if position.staked == 0 {
            return 0;
        }
        let from = position.last_update.max(self.start_time);
        let elapsed = now.saturating_sub(from);
        self.rate.saturating_mul(Amount::from(elapsed))
    }

    /// Fold pending accrual into the owed balance and advance the
    /// settlement timestamp.
    fn settle(&mut self, staker: &Address, now: u64) -> Result<(), StakingError> {
        let accrued = self
            .positions
            .get(staker)
            .map(|p| self.pending_accrual(p, now))
            .unwrap_or(0);
        let position = self.positions.entry(staker.clone()).or_default();
        position.owed = position.owed.checked_add(accrued).ok_or(LedgerError::Overflow)?;
        position.last_update = position.last_update.max(now).max(self.start_time);
        Ok(())
    }

    fn check_token(&self, ledger: &TokenLedger) -> Result<(), StakingError> {
        if *ledger.address() != self.token {
            return Err(ValidationError::TokenMismatch {
                expected: self.token.clone(),
                actual: ledger.address().clone(),
            }
            .into());
        }
        Ok(())
    }
}
