//! Character generation fee router
//!
//! Collects a fixed fee to gate character generation and splits it
//! proportionally between the staking pool and the treasury. The split
//! is all-or-nothing: the caller's funds are checked up front so the
//! two outbound legs cannot partially apply.

use types::address::Address;
use types::numeric::{Amount, Bps};

use crate::errors::{GenerationError, ValidationError};
use crate::events::{ContractEvent, GenerationRequested};
use crate::security::AccessControl;
use crate::token::TokenLedger;

/// Fee router gating character generation.
#[derive(Debug)]
pub struct GenerationManager {
    /// The router's own spender identity in the ledger.
    address: Address,
    /// Identity of the token ledger fees are paid in.
    token: Address,
    /// Receives the non-staking share of each fee.
    treasury: Address,
    /// Receives the staking share of each fee.
    staking_contract: Address,
    /// Fraction of each fee routed to the staking pool.
    staking_percentage: Bps,
    /// Fixed fee per generation request.
    generation_price: Amount,
    access_control: AccessControl,
    events: Vec<ContractEvent>,
}

impl GenerationManager {
    /// Create a router. Zero addresses and a zero price are rejected.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        owner: Address,
        address: Address,
        token: Address,
        treasury: Address,
        staking_contract: Address,
        staking_percentage: Bps,
        generation_price: Amount,
    ) -> Result<Self, GenerationError> {
        if owner.is_zero()
            || address.is_zero()
            || token.is_zero()
            || treasury.is_zero()
            || staking_contract.is_zero()
        {
            return Err(ValidationError::ZeroAddress.into());
        }
        if generation_price == 0 {
            return Err(ValidationError::ZeroAmount.into());
        }
        Ok(Self {
            address,
            token,
            treasury,
            staking_contract,
            staking_percentage,
            generation_price,
            access_control: AccessControl::new(owner),
            events: Vec::new(),
        })
    }

    /// Pay the generation fee: pulls `generation_price` from the caller,
    /// routes the staking share to the staking pool and the remainder to
    /// the treasury. Emits `GenerationRequested`.
    pub fn request_generation(
        &mut self,
        ledger: &mut TokenLedger,
        caller: &Address,
    ) -> Result<ContractEvent, GenerationError> {
        self.check_token(ledger)?;
        if caller.is_zero() {
            return Err(ValidationError::ZeroAddress.into());
        }

        // Both legs must succeed or neither; verify the full price is
        // coverable before moving anything.
        ledger.check_transfer_from(&self.address, caller, self.generation_price)?;

        let staking_share = self.staking_percentage.apply(self.generation_price);
        let treasury_share = self.generation_price - staking_share;

        ledger.transfer_from(&self.address, caller, &self.staking_contract, staking_share)?;
        ledger.transfer_from(&self.address, caller, &self.treasury, treasury_share)?;

        let event = ContractEvent::GenerationRequested(GenerationRequested {
            caller: caller.clone(),
        });
        self.events.push(event.clone());
        Ok(event)
    }

    // ───────────────────────── Admin setters ─────────────────────────

    /// Change the fee token. Owner-only; zero address rejected.
    pub fn set_token(&mut self, caller: &Address, token: Address) -> Result<(), GenerationError> {
        self.check_owner(caller)?;
        if token.is_zero() {
            return Err(ValidationError::ZeroAddress.into());
        }
        self.token = token;
        Ok(())
    }

    /// Change the treasury address. Owner-only; zero address rejected.
    pub fn set_treasury(
        &mut self,
        caller: &Address,
        treasury: Address,
    ) -> Result<(), GenerationError> {
        self.check_owner(caller)?;
        if treasury.is_zero() {
            return Err(ValidationError::ZeroAddress.into());
        }
        self.treasury = treasury;
        Ok(())
    }

    /// Change the staking pool address. Owner-only; zero address rejected.
    pub fn set_staking_contract(
        &mut self,
        caller: &Address,
        staking_contract: Address,
    ) -> Result<(), GenerationError> {
        self.check_owner(caller)?;
        if staking_contract.is_zero() {
            return Err(ValidationError::ZeroAddress.into());
        }
        self.staking_contract = staking_contract;
        Ok(())
    }

    /// Change the staking share of the fee. Owner-only; zero is allowed
    /// (the entire fee then goes to the treasury).
    pub fn set_staking_percentage(
        &mut self,
        caller: &Address,
        staking_percentage: Bps,
    ) -> Result<(), GenerationError> {
        self.check_owner(caller)?;
        self.staking_percentage = staking_percentage;
        Ok(())
    }

    /// Change the generation fee. Owner-only; zero rejected.
    pub fn set_generation_price(
        &mut self,
        caller: &Address,
        generation_price: Amount,
    ) -> Result<(), GenerationError> {
        self.check_owner(caller)?;
        if generation_price == 0 {
            return Err(ValidationError::ZeroAmount.into());
        }
        self.generation_price = generation_price;
        Ok(())
    }

    // ───────────────────────── Read surface ─────────────────────────

    pub fn token(&self) -> &Address {
        &self.token
    }

    pub fn treasury(&self) -> &Address {
        &self.treasury
    }

    pub fn staking_contract(&self) -> &Address {
        &self.staking_contract
    }

    pub fn staking_percentage(&self) -> Bps {
        self.staking_percentage
    }

    pub fn generation_price(&self) -> Amount {
        self.generation_price
    }

    pub fn owner(&self) -> &Address {
        self.access_control.owner()
    }

    pub fn events(&self) -> &[ContractEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<ContractEvent> {
        std::mem::take(&mut self.events)
    }

    // ───────────────────────── Internal guards ─────────────────────────

    fn check_owner(&self, caller: &Address) -> Result<(), GenerationError> {
        if !self.access_control.is_owner(caller) {
            return Err(GenerationError::Authorization {
                caller: caller.clone(),
            });
        }
        Ok(())
    }

    fn check_token(&self, ledger: &TokenLedger) -> Result<(), GenerationError> {
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
