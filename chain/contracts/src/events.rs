//! Contract events
//!
//! Events are immutable records appended by successful state-changing
//! operations. Each component keeps its own append-only log; the enum
//! wrapper enables uniform draining and serialization.

use serde::{Deserialize, Serialize};
use types::address::Address;
use types::ids::ArenaId;
use types::numeric::Amount;

/// A new arena was opened and the creator's stake escrowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArenaCreated {
    pub id: ArenaId,
    pub creator: Address,
    pub amount: Amount,
}

/// An opponent matched the arena and escrowed the equal stake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArenaAccepted {
    pub id: ArenaId,
    pub opponent: Address,
}

/// An unmatched arena was withdrawn and the stake refunded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArenaCanceled {
    pub id: ArenaId,
}

/// The resolver declared a winner; payout sent, fee burned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinnerSet {
    pub id: ArenaId,
    pub winner: Address,
}

/// A caller paid the character generation fee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequested {
    pub caller: Address,
}

/// Tokens staked into the rewards pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Staked {
    pub staker: Address,
    pub amount: Amount,
}

/// Stake returned to the staker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unstaked {
    pub staker: Address,
    pub amount: Amount,
}

/// Accrued rewards paid out from the pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardsClaimed {
    pub staker: Address,
    pub amount: Amount,
}

/// The rewards pool was funded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardsToppedUp {
    pub from: Address,
    pub amount: Amount,
}

/// Enum wrapper for all contract events, enabling uniform handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContractEvent {
    ArenaCreated(ArenaCreated),
    ArenaAccepted(ArenaAccepted),
    ArenaCanceled(ArenaCanceled),
    WinnerSet(WinnerSet),
    GenerationRequested(GenerationRequested),
    Staked(Staked),
    Unstaked(Unstaked),
    RewardsClaimed(RewardsClaimed),
    RewardsToppedUp(RewardsToppedUp),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arena_created_serialization() {
        let event = ArenaCreated {
            id: ArenaId::new(0),
            creator: Address::new("alice"),
            amount: 150,
        };
        let json = serde_json::to_string(&event).unwrap();
        let deser: ArenaCreated = serde_json::from_str(&json).unwrap();
        assert_eq!(event, deser);
    }

    #[test]
    fn test_winner_set_serialization() {
        let event = ContractEvent::WinnerSet(WinnerSet {
            id: ArenaId::new(3),
            winner: Address::new("bob"),
        });
        let json = serde_json::to_string(&event).unwrap();
        let deser: ContractEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, deser);
    }

    #[test]
    fn test_contract_event_enum_variant() {
        let event = ContractEvent::ArenaCanceled(ArenaCanceled { id: ArenaId::new(9) });
        assert!(matches!(event, ContractEvent::ArenaCanceled(_)));
    }

    #[test]
    fn test_staking_event_round_trip() {
        let event = ContractEvent::RewardsClaimed(RewardsClaimed {
            staker: Address::new("carol"),
            amount: 30,
        });
        let json = serde_json::to_string(&event).unwrap();
        let deser: ContractEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, deser);
    }
}
