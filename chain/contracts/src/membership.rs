//! Membership Index — per-address enumerable arena set
//!
//! Sparse-set layout: each address owns an ordered-but-mutable sequence
//! of arena ids, with a reverse map from (address, id) to the id's
//! position in that sequence. Append and removal are both O(1);
//! removal swaps the target with the last element and pops, so the
//! sequence order is stable only up to swap-pop consequences.

use std::collections::HashMap;

use types::address::Address;
use types::ids::ArenaId;

/// Per-address enumerable set of arena ids with O(1) insert/remove.
#[derive(Debug, Clone, Default)]
pub struct MembershipIndex {
    /// Sequences of arena ids per address.
    sequences: HashMap<Address, Vec<ArenaId>>,
    /// Reverse lookup: (address, id) -> position in the sequence.
    positions: HashMap<(Address, ArenaId), usize>,
}

impl MembershipIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an id to an address's sequence. O(1).
    pub fn append(&mut self, address: &Address, id: ArenaId) {
        let sequence = self.sequences.entry(address.clone()).or_default();
        self.positions
            .insert((address.clone(), id), sequence.len());
        sequence.push(id);
    }

    /// Remove an id from an address's sequence by swap-pop. O(1).
    ///
    /// The last element takes the removed element's slot and its
    /// recorded position is updated. Returns `false` if the id was not
    /// a member.
    pub fn remove(&mut self, address: &Address, id: ArenaId) -> bool {
        let Some(position) = self.positions.remove(&(address.clone(), id)) else {
            return false;
        };
        // A recorded position implies the sequence exists.
        let Some(sequence) = self.sequences.get_mut(address) else {
            return false;
        };
        let last = sequence.len() - 1;
        if position != last {
            sequence.swap(position, last);
            let moved = sequence[position];
            self.positions.insert((address.clone(), moved), position);
        }
        sequence.pop();
        true
    }

    /// The full id sequence for an address (swap-pop order).
    pub fn list(&self, address: &Address) -> &[ArenaId] {
        self.sequences.get(address).map_or(&[], Vec::as_slice)
    }

    /// Membership test.
    pub fn contains(&self, address: &Address, id: ArenaId) -> bool {
        self.positions.contains_key(&(address.clone(), id))
    }
}
