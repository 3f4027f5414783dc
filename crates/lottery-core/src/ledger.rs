//! Winner ledger
//!
//! Maps prize number to its ordered winner list. This is the authoritative
//! draw state. A participant ID appears in at most one list at any time;
//! the ledger does not enforce this itself, the eligibility pool does by
//! never offering a current winner.

use crate::types::{Participant, PrizeNo};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, BTreeSet};

/// Prize number to winner list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WinnerLedger {
    entries: BTreeMap<PrizeNo, Vec<Participant>>,
}

impl WinnerLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Winner list for a prize, if an entry exists
    pub fn get(&self, prize_no: PrizeNo) -> Option<&[Participant]> {
        self.entries.get(&prize_no).map(Vec::as_slice)
    }

    /// Whether an entry exists for the prize, even an empty one
    pub fn has_entry(&self, prize_no: PrizeNo) -> bool {
        self.entries.contains_key(&prize_no)
    }

    /// Whether the prize currently has at least one winner
    pub fn has_winners(&self, prize_no: PrizeNo) -> bool {
        self.entries
            .get(&prize_no)
            .is_some_and(|winners| !winners.is_empty())
    }

    /// All entries in ascending prize order
    pub fn entries(&self) -> &BTreeMap<PrizeNo, Vec<Participant>> {
        &self.entries
    }

    /// IDs of every current winner across all prizes
    pub fn winner_ids(&self) -> BTreeSet<&str> {
        self.entries
            .values()
            .flatten()
            .map(|p| p.id.as_str())
            .collect()
    }

    /// Total number of winners across all prizes
    pub fn winner_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Replace the entry for a prize
    pub fn set(&mut self, prize_no: PrizeNo, winners: Vec<Participant>) {
        self.entries.insert(prize_no, winners);
    }

    /// Append winners to a prize's list, creating the entry if absent
    pub fn append(&mut self, prize_no: PrizeNo, winners: impl IntoIterator<Item = Participant>) {
        self.entries.entry(prize_no).or_default().extend(winners);
    }

    /// Remove the given IDs from a prize's list, returning the removed winners
    /// in list order. IDs not present are ignored.
    pub fn remove(&mut self, prize_no: PrizeNo, ids: &BTreeSet<&str>) -> Vec<Participant> {
        let Some(winners) = self.entries.get_mut(&prize_no) else {
            return Vec::new();
        };
        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(winners)
            .into_iter()
            .partition(|p| ids.contains(p.id.as_str()));
        *winners = kept;
        removed
    }

    /// Empty a prize's list, leaving an empty entry in place
    pub fn clear(&mut self, prize_no: PrizeNo) {
        self.entries.entry(prize_no).or_default().clear();
    }

    /// Drop every entry
    pub fn clear_all(&mut self) {
        self.entries.clear();
    }

    /// Hex SHA-256 over this ledger's winners
    ///
    /// Entries are visited in ascending prize order. Each entry contributes
    /// its prize number (big-endian) followed by every winner's ID and name,
    /// each length-prefixed so that adjacent fields cannot run together.
    pub fn checksum(&self) -> String {
        let mut hasher = Sha256::new();
        for (prize_no, winners) in &self.entries {
            hasher.update(prize_no.to_be_bytes());
            for winner in winners {
                update_field(&mut hasher, &winner.id);
                update_field(&mut hasher, &winner.name);
            }
        }
        hex::encode(hasher.finalize())
    }
}

fn update_field(hasher: &mut Sha256, field: &str) {
    hasher.update((field.len() as u64).to_be_bytes());
    hasher.update(field.as_bytes());
}

impl FromIterator<(PrizeNo, Vec<Participant>)> for WinnerLedger {
    fn from_iter<T: IntoIterator<Item = (PrizeNo, Vec<Participant>)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
