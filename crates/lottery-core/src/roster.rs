//! Roster and blacklist index
//!
//! Both are filled once by a loader at session start, or replaced wholesale
//! by a snapshot load. Ordered maps keep iteration stable so that a seeded
//! engine draws the same winners on every run.

use crate::types::{Blacklist, Participant, Prize, PrizeNo};
use std::collections::{BTreeMap, BTreeSet};

/// Participants keyed by ID and prizes keyed by number
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    participants: BTreeMap<String, Participant>,
    prizes: BTreeMap<PrizeNo, Prize>,
}

impl Roster {
    /// Create an empty roster
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all participants. Later entries win on duplicate IDs.
    pub fn set_participants(&mut self, participants: impl IntoIterator<Item = Participant>) {
        self.participants = participants
            .into_iter()
            .map(|p| (p.id.clone(), p))
            .collect();
    }

    /// Replace all prizes. Later entries win on duplicate numbers.
    pub fn set_prizes(&mut self, prizes: impl IntoIterator<Item = Prize>) {
        self.prizes = prizes.into_iter().map(|p| (p.no, p)).collect();
    }

    /// All participants keyed by ID
    pub fn participants(&self) -> &BTreeMap<String, Participant> {
        &self.participants
    }

    /// All prizes keyed by number
    pub fn prizes(&self) -> &BTreeMap<PrizeNo, Prize> {
        &self.prizes
    }

    /// Look up a participant
    pub fn participant(&self, id: &str) -> Option<&Participant> {
        self.participants.get(id)
    }

    /// Look up a prize
    pub fn prize(&self, no: PrizeNo) -> Option<&Prize> {
        self.prizes.get(&no)
    }
}

/// Blacklist entries keyed by threshold
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlacklistIndex {
    entries: BTreeMap<PrizeNo, Blacklist>,
}

impl BlacklistIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index, merging entries that share a threshold
    pub fn from_entries(entries: impl IntoIterator<Item = Blacklist>) -> Self {
        let mut index = Self::new();
        for entry in entries {
            index.insert(entry);
        }
        index
    }

    /// Add an entry, merging its IDs into any entry with the same threshold
    pub fn insert(&mut self, entry: Blacklist) {
        self.entries
            .entry(entry.threshold)
            .or_insert_with(|| Blacklist::new(entry.threshold, Vec::<String>::new()))
            .ids
            .extend(entry.ids);
    }

    /// Entries keyed by threshold
    pub fn entries(&self) -> &BTreeMap<PrizeNo, Blacklist> {
        &self.entries
    }

    /// Number of distinct thresholds
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// IDs excluded from the given prize by any applicable entry
    pub fn excluded_for(&self, prize_no: PrizeNo) -> BTreeSet<&str> {
        // Entries with threshold <= prize_no never apply.
        self.entries
            .range(prize_no.saturating_add(1)..)
            .filter(|(_, entry)| entry.applies_to(prize_no))
            .flat_map(|(_, entry)| entry.ids.iter().map(String::as_str))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_participant_ids_keep_last_row() {
        let mut roster = Roster::new();
        roster.set_participants([
            Participant::new("5", "Fal"),
            Participant::new("5", "Falco"),
        ]);
        assert_eq!(roster.participants().len(), 1);
        assert_eq!(roster.participant("5").map(|p| p.name.as_str()), Some("Falco"));
    }

    #[test]
    fn shared_thresholds_merge() {
        let index = BlacklistIndex::from_entries([
            Blacklist::new(2, ["33"]),
            Blacklist::new(2, ["17"]),
            Blacklist::new(4, ["8"]),
        ]);
        assert_eq!(index.len(), 2);
        assert_eq!(index.entries()[&2].ids.len(), 2);
    }

    #[test]
    fn exclusions_respect_threshold() {
        let index = BlacklistIndex::from_entries([
            Blacklist::new(2, ["33"]),
            Blacklist::new(4, ["8"]),
        ]);
        assert_eq!(index.excluded_for(0), BTreeSet::from(["33", "8"]));
        assert_eq!(index.excluded_for(1), BTreeSet::from(["33", "8"]));
        assert_eq!(index.excluded_for(2), BTreeSet::from(["8"]));
        assert_eq!(index.excluded_for(3), BTreeSet::from(["8"]));
        assert!(index.excluded_for(4).is_empty());
    }

    #[test]
    fn zero_threshold_excludes_nothing() {
        let index = BlacklistIndex::from_entries([Blacklist::new(0, ["5"])]);
        assert!(index.excluded_for(0).is_empty());
    }
}
