//! Lottery data types
//!
//! Participants, prizes and blacklist entries as loaded from the source
//! files and as written into snapshots.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Prize number. Prizes are addressed by number, not by position.
pub type PrizeNo = u32;

/// A person who can win a prize
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Participant {
    /// Unique participant ID
    pub id: String,
    /// Display name
    pub name: String,
}

impl Participant {
    /// Create a participant
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A prize that can be drawn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prize {
    /// Prize number
    pub no: PrizeNo,
    /// Prize name
    pub name: String,
    /// Number of winners to draw; must be at least one to be drawable
    pub amount: i64,
    /// Free-form description
    #[serde(default)]
    pub desc: String,
}

impl Prize {
    /// Create a prize
    pub fn new(no: PrizeNo, name: impl Into<String>, amount: i64, desc: impl Into<String>) -> Self {
        Self {
            no,
            name: name.into(),
            amount,
            desc: desc.into(),
        }
    }
}

/// Exclusion list keyed by a prize-number threshold
///
/// The listed IDs cannot win any prize numbered below `threshold`. Prizes
/// numbered at or above the threshold are unaffected.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Blacklist {
    /// First prize number the listed IDs may win
    pub threshold: PrizeNo,
    /// Excluded participant IDs
    pub ids: BTreeSet<String>,
}

impl Blacklist {
    /// Create a blacklist entry
    pub fn new<I, S>(threshold: PrizeNo, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            threshold,
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether this entry excludes its IDs from the given prize
    pub fn applies_to(&self, prize_no: PrizeNo) -> bool {
        prize_no < self.threshold
    }
}
