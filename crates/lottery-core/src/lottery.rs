//! Lottery session
//!
//! [`Lottery`] is the public face of the engine. All session state sits in
//! one aggregate behind a single `parking_lot::Mutex`; every public method
//! takes the lock for its full duration, including snapshot I/O, and never
//! calls another locked method while holding it.

use crate::engine::LotteryState;
use crate::errors::{LotteryError, Result};
use crate::loader;
use crate::persistence::{default_data_dir, LotterySnapshot, SaveSnapshot, SnapshotStore};
use crate::roster::BlacklistIndex;
use crate::types::{Blacklist, Participant, Prize, PrizeNo};
use parking_lot::Mutex;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Builder for [`Lottery`]
#[derive(Debug, Clone)]
pub struct LotteryBuilder {
    name: String,
    data_dir: Option<PathBuf>,
    seed: Option<[u8; 32]>,
}

impl LotteryBuilder {
    /// Directory holding the snapshot file (default: [`default_data_dir`])
    pub fn data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    /// Fixed generator seed for reproducible draws
    pub fn seed(mut self, seed: [u8; 32]) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Build the lottery with an empty roster and ledger
    pub fn build(self) -> Lottery {
        let rng = match self.seed {
            Some(seed) => ChaCha20Rng::from_seed(seed),
            None => ChaCha20Rng::from_entropy(),
        };
        let data_dir = self.data_dir.unwrap_or_else(default_data_dir);
        let store = SnapshotStore::new(&data_dir, &self.name);
        Lottery {
            state: Mutex::new(LotteryState::new(self.name, rng)),
            store,
        }
    }
}

/// A lottery session
#[derive(Debug)]
pub struct Lottery {
    state: Mutex<LotteryState>,
    store: SnapshotStore,
}

impl Lottery {
    /// Lottery with the default data directory and an entropy-seeded generator
    pub fn new(name: impl Into<String>) -> Self {
        Self::builder(name).build()
    }

    /// Start configuring a lottery
    pub fn builder(name: impl Into<String>) -> LotteryBuilder {
        LotteryBuilder {
            name: name.into(),
            data_dir: None,
            seed: None,
        }
    }

    /// Lottery name
    pub fn name(&self) -> String {
        self.state.lock().name.clone()
    }

    // ─── Loading ─────────────────────────────────────────────────────────────

    /// Replace participants from a headerless `ID,Name` CSV file
    pub fn load_participants_csv(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut state = self.state.lock();
        let participants = loader::read_participants(open(path.as_ref())?)?;
        info!(count = participants.len(), "Loaded participants");
        state.roster.set_participants(participants);
        Ok(())
    }

    /// Replace prizes from a `No,Name,Amount,Description` CSV file with header
    pub fn load_prizes_csv(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut state = self.state.lock();
        let prizes = loader::read_prizes(open(path.as_ref())?)?;
        info!(count = prizes.len(), "Loaded prizes");
        state.roster.set_prizes(prizes);
        Ok(())
    }

    /// Replace blacklists from a JSON file
    pub fn load_blacklists_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut state = self.state.lock();
        let entries = loader::read_blacklists(open(path.as_ref())?)?;
        info!(count = entries.len(), "Loaded blacklists");
        state.blacklists = BlacklistIndex::from_entries(entries);
        Ok(())
    }

    /// Replace participants
    pub fn set_participants(&self, participants: impl IntoIterator<Item = Participant>) {
        self.state.lock().roster.set_participants(participants);
    }

    /// Replace prizes
    pub fn set_prizes(&self, prizes: impl IntoIterator<Item = Prize>) {
        self.state.lock().roster.set_prizes(prizes);
    }

    /// Replace blacklists
    pub fn set_blacklists(&self, entries: impl IntoIterator<Item = Blacklist>) {
        self.state.lock().blacklists = BlacklistIndex::from_entries(entries);
    }

    // ─── Accessors ───────────────────────────────────────────────────────────

    /// All participants, ordered by ID
    pub fn participants(&self) -> Vec<Participant> {
        self.state.lock().roster.participants().values().cloned().collect()
    }

    /// All prizes, ordered by number
    pub fn prizes(&self) -> Vec<Prize> {
        self.state.lock().roster.prizes().values().cloned().collect()
    }

    /// One prize
    pub fn prize(&self, prize_no: PrizeNo) -> Option<Prize> {
        self.state.lock().roster.prize(prize_no).cloned()
    }

    /// All blacklist entries, ordered by threshold
    pub fn blacklists(&self) -> Vec<Blacklist> {
        self.state.lock().blacklists.entries().values().cloned().collect()
    }

    /// Current winners of a prize; empty if none
    pub fn winners(&self, prize_no: PrizeNo) -> Vec<Participant> {
        self.state
            .lock()
            .ledger
            .get(prize_no)
            .map(<[Participant]>::to_vec)
            .unwrap_or_default()
    }

    /// The whole ledger, ordered by prize number
    pub fn all_winners(&self) -> BTreeMap<PrizeNo, Vec<Participant>> {
        self.state.lock().ledger.entries().clone()
    }

    /// Participants who could win the prize right now, ordered by ID
    pub fn available_participants(&self, prize_no: PrizeNo) -> Vec<Participant> {
        self.state.lock().eligible(prize_no)
    }

    /// Copy of the full session
    pub fn snapshot(&self) -> LotterySnapshot {
        snapshot_of(&self.state.lock())
    }

    // ─── Draws ───────────────────────────────────────────────────────────────

    /// Draw the prize's configured amount of winners
    pub fn draw(&self, prize_no: PrizeNo) -> Result<Vec<Participant>> {
        let mut state = self.state.lock();
        let amount = state
            .roster
            .prize(prize_no)
            .map(|prize| prize.amount)
            .ok_or(LotteryError::UnknownPrize { prize_no })?;
        state.draw(prize_no, amount)
    }

    /// Draw `amount` winners for a prize that has none
    pub fn draw_amount(&self, prize_no: PrizeNo, amount: i64) -> Result<Vec<Participant>> {
        self.state.lock().draw(prize_no, amount)
    }

    /// Draw `amount` more winners and append them to the prize's list
    pub fn redraw(&self, prize_no: PrizeNo, amount: i64) -> Result<Vec<Participant>> {
        self.state.lock().redraw(prize_no, amount)
    }

    /// Remove the given winners from the prize's list, returning them
    pub fn revoke(&self, prize_no: PrizeNo, ids: &[String]) -> Result<Vec<Participant>> {
        self.state.lock().revoke(prize_no, ids)
    }

    /// Empty one prize's winner list
    pub fn clear_winners(&self, prize_no: PrizeNo) {
        self.state.lock().clear_winners(prize_no);
    }

    /// Empty the whole ledger
    pub fn clear_all_winners(&self) {
        self.state.lock().clear_all_winners();
    }

    // ─── Persistence ─────────────────────────────────────────────────────────

    /// Path of this lottery's data file
    pub fn data_file_path(&self) -> PathBuf {
        self.store.path().to_path_buf()
    }

    /// Whether a data file exists for this lottery
    pub fn data_file_exists(&self) -> bool {
        let _state = self.state.lock();
        self.store.exists()
    }

    /// Write the full session to the data file
    pub fn save_to_file(&self) -> Result<()> {
        let state = self.state.lock();
        self.store.save(&SaveSnapshot::new(snapshot_of(&state)))
    }

    /// Replace participants, prizes, blacklists and winners with the data
    /// file's contents
    ///
    /// Nothing changes unless the file reads, parses and passes its checksum.
    /// The lottery keeps its own name, which also fixes the data file path; a
    /// differing name inside the snapshot is ignored.
    pub fn load_from_file(&self) -> Result<()> {
        let mut state = self.state.lock();
        let snapshot = self.store.load()?.lottery;
        if snapshot.name != state.name {
            warn!(
                lottery = %state.name,
                snapshot = %snapshot.name,
                "Snapshot name differs; keeping lottery name"
            );
        }
        state.roster.set_participants(snapshot.participants.into_values());
        state.roster.set_prizes(snapshot.prizes.into_values());
        state.blacklists = BlacklistIndex::from_entries(snapshot.blacklists.into_values());
        state.ledger = snapshot.winners;
        info!(
            participants = state.roster.participants().len(),
            winners = state.ledger.winner_count(),
            "Restored lottery from snapshot"
        );
        Ok(())
    }
}

fn snapshot_of(state: &LotteryState) -> LotterySnapshot {
    LotterySnapshot {
        name: state.name.clone(),
        prizes: state.roster.prizes().clone(),
        blacklists: state.blacklists.entries().clone(),
        participants: state.roster.participants().clone(),
        winners: state.ledger.clone(),
    }
}

fn open(path: &Path) -> Result<BufReader<File>> {
    Ok(BufReader::new(File::open(path)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lottery() -> Lottery {
        let lottery = Lottery::builder("unit").data_dir("unused").seed([9; 32]).build();
        lottery.set_participants(
            (1..=6).map(|i| Participant::new(i.to_string(), format!("N{i}"))),
        );
        lottery.set_prizes([Prize::new(0, "Grand", 1, ""), Prize::new(1, "Other", 3, "")]);
        lottery
    }

    #[test]
    fn draw_uses_configured_amount() {
        let lottery = lottery();
        assert_eq!(lottery.draw(1).unwrap().len(), 3);
        assert_eq!(lottery.winners(1).len(), 3);
        assert!(lottery.winners(0).is_empty());
        assert!(matches!(
            lottery.draw(4),
            Err(LotteryError::UnknownPrize { prize_no: 4 })
        ));
    }

    #[test]
    fn non_positive_configured_amount_is_invalid() {
        let lottery = lottery();
        lottery.set_prizes([Prize::new(0, "Broken", 0, "")]);
        assert!(matches!(
            lottery.draw(0),
            Err(LotteryError::InvalidAmount { amount: 0 })
        ));
    }

    #[test]
    fn available_excludes_winners() {
        let lottery = lottery();
        let winners = lottery.draw(0).unwrap();
        let available = lottery.available_participants(1);
        assert_eq!(available.len(), 5);
        assert!(!available.contains(&winners[0]));
    }

    #[test]
    fn seeded_lotteries_agree() {
        let a = lottery();
        let b = lottery();
        assert_eq!(a.draw(1).unwrap(), b.draw(1).unwrap());
        assert_eq!(a.draw(0).unwrap(), b.draw(0).unwrap());
    }

    #[test]
    fn data_file_named_after_lottery() {
        let lottery = lottery();
        assert_eq!(
            lottery.data_file_path(),
            Path::new("unused").join(crate::persistence::data_file_name("unit"))
        );
    }
}
