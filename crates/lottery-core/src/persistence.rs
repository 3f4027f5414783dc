//! Snapshot persistence
//!
//! A snapshot holds the full session (roster, blacklists, ledger) plus a
//! checksum over the winners it carries. Loading recomputes the checksum
//! from the loaded winners and rejects the file on any disagreement.
//!
//! The data file lives at `<data_dir>/<sha256(name)>.json`, so a lottery
//! always resumes from the same file no matter where the process starts.

use crate::errors::{LotteryError, Result};
use crate::ledger::WinnerLedger;
use crate::types::{Blacklist, Participant, Prize, PrizeNo};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Timestamp layout of `last_updated`
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Resolve the default data directory for lottery snapshots.
///
/// Priority:
/// 1. `$LOTTERY_PATH/.lottery` if LOTTERY_PATH is set
/// 2. `~/.lottery` (home directory)
/// 3. `./.lottery` (current directory fallback)
pub fn default_data_dir() -> PathBuf {
    std::env::var("LOTTERY_PATH")
        .ok()
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".lottery")
}

/// File name of a lottery's snapshot, stable across runs
pub fn data_file_name(lottery_name: &str) -> String {
    let digest = Sha256::digest(lottery_name.as_bytes());
    format!("{}.json", hex::encode(digest))
}

/// Session body: everything needed to resume a lottery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotterySnapshot {
    /// Lottery name
    pub name: String,
    /// Prizes keyed by number
    pub prizes: BTreeMap<PrizeNo, Prize>,
    /// Blacklist entries keyed by threshold
    pub blacklists: BTreeMap<PrizeNo, Blacklist>,
    /// Participants keyed by ID
    pub participants: BTreeMap<String, Participant>,
    /// Winner ledger
    pub winners: WinnerLedger,
}

/// On-disk snapshot format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveSnapshot {
    /// Session body
    pub lottery: LotterySnapshot,
    /// Local wall-clock time of the save
    pub last_updated: String,
    /// Checksum over `lottery.winners`
    pub checksum: String,
}

impl SaveSnapshot {
    /// Stamp a session body with the current time and its winners' checksum
    pub fn new(lottery: LotterySnapshot) -> Self {
        let checksum = lottery.winners.checksum();
        Self {
            lottery,
            last_updated: chrono::Local::now().format(TIMESTAMP_FORMAT).to_string(),
            checksum,
        }
    }

    /// Check the stored checksum against this snapshot's own winners
    pub fn verify(&self) -> Result<()> {
        let computed = self.lottery.winners.checksum();
        if computed != self.checksum {
            warn!(stored = %self.checksum, %computed, "Snapshot checksum mismatch");
            return Err(LotteryError::ChecksumMismatch {
                stored: self.checksum.clone(),
                computed,
            });
        }
        Ok(())
    }
}

/// Snapshot file for one lottery
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    /// Store for `lottery_name` under `data_dir`
    pub fn new(data_dir: impl AsRef<Path>, lottery_name: &str) -> Self {
        Self {
            path: data_dir.as_ref().join(data_file_name(lottery_name)),
        }
    }

    /// Path of the data file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the data file exists
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Write the snapshot as indented JSON, replacing the file atomically
    ///
    /// The temp file is synced before the rename and removed if any step
    /// fails, so the data file is either the previous snapshot or the new one.
    pub fn save(&self, snapshot: &SaveSnapshot) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(snapshot)?;
        let tmp_path = self.path.with_extension("json.tmp");
        let written =
            write_synced(&tmp_path, &data).and_then(|()| fs::rename(&tmp_path, &self.path));
        if let Err(e) = written {
            if let Err(cleanup) = fs::remove_file(&tmp_path) {
                debug!(path = %tmp_path.display(), error = %cleanup, "Temp file not removed");
            }
            return Err(e.into());
        }
        info!(path = %self.path.display(), "Saved lottery snapshot");
        Ok(())
    }

    /// Read and verify the snapshot
    pub fn load(&self) -> Result<SaveSnapshot> {
        let data = fs::read(&self.path)?;
        let snapshot: SaveSnapshot = serde_json::from_slice(&data)?;
        snapshot.verify()?;
        debug!(
            path = %self.path.display(),
            last_updated = %snapshot.last_updated,
            "Loaded lottery snapshot"
        );
        Ok(snapshot)
    }
}

fn write_synced(path: &Path, data: &[u8]) -> io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(data)?;
    file.sync_all()
}
