//! # Lottery Core
//!
//! Draws random winners for numbered prizes from a roster of participants.
//!
//! ## Core Concepts
//!
//! - **Eligible pool**: participants who are not a current winner of any
//!   prize and not blacklisted against the prize being drawn
//! - **Blacklist threshold**: an entry excludes its IDs from every prize
//!   numbered below its threshold
//! - **Ledger**: prize number to ordered winner list; a participant is in
//!   at most one list at a time
//! - **Redraw / Revoke**: revoke removes specific winners without
//!   replacement; redraw appends fresh winners to an existing list
//! - **Snapshot**: the full session written as JSON with a checksum over
//!   its own winners, verified again on load
//!
//! ## What's NOT in this crate
//!
//! - HTTP or WebSocket transports (see `lottery-server`)
//! - Process configuration and bootstrap

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod draw;
mod engine;

/// Eligible pool computation
pub mod eligibility;

/// Unified lottery error types
pub mod errors;

/// Winner ledger and its checksum
pub mod ledger;

/// Participant, prize and blacklist source readers
pub mod loader;

/// Locked lottery session
pub mod lottery;

/// Snapshot format and data file handling
pub mod persistence;

/// Roster and blacklist index
pub mod roster;

/// Participant, prize and blacklist types
pub mod types;

pub use draw::sample;
pub use errors::{ErrorCategory, LotteryError, Result};
pub use ledger::WinnerLedger;
pub use lottery::{Lottery, LotteryBuilder};
pub use persistence::{default_data_dir, LotterySnapshot, SaveSnapshot, SnapshotStore};
pub use roster::{BlacklistIndex, Roster};
pub use types::{Blacklist, Participant, Prize, PrizeNo};
