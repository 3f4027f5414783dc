//! Lottery error types
//!
//! A single error enum covers every engine operation. Each variant maps onto
//! one of five broad categories so transports can decide how to report it
//! without matching on individual variants.

use crate::types::PrizeNo;

/// Broad failure class of a [`LotteryError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Bad input: unknown prize number, non-positive amount, malformed source file
    Validation,
    /// The request conflicts with the current ledger
    StateConflict,
    /// Nobody is left to draw from
    ResourceExhaustion,
    /// Snapshot or source file could not be read, written, or decoded
    Persistence,
    /// Snapshot contents disagree with their own checksum
    Integrity,
}

/// Unified error type for all lottery operations
#[derive(Debug, thiserror::Error)]
pub enum LotteryError {
    /// No prize is defined with this number
    #[error("unknown prize number {prize_no}")]
    UnknownPrize {
        /// Requested prize number
        prize_no: PrizeNo,
    },

    /// Requested amount of winners is below one
    #[error("invalid amount {amount}: at least one winner must be drawn")]
    InvalidAmount {
        /// Requested amount
        amount: i64,
    },

    /// The prize was already drawn and has not been cleared
    #[error("winners already exist for prize {prize_no}")]
    WinnersAlreadyExist {
        /// Prize number
        prize_no: PrizeNo,
    },

    /// Redraw or revoke on a prize that has never been drawn
    #[error("no original winners for prize {prize_no}")]
    NoOriginalWinners {
        /// Prize number
        prize_no: PrizeNo,
    },

    /// A participant named for revocation is not a current winner of the prize
    #[error("revoked winner {id} does not match any winner of prize {prize_no}")]
    RevokedWinnerNotMatch {
        /// Prize number
        prize_no: PrizeNo,
        /// Offending participant ID
        id: String,
    },

    /// The eligible pool for the prize is empty
    #[error("no available participants for prize {prize_no}")]
    NoAvailableParticipants {
        /// Prize number
        prize_no: PrizeNo,
    },

    /// The stored checksum does not match the loaded winners
    #[error("checksum mismatch: stored {stored}, computed {computed}")]
    ChecksumMismatch {
        /// Checksum recorded in the snapshot
        stored: String,
        /// Checksum recomputed from the snapshot's winners
        computed: String,
    },

    /// Participants CSV row with the wrong column count
    #[error("incorrect participants CSV: line {line} has {columns} columns, expected 2")]
    InvalidParticipantsCsv {
        /// 1-based line number
        line: u64,
        /// Number of columns found
        columns: usize,
    },

    /// Prizes CSV row that cannot be interpreted
    #[error("incorrect prizes CSV: {message}")]
    InvalidPrizesCsv {
        /// What was wrong with the row
        message: String,
    },

    /// Filesystem failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encode/decode failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV read failure
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl LotteryError {
    /// Classify this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnknownPrize { .. }
            | Self::InvalidAmount { .. }
            | Self::InvalidParticipantsCsv { .. }
            | Self::InvalidPrizesCsv { .. } => ErrorCategory::Validation,
            Self::WinnersAlreadyExist { .. }
            | Self::NoOriginalWinners { .. }
            | Self::RevokedWinnerNotMatch { .. } => ErrorCategory::StateConflict,
            Self::NoAvailableParticipants { .. } => ErrorCategory::ResourceExhaustion,
            Self::Io(_) | Self::Json(_) | Self::Csv(_) => ErrorCategory::Persistence,
            Self::ChecksumMismatch { .. } => ErrorCategory::Integrity,
        }
    }
}

/// Result alias for lottery operations
pub type Result<T> = std::result::Result<T, LotteryError>;
