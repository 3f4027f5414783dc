//! Source file readers
//!
//! - Participants CSV: no header, exactly two columns `ID,Name`
//! - Prizes CSV: header row, columns `No,Name,Amount,Description` by position
//! - Blacklists JSON: object of `{"threshold": n, "ids": [...]}` entries

use crate::errors::{LotteryError, Result};
use crate::types::{Blacklist, Participant, Prize, PrizeNo};
use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;

/// Read participants from a headerless two-column CSV
pub fn read_participants<R: Read>(reader: R) -> Result<Vec<Participant>> {
    let mut csv = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut participants = Vec::new();
    for record in csv.records() {
        let record = record?;
        if record.len() != 2 {
            return Err(LotteryError::InvalidParticipantsCsv {
                line: record.position().map_or(0, csv::Position::line),
                columns: record.len(),
            });
        }
        participants.push(Participant::new(&record[0], &record[1]));
    }
    Ok(participants)
}

/// Read prizes from a CSV with a header row
pub fn read_prizes<R: Read>(reader: R) -> Result<Vec<Prize>> {
    let mut csv = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut seen = BTreeSet::new();
    let mut prizes = Vec::new();
    for record in csv.records() {
        let record = record?;
        let line = record.position().map_or(0, csv::Position::line);
        let (no, name, amount, desc): (PrizeNo, String, i64, String) =
            record.deserialize(None).map_err(|e| LotteryError::InvalidPrizesCsv {
                message: format!("line {line}: {e}"),
            })?;
        if !seen.insert(no) {
            return Err(LotteryError::InvalidPrizesCsv {
                message: format!("line {line}: duplicate prize number {no}"),
            });
        }
        prizes.push(Prize::new(no, name, amount, desc));
    }
    Ok(prizes)
}

/// Read blacklist entries from a JSON object keyed by threshold
///
/// The entry's own `threshold` field is authoritative; the key is only a label.
pub fn read_blacklists<R: Read>(reader: R) -> Result<Vec<Blacklist>> {
    let entries: BTreeMap<String, Blacklist> = serde_json::from_reader(reader)?;
    Ok(entries.into_values().collect())
}
