//! Snapshot save/load and source file loading against a real filesystem.

#![allow(clippy::unwrap_used, clippy::expect_used, missing_docs)]

use lottery_core::{
    Blacklist, ErrorCategory, Lottery, LotteryError, Participant, Prize, SaveSnapshot,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn seeded(dir: &Path) -> Lottery {
    let lottery = Lottery::builder("annual party").data_dir(dir).seed([5; 32]).build();
    lottery.set_participants([
        Participant::new("5", "Fal"),
        Participant::new("7", "Nango"),
        Participant::new("8", "Jacky"),
        Participant::new("9", "Sonny"),
        Participant::new("33", "Xiao"),
    ]);
    lottery.set_prizes([
        Prize::new(0, "Grand", 1, "Car"),
        Prize::new(1, "Second", 2, "Laptop"),
    ]);
    lottery.set_blacklists([Blacklist::new(1, ["33"])]);
    lottery
}

#[test]
fn save_then_load_reproduces_session() {
    let dir = TempDir::new().unwrap();
    let original = seeded(dir.path());
    original.draw(0).unwrap();
    original.draw(1).unwrap();

    assert!(!original.data_file_exists());
    original.save_to_file().unwrap();
    assert!(original.data_file_exists());

    let resumed = Lottery::builder("annual party").data_dir(dir.path()).build();
    assert!(resumed.data_file_exists());
    resumed.load_from_file().unwrap();

    assert_eq!(resumed.all_winners(), original.all_winners());
    assert_eq!(resumed.snapshot(), original.snapshot());
}

/// Save a session whose only winner is ("5", "Fal") for prize 0; returns
/// the saved file's text.
fn save_single_winner(dir: &Path) -> String {
    let original = seeded(dir);
    original.set_blacklists(Vec::new());
    original.set_participants([Participant::new("5", "Fal")]);
    original.draw(0).unwrap();
    original.save_to_file().unwrap();

    let text = fs::read_to_string(original.data_file_path()).unwrap();
    let snapshot: SaveSnapshot = serde_json::from_str(&text).unwrap();
    assert_eq!(snapshot.lottery.winners.get(0).unwrap(), [Participant::new("5", "Fal")]);
    text
}

/// Replace the last occurrence of `from`, which lies in the winners block
/// since `winners` is serialized after `participants` and `prizes`.
fn rewrite_last(text: &str, from: &str, to: &str) -> String {
    let at = text.rfind(from).unwrap();
    let mut out = text.to_string();
    out.replace_range(at..at + from.len(), to);
    out
}

fn assert_integrity_failure(dir: &Path, tampered: String) {
    let resumed = Lottery::builder("annual party").data_dir(dir).build();
    fs::write(resumed.data_file_path(), tampered).unwrap();

    let err = resumed.load_from_file().unwrap_err();
    assert!(matches!(err, LotteryError::ChecksumMismatch { .. }));
    assert_eq!(err.category(), ErrorCategory::Integrity);
    assert!(resumed.participants().is_empty());
    assert!(resumed.all_winners().is_empty());
}

#[test]
fn tampered_winner_name_fails_integrity_check() {
    let dir = TempDir::new().unwrap();
    let text = save_single_winner(dir.path());
    assert_integrity_failure(dir.path(), rewrite_last(&text, "\"Fal\"", "\"Fbl\""));
}

#[test]
fn tampered_winner_id_fails_integrity_check() {
    let dir = TempDir::new().unwrap();
    let text = save_single_winner(dir.path());
    assert_integrity_failure(dir.path(), rewrite_last(&text, "\"id\": \"5\"", "\"id\": \"6\""));
}

#[test]
fn tampered_winner_prize_key_fails_integrity_check() {
    let dir = TempDir::new().unwrap();
    let text = save_single_winner(dir.path());
    assert_integrity_failure(dir.path(), rewrite_last(&text, "\"0\": [", "\"3\": ["));
}

#[test]
fn load_keeps_lottery_name_and_data_file() {
    let dir = TempDir::new().unwrap();
    let original = seeded(dir.path());
    original.draw(0).unwrap();
    original.save_to_file().unwrap();

    let path = original.data_file_path();
    let text = fs::read_to_string(&path)
        .unwrap()
        .replace("\"name\": \"annual party\"", "\"name\": \"other\"");
    fs::write(&path, text).unwrap();

    let resumed = Lottery::builder("annual party").data_dir(dir.path()).build();
    resumed.load_from_file().unwrap();
    assert_eq!(resumed.name(), "annual party");
    assert_eq!(resumed.snapshot().name, "annual party");
    assert_eq!(resumed.all_winners(), original.all_winners());

    resumed.save_to_file().unwrap();
    assert_eq!(resumed.data_file_path(), path);
    let saved: SaveSnapshot = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(saved.lottery.name, "annual party");
}

#[test]
fn tampered_participants_outside_winners_still_load() {
    let dir = TempDir::new().unwrap();
    let original = seeded(dir.path());
    original.save_to_file().unwrap();

    let path = original.data_file_path();
    let text = fs::read_to_string(&path).unwrap().replace("Sonny", "Sunny");
    fs::write(&path, text).unwrap();

    let resumed = Lottery::builder("annual party").data_dir(dir.path()).build();
    resumed.load_from_file().unwrap();
    assert!(resumed.participants().contains(&Participant::new("9", "Sunny")));
}

#[test]
fn missing_or_malformed_file_is_a_persistence_error() {
    let dir = TempDir::new().unwrap();
    let lottery = seeded(dir.path());

    let err = lottery.load_from_file().unwrap_err();
    assert!(matches!(err, LotteryError::Io(_)));
    assert_eq!(err.category(), ErrorCategory::Persistence);

    fs::write(lottery.data_file_path(), "{ not json").unwrap();
    let err = lottery.load_from_file().unwrap_err();
    assert!(matches!(err, LotteryError::Json(_)));
    assert_eq!(lottery.participants().len(), 5);
}

#[test]
fn save_creates_data_dir_and_leaves_no_temp_file() {
    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("nested").join("data");
    let lottery = seeded(&nested);
    lottery.save_to_file().unwrap();

    let entries: Vec<_> = fs::read_dir(&nested)
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(entries.len(), 1);
    assert!(entries[0].ends_with(".json"));
    assert!(!entries[0].ends_with(".tmp"));
}

#[test]
fn different_names_use_different_files() {
    let dir = TempDir::new().unwrap();
    let a = Lottery::builder("a").data_dir(dir.path()).build();
    let b = Lottery::builder("b").data_dir(dir.path()).build();
    assert_ne!(a.data_file_path(), b.data_file_path());

    a.save_to_file().unwrap();
    assert!(a.data_file_exists());
    assert!(!b.data_file_exists());
}

#[test]
fn cold_start_from_source_files() {
    let dir = TempDir::new().unwrap();
    let participants = dir.path().join("participants.csv");
    let prizes = dir.path().join("prizes.csv");
    let blacklists = dir.path().join("blacklists.json");
    fs::write(&participants, "5,Fal\n7,Nango\n33,Xiao\n").unwrap();
    fs::write(
        &prizes,
        "no,name,amount,description\n0,Grand,1,Car\n2,Third,5,Mug\n",
    )
    .unwrap();
    fs::write(&blacklists, r#"{"2": {"threshold": 2, "ids": ["33"]}}"#).unwrap();

    let lottery = Lottery::builder("cold").data_dir(dir.path()).build();
    lottery.load_participants_csv(&participants).unwrap();
    lottery.load_prizes_csv(&prizes).unwrap();
    lottery.load_blacklists_json(&blacklists).unwrap();

    assert_eq!(lottery.participants().len(), 3);
    assert_eq!(lottery.prize(2), Some(Prize::new(2, "Third", 5, "Mug")));
    assert_eq!(lottery.blacklists(), vec![Blacklist::new(2, ["33"])]);
    assert_eq!(lottery.available_participants(0).len(), 2);
    assert_eq!(lottery.available_participants(2).len(), 3);
}

#[test]
fn bad_participants_file_is_rejected() {
    let dir = TempDir::new().unwrap();
    let participants = dir.path().join("participants.csv");
    fs::write(&participants, "5,Fal\n7\n").unwrap();

    let lottery = Lottery::builder("bad").data_dir(dir.path()).build();
    let err = lottery.load_participants_csv(&participants).unwrap_err();
    assert!(matches!(
        err,
        LotteryError::InvalidParticipantsCsv { line: 2, columns: 1 }
    ));
    assert!(lottery.participants().is_empty());
}
