//! Eligible pool computation

use crate::ledger::WinnerLedger;
use crate::roster::{BlacklistIndex, Roster};
use crate::types::{Participant, PrizeNo};

/// Participants who may win `prize_no` right now
///
/// Everyone in the roster, minus every current winner of any prize, minus
/// every ID blacklisted against this prize. The result is ordered by ID.
pub fn eligible(
    roster: &Roster,
    blacklists: &BlacklistIndex,
    ledger: &WinnerLedger,
    prize_no: PrizeNo,
) -> Vec<Participant> {
    let winners = ledger.winner_ids();
    let excluded = blacklists.excluded_for(prize_no);

    roster
        .participants()
        .values()
        .filter(|p| !winners.contains(p.id.as_str()) && !excluded.contains(p.id.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Blacklist;

    fn roster() -> Roster {
        let mut roster = Roster::new();
        roster.set_participants([
            Participant::new("5", "Fal"),
            Participant::new("7", "Nango"),
            Participant::new("8", "Jacky"),
            Participant::new("33", "Xiao"),
        ]);
        roster
    }

    fn ids(pool: &[Participant]) -> Vec<&str> {
        pool.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn everyone_is_eligible_on_a_fresh_session() {
        let pool = eligible(&roster(), &BlacklistIndex::new(), &WinnerLedger::new(), 0);
        assert_eq!(ids(&pool), vec!["33", "5", "7", "8"]);
    }

    #[test]
    fn winners_of_any_prize_are_removed() {
        let mut ledger = WinnerLedger::new();
        ledger.set(4, vec![Participant::new("7", "Nango")]);
        let pool = eligible(&roster(), &BlacklistIndex::new(), &ledger, 1);
        assert_eq!(ids(&pool), vec!["33", "5", "8"]);
    }

    #[test]
    fn blacklist_applies_below_threshold() {
        let blacklists = BlacklistIndex::from_entries([Blacklist::new(2, ["33"])]);
        let ledger = WinnerLedger::new();
        for prize_no in [0, 1] {
            let pool = eligible(&roster(), &blacklists, &ledger, prize_no);
            assert!(!ids(&pool).contains(&"33"), "33 must be excluded from {prize_no}");
        }
        for prize_no in [2, 3, 10] {
            let pool = eligible(&roster(), &blacklists, &ledger, prize_no);
            assert!(ids(&pool).contains(&"33"), "33 must be eligible for {prize_no}");
        }
    }

    #[test]
    fn unknown_blacklisted_ids_are_harmless() {
        let blacklists = BlacklistIndex::from_entries([Blacklist::new(9, ["404"])]);
        let pool = eligible(&roster(), &blacklists, &WinnerLedger::new(), 0);
        assert_eq!(pool.len(), 4);
    }
}
