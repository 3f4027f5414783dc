//! Draw engine
//!
//! Owns the whole session state and implements draw, redraw, revoke and
//! clear. Every operation validates before it mutates, so a failed call
//! leaves the ledger untouched. The engine is not synchronized; [`Lottery`]
//! wraps it in the session lock.
//!
//! [`Lottery`]: crate::Lottery

use crate::draw::sample;
use crate::eligibility::eligible;
use crate::errors::{LotteryError, Result};
use crate::ledger::WinnerLedger;
use crate::roster::{BlacklistIndex, Roster};
use crate::types::{Participant, PrizeNo};
use rand_chacha::ChaCha20Rng;
use std::collections::BTreeSet;
use tracing::{debug, info};

/// Session state: roster, blacklists, ledger and the one random generator
#[derive(Debug)]
pub(crate) struct LotteryState {
    pub(crate) name: String,
    pub(crate) roster: Roster,
    pub(crate) blacklists: BlacklistIndex,
    pub(crate) ledger: WinnerLedger,
    rng: ChaCha20Rng,
}

impl LotteryState {
    pub(crate) fn new(name: String, rng: ChaCha20Rng) -> Self {
        Self {
            name,
            roster: Roster::new(),
            blacklists: BlacklistIndex::new(),
            ledger: WinnerLedger::new(),
            rng,
        }
    }

    pub(crate) fn eligible(&self, prize_no: PrizeNo) -> Vec<Participant> {
        eligible(&self.roster, &self.blacklists, &self.ledger, prize_no)
    }

    fn require_prize(&self, prize_no: PrizeNo) -> Result<()> {
        if self.roster.prize(prize_no).is_none() {
            return Err(LotteryError::UnknownPrize { prize_no });
        }
        Ok(())
    }

    /// Draw winners for a prize that currently has none
    pub(crate) fn draw(&mut self, prize_no: PrizeNo, amount: i64) -> Result<Vec<Participant>> {
        self.require_prize(prize_no)?;
        let amount = validate_amount(amount)?;
        if self.ledger.has_winners(prize_no) {
            return Err(LotteryError::WinnersAlreadyExist { prize_no });
        }

        let winners = self.sample_pool(prize_no, amount)?;
        self.ledger.set(prize_no, winners.clone());
        info!(prize_no, requested = amount, drawn = winners.len(), "Drew winners");
        Ok(winners)
    }

    /// Draw additional winners and append them to an existing entry
    pub(crate) fn redraw(&mut self, prize_no: PrizeNo, amount: i64) -> Result<Vec<Participant>> {
        self.require_prize(prize_no)?;
        let amount = validate_amount(amount)?;
        if !self.ledger.has_entry(prize_no) {
            return Err(LotteryError::NoOriginalWinners { prize_no });
        }

        let winners = self.sample_pool(prize_no, amount)?;
        self.ledger.append(prize_no, winners.iter().cloned());
        info!(prize_no, requested = amount, drawn = winners.len(), "Redrew winners");
        Ok(winners)
    }

    /// Remove specific winners from a prize without replacement
    pub(crate) fn revoke(&mut self, prize_no: PrizeNo, ids: &[String]) -> Result<Vec<Participant>> {
        self.require_prize(prize_no)?;
        let mut revoked = BTreeSet::new();
        {
            let current = self
                .ledger
                .get(prize_no)
                .ok_or(LotteryError::NoOriginalWinners { prize_no })?;
            let mut remaining: BTreeSet<&str> = current.iter().map(|p| p.id.as_str()).collect();
            for id in ids {
                // A repeated ID is no longer a winner on its second occurrence.
                if !remaining.remove(id.as_str()) {
                    return Err(LotteryError::RevokedWinnerNotMatch {
                        prize_no,
                        id: id.clone(),
                    });
                }
                revoked.insert(id.as_str());
            }
        }

        let removed = self.ledger.remove(prize_no, &revoked);
        info!(prize_no, revoked = removed.len(), "Revoked winners");
        Ok(removed)
    }

    pub(crate) fn clear_winners(&mut self, prize_no: PrizeNo) {
        self.ledger.clear(prize_no);
        info!(prize_no, "Cleared winners");
    }

    pub(crate) fn clear_all_winners(&mut self) {
        self.ledger.clear_all();
        info!("Cleared all winners");
    }

    fn sample_pool(&mut self, prize_no: PrizeNo, amount: usize) -> Result<Vec<Participant>> {
        let pool = self.eligible(prize_no);
        debug!(prize_no, pool = pool.len(), "Computed eligible pool");
        if pool.is_empty() {
            return Err(LotteryError::NoAvailableParticipants { prize_no });
        }
        Ok(sample(&mut self.rng, pool, amount))
    }
}

fn validate_amount(amount: i64) -> Result<usize> {
    if amount < 1 {
        return Err(LotteryError::InvalidAmount { amount });
    }
    Ok(usize::try_from(amount).unwrap_or(usize::MAX))
}
