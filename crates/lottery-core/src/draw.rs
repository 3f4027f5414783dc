//! Sampling without replacement

use crate::types::Participant;
use rand::Rng;

/// Pick up to `amount` winners uniformly at random from `pool`
///
/// Each round picks a random index, moves that participant into the result
/// and fills the hole with the last pool element. Returns
/// `min(amount, pool.len())` distinct participants.
pub fn sample<R: Rng + ?Sized>(
    rng: &mut R,
    mut pool: Vec<Participant>,
    amount: usize,
) -> Vec<Participant> {
    let k = amount.min(pool.len());
    let mut winners = Vec::with_capacity(k);
    for _ in 0..k {
        let index = rng.gen_range(0..pool.len());
        winners.push(pool.swap_remove(index));
    }
    winners
}
