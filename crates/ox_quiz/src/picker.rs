//! Question selection without repeats inside a round.

use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::BTreeSet;
use tracing::{debug, instrument};

/// A question chosen for the next turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pick {
    /// Index into the question pool.
    pub index: usize,
    /// True when every pool index had been used and the used set was reset.
    pub exhausted: bool,
}

/// Picks a pool index uniformly among those not yet used this round.
///
/// When every index has been used the used set is treated as empty and the
/// pick is uniform over the whole pool, so a question may repeat across that
/// reset. Returns `None` only for an empty pool.
#[instrument(skip(used, rng), fields(used = used.len()))]
pub fn pick_question<R: Rng + ?Sized>(
    pool_len: usize,
    used: &BTreeSet<usize>,
    rng: &mut R,
) -> Option<Pick> {
    if pool_len == 0 {
        return None;
    }

    let available: Vec<usize> = (0..pool_len).filter(|i| !used.contains(i)).collect();
    let pick = match available.choose(rng) {
        Some(&index) => Pick {
            index,
            exhausted: false,
        },
        None => {
            debug!("Question pool exhausted, resetting used set");
            Pick {
                index: rng.gen_range(0..pool_len),
                exhausted: true,
            }
        }
    };

    debug!(index = pick.index, exhausted = pick.exhausted, "Question picked");
    Some(pick)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_empty_pool_has_no_pick() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(pick_question(0, &BTreeSet::new(), &mut rng), None);
    }

    #[test]
    fn test_only_unused_index_is_picked() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let used: BTreeSet<usize> = [0, 1, 3].into_iter().collect();
        for _ in 0..20 {
            let pick = pick_question(4, &used, &mut rng).expect("non-empty pool");
            assert_eq!(pick.index, 2);
            assert!(!pick.exhausted);
        }
    }

    #[test]
    fn test_exhausted_pool_resets() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let used: BTreeSet<usize> = [0, 1].into_iter().collect();
        let pick = pick_question(2, &used, &mut rng).expect("non-empty pool");
        assert!(pick.exhausted);
        assert!(pick.index < 2);
    }
}
