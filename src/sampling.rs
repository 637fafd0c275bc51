use std::sync::atomic::{AtomicUsize, Ordering};

use log::{info, trace};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Keep/skip decision for one user of the cross-validation pass.
pub trait UserSampler {
    fn new(sample_ratio: f64, seed: Option<u64>) -> Self;
    /// Decide whether a user with `nratings` ratings takes part
    fn should_keep(&mut self, nratings: usize) -> bool;
}

/// Bernoulli sampler: users with at least two ratings are kept independently
/// with probability `sample_ratio`. Users that cannot be held out (one rating
/// or none) are skipped without consuming a draw, so the draw sequence only
/// depends on the eligible users.
pub struct BernoulliUserSampler {
    sample_ratio: f64,
    current_idx: usize,
    rng: ChaCha8Rng,

    pub sampled_count: AtomicUsize,
    pub discarded_count: AtomicUsize,
}

impl UserSampler for BernoulliUserSampler {
    fn new(sample_ratio: f64, seed: Option<u64>) -> Self {
        info!(
            "Bernoulli user sampler with rate {:.2}% (seed: {:?})",
            sample_ratio * 100.0,
            seed
        );
        let rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_rng(&mut rand::rng()),
        };
        Self {
            sample_ratio,
            current_idx: 0,
            rng,

            sampled_count: AtomicUsize::new(0),
            discarded_count: AtomicUsize::new(0),
        }
    }

    fn should_keep(&mut self, nratings: usize) -> bool {
        self.current_idx += 1;

        if nratings <= 1 {
            self.discarded_count.fetch_add(1, Ordering::Relaxed);
            trace!("User #{}: {} rating(s), not eligible", self.current_idx, nratings);
            return false;
        }

        let keep = self.rng.random::<f64>() < self.sample_ratio;
        if keep {
            self.sampled_count.fetch_add(1, Ordering::Relaxed);
        } else {
            self.discarded_count.fetch_add(1, Ordering::Relaxed);
        }

        trace!(
            "User #{}: ratings={}, rate={:.4}, keep={}",
            self.current_idx,
            nratings,
            self.sample_ratio,
            keep
        );

        keep
    }
}
