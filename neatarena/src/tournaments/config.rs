use serde::{Deserialize, Serialize};

use std::num::NonZeroUsize;

/// Configuration data for tournament scheduling.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TournamentConfig {
    /// Seats per table. Only the best seat of each
    /// table advances to the next round. Must be at least 2.
    pub table_size: usize,
    /// Episodes played by each table per round.
    pub round_size: NonZeroUsize,
    /// Maximum number of concurrent workers per batch.
    pub workers: NonZeroUsize,
    /// Maximum number of episodes a worker plays per batch.
    pub batch_size: NonZeroUsize,
    /// Fitness awarded per round advanced, relative to
    /// the reigning champion.
    pub fitness_step: f32,
}

impl TournamentConfig {
    /// Returns a "zero-valued" configuration.
    /// All values are 0, or in the case of
    /// `NonZeroUsize`s, 1. The table size is 2,
    /// the smallest valid one.
    ///
    /// # Examples
    /// ```
    /// use neatarena::TournamentConfig;
    ///
    /// let cfg = TournamentConfig {
    ///     table_size: 4,
    ///     ..TournamentConfig::zero()
    /// };
    /// assert_eq!(cfg.round_size.get(), 1);
    /// ```
    pub const fn zero() -> TournamentConfig {
        TournamentConfig {
            table_size: 2,
            round_size: NonZeroUsize::MIN,
            workers: NonZeroUsize::MIN,
            batch_size: NonZeroUsize::MIN,
            fitness_step: 0.0,
        }
    }
}

impl Default for TournamentConfig {
    /// Tables of 4 playing 2000 episodes each, spread
    /// over 20 workers of 20 episodes, and 5 fitness
    /// points per round.
    fn default() -> TournamentConfig {
        TournamentConfig {
            table_size: 4,
            round_size: NonZeroUsize::new(2000).unwrap_or(NonZeroUsize::MIN),
            workers: NonZeroUsize::new(20).unwrap_or(NonZeroUsize::MIN),
            batch_size: NonZeroUsize::new(20).unwrap_or(NonZeroUsize::MIN),
            fitness_step: 5.0,
        }
    }
}
