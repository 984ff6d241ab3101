use serde::{Deserialize, Serialize};

use std::num::NonZeroUsize;

/// Configuration data for population generation
/// and evolution.
///
/// # Note
/// All quantities expressing probabilities
/// should be in the range [0.0, 1.0]. Using
/// values that are not in this bound may result
/// in odd behaviours and/or incorrect programs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PopulationConfig {
    /// Size of the population.
    pub size: NonZeroUsize,
    /// Genetic distance threshold, at or beyond which
    /// genomes are considered as belonging to
    /// different species.
    pub distance_threshold: f32,
    /// Top fraction of each species which survives
    /// culling and may parent offspring. The count is
    /// rounded up.
    pub survival_threshold: f32,
    /// Chance that offspring will be the result
    /// of sexual reproduction (as opposed to asexual).
    pub sexual_reproduction_chance: f32,
    /// Number of generations without a fitness increase
    /// after which a species is removed.
    pub stagnation_threshold: NonZeroUsize,
}

impl PopulationConfig {
    /// Returns a "zero-valued" configuration.
    /// All values are 0, or in the case of
    /// `NonZeroUsize`s, 1.
    ///
    /// # Note
    /// This value is not suitable for use in most experiments.
    /// It is meant as a way to abbreviate configuration
    /// instantiation, or to fill in unused values.
    ///
    /// # Examples
    /// ```
    /// use neatarena::PopulationConfig;
    ///
    /// let cfg = PopulationConfig {
    ///     // Specify some values here...
    ///     survival_threshold: 0.5,
    ///     // Zero the rest...
    ///     ..PopulationConfig::zero()
    /// };
    /// ```
    pub const fn zero() -> PopulationConfig {
        PopulationConfig {
            size: NonZeroUsize::MIN,
            distance_threshold: 0.0,
            survival_threshold: 0.0,
            sexual_reproduction_chance: 0.0,
            stagnation_threshold: NonZeroUsize::MIN,
        }
    }
}

impl Default for PopulationConfig {
    /// The stock configuration: 256 genomes, distance
    /// threshold 1.0, top 20% survive, 75% of offspring
    /// from crossover, and removal after 15 stagnant
    /// generations.
    ///
    /// # Examples
    /// ```
    /// use neatarena::PopulationConfig;
    ///
    /// let cfg = PopulationConfig::default();
    ///
    /// assert_eq!(cfg.size.get(), 256);
    /// assert_eq!(cfg.stagnation_threshold.get(), 15);
    /// ```
    fn default() -> PopulationConfig {
        PopulationConfig {
            size: NonZeroUsize::new(256).unwrap_or(NonZeroUsize::MIN),
            distance_threshold: 1.0,
            survival_threshold: 0.2,
            sexual_reproduction_chance: 0.75,
            stagnation_threshold: NonZeroUsize::new(15).unwrap_or(NonZeroUsize::MIN),
        }
    }
}
