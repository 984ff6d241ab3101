use rand::Rng;
use serde::{Deserialize, Serialize};

use std::num::NonZeroUsize;

/// Controls how a fractional mutation rate turns
/// into a number of mutation pass repetitions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PassCadence {
    /// Repeat the pass `floor(rate)` times. Rates
    /// below 1 never trigger the pass.
    Truncate,
    /// Repeat the pass `floor(rate)` times, plus once
    /// more with probability `rate - floor(rate)`.
    Stochastic,
}

impl PassCadence {
    /// Returns how many times a pass with the given
    /// rate should run.
    ///
    /// # Examples
    /// ```
    /// use neatarena_nn::genomics::PassCadence;
    /// use rand::{rngs::StdRng, SeedableRng};
    ///
    /// let mut rng = StdRng::seed_from_u64(0);
    ///
    /// assert_eq!(PassCadence::Truncate.repetitions(2.9, &mut rng), 2);
    /// assert_eq!(PassCadence::Truncate.repetitions(0.2, &mut rng), 0);
    /// assert!((2..=3).contains(&PassCadence::Stochastic.repetitions(2.5, &mut rng)));
    /// ```
    pub fn repetitions<R: Rng>(self, rate: f32, rng: &mut R) -> usize {
        if rate <= 0.0 {
            return 0;
        }
        let whole = rate.floor();
        let fraction = rate - whole;
        match self {
            PassCadence::Truncate => whole as usize,
            PassCadence::Stochastic => whole as usize + usize::from(rng.gen::<f32>() < fraction),
        }
    }
}

/// Configuration data for genome generation
/// and inter-genome operations.
///
/// # Note
/// All quantities expressing probabilities
/// should be in the range [0.0, 1.0]. Rates are
/// expected repetitions per mutation round and
/// may exceed 1.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeneticConfig {
    /// Number of inputs in a genome.
    pub input_count: NonZeroUsize,
    /// Number of outputs in a genome.
    pub output_count: NonZeroUsize,
    /// Maximum magnitude of a randomly assigned gene weight.
    pub weight_bound: f32,
    /// Width of the uniform distribution used to
    /// perturb gene weights.
    pub weight_shift_step: f32,
    /// Chance that a weight mutation perturbs the
    /// weight instead of replacing it.
    pub weight_perturbation_chance: f32,
    /// Rate of the weight mutation pass.
    pub weight_mutation_rate: f32,
    /// Rate of the gene addition pass.
    pub gene_addition_rate: f32,
    /// Rate of the node addition pass.
    pub node_addition_rate: f32,
    /// Rate of the gene disabling pass.
    pub gene_disable_rate: f32,
    /// Rate of the gene re-enabling pass.
    pub gene_enable_rate: f32,
    /// How fractional rates are turned into repetitions.
    pub pass_cadence: PassCadence,
    /// Weight of excess genes in genetic distance.
    pub excess_gene_factor: f32,
    /// Weight of disjoint genes in genetic distance.
    pub disjoint_gene_factor: f32,
    /// Weight of the common gene weight average in genetic distance.
    pub common_weight_factor: f32,
}

impl GeneticConfig {
    /// Returns a "zero-valued" configuration.
    /// All values are 0, or in the case of
    /// `NonZeroUsize`s, 1. The pass cadence is
    /// [`PassCadence::Truncate`], so no mutation
    /// pass ever runs.
    ///
    /// # Note
    /// This value is not suitable for use in most experiments.
    /// It is meant as a way to fill in unused values during
    /// configuration instantiation.
    ///
    /// # Examples
    /// ```
    /// use neatarena_nn::genomics::GeneticConfig;
    ///
    /// let cfg = GeneticConfig {
    ///     // Specify some values here...
    ///     node_addition_rate: 1.0,
    ///     // Zero the rest...
    ///     ..GeneticConfig::zero()
    /// };
    /// ```
    pub const fn zero() -> GeneticConfig {
        GeneticConfig {
            input_count: NonZeroUsize::MIN,
            output_count: NonZeroUsize::MIN,
            weight_bound: 0.0,
            weight_shift_step: 0.0,
            weight_perturbation_chance: 0.0,
            weight_mutation_rate: 0.0,
            gene_addition_rate: 0.0,
            node_addition_rate: 0.0,
            gene_disable_rate: 0.0,
            gene_enable_rate: 0.0,
            pass_cadence: PassCadence::Truncate,
            excess_gene_factor: 0.0,
            disjoint_gene_factor: 0.0,
            common_weight_factor: 0.0,
        }
    }
}

impl Default for GeneticConfig {
    /// The stock configuration: single input and output,
    /// weights within ±2, mutation rates of 2.0 (weight),
    /// 0.2 (gene), 0.1 (node), 0.2 (disable) and 0.6 (enable),
    /// and distance factors of 1.0, 1.0 and 0.4.
    fn default() -> GeneticConfig {
        GeneticConfig {
            input_count: NonZeroUsize::MIN,
            output_count: NonZeroUsize::MIN,
            weight_bound: 2.0,
            weight_shift_step: 0.1,
            weight_perturbation_chance: 0.9,
            weight_mutation_rate: 2.0,
            gene_addition_rate: 0.2,
            node_addition_rate: 0.1,
            gene_disable_rate: 0.2,
            gene_enable_rate: 0.6,
            pass_cadence: PassCadence::Stochastic,
            excess_gene_factor: 1.0,
            disjoint_gene_factor: 1.0,
            common_weight_factor: 0.4,
        }
    }
}
