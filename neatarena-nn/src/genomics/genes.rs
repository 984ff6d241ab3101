use crate::genomics::GeneticConfig;
use crate::{Innovation, NodeId};

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Genes are the principal components of genomes.
/// They are created between two nodes, and become
/// network connections in the genome's phenotype.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Gene {
    innovation: Innovation,
    input: NodeId,
    output: NodeId,
    weight: f32,
    enabled: bool,
}

impl Gene {
    /// Returns a new _enabled_ gene with the specified parameters.
    ///
    /// # Examples
    /// ```
    /// use neatarena_nn::genomics::Gene;
    ///
    /// let gene = Gene::new(42, 3, 9, 2.0);
    ///
    /// assert!(gene.enabled());
    /// ```
    pub fn new(innovation: Innovation, input: NodeId, output: NodeId, weight: f32) -> Gene {
        Gene {
            innovation,
            input,
            output,
            weight,
            enabled: true,
        }
    }

    /// Returns a random weight, uniformly distributed
    /// over ±[`weight_bound`].
    ///
    /// [`weight_bound`]: crate::genomics::GeneticConfig::weight_bound
    pub(super) fn random_weight<R: Rng>(config: &GeneticConfig, rng: &mut R) -> f32 {
        rng.gen_range(-config.weight_bound..=config.weight_bound)
    }

    /// Replaces the gene's weight with a random one,
    /// uniformly distributed over ±[`weight_bound`].
    ///
    /// [`weight_bound`]: crate::genomics::GeneticConfig::weight_bound
    ///
    /// # Examples
    /// ```
    /// use neatarena_nn::genomics::{Gene, GeneticConfig};
    /// use rand::{rngs::StdRng, SeedableRng};
    ///
    /// let mut gene = Gene::new(42, 3, 9, 7.0);
    ///
    /// gene.randomize_weight(
    ///     &GeneticConfig {
    ///         weight_bound: 2.0,
    ///         ..GeneticConfig::zero()
    ///     },
    ///     &mut StdRng::seed_from_u64(0),
    /// );
    ///
    /// assert!(gene.weight().abs() <= 2.0);
    /// ```
    pub fn randomize_weight<R: Rng>(&mut self, config: &GeneticConfig, rng: &mut R) {
        self.weight = Self::random_weight(config, rng);
    }

    /// Shifts the gene's weight by a random amount,
    /// uniformly distributed over ±half of [`weight_shift_step`].
    ///
    /// [`weight_shift_step`]: crate::genomics::GeneticConfig::weight_shift_step
    ///
    /// # Examples
    /// ```
    /// use neatarena_nn::genomics::{Gene, GeneticConfig};
    /// use rand::{rngs::StdRng, SeedableRng};
    ///
    /// let mut gene = Gene::new(42, 3, 9, 1.0);
    ///
    /// gene.perturb_weight(
    ///     &GeneticConfig {
    ///         weight_shift_step: 0.1,
    ///         ..GeneticConfig::zero()
    ///     },
    ///     &mut StdRng::seed_from_u64(0),
    /// );
    ///
    /// assert!((gene.weight() - 1.0).abs() <= 0.05 + f32::EPSILON);
    /// ```
    pub fn perturb_weight<R: Rng>(&mut self, config: &GeneticConfig, rng: &mut R) {
        let half_step = config.weight_shift_step / 2.0;
        self.weight += rng.gen_range(-half_step..=half_step);
    }

    /// Returns the gene's innovation number.
    ///
    /// # Examples
    /// ```
    /// use neatarena_nn::genomics::Gene;
    ///
    /// let gene = Gene::new(42, 3, 9, 2.0);
    ///
    /// assert_eq!(gene.innovation(), 42);
    /// ```
    pub fn innovation(&self) -> Innovation {
        self.innovation
    }

    /// Returns the gene's source node.
    ///
    /// # Examples
    /// ```
    /// use neatarena_nn::genomics::Gene;
    ///
    /// let gene = Gene::new(42, 3, 9, 2.0);
    ///
    /// assert_eq!(gene.input(), 3);
    /// ```
    pub fn input(&self) -> NodeId {
        self.input
    }

    /// Returns the gene's destination node.
    ///
    /// # Examples
    /// ```
    /// use neatarena_nn::genomics::Gene;
    ///
    /// let gene = Gene::new(42, 3, 9, 2.0);
    ///
    /// assert_eq!(gene.output(), 9);
    /// ```
    pub fn output(&self) -> NodeId {
        self.output
    }

    /// Returns the gene's endpoints as a `(source, destination)` pair.
    pub fn endpoints(&self) -> (NodeId, NodeId) {
        (self.input, self.output)
    }

    /// Returns the gene's weight.
    ///
    /// # Examples
    /// ```
    /// use neatarena_nn::genomics::Gene;
    ///
    /// let gene = Gene::new(42, 3, 9, 2.0);
    ///
    /// assert_eq!(gene.weight(), 2.0);
    /// ```
    pub fn weight(&self) -> f32 {
        self.weight
    }

    /// Sets the gene's weight.
    pub fn set_weight(&mut self, weight: f32) {
        self.weight = weight;
    }

    /// Returns whether the gene is expressed in the phenotype.
    ///
    /// # Examples
    /// ```
    /// use neatarena_nn::genomics::Gene;
    ///
    /// let mut gene = Gene::new(42, 3, 9, 2.0);
    /// gene.set_enabled(false);
    ///
    /// assert!(!gene.enabled());
    /// ```
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Sets the gene's expression status.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn random_weights_respect_bound() {
        let config = GeneticConfig {
            weight_bound: 2.0,
            ..GeneticConfig::zero()
        };
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..1000 {
            assert!(Gene::random_weight(&config, &mut rng).abs() <= 2.0);
        }
    }

    #[test]
    fn zero_step_perturbation_keeps_weight() {
        let mut gene = Gene::new(0, 0, 1, 0.75);
        gene.perturb_weight(&GeneticConfig::zero(), &mut StdRng::seed_from_u64(3));
        assert_eq!(gene.weight(), 0.75);
    }
}
