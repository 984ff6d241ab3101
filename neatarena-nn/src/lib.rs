//! # neatarena-nn
//! A neural network-based implementation of the [`neatarena`] crate's `Genome` trait.
//!
//! Provides an [`NNGenome`] type usable in `neatarena` `Population`s, the shared
//! innovation registry ([`History`]) its structural mutations draw ids from,
//! and the [`Network`] phenotype which an [`NNGenome`] compiles into.
//!
//! Networks may be recurrent. Instead of solving for a fixed point, a network
//! is relaxed over a bounded number of passes each time it is evaluated.
//!
//! [`NNGenome`]: crate::genomics::NNGenome
//! [`History`]: crate::genomics::History
//! [`Network`]: crate::networks::Network
//!
//! # Example usage: one generation of a tiny population
//! ```
//! use neatarena::{Genome, Population, PopulationConfig};
//! use neatarena_nn::{
//!     genomics::{GeneticConfig, NNGenome},
//!     networks::Network,
//! };
//! use rand::{rngs::StdRng, SeedableRng};
//! use std::num::NonZeroUsize;
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let genetic_config = GeneticConfig {
//!     input_count: NonZeroUsize::new(2).unwrap(),
//!     output_count: NonZeroUsize::new(1).unwrap(),
//!     ..GeneticConfig::default()
//! };
//! let population_config = PopulationConfig {
//!     size: NonZeroUsize::new(16).unwrap(),
//!     ..PopulationConfig::default()
//! };
//!
//! let mut population = Population::<_, _, NNGenome>::new(population_config, genetic_config, &mut rng);
//! for genome in population.genomes_mut() {
//!     let output = Network::from(&*genome).evaluate(&[1.0, 0.0])[0];
//!     genome.set_fitness(output);
//! }
//! population.evolve(&mut rng).unwrap();
//!
//! assert_eq!(population.genomes().count(), 16);
//! assert_eq!(population.generation(), 1);
//! ```

pub mod genomics;
pub mod networks;

/// Identifier type used to designate historically
/// identical structural mutations for the purposes of
/// genome alignment and genetic tracking.
pub type Innovation = usize;

/// Identifier of a node within a genome.
pub type NodeId = usize;
