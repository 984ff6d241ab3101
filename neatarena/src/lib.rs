//! NeuroEvolution of Augmenting Topologies driven by tournaments.
//!
//! Genomes are grouped into species and evolved by fitness sharing,
//! following the 2002 paper: <http://nn.cs.utexas.edu/keyword?stanley:ec02>.
//! Instead of an evaluation function, fitness comes from a
//! [`Tournament`]: compiled genomes are seated at tables of a
//! competitive [`Environment`], thousands of episodes are played
//! concurrently, and genomes score by how many rounds they advance.
//!
//! The genomic structure is left to implementors of the [`Genome`]
//! trait. A neural network-based representation is supplied by the
//! `neatarena-nn` crate.
//!
//! # Example usage: ranking networks by their first output
//! ```
//! use neatarena::{
//!     Environment, EnvironmentFactory, Outcome, Observation,
//!     Population, PopulationConfig, Tournament, TournamentConfig,
//! };
//! use neatarena_nn::{genomics::{GeneticConfig, NNGenome}, networks::Network};
//! use rand::{rngs::StdRng, SeedableRng};
//! use std::num::NonZeroUsize;
//!
//! // The seat whose network answers highest wins.
//! struct Highest<'a>(Vec<&'a Network>);
//!
//! impl Environment for Highest<'_> {
//!     fn step(&mut self) -> Outcome {
//!         let answers: Vec<f32> = self.0.iter().map(|n| n.evaluate(&[1.0])[0]).collect();
//!         let best = (0..answers.len())
//!             .max_by(|a, b| answers[*a].total_cmp(&answers[*b]))
//!             .unwrap();
//!         Outcome::Win(best)
//!     }
//!
//!     fn observations(&mut self) -> Vec<Observation> {
//!         vec![]
//!     }
//! }
//!
//! struct Arena;
//!
//! impl EnvironmentFactory<Network> for Arena {
//!     fn open<'a>(&'a self, seats: &[&'a Network], _seed: u64) -> Box<dyn Environment + 'a> {
//!         Box::new(Highest(seats.to_vec()))
//!     }
//! }
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let mut population = Population::<_, _, NNGenome>::new(
//!     PopulationConfig {
//!         size: NonZeroUsize::new(32).unwrap(),
//!         ..PopulationConfig::default()
//!     },
//!     GeneticConfig::default(),
//!     &mut rng,
//! );
//! let mut tournament = Tournament::new(
//!     TournamentConfig {
//!         round_size: NonZeroUsize::new(4).unwrap(),
//!         workers: NonZeroUsize::new(2).unwrap(),
//!         ..TournamentConfig::default()
//!     },
//!     (),
//! )
//! .unwrap();
//!
//! for _ in 0..3 {
//!     let report = tournament
//!         .execute::<_, _, Network, _, _>(&mut population, &Arena, &mut rng)
//!         .unwrap();
//!     assert_eq!(report.rounds, 3);
//!     println!("{}", population.summary());
//!     population.evolve(&mut rng).unwrap();
//! }
//! assert_eq!(population.genome_count(), 32);
//! ```

mod checkpoint;
mod genome;
mod populations;
#[cfg(test)]
mod testing;
mod tournaments;

pub use checkpoint::Checkpoint;
pub use genome::*;
pub use populations::*;
pub use tournaments::*;
