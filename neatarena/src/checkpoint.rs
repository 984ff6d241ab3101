use crate::{Champion, Species};

use serde::{Deserialize, Serialize};

/// Everything needed to resume an evolutionary run:
/// the generation number, the reigning champion, the
/// innovation history and every species with its members.
///
/// The byte format is up to the caller; any serde format
/// round-trips a checkpoint without loss.
///
/// # Examples
/// ```
/// use neatarena::{Checkpoint, Population, PopulationConfig, Tournament, TournamentConfig};
/// use neatarena_nn::genomics::{GeneticConfig, History, NNGenome};
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let mut rng = StdRng::seed_from_u64(0);
/// let population = Population::<_, _, NNGenome>::new(
///     PopulationConfig::zero(),
///     GeneticConfig::zero(),
///     &mut rng,
/// );
/// let tournament = Tournament::<NNGenome>::new(TournamentConfig::zero(), ()).unwrap();
///
/// let checkpoint = tournament.checkpoint(&population);
/// let json = serde_json::to_string(&checkpoint).unwrap();
/// let restored: Checkpoint<History, NNGenome> = serde_json::from_str(&json).unwrap();
///
/// let population = Population::restore(restored, PopulationConfig::zero(), GeneticConfig::zero()).unwrap();
/// assert_eq!(population.genome_count(), 1);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Checkpoint<H, G> {
    pub generation: usize,
    pub champion: Champion<G>,
    pub history: H,
    pub species: Vec<Species<G>>,
}
