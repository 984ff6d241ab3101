//! A Population is a collection of genomes.
//! These are grouped into species, which are
//! evolved using externally assigned fitness
//! as the source of selective pressure.
mod config;
mod errors;
pub mod logging;
mod offspring_factory;
mod species;

use crate::{Checkpoint, Genome, InnovationHistory};
pub use config::PopulationConfig;
pub use errors::PopulationError;
use logging::{GenerationSummary, Stats};
use offspring_factory::OffspringFactory;
pub use species::{Species, SpeciesID};

use rand::prelude::Rng;
use rayon::prelude::*;
use tracing::debug;

/// A population of genomes.
///
/// The population owns the innovation history shared by
/// all of its genomes, so independent populations never
/// interfere with each other.
pub struct Population<C, H, G> {
    species: Vec<Species<G>>,
    history: H,
    generation: usize,
    population_config: PopulationConfig,
    genetic_config: C,
}

impl<C, H, G> Population<C, H, G>
where
    H: InnovationHistory<Config = C>,
    G: Genome<InnovationHistory = H, Config = C>,
{
    /// Creates a new population using the passed configurations.
    /// Every genome starts minimal and receives one round of
    /// mutation, and all of them share species 0.
    ///
    /// The type of `genetic_config` depends on the implementation
    /// of [`Genome`], and is effectively opaque to the population.
    ///
    /// [`Genome`]: crate::Genome
    ///
    /// # Examples
    /// ```
    /// use neatarena::{Population, PopulationConfig};
    /// use neatarena_nn::genomics::{GeneticConfig, NNGenome as G};
    /// use rand::{rngs::StdRng, SeedableRng};
    /// use std::num::NonZeroUsize;
    ///
    /// let pop_config = PopulationConfig {
    ///     size: NonZeroUsize::new(10).unwrap(),
    ///     ..PopulationConfig::zero()
    /// };
    /// let mut rng = StdRng::seed_from_u64(0);
    ///
    /// // With `G` a suitable type implementing `Genome`...
    /// let population = Population::<_, _, G>::new(pop_config, GeneticConfig::zero(), &mut rng);
    ///
    /// assert_eq!(population.genome_count(), 10);
    /// assert_eq!(population.species().count(), 1);
    /// ```
    pub fn new<R: Rng>(
        population_config: PopulationConfig,
        genetic_config: C,
        rng: &mut R,
    ) -> Population<C, H, G> {
        let mut history = H::new(&genetic_config);
        let mut spawn = || {
            let mut genome = G::new(&genetic_config);
            genome.mutate(&mut history, &genetic_config, rng);
            genome
        };
        let mut s0 = Species::new(SpeciesID(0, 0), spawn());
        s0.genomes
            .extend((1..population_config.size.get()).map(|_| spawn()));

        Population {
            species: vec![s0],
            history,
            generation: 0,
            population_config,
            genetic_config,
        }
    }

    /// Rebuilds a population from a checkpoint.
    ///
    /// # Errors
    /// Returns an error if the checkpoint holds no species,
    /// or any species without members.
    pub fn restore(
        checkpoint: Checkpoint<H, G>,
        population_config: PopulationConfig,
        genetic_config: C,
    ) -> Result<Population<C, H, G>, PopulationError> {
        if checkpoint.species.is_empty() {
            return Err(PopulationError::Degenerate);
        }
        if let Some(empty) = checkpoint.species.iter().find(|s| s.is_empty()) {
            return Err(PopulationError::EmptySpecies(empty.id()));
        }
        Ok(Population {
            species: checkpoint.species,
            history: checkpoint.history,
            generation: checkpoint.generation,
            population_config,
            genetic_config,
        })
    }

    /// Captures the population's generation, innovation
    /// history and species. The champion record is left
    /// empty; see [`Tournament::checkpoint`].
    ///
    /// [`Tournament::checkpoint`]: crate::Tournament::checkpoint
    pub fn checkpoint(&self) -> Checkpoint<H, G>
    where
        H: Clone,
    {
        Checkpoint {
            generation: self.generation,
            champion: Default::default(),
            history: self.history.clone(),
            species: self.species.clone(),
        }
    }

    /// Evolves the population into its next generation.
    ///
    /// Fitness is shared within each species, species are
    /// culled down to their best performers and pruned when
    /// too small or stagnant, and the survivors breed the
    /// children that fill the population back up. Each
    /// species then keeps only its best member, and every
    /// child is placed in the first species within the
    /// distance threshold (or founds a new one).
    ///
    /// Genome fitness, adjusted fitness and bracket are
    /// reset afterwards.
    ///
    /// # Errors
    /// Returns an error if the population holds no genomes.
    ///
    /// # Examples
    /// ```
    /// use neatarena::{Genome, Population, PopulationConfig};
    /// use neatarena_nn::genomics::{GeneticConfig, NNGenome as G};
    /// use rand::{rngs::StdRng, SeedableRng};
    /// use std::num::NonZeroUsize;
    ///
    /// let mut rng = StdRng::seed_from_u64(0);
    /// let mut population = Population::<_, _, G>::new(
    ///     PopulationConfig {
    ///         size: NonZeroUsize::new(30).unwrap(),
    ///         ..PopulationConfig::default()
    ///     },
    ///     GeneticConfig::default(),
    ///     &mut rng,
    /// );
    ///
    /// for (i, genome) in population.genomes_mut().enumerate() {
    ///     genome.set_fitness(i as f32);
    /// }
    /// population.evolve(&mut rng).unwrap();
    ///
    /// assert_eq!(population.genome_count(), 30);
    /// assert_eq!(population.generation(), 1);
    /// ```
    pub fn evolve<R: Rng>(&mut self, rng: &mut R) -> Result<(), PopulationError> {
        if self.genome_count() == 0 {
            return Err(PopulationError::Degenerate);
        }

        self.cull_species();
        self.remove_stagnant_species();

        let offspring = OffspringFactory::new(
            &self.species,
            &mut self.history,
            &self.genetic_config,
            &self.population_config,
        )
        .generate_offspring(rng);

        self.species.iter_mut().for_each(Species::cull_to_elite);
        self.respeciate_all(offspring);

        self.generation += 1;
        for genome in self.genomes_mut() {
            genome.set_fitness(0.0);
            genome.set_adjusted_fitness(0.0);
            genome.set_bracket(0);
        }
        Ok(())
    }

    /// Shares fitness within each species and culls every
    /// species to its survivors. Species left with at most
    /// one member are removed, unless that would remove
    /// them all, in which case the best one is kept.
    fn cull_species(&mut self) {
        let survival_threshold = self.population_config.survival_threshold;
        for species in &mut self.species {
            species.share_fitness();
            species.sort_by_adjusted_fitness();
            species.cull_to_portion(survival_threshold);
        }

        let mut doomed: Vec<bool> = self.species.iter().map(|s| s.len() <= 1).collect();
        if doomed.iter().all(|d| *d) {
            if let Some(best) = index_of_max(
                self.species
                    .iter()
                    .map(|s| s.representative().adjusted_fitness()),
            ) {
                doomed[best] = false;
            }
        }
        self.remove_marked(&doomed, "too small to breed");
    }

    /// Tracks each species' best fitness and removes those
    /// that have not improved for too long. Skipped while
    /// only one species remains, and never removes them all.
    fn remove_stagnant_species(&mut self) {
        if self.species.len() <= 1 {
            return;
        }
        let threshold = self.population_config.stagnation_threshold.get();
        let mut doomed: Vec<bool> = self
            .species
            .iter_mut()
            .map(|s| s.update_staleness() >= threshold)
            .collect();
        if doomed.iter().all(|d| *d) {
            if let Some(best) = index_of_max(self.species.iter().map(|s| s.top_fitness())) {
                doomed[best] = false;
            }
        }
        self.remove_marked(&doomed, "stagnant");
    }

    fn remove_marked(&mut self, doomed: &[bool], reason: &str) {
        let before = self.species.len();
        let mut doomed = doomed.iter();
        self.species
            .retain(|_| !doomed.next().copied().unwrap_or(false));
        if self.species.len() < before {
            debug!(
                generation = self.generation,
                removed = before - self.species.len(),
                reason,
                "removed species"
            );
        }
    }

    /// Assigns each child to the first species whose
    /// representative lies within the distance threshold,
    /// creating new species as needed.
    fn respeciate_all(&mut self, offspring: Vec<G>) {
        let mut new_species_count = 0;
        for genome in offspring {
            let threshold = self.population_config.distance_threshold;
            let home = self
                .species
                .iter_mut()
                .find(|s| s.genetic_distance(&genome, &self.genetic_config) < threshold);
            match home {
                Some(species) => species.add_genome(genome),
                None => {
                    let id = SpeciesID(self.generation + 1, new_species_count);
                    self.species.push(Species::new(id, genome));
                    new_species_count += 1;
                }
            }
        }
        if new_species_count > 0 {
            debug!(
                generation = self.generation + 1,
                created = new_species_count,
                "founded species"
            );
        }
    }

    /// Compiles every genome into a phenotype, in
    /// the order of [`genomes`](Population::genomes).
    /// Compilation runs in parallel.
    ///
    /// # Examples
    /// ```
    /// use neatarena::{Population, PopulationConfig};
    /// use neatarena_nn::{genomics::{GeneticConfig, NNGenome as G}, networks::Network};
    /// use rand::{rngs::StdRng, SeedableRng};
    ///
    /// let mut rng = StdRng::seed_from_u64(0);
    /// let population = Population::<_, _, G>::new(
    ///     PopulationConfig::zero(),
    ///     GeneticConfig::zero(),
    ///     &mut rng,
    /// );
    ///
    /// let networks: Vec<Network> = population.phenotypes();
    /// assert_eq!(networks.len(), population.genome_count());
    /// ```
    pub fn phenotypes<P>(&self) -> Vec<P>
    where
        G: Sync,
        P: for<'g> From<&'g G> + Send,
    {
        let genomes: Vec<&G> = self.genomes().collect();
        genomes.par_iter().map(|g| P::from(*g)).collect()
    }

    /// Returns an iterator over the population's species.
    pub fn species(&self) -> impl Iterator<Item = &Species<G>> {
        self.species.iter()
    }

    /// Returns an iterator over all genomes, species
    /// by species.
    pub fn genomes(&self) -> impl Iterator<Item = &G> {
        self.species.iter().flat_map(|s| s.genomes.iter())
    }

    /// Returns a mutable iterator over all genomes, in
    /// the same order as [`genomes`](Population::genomes).
    pub fn genomes_mut(&mut self) -> impl Iterator<Item = &mut G> {
        self.species.iter_mut().flat_map(|s| s.genomes.iter_mut())
    }

    /// Returns the total number of genomes.
    pub fn genome_count(&self) -> usize {
        self.species.iter().map(Species::len).sum()
    }

    /// Returns the genome with the highest fitness, if any.
    pub fn champion(&self) -> Option<&G> {
        self.genomes()
            .max_by(|a, b| a.fitness().total_cmp(&b.fitness()))
    }

    /// Returns the current generation number.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Returns the population's innovation history.
    pub fn history(&self) -> &H {
        &self.history
    }

    /// Returns the population configuration.
    pub fn population_config(&self) -> &PopulationConfig {
        &self.population_config
    }

    /// Returns the genetic configuration.
    pub fn genetic_config(&self) -> &C {
        &self.genetic_config
    }

    /// Returns a summary of the current generation's
    /// fitness distribution.
    pub fn summary(&self) -> GenerationSummary {
        GenerationSummary {
            generation: self.generation,
            species_count: self.species.len(),
            genome_count: self.genome_count(),
            fitness: Stats::from(self.genomes().map(|g| g.fitness())),
        }
    }
}

/// Index of the largest value, first one on ties.
fn index_of_max(values: impl Iterator<Item = f32>) -> Option<usize> {
    values
        .enumerate()
        .fold(None, |best: Option<(usize, f32)>, (i, v)| match best {
            Some((_, b)) if b >= v => best,
            _ => Some((i, v)),
        })
        .map(|(i, _)| i)
}
