use super::{PopulationConfig, Species};

use crate::Genome;

use rand::prelude::{Rng, SliceRandom};

/// Auxiliary type for offspring generation.
/// Handles all the tasks of generating a population's
/// offspring according to the specified configs,
/// from already culled species.
pub(super) struct OffspringFactory<'a, G: Genome> {
    species: &'a [Species<G>],
    history: &'a mut G::InnovationHistory,
    genetic_config: &'a G::Config,
    population_config: &'a PopulationConfig,
}

impl<'a, G: Genome> OffspringFactory<'a, G> {
    pub(super) fn new(
        species: &'a [Species<G>],
        history: &'a mut G::InnovationHistory,
        genetic_config: &'a G::Config,
        population_config: &'a PopulationConfig,
    ) -> OffspringFactory<'a, G> {
        OffspringFactory {
            species,
            history,
            genetic_config,
            population_config,
        }
    }

    /// Number of children each species is allotted in
    /// proportion to its share of the adjusted fitness.
    /// One slot per species is reserved for its elite.
    pub(super) fn allot_offspring(&self) -> Vec<usize> {
        let size = self.population_config.size.get();
        let sums: Vec<f32> = self
            .species
            .iter()
            .map(|s| s.adjusted_fitness_sum().max(0.0))
            .collect();
        let total: f32 = sums.iter().sum();
        let equal_share = 1.0 / self.species.len() as f32;

        let mut budget = size.saturating_sub(self.species.len());
        sums.iter()
            .map(|sum| {
                let share = if total > 0.0 { sum / total } else { equal_share };
                let allotted = ((size as f32 * share).floor() as usize)
                    .saturating_sub(1)
                    .min(budget);
                budget -= allotted;
                allotted
            })
            .collect()
    }

    /// Breeds the allotted children, then tops the
    /// population up with children of randomly chosen
    /// species until elites and children fill it.
    pub(super) fn generate_offspring<R: Rng>(&mut self, rng: &mut R) -> Vec<G> {
        let size = self.population_config.size.get();
        let all_species = self.species;
        let allotted_offspring = self.allot_offspring();
        let mut offspring = Vec::with_capacity(size.saturating_sub(all_species.len()));

        for (species, allotted) in all_species.iter().zip(allotted_offspring) {
            for _ in 0..allotted {
                if let Some(child) = self.breed(species, rng) {
                    offspring.push(child);
                }
            }
        }

        while all_species.len() + offspring.len() < size {
            let child = match all_species.choose(rng) {
                Some(species) => self.breed(species, rng),
                None => None,
            };
            match child {
                Some(child) => offspring.push(child),
                None => break,
            }
        }

        offspring
    }

    fn breed<R: Rng>(&mut self, species: &Species<G>, rng: &mut R) -> Option<G> {
        species.breed(
            self.history,
            self.genetic_config,
            self.population_config.sexual_reproduction_chance,
            rng,
        )
    }
}
