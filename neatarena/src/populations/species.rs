use crate::Genome;

use rand::prelude::{Rng, SliceRandom};
use serde::{Deserialize, Serialize};

/// Species identifier. Specifies
/// the generation in which the species
/// was born, and the count of other species
/// generated in the _same generation_ before
/// the one identified (i.e, if it was the
/// third species born in generation 5, it
/// will be species [5, 2]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SpeciesID(pub usize, pub usize);

/// Species are collections of reproductively
/// compatible (within a certain [genetic distance])
/// genomes. Membership is determined by calculating
/// the genetic distance to the species' first member,
/// its _representative_.
///
/// A species whose best fitness has not improved for
/// [`stagnation_threshold`] generations is removed.
///
/// [genetic distance]: crate::PopulationConfig::distance_threshold
/// [`stagnation_threshold`]: crate::PopulationConfig::stagnation_threshold
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Species<G> {
    id: SpeciesID,
    pub(super) genomes: Vec<G>,
    top_fitness: f32,
    staleness: usize,
}

impl<G: Genome> Species<G> {
    /// Creates a new species with the specified ID,
    /// whose first member and representative is `founder`.
    ///
    /// # Examples
    /// ```
    /// use neatarena::{Genome, Species, SpeciesID};
    /// use neatarena_nn::genomics::{GeneticConfig, NNGenome};
    ///
    /// let species = Species::new(SpeciesID(1, 0), NNGenome::new(&GeneticConfig::zero()));
    ///
    /// assert_eq!(species.len(), 1);
    /// ```
    pub fn new(id: SpeciesID, founder: G) -> Species<G> {
        Species {
            id,
            genomes: vec![founder],
            top_fitness: 0.0,
            staleness: 0,
        }
    }

    /// Returns the species' ID.
    ///
    /// # Examples
    /// ```
    /// use neatarena::{Genome, Species, SpeciesID};
    /// use neatarena_nn::genomics::{GeneticConfig, NNGenome};
    ///
    /// let species = Species::new(SpeciesID(1, 0), NNGenome::new(&GeneticConfig::zero()));
    ///
    /// assert_eq!(species.id(), SpeciesID(1, 0));
    /// ```
    pub fn id(&self) -> SpeciesID {
        self.id
    }

    /// Returns the species' representative, its first member.
    ///
    /// # Examples
    /// ```
    /// use neatarena::{Genome, Species, SpeciesID};
    /// use neatarena_nn::genomics::{GeneticConfig, NNGenome};
    ///
    /// let representative = NNGenome::new(&GeneticConfig::zero());
    /// let species = Species::new(SpeciesID(1, 0), representative.clone());
    ///
    /// assert_eq!(species.representative(), &representative);
    /// ```
    pub fn representative(&self) -> &G {
        &self.genomes[0]
    }

    /// Returns the genetic distance between the species'
    /// representative and `other`.
    pub fn genetic_distance(&self, other: &G, config: &G::Config) -> f32 {
        G::genetic_distance(self.representative(), other, config)
    }

    /// Adds a genome to the species.
    pub fn add_genome(&mut self, genome: G) {
        self.genomes.push(genome);
    }

    /// Returns an iterator over the species' members.
    pub fn genomes(&self) -> impl Iterator<Item = &G> {
        self.genomes.iter()
    }

    /// Returns the number of members.
    pub fn len(&self) -> usize {
        self.genomes.len()
    }

    /// Returns whether the species has no members.
    pub fn is_empty(&self) -> bool {
        self.genomes.is_empty()
    }

    /// Returns the best fitness any member has reached
    /// while the species was tracked.
    pub fn top_fitness(&self) -> f32 {
        self.top_fitness
    }

    /// Returns the number of generations the species'
    /// best fitness has not improved.
    pub fn time_stagnated(&self) -> usize {
        self.staleness
    }

    /// Returns the member with the highest fitness.
    ///
    /// # Examples
    /// ```
    /// use neatarena::{Genome, Species, SpeciesID};
    /// use neatarena_nn::genomics::{GeneticConfig, NNGenome, NodeType};
    ///
    /// let config = GeneticConfig::zero();
    /// let mut g1 = NNGenome::new(&config);
    /// let mut g2 = NNGenome::new(&config);
    /// g2.add_node(2, NodeType::Hidden);
    /// g1.set_fitness(5.0);
    /// g2.set_fitness(20.0);
    ///
    /// let mut species = Species::new(SpeciesID(1, 0), g1);
    /// species.add_genome(g2.clone());
    ///
    /// assert_eq!(species.champion(), Some(&g2));
    /// ```
    pub fn champion(&self) -> Option<&G> {
        self.genomes
            .iter()
            .max_by(|a, b| a.fitness().total_cmp(&b.fitness()))
    }

    /// Returns the sum of the members' adjusted fitnesses.
    pub fn adjusted_fitness_sum(&self) -> f32 {
        self.genomes.iter().map(|g| g.adjusted_fitness()).sum()
    }

    /// Divides each member's fitness by the species size.
    pub(super) fn share_fitness(&mut self) {
        let size = self.genomes.len() as f32;
        for genome in &mut self.genomes {
            let adjusted = genome.fitness() / size;
            genome.set_adjusted_fitness(adjusted);
        }
    }

    /// Sorts members by decreasing adjusted fitness.
    pub(super) fn sort_by_adjusted_fitness(&mut self) {
        self.genomes
            .sort_by(|a, b| b.adjusted_fitness().total_cmp(&a.adjusted_fitness()));
    }

    /// Keeps the top `ceil(len ⨯ survival_threshold)` members.
    /// Species with at most one member are left untouched.
    pub(super) fn cull_to_portion(&mut self, survival_threshold: f32) {
        if self.genomes.len() <= 1 {
            return;
        }
        self.genomes.truncate(self.count_survivors(survival_threshold));
    }

    pub(super) fn count_survivors(&self, survival_threshold: f32) -> usize {
        ((self.genomes.len() as f32 * survival_threshold).ceil() as usize).min(self.genomes.len())
    }

    /// Keeps only the top member.
    pub(super) fn cull_to_elite(&mut self) {
        self.genomes.truncate(1);
    }

    /// Updates the species' record of top fitness,
    /// to keep track of stagnation. Returns the
    /// updated staleness.
    pub(super) fn update_staleness(&mut self) -> usize {
        let best = self
            .genomes
            .iter()
            .map(|g| g.fitness())
            .max_by(f32::total_cmp)
            .unwrap_or(f32::NEG_INFINITY);
        if best > self.top_fitness {
            self.top_fitness = best;
            self.staleness = 0;
        } else {
            self.staleness += 1;
        }
        self.staleness
    }

    /// Produces one child from the species' members.
    ///
    /// With probability `sexual_reproduction_chance`, and only
    /// if the species has at least two members, two distinct
    /// members are mated. Otherwise a random member is cloned.
    /// Either way the child is then mutated.
    pub(super) fn breed<R: Rng>(
        &self,
        history: &mut G::InnovationHistory,
        config: &G::Config,
        sexual_reproduction_chance: f32,
        rng: &mut R,
    ) -> Option<G> {
        let mut child = if self.genomes.len() > 1 && rng.gen::<f32>() < sexual_reproduction_chance {
            let mut parents = self.genomes.choose_multiple(rng, 2);
            match (parents.next(), parents.next()) {
                (Some(p1), Some(p2)) => G::mate(p1, p2, rng),
                _ => return None,
            }
        } else {
            self.genomes.choose(rng)?.clone()
        };
        child.mutate(history, config, rng);
        Some(child)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{BitGenome, BitHistory};
    use rand::{rngs::StdRng, SeedableRng};

    fn species_with_fitnesses(fitnesses: &[f32]) -> Species<BitGenome> {
        let mut genomes = fitnesses.iter().enumerate().map(|(i, f)| {
            let mut g = BitGenome::with_bits(vec![i as u8]);
            g.set_fitness(*f);
            g
        });
        let mut species = Species::new(SpeciesID(0, 0), genomes.next().unwrap());
        genomes.for_each(|g| species.add_genome(g));
        species
    }

    #[test]
    fn fitness_sharing_divides_by_size() {
        let mut species = species_with_fitnesses(&[4.0, 8.0]);
        species.share_fitness();
        let adjusted: Vec<_> = species.genomes().map(|g| g.adjusted_fitness()).collect();
        assert_eq!(adjusted, [2.0, 4.0]);
        assert_eq!(species.adjusted_fitness_sum(), 6.0);
    }

    #[test]
    fn culling_keeps_rounded_up_top_portion() {
        let mut species = species_with_fitnesses(&[1.0, 9.0, 3.0, 7.0, 5.0, 2.0]);
        species.share_fitness();
        species.sort_by_adjusted_fitness();
        species.cull_to_portion(0.2);
        // ceil(6 ⨯ 0.2) = 2
        let kept: Vec<_> = species.genomes().map(|g| g.fitness()).collect();
        assert_eq!(kept, [9.0, 7.0]);
    }

    #[test]
    fn single_member_is_never_culled() {
        let mut species = species_with_fitnesses(&[1.0]);
        species.cull_to_portion(0.0);
        assert_eq!(species.len(), 1);
    }

    #[test]
    fn staleness_resets_on_improvement() {
        let mut species = species_with_fitnesses(&[1.0, 2.0]);
        assert_eq!(species.update_staleness(), 0);
        assert_eq!(species.top_fitness(), 2.0);
        assert_eq!(species.update_staleness(), 1);
        assert_eq!(species.update_staleness(), 2);
        species.genomes[0].set_fitness(3.0);
        assert_eq!(species.update_staleness(), 0);
        assert_eq!(species.top_fitness(), 3.0);
    }

    #[test]
    fn single_member_breeds_asexually() {
        let species = species_with_fitnesses(&[1.0]);
        let mut history = BitHistory::default();
        let mut rng = StdRng::seed_from_u64(0);
        for _ in 0..20 {
            let child = species.breed(&mut history, &(), 1.0, &mut rng).unwrap();
            // Clone plus one mutation bit.
            assert_eq!(child.bits()[0], 0);
            assert_eq!(child.bits().len(), 2);
        }
    }

    #[test]
    fn sexual_breeding_uses_distinct_parents() {
        let species = species_with_fitnesses(&[1.0, 2.0]);
        let mut history = BitHistory::default();
        let mut rng = StdRng::seed_from_u64(0);
        for _ in 0..20 {
            let child = species.breed(&mut history, &(), 1.0, &mut rng).unwrap();
            // Mating concatenates both parents' bits.
            let mut parents = child.bits()[..2].to_vec();
            parents.sort_unstable();
            assert_eq!(parents, [0, 1]);
        }
    }
}
