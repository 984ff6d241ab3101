use rand::Rng;

/// An interface for genomes that can be used by NEAT.
pub trait Genome: Clone {
    type Config;
    type InnovationHistory: InnovationHistory<Config = Self::Config>;

    /// Returns a minimal genome.
    fn new(config: &Self::Config) -> Self;

    /// Returns the genetic distance between two genomes.
    ///
    /// Should be symmetric in its genome arguments.
    fn genetic_distance(first: &Self, second: &Self, config: &Self::Config) -> f32;

    /// Combines two genomes and returns a "child" genome.
    fn mate<R: Rng>(parent1: &Self, parent2: &Self, rng: &mut R) -> Self;

    /// Applies a round of mutations to the genome, recording
    /// structural innovations in `history`.
    fn mutate<R: Rng>(
        &mut self,
        history: &mut Self::InnovationHistory,
        config: &Self::Config,
        rng: &mut R,
    );

    /// Sets the genome's fitness value.
    fn set_fitness(&mut self, fitness: f32);

    /// Returns the genome's fitness value.
    fn fitness(&self) -> f32;

    /// Sets the genome's fitness value shared
    /// among the members of its species.
    fn set_adjusted_fitness(&mut self, adjusted_fitness: f32);

    /// Returns the genome's shared fitness value.
    fn adjusted_fitness(&self) -> f32;

    /// Sets the number of tournament rounds the genome won.
    fn set_bracket(&mut self, bracket: usize);

    /// Returns the number of tournament rounds the genome won.
    fn bracket(&self) -> usize;
}

/// The registry of structural innovations shared by
/// every genome of a population for the whole run.
///
/// How innovations are identified and numbered is left
/// to the implementor; the population only creates the
/// registry and hands it to mutation.
pub trait InnovationHistory {
    type Config;

    /// Returns a fresh registry for the given configuration.
    fn new(config: &Self::Config) -> Self;
}
