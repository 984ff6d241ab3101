use super::SpeciesID;

use thiserror::Error;

/// Errors raised while evolving or restoring a population.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PopulationError {
    /// The population holds no genomes.
    #[error("attempted evolution on degenerate population")]
    Degenerate,
    /// A restored species holds no genomes.
    #[error("species {0:?} has no members")]
    EmptySpecies(SpeciesID),
}
