use thiserror::Error;

/// Errors raised while setting up or running a tournament.
#[derive(Debug, Error)]
pub enum TournamentError {
    /// The population has no genomes to rank.
    #[error("attempted tournament on an empty population")]
    EmptyPopulation,
    /// The worker pool could not be started.
    #[error("failed to build worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
    /// A configuration value is out of range.
    #[error("invalid tournament configuration: {0}")]
    InvalidConfig(&'static str),
}
