/// The state of an episode after one step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The episode continues.
    Ongoing,
    /// The episode ended without a winner.
    Draw,
    /// The seat at the given index won the episode.
    Win(usize),
}

/// A per-item event reported by an environment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Observation {
    /// The winner of an episode held `item` when it ended.
    Win { item: usize },
    /// A bid of `amount` was made on `item`.
    Bid { item: usize, amount: u32 },
}

/// A competitive environment in which a fixed set
/// of seats play one episode.
pub trait Environment {
    /// Advances the episode by one step.
    fn step(&mut self) -> Outcome;

    /// Drains the observations gathered since the last call.
    fn observations(&mut self) -> Vec<Observation>;
}

/// Opens environments over a table of phenotypes.
///
/// One factory is shared by every worker of a tournament,
/// so it must be [`Sync`].
pub trait EnvironmentFactory<P>: Sync {
    /// Opens a fresh episode. `seats` holds the players in
    /// seating order; [`Outcome::Win`] indexes into it.
    /// `seed` should drive all of the episode's randomness.
    fn open<'a>(&'a self, seats: &[&'a P], seed: u64) -> Box<dyn Environment + 'a>;
}

/// Collects per-item observations across episodes.
pub trait Statistics: Send {
    /// Records that an episode's winner held `item`.
    fn mark_win(&mut self, item: usize);

    /// Records a bid of `amount` on `item`.
    fn make_bid(&mut self, item: usize, amount: u32);

    /// Forwards an observation to the matching method.
    fn observe(&mut self, observation: Observation) {
        match observation {
            Observation::Win { item } => self.mark_win(item),
            Observation::Bid { item, amount } => self.make_bid(item, amount),
        }
    }
}

/// Discards every observation.
impl Statistics for () {
    fn mark_win(&mut self, _: usize) {}

    fn make_bid(&mut self, _: usize, _: u32) {}
}
