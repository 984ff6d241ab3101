//! A Tournament turns a generation's phenotypes into
//! fitness scores. Contestants are seated at tables,
//! each table plays many episodes of an external
//! environment concurrently, and only the best seat of
//! every table advances. Rounds repeat until a single
//! contestant remains.
//!
//! Fitness is relative to the reigning champion: every
//! genome scores the champion's fitness plus a fixed step
//! for each round it advanced beyond the champion, so
//! scores stay comparable as the field changes.
mod config;
mod environment;
mod errors;

use crate::{Checkpoint, Genome, InnovationHistory, Population};
pub use config::TournamentConfig;
pub use environment::{Environment, EnvironmentFactory, Observation, Outcome, Statistics};
pub use errors::TournamentError;

use rand::prelude::{Rng, SeedableRng, SliceRandom, StdRng};
use rayon::{ThreadPool, ThreadPoolBuilder};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Mutex, PoisonError};

/// The genome that won the latest tournament, and
/// the standing it won with.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Champion<G> {
    /// The winning genome, if a tournament has been played.
    pub genome: Option<G>,
    /// Its fitness when it won.
    pub fitness: f32,
    /// The number of rounds it advanced.
    pub bracket: usize,
}

impl<G> Default for Champion<G> {
    fn default() -> Champion<G> {
        Champion {
            genome: None,
            fitness: 0.0,
            bracket: 0,
        }
    }
}

/// Totals for one tournament.
#[derive(Clone, Debug, PartialEq)]
pub struct TournamentReport {
    pub rounds: usize,
    pub episodes: usize,
    pub failed_episodes: usize,
    /// Index of the winner, in population genome order.
    pub champion: usize,
    pub champion_fitness: f32,
}

/// Totals for one round.
#[derive(Clone, Debug, PartialEq)]
pub struct RoundReport {
    /// Contestants advancing to the next round.
    pub survivors: Vec<usize>,
    pub episodes: usize,
    pub failed_episodes: usize,
}

/// Shared state of the workers playing one table.
struct Tally<'s, S> {
    scores: Vec<f32>,
    statistics: &'s mut S,
    failed: usize,
}

/// Final scores of one table, by seat.
struct TableResult {
    scores: Vec<f32>,
    failed: usize,
}

/// A tournament scheduler.
///
/// Owns the worker pool that plays episodes and the
/// statistics collector that receives their observations.
pub struct Tournament<G, S = ()> {
    config: TournamentConfig,
    statistics: S,
    champion: Champion<G>,
    pool: ThreadPool,
}

impl<G, S: Statistics> Tournament<G, S> {
    /// Creates a tournament scheduler with no champion.
    ///
    /// # Errors
    /// Returns an error if the table size is lesser than 2,
    /// or if the worker pool cannot be started.
    ///
    /// # Examples
    /// ```
    /// use neatarena::{Tournament, TournamentConfig};
    /// use neatarena_nn::genomics::NNGenome;
    ///
    /// let tournament = Tournament::<NNGenome>::new(TournamentConfig::default(), ()).unwrap();
    /// assert!(tournament.champion().genome.is_none());
    ///
    /// let invalid = TournamentConfig { table_size: 1, ..TournamentConfig::default() };
    /// assert!(Tournament::<NNGenome>::new(invalid, ()).is_err());
    /// ```
    pub fn new(config: TournamentConfig, statistics: S) -> Result<Tournament<G, S>, TournamentError> {
        if config.table_size < 2 {
            return Err(TournamentError::InvalidConfig("table size must be at least 2"));
        }
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.workers.get())
            .thread_name(|i| format!("tournament-worker-{}", i))
            .build()?;
        Ok(Tournament {
            config,
            statistics,
            champion: Champion::default(),
            pool,
        })
    }

    /// Creates a tournament scheduler that continues from
    /// the champion recorded in `checkpoint`.
    ///
    /// # Errors
    /// As [`Tournament::new`].
    pub fn resume<H>(
        config: TournamentConfig,
        statistics: S,
        checkpoint: &Checkpoint<H, G>,
    ) -> Result<Tournament<G, S>, TournamentError>
    where
        G: Clone,
    {
        let mut tournament = Tournament::new(config, statistics)?;
        tournament.champion = checkpoint.champion.clone();
        Ok(tournament)
    }

    /// Captures `population` together with the
    /// tournament's current champion.
    pub fn checkpoint<C, H>(&self, population: &Population<C, H, G>) -> Checkpoint<H, G>
    where
        H: InnovationHistory<Config = C> + Clone,
        G: Genome<Config = C, InnovationHistory = H>,
    {
        Checkpoint {
            champion: self.champion.clone(),
            ..population.checkpoint()
        }
    }

    /// Ranks the population and writes each genome's
    /// bracket and fitness.
    ///
    /// Every genome is compiled into a phenotype of type `P`,
    /// then rounds are played until one contestant remains. That
    /// contestant becomes the new champion.
    ///
    /// # Errors
    /// Returns an error if the population has no genomes.
    pub fn execute<C, H, P, F, R>(
        &mut self,
        population: &mut Population<C, H, G>,
        factory: &F,
        rng: &mut R,
    ) -> Result<TournamentReport, TournamentError>
    where
        H: InnovationHistory<Config = C>,
        G: Genome<Config = C, InnovationHistory = H> + PartialEq + Sync,
        P: for<'g> From<&'g G> + Send + Sync,
        F: EnvironmentFactory<P>,
        R: Rng,
    {
        let phenotypes: Vec<P> = population.phenotypes();
        if phenotypes.is_empty() {
            return Err(TournamentError::EmptyPopulation);
        }
        info!(
            generation = population.generation(),
            contestants = phenotypes.len(),
            "starting tournament"
        );

        let mut brackets = vec![0; phenotypes.len()];
        let mut contestants: Vec<usize> = (0..phenotypes.len()).collect();
        let (mut rounds, mut episodes, mut failed_episodes) = (0, 0, 0);
        while contestants.len() > 1 {
            let round = self.execute_round(&phenotypes, &contestants, factory, rng);
            for survivor in &round.survivors {
                brackets[*survivor] += 1;
            }
            rounds += 1;
            episodes += round.episodes;
            failed_episodes += round.failed_episodes;
            debug!(
                round = rounds,
                survivors = round.survivors.len(),
                failed_episodes = round.failed_episodes,
                "round complete"
            );
            contestants = round.survivors;
        }
        let winner = contestants[0];

        let champion_bracket = match &self.champion.genome {
            Some(previous) => population
                .genomes()
                .position(|g| g == previous)
                .map(|i| brackets[i])
                .unwrap_or(self.champion.bracket),
            None => self.champion.bracket,
        };
        let base_fitness = self.champion.fitness;
        let step = self.config.fitness_step;
        for (genome, bracket) in population.genomes_mut().zip(&brackets) {
            genome.set_bracket(*bracket);
            genome.set_fitness(base_fitness + (*bracket as f32 - champion_bracket as f32) * step);
        }

        if let Some(genome) = population.genomes().nth(winner) {
            self.champion = Champion {
                genome: Some(genome.clone()),
                fitness: genome.fitness(),
                bracket: brackets[winner],
            };
        }
        info!(
            generation = population.generation(),
            rounds,
            episodes,
            failed_episodes,
            champion_fitness = self.champion.fitness,
            "tournament complete"
        );

        Ok(TournamentReport {
            rounds,
            episodes,
            failed_episodes,
            champion: winner,
            champion_fitness: self.champion.fitness,
        })
    }

    /// Plays one round among `contestants`, which index
    /// into `phenotypes`.
    ///
    /// Contestants are shuffled and seated at tables of
    /// [`table_size`]; the last table may be smaller. Each
    /// table plays [`round_size`] episodes and its highest
    /// scoring seat advances, the earliest seat on ties. A
    /// table of one advances without playing.
    ///
    /// [`table_size`]: TournamentConfig::table_size
    /// [`round_size`]: TournamentConfig::round_size
    pub fn execute_round<P, F, R>(
        &mut self,
        phenotypes: &[P],
        contestants: &[usize],
        factory: &F,
        rng: &mut R,
    ) -> RoundReport
    where
        P: Sync,
        F: EnvironmentFactory<P>,
        R: Rng,
    {
        let mut seating = contestants.to_vec();
        seating.shuffle(rng);

        let mut report = RoundReport {
            survivors: Vec::with_capacity(seating.len() / self.config.table_size + 1),
            episodes: 0,
            failed_episodes: 0,
        };
        for table in seating.chunks(self.config.table_size) {
            if table.len() == 1 {
                report.survivors.push(table[0]);
                continue;
            }
            let seats: Vec<&P> = table.iter().map(|i| &phenotypes[*i]).collect();
            let result = self.play_table(&seats, factory, rng);
            let winner = index_of_best(&result.scores);
            debug!(table = ?table, scores = ?result.scores, winner = table[winner], "table complete");

            report.survivors.push(table[winner]);
            report.episodes += self.config.round_size.get();
            report.failed_episodes += result.failed;
        }
        report
    }

    /// Plays a table's episodes in batches of at most
    /// `workers` concurrent tasks of `batch_size` episodes
    /// each. A batch finishes before the next one starts.
    fn play_table<P, F, R>(&mut self, seats: &[&P], factory: &F, rng: &mut R) -> TableResult
    where
        P: Sync,
        F: EnvironmentFactory<P>,
        R: Rng,
    {
        let tally = Mutex::new(Tally {
            scores: vec![0.0; seats.len()],
            statistics: &mut self.statistics,
            failed: 0,
        });

        let mut remaining = self.config.round_size.get();
        while remaining > 0 {
            let mut quotas = Vec::with_capacity(self.config.workers.get());
            while quotas.len() < self.config.workers.get() && remaining > 0 {
                let quota = self.config.batch_size.get().min(remaining);
                quotas.push((quota, rng.gen::<u64>()));
                remaining -= quota;
            }
            let tally = &tally;
            self.pool.scope(|scope| {
                for (quota, seed) in quotas {
                    scope.spawn(move |_| {
                        let mut rng = StdRng::seed_from_u64(seed);
                        for _ in 0..quota {
                            play_episode(seats, factory, tally, &mut rng);
                        }
                    });
                }
            });
        }

        let tally = tally.into_inner().unwrap_or_else(PoisonError::into_inner);
        TableResult {
            scores: tally.scores,
            failed: tally.failed,
        }
    }

    /// Returns the reigning champion.
    pub fn champion(&self) -> &Champion<G> {
        &self.champion
    }

    /// Returns the tournament configuration.
    pub fn config(&self) -> &TournamentConfig {
        &self.config
    }

    /// Returns the statistics collector.
    pub fn statistics(&self) -> &S {
        &self.statistics
    }

    /// Returns the statistics collector mutably.
    pub fn statistics_mut(&mut self) -> &mut S {
        &mut self.statistics
    }
}

/// Plays one episode with a shuffled seating order and
/// records its outcome. A panicking environment counts
/// as a failed episode and scores nothing.
fn play_episode<P, F, S>(seats: &[&P], factory: &F, tally: &Mutex<Tally<'_, S>>, rng: &mut StdRng)
where
    F: EnvironmentFactory<P>,
    S: Statistics,
{
    let mut order: Vec<usize> = (0..seats.len()).collect();
    order.shuffle(rng);
    let seating: Vec<&P> = order.iter().map(|i| seats[*i]).collect();
    let seed = rng.gen::<u64>();

    let played = panic::catch_unwind(AssertUnwindSafe(|| {
        let mut environment = factory.open(&seating, seed);
        let outcome = loop {
            match environment.step() {
                Outcome::Ongoing => continue,
                outcome => break outcome,
            }
        };
        (outcome, environment.observations())
    }));

    let mut tally = tally.lock().unwrap_or_else(PoisonError::into_inner);
    match played {
        Ok((Outcome::Win(seat), observations)) if seat < order.len() => {
            tally.scores[order[seat]] += 1.0;
            tally.record(observations);
        }
        Ok((Outcome::Draw, observations)) => {
            tally.scores.iter_mut().for_each(|s| *s += 0.25);
            tally.record(observations);
        }
        Ok((outcome, _)) => {
            tally.failed += 1;
            warn!(?outcome, "episode ended with an invalid outcome");
        }
        Err(payload) => {
            tally.failed += 1;
            warn!(reason = %panic_message(payload.as_ref()), "episode panicked");
        }
    }
}

impl<S: Statistics> Tally<'_, S> {
    fn record(&mut self, observations: Vec<Observation>) {
        for observation in observations {
            self.statistics.observe(observation);
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic"
    }
}

/// Index of the highest score, earliest on ties.
fn index_of_best(scores: &[f32]) -> usize {
    let mut best = 0;
    for (i, score) in scores.iter().enumerate() {
        if *score > scores[best] {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{BitGenome, BitHistory};
    use crate::PopulationConfig;
    use std::num::NonZeroUsize;

    /// Plays as strongly as its genome's newest innovation.
    #[derive(Debug, PartialEq)]
    struct Strength(u8);

    impl From<&BitGenome> for Strength {
        fn from(genome: &BitGenome) -> Strength {
            Strength(genome.bits().last().copied().unwrap_or(0))
        }
    }

    /// The strongest seat wins, equal strengths draw.
    struct Duel<'a> {
        seats: Vec<&'a Strength>,
        reported: bool,
    }

    impl Environment for Duel<'_> {
        fn step(&mut self) -> Outcome {
            let best = self.seats.iter().map(|s| s.0).max().unwrap_or(0);
            let mut winners = self.seats.iter().enumerate().filter(|(_, s)| s.0 == best);
            match (winners.next(), winners.next()) {
                (Some((seat, _)), None) => Outcome::Win(seat),
                _ => Outcome::Draw,
            }
        }

        fn observations(&mut self) -> Vec<Observation> {
            if std::mem::replace(&mut self.reported, true) {
                return vec![];
            }
            vec![Observation::Bid { item: 1, amount: 10 }, Observation::Win { item: 2 }]
        }
    }

    struct DuelFactory;

    impl EnvironmentFactory<Strength> for DuelFactory {
        fn open<'a>(&'a self, seats: &[&'a Strength], _: u64) -> Box<dyn Environment + 'a> {
            Box::new(Duel {
                seats: seats.to_vec(),
                reported: false,
            })
        }
    }

    struct Broken;

    impl Environment for Broken {
        fn step(&mut self) -> Outcome {
            panic!("environment failure");
        }

        fn observations(&mut self) -> Vec<Observation> {
            vec![]
        }
    }

    struct BrokenFactory;

    impl EnvironmentFactory<Strength> for BrokenFactory {
        fn open<'a>(&'a self, _: &[&'a Strength], _: u64) -> Box<dyn Environment + 'a> {
            Box::new(Broken)
        }
    }

    #[derive(Default)]
    struct Counter {
        bids: usize,
        wins: usize,
    }

    impl Statistics for Counter {
        fn mark_win(&mut self, _: usize) {
            self.wins += 1;
        }

        fn make_bid(&mut self, _: usize, _: u32) {
            self.bids += 1;
        }
    }

    fn config(round_size: usize) -> TournamentConfig {
        TournamentConfig {
            table_size: 4,
            round_size: NonZeroUsize::new(round_size).unwrap(),
            workers: NonZeroUsize::new(3).unwrap(),
            batch_size: NonZeroUsize::new(2).unwrap(),
            fitness_step: 5.0,
        }
    }

    fn strengths(count: u8) -> Vec<Strength> {
        (0..count).map(Strength).collect()
    }

    fn population(size: usize, rng: &mut StdRng) -> Population<(), BitHistory, BitGenome> {
        let config = PopulationConfig {
            size: NonZeroUsize::new(size).unwrap(),
            ..PopulationConfig::zero()
        };
        Population::new(config, (), rng)
    }

    #[test]
    fn round_keeps_one_contestant_per_table() {
        let mut tournament = Tournament::<BitGenome, Counter>::new(config(7), Counter::default()).unwrap();
        let phenotypes = strengths(16);
        let contestants: Vec<usize> = (0..16).collect();
        let mut rng = StdRng::seed_from_u64(0);

        let round = tournament.execute_round(&phenotypes, &contestants, &DuelFactory, &mut rng);

        assert_eq!(round.survivors.len(), 4);
        assert!(round.survivors.contains(&15));
        assert_eq!(round.episodes, 4 * 7);
        assert_eq!(round.failed_episodes, 0);
        assert_eq!(tournament.statistics().bids, 4 * 7);
        assert_eq!(tournament.statistics().wins, 4 * 7);
    }

    #[test]
    fn short_tables_play_and_lone_seats_get_a_bye() {
        let mut tournament = Tournament::<BitGenome>::new(config(3), ()).unwrap();
        let mut rng = StdRng::seed_from_u64(1);

        let phenotypes = strengths(6);
        let contestants: Vec<usize> = (0..6).collect();
        let round = tournament.execute_round(&phenotypes, &contestants, &DuelFactory, &mut rng);
        assert_eq!(round.survivors.len(), 2);
        assert_eq!(round.episodes, 2 * 3);

        let phenotypes = strengths(5);
        let contestants: Vec<usize> = (0..5).collect();
        let round = tournament.execute_round(&phenotypes, &contestants, &DuelFactory, &mut rng);
        assert_eq!(round.survivors.len(), 2);
        assert_eq!(round.episodes, 3);
    }

    #[test]
    fn draws_advance_the_first_seat() {
        let mut tournament = Tournament::<BitGenome>::new(config(5), ()).unwrap();
        let phenotypes: Vec<Strength> = (0..4).map(|_| Strength(1)).collect();
        let mut rng = StdRng::seed_from_u64(2);
        let round = tournament.execute_round(&phenotypes, &[3, 1, 2, 0], &DuelFactory, &mut rng);
        assert_eq!(round.survivors.len(), 1);
        assert_eq!(round.failed_episodes, 0);
    }

    #[test]
    fn panicking_episodes_count_as_failures() {
        let mut tournament = Tournament::<BitGenome>::new(config(4), ()).unwrap();
        let phenotypes = strengths(8);
        let contestants: Vec<usize> = (0..8).collect();
        let mut rng = StdRng::seed_from_u64(3);

        let round = tournament.execute_round(&phenotypes, &contestants, &BrokenFactory, &mut rng);

        assert_eq!(round.survivors.len(), 2);
        assert_eq!(round.failed_episodes, 8);
    }

    #[test]
    fn fitness_counts_rounds_advanced() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut population = population(16, &mut rng);
        let mut tournament = Tournament::<BitGenome>::new(config(2), ()).unwrap();

        let report = tournament
            .execute::<_, _, Strength, _, _>(&mut population, &DuelFactory, &mut rng)
            .unwrap();

        assert_eq!(report.rounds, 2);
        assert_eq!(report.episodes, (4 + 1) * 2);
        assert_eq!(report.champion_fitness, 10.0);
        let brackets: Vec<usize> = population.genomes().map(|g| g.bracket()).collect();
        assert_eq!(brackets.iter().filter(|b| **b >= 1).count(), 4);
        assert_eq!(brackets.iter().filter(|b| **b == 2).count(), 1);
        for genome in population.genomes() {
            assert_eq!(genome.fitness(), genome.bracket() as f32 * 5.0);
        }
        // Every genome's newest innovation is unique, the strongest wins.
        let champion = population.genomes().nth(report.champion).unwrap();
        assert_eq!(Strength::from(champion), Strength(15));
        assert_eq!(tournament.champion().genome.as_ref(), Some(champion));
    }

    #[test]
    fn fitness_is_relative_to_the_champion() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut population = population(16, &mut rng);
        let mut tournament = Tournament::<BitGenome>::new(config(1), ()).unwrap();
        tournament
            .execute::<_, _, Strength, _, _>(&mut population, &DuelFactory, &mut rng)
            .unwrap();

        let report = tournament
            .execute::<_, _, Strength, _, _>(&mut population, &DuelFactory, &mut rng)
            .unwrap();

        // The champion defends its title and keeps its fitness.
        assert_eq!(report.champion_fitness, 10.0);
        for genome in population.genomes() {
            assert_eq!(genome.fitness(), 10.0 + (genome.bracket() as f32 - 2.0) * 5.0);
        }
    }

    #[test]
    fn single_genome_wins_without_playing() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut population = population(1, &mut rng);
        let mut tournament = Tournament::<BitGenome>::new(config(1), ()).unwrap();
        let report = tournament
            .execute::<_, _, Strength, _, _>(&mut population, &DuelFactory, &mut rng)
            .unwrap();
        assert_eq!(report.rounds, 0);
        assert_eq!(report.episodes, 0);
        assert_eq!(report.champion, 0);
    }

    #[test]
    fn resume_restores_the_champion() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut population = population(8, &mut rng);
        let mut tournament = Tournament::<BitGenome>::new(config(1), ()).unwrap();
        tournament
            .execute::<_, _, Strength, _, _>(&mut population, &DuelFactory, &mut rng)
            .unwrap();

        let checkpoint = tournament.checkpoint(&population);
        let resumed = Tournament::<BitGenome>::resume(config(1), (), &checkpoint).unwrap();
        assert_eq!(resumed.champion(), tournament.champion());
    }
}
