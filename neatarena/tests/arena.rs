use neatarena::{
    Checkpoint, Environment, EnvironmentFactory, Genome, Observation, Outcome, Population,
    PopulationConfig, Tournament, TournamentConfig,
};
use neatarena_nn::{
    genomics::{GeneticConfig, History, NNGenome},
    networks::Network,
};
use rand::{rngs::StdRng, Rng, SeedableRng};

use std::num::NonZeroUsize;

/// Each seat answers a random question; the highest answer wins.
struct Quiz<'a> {
    seats: Vec<&'a Network>,
    question: f32,
}

impl Environment for Quiz<'_> {
    fn step(&mut self) -> Outcome {
        let answers: Vec<f32> = self
            .seats
            .iter()
            .map(|n| n.evaluate(&[self.question, 1.0 - self.question])[0])
            .collect();
        let mut best = 0;
        for (seat, answer) in answers.iter().enumerate() {
            if *answer > answers[best] {
                best = seat;
            }
        }
        if answers.iter().all(|a| *a == answers[best]) {
            Outcome::Draw
        } else {
            Outcome::Win(best)
        }
    }

    fn observations(&mut self) -> Vec<Observation> {
        vec![]
    }
}

struct QuizMaster;

impl EnvironmentFactory<Network> for QuizMaster {
    fn open<'a>(&'a self, seats: &[&'a Network], seed: u64) -> Box<dyn Environment + 'a> {
        Box::new(Quiz {
            seats: seats.to_vec(),
            question: StdRng::seed_from_u64(seed).gen(),
        })
    }
}

/// Crashes on roughly half of the episodes.
struct Flaky(QuizMaster);

impl EnvironmentFactory<Network> for Flaky {
    fn open<'a>(&'a self, seats: &[&'a Network], seed: u64) -> Box<dyn Environment + 'a> {
        if seed % 2 == 0 {
            panic!("lost connection to table");
        }
        self.0.open(seats, seed)
    }
}

fn genetic_config() -> GeneticConfig {
    GeneticConfig {
        input_count: NonZeroUsize::new(2).unwrap(),
        output_count: NonZeroUsize::new(1).unwrap(),
        ..GeneticConfig::default()
    }
}

fn population(size: usize, rng: &mut StdRng) -> Population<GeneticConfig, History, NNGenome> {
    Population::new(
        PopulationConfig {
            size: NonZeroUsize::new(size).unwrap(),
            ..PopulationConfig::default()
        },
        genetic_config(),
        rng,
    )
}

fn tournament_config(round_size: usize) -> TournamentConfig {
    TournamentConfig {
        round_size: NonZeroUsize::new(round_size).unwrap(),
        workers: NonZeroUsize::new(4).unwrap(),
        batch_size: NonZeroUsize::new(3).unwrap(),
        ..TournamentConfig::default()
    }
}

#[test]
fn first_round_quarters_the_field() {
    let mut rng = StdRng::seed_from_u64(0);
    let population = population(256, &mut rng);
    let phenotypes: Vec<Network> = population.phenotypes();
    let contestants: Vec<usize> = (0..256).collect();
    let mut tournament = Tournament::<NNGenome>::new(tournament_config(10), ()).unwrap();

    let round = tournament.execute_round(&phenotypes, &contestants, &QuizMaster, &mut rng);

    assert_eq!(round.survivors.len(), 64);
    assert_eq!(round.episodes, 64 * 10);
    let mut survivors = round.survivors.clone();
    survivors.sort_unstable();
    survivors.dedup();
    assert_eq!(survivors.len(), 64);
}

#[test]
fn full_tournament_brackets() {
    let mut rng = StdRng::seed_from_u64(1);
    let mut population = population(256, &mut rng);
    let mut tournament = Tournament::<NNGenome>::new(tournament_config(5), ()).unwrap();

    let report = tournament
        .execute::<_, _, Network, _, _>(&mut population, &QuizMaster, &mut rng)
        .unwrap();

    // 256 -> 64 -> 16 -> 4 -> 1
    assert_eq!(report.rounds, 4);
    let at_least = |rounds: usize| population.genomes().filter(|g| g.bracket() >= rounds).count();
    assert_eq!(at_least(1), 64);
    assert_eq!(at_least(2), 16);
    assert_eq!(at_least(3), 4);
    assert_eq!(at_least(4), 1);
    assert_eq!(report.champion_fitness, 20.0);
}

#[test]
fn generations_keep_population_size() {
    let mut rng = StdRng::seed_from_u64(2);
    let mut population = population(64, &mut rng);
    let mut tournament = Tournament::<NNGenome>::new(tournament_config(4), ()).unwrap();

    for generation in 0..4 {
        tournament
            .execute::<_, _, Network, _, _>(&mut population, &QuizMaster, &mut rng)
            .unwrap();
        population.evolve(&mut rng).unwrap();
        assert_eq!(population.genome_count(), 64);
        assert_eq!(population.generation(), generation + 1);
    }
}

#[test]
fn crashing_episodes_do_not_stall_the_tournament() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut population = population(16, &mut rng);
    let mut tournament = Tournament::<NNGenome>::new(tournament_config(8), ()).unwrap();

    let report = tournament
        .execute::<_, _, Network, _, _>(&mut population, &Flaky(QuizMaster), &mut rng)
        .unwrap();

    assert_eq!(report.rounds, 2);
    assert_eq!(report.episodes, 5 * 8);
    assert!(report.failed_episodes > 0);
    assert!(report.failed_episodes < report.episodes);
}

#[test]
fn checkpoint_round_trips_through_json() {
    let mut rng = StdRng::seed_from_u64(4);
    let mut population = population(32, &mut rng);
    let mut tournament = Tournament::<NNGenome>::new(tournament_config(2), ()).unwrap();
    tournament
        .execute::<_, _, Network, _, _>(&mut population, &QuizMaster, &mut rng)
        .unwrap();
    population.evolve(&mut rng).unwrap();

    let checkpoint = tournament.checkpoint(&population);
    let json = serde_json::to_string(&checkpoint).unwrap();
    let restored: Checkpoint<History, NNGenome> = serde_json::from_str(&json).unwrap();

    assert_eq!(restored.generation, 1);
    assert_eq!(restored.history, *population.history());
    assert_eq!(restored.champion, *tournament.champion());

    let resumed = Tournament::<NNGenome>::resume(tournament_config(2), (), &restored).unwrap();
    assert_eq!(resumed.champion(), tournament.champion());

    let population_config = population.population_config().clone();
    let revived = Population::restore(restored, population_config, genetic_config()).unwrap();
    assert_eq!(revived.generation(), population.generation());
    assert_eq!(
        revived.species().map(|s| s.id()).collect::<Vec<_>>(),
        population.species().map(|s| s.id()).collect::<Vec<_>>()
    );
    assert!(revived.genomes().eq(population.genomes()));
}
