use neatarena::{Population, PopulationConfig, Tournament, TournamentConfig};
use neatarena_nn::genomics::NNGenome;
use rand::{rngs::StdRng, SeedableRng};
use sealed_bid::{auction::AuctionFactory, board, ledger::Ledger, seats::NetworkSeat, settings::Settings};

use std::num::NonZeroUsize;

#[test]
fn auction_tournament_fills_the_ledger() {
    let settings = Settings::default();
    let mut rng = StdRng::seed_from_u64(0);
    let mut population = Population::<_, _, NNGenome>::new(
        PopulationConfig {
            size: NonZeroUsize::new(16).unwrap(),
            ..settings.population.clone()
        },
        settings.genetics.clone(),
        &mut rng,
    );
    let mut tournament = Tournament::new(
        TournamentConfig {
            round_size: NonZeroUsize::new(2).unwrap(),
            workers: NonZeroUsize::new(2).unwrap(),
            batch_size: NonZeroUsize::new(1).unwrap(),
            ..settings.tournament.clone()
        },
        Ledger::new(),
    )
    .unwrap();

    let report = tournament
        .execute::<_, _, NetworkSeat, _, _>(&mut population, &AuctionFactory, &mut rng)
        .unwrap();

    assert_eq!(report.rounds, 2);
    assert_eq!(report.episodes, 4 * 2 + 2);
    assert_eq!(report.failed_episodes, 0);
    let ledger = tournament.statistics();
    assert!((0..board::BOARD_LENGTH).any(|lot| ledger.bids(lot) > 0));

    population.evolve(&mut rng).unwrap();
    assert_eq!(population.genome_count(), 16);
}
