use sealed_bid::{
    auction::{self, AuctionFactory},
    ledger::Ledger,
    seats::{NetworkSeat, ThriftySeat},
    settings::Settings,
    storage,
};

use anyhow::Context;
use clap::Parser;
use neatarena::{Population, Tournament};
use neatarena_nn::genomics::NNGenome;
use rand::{rngs::StdRng, SeedableRng};
use tracing::info;
use tracing_subscriber::EnvFilter;

use std::path::PathBuf;

/// Evolve sealed-bid auction players by tournament.
#[derive(Parser, Debug)]
#[command(name = "sealed-bid", version, about)]
struct Args {
    /// Checkpoint file; resumed from if it exists, rewritten after every generation
    #[arg(short, long, default_value = "sealed-bid.ron")]
    checkpoint: PathBuf,

    /// RON settings file (genetics, population, tournament)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of generations to run
    #[arg(short, long, default_value_t = 100)]
    generations: usize,

    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Episodes the champion plays against thrifty seats after each tournament (0 = skip)
    #[arg(long, default_value_t = 200)]
    benchmark: usize,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_thread_names(true)
        .init();

    let settings = Settings::load(args.config.as_deref())?;
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let (mut population, mut tournament) = match storage::read_checkpoint(&args.checkpoint)? {
        Some(checkpoint) => {
            info!(
                generation = checkpoint.generation,
                path = %args.checkpoint.display(),
                "resuming from checkpoint"
            );
            let tournament = Tournament::resume(settings.tournament.clone(), Ledger::new(), &checkpoint)?;
            let population = Population::restore(checkpoint, settings.population.clone(), settings.genetics.clone())
                .context("restoring population")?;
            (population, tournament)
        }
        None => {
            info!(size = settings.population.size.get(), "starting a new population");
            let population = Population::<_, _, NNGenome>::new(
                settings.population.clone(),
                settings.genetics.clone(),
                &mut rng,
            );
            let tournament = Tournament::new(settings.tournament.clone(), Ledger::new())?;
            (population, tournament)
        }
    };

    for _ in 0..args.generations {
        let report = tournament.execute::<_, _, NetworkSeat, _, _>(&mut population, &AuctionFactory, &mut rng)?;
        info!("{}", population.summary());
        if report.failed_episodes > 0 {
            info!(
                failed = report.failed_episodes,
                episodes = report.episodes,
                "some episodes were abandoned"
            );
        }

        if let Some(champion) = tournament.champion().genome.as_ref().filter(|_| args.benchmark > 0) {
            let champion = NetworkSeat::from(champion);
            let wins = auction::benchmark(&champion, &ThriftySeat::default(), args.benchmark, &mut rng);
            info!(
                wins,
                episodes = args.benchmark,
                "champion against thrifty seats"
            );
        }

        population.evolve(&mut rng)?;
        storage::write_checkpoint(&args.checkpoint, &tournament.checkpoint(&population))?;
    }

    if !tournament.statistics().is_empty() {
        info!("lot statistics\n{}", tournament.statistics());
    }
    Ok(())
}
