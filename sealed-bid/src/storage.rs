//! Checkpoint files.
use anyhow::Context;
use neatarena::Checkpoint;
use neatarena_nn::genomics::{History, NNGenome};

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

pub type AuctionCheckpoint = Checkpoint<History, NNGenome>;

/// Reads the checkpoint at `path`, if there is one.
///
/// # Errors
/// Returns an error if the file exists but cannot
/// be read or parsed.
pub fn read_checkpoint(path: &Path) -> anyhow::Result<Option<AuctionCheckpoint>> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e).with_context(|| format!("reading checkpoint {}", path.display())),
    };
    let checkpoint = ron::from_str(&text)
        .with_context(|| format!("parsing checkpoint {}", path.display()))?;
    Ok(Some(checkpoint))
}

/// Writes `checkpoint` to `path`, replacing any previous one.
///
/// The file is written beside its destination first and then
/// renamed over it, so an interrupted write leaves the previous
/// checkpoint intact.
///
/// # Errors
/// Returns an error if serialization or any file operation fails.
pub fn write_checkpoint(path: &Path, checkpoint: &AuctionCheckpoint) -> anyhow::Result<()> {
    let text = ron::to_string(checkpoint).context("serializing checkpoint")?;
    let staging = path.with_extension("ron.partial");
    fs::write(&staging, text).with_context(|| format!("writing {}", staging.display()))?;
    fs::rename(&staging, path).with_context(|| format!("replacing {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use neatarena::{Population, Tournament};
    use rand::{rngs::StdRng, SeedableRng};
    use std::num::NonZeroUsize;

    #[test]
    fn missing_file_is_no_checkpoint() {
        let path = std::env::temp_dir().join("sealed-bid-missing-checkpoint.ron");
        assert!(read_checkpoint(&path).unwrap().is_none());
    }

    #[test]
    fn written_checkpoint_reads_back() {
        let settings = Settings::default();
        let mut rng = StdRng::seed_from_u64(0);
        let population = Population::<_, _, NNGenome>::new(
            neatarena::PopulationConfig {
                size: NonZeroUsize::new(8).unwrap(),
                ..settings.population.clone()
            },
            settings.genetics.clone(),
            &mut rng,
        );
        let tournament = Tournament::<NNGenome>::new(settings.tournament.clone(), ()).unwrap();
        let checkpoint = tournament.checkpoint(&population);

        let path = std::env::temp_dir().join(format!("sealed-bid-{}.ron", std::process::id()));
        write_checkpoint(&path, &checkpoint).unwrap();
        let restored = read_checkpoint(&path).unwrap().unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(restored.generation, checkpoint.generation);
        assert_eq!(restored.history, checkpoint.history);
        assert_eq!(restored.species.len(), checkpoint.species.len());
        assert!(restored.species[0].genomes().eq(checkpoint.species[0].genomes()));
    }
}
