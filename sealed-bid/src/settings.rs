//! Run settings, read from an optional RON file.
use crate::seats::{NetworkSeat, TableEncoder};

use anyhow::{ensure, Context};
use neatarena::{PopulationConfig, TournamentConfig};
use neatarena_nn::genomics::GeneticConfig;
use serde::{Deserialize, Serialize};

use std::fs;
use std::num::NonZeroUsize;
use std::path::Path;

/// Every configuration a run needs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub genetics: GeneticConfig,
    pub population: PopulationConfig,
    pub tournament: TournamentConfig,
}

impl Settings {
    /// Reads settings from `path`, or returns the
    /// defaults when there is no path.
    ///
    /// Sections missing from the file keep their defaults.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed,
    /// or if its network shape does not fit the auction table.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Settings> {
        let settings = match path {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("reading settings from {}", path.display()))?;
                ron::from_str(&text)
                    .with_context(|| format!("parsing settings in {}", path.display()))?
            }
            None => Settings::default(),
        };
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            self.genetics.input_count.get() == TableEncoder::INPUTS,
            "networks need {} inputs, configured {}",
            TableEncoder::INPUTS,
            self.genetics.input_count
        );
        ensure!(
            self.genetics.output_count.get() == NetworkSeat::OUTPUTS,
            "networks need {} outputs, configured {}",
            NetworkSeat::OUTPUTS,
            self.genetics.output_count
        );
        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Settings {
        Settings {
            genetics: GeneticConfig {
                input_count: NonZeroUsize::new(TableEncoder::INPUTS).unwrap_or(NonZeroUsize::MIN),
                output_count: NonZeroUsize::new(NetworkSeat::OUTPUTS).unwrap_or(NonZeroUsize::MIN),
                ..GeneticConfig::default()
            },
            population: PopulationConfig {
                size: NonZeroUsize::new(256).unwrap_or(NonZeroUsize::MIN),
                ..PopulationConfig::default()
            },
            tournament: TournamentConfig::default(),
        }
    }
}
