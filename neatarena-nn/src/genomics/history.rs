use crate::genomics::{GeneticConfig, HistoryError};
use crate::{Innovation, NodeId};

use ahash::RandomState;
use neatarena::InnovationHistory;
use serde::{Deserialize, Serialize};

use std::collections::hash_map::{Entry, HashMap};
use std::convert::TryFrom;

/// A `History` is the innovation registry shared by all
/// genomes of a population. It makes sure identical
/// structural mutations are assigned the same innovation
/// numbers, no matter which genome produced them.
///
/// Mutations are identified by the endpoints of the gene
/// they create. Innovation numbers are handed out in
/// allocation order, starting at 0, and are never reused.
///
/// A `History` serializes as its ordered list of endpoint
/// pairs, from which the numbering is reconstructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "Vec<(NodeId, NodeId)>",
    into = "Vec<(NodeId, NodeId)>"
)]
pub struct History {
    gene_innovations: HashMap<(NodeId, NodeId), Innovation, RandomState>,
    gene_endpoints: Vec<(NodeId, NodeId)>,
}

impl InnovationHistory for History {
    type Config = GeneticConfig;

    fn new(config: &GeneticConfig) -> History {
        Self::new(config)
    }
}

impl History {
    /// Creates a new History using the specified configuration.
    ///
    /// Every (input, output) pair is pre-registered in
    /// input-major order, so the gene between input `i` and
    /// output node `o` has innovation number
    /// `i ⨯ output_count + (o - input_count)`.
    ///
    /// # Examples
    /// ```
    /// use neatarena_nn::genomics::{GeneticConfig, History};
    /// use std::num::NonZeroUsize;
    ///
    /// let history = History::new(&GeneticConfig {
    ///     input_count: NonZeroUsize::new(2).unwrap(),
    ///     output_count: NonZeroUsize::new(3).unwrap(),
    ///     ..GeneticConfig::zero()
    /// });
    ///
    /// assert_eq!(history.len(), 6);
    /// assert_eq!(history.innovation_of(0, 2), Some(0));
    /// assert_eq!(history.innovation_of(1, 4), Some(5));
    /// ```
    pub fn new(config: &GeneticConfig) -> History {
        let input_count = config.input_count.get();
        let output_count = config.output_count.get();
        let mut history = History::empty();
        for input in 0..input_count {
            for output in input_count..input_count + output_count {
                history.register_innovation(input, output);
            }
        }
        history
    }

    fn empty() -> History {
        History {
            gene_innovations: HashMap::default(),
            gene_endpoints: vec![],
        }
    }

    /// Returns the innovation number of the gene between
    /// `input` and `output`, registering it first if
    /// the pair is new.
    ///
    /// # Examples
    /// ```
    /// use neatarena_nn::genomics::{GeneticConfig, History};
    ///
    /// let mut history = History::new(&GeneticConfig::zero());
    ///
    /// let first = history.register_innovation(1, 7);
    /// let second = history.register_innovation(1, 7);
    ///
    /// assert_eq!(first, second);
    /// assert_eq!(history.register_innovation(7, 1), first + 1);
    /// ```
    pub fn register_innovation(&mut self, input: NodeId, output: NodeId) -> Innovation {
        match self.gene_innovations.entry((input, output)) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                let innovation = self.gene_endpoints.len();
                self.gene_endpoints.push((input, output));
                *entry.insert(innovation)
            }
        }
    }

    /// Returns the innovation number previously assigned to
    /// the gene between `input` and `output`, if any.
    pub fn innovation_of(&self, input: NodeId, output: NodeId) -> Option<Innovation> {
        self.gene_innovations.get(&(input, output)).copied()
    }

    /// Returns the endpoints of every registered gene,
    /// indexed by innovation number.
    ///
    /// # Examples
    /// ```
    /// use neatarena_nn::genomics::{GeneticConfig, History};
    ///
    /// let mut history = History::new(&GeneticConfig::zero());
    /// history.register_innovation(0, 2);
    ///
    /// assert_eq!(history.endpoints(), &[(0, 1), (0, 2)]);
    /// ```
    pub fn endpoints(&self) -> &[(NodeId, NodeId)] {
        &self.gene_endpoints
    }

    /// Returns the highest innovation number handed out,
    /// or `None` if the registry is empty.
    pub fn max_innovation(&self) -> Option<Innovation> {
        self.gene_endpoints.len().checked_sub(1)
    }

    /// Returns the number of registered innovations.
    pub fn len(&self) -> usize {
        self.gene_endpoints.len()
    }

    /// Returns whether no innovation has been registered.
    pub fn is_empty(&self) -> bool {
        self.gene_endpoints.is_empty()
    }
}

impl TryFrom<Vec<(NodeId, NodeId)>> for History {
    type Error = HistoryError;

    fn try_from(endpoints: Vec<(NodeId, NodeId)>) -> Result<History, HistoryError> {
        let mut history = History::empty();
        for (input, output) in endpoints {
            if history.innovation_of(input, output).is_some() {
                return Err(HistoryError::DuplicateEndpoints(input, output));
            }
            history.register_innovation(input, output);
        }
        Ok(history)
    }
}

impl From<History> for Vec<(NodeId, NodeId)> {
    fn from(history: History) -> Vec<(NodeId, NodeId)> {
        history.gene_endpoints
    }
}
