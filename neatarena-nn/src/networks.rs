//! A Network is the executable phenotype of a genome.
//! Genome nodes become an arena of network nodes, addressed
//! by contiguous index in ascending node ID order, and genes
//! become incoming connections of their destination nodes.
//!
//! Networks may contain cycles. Rather than solving for a
//! fixed point, each evaluation relaxes the network over a
//! bounded number of passes.
mod connection;

use crate::genomics::{NNGenome, NodeType};
use crate::NodeId;
use connection::Connection;

use ahash::RandomState;

use std::collections::HashMap;

/// Default number of relaxation passes per evaluation.
pub const DEFAULT_PASSES: usize = 10;

/// An arbitrarily-structured, possibly recurrent, neural network.
///
/// A network holds no activation state between evaluations, so it
/// can be shared read-only between threads.
#[derive(Clone, Debug)]
pub struct Network {
    node_ids: Box<[NodeId]>,
    input_indices: Box<[usize]>,
    output_indices: Box<[usize]>,
    /// Nodes with at least one incoming connection, non-outputs
    /// first, each group in ascending ID order.
    schedule: Box<[usize]>,
    incoming: Box<[Box<[Connection]>]>,
    passes: usize,
}

impl Network {
    /// Compiles a genome into a network that relaxes
    /// over `passes` passes per evaluation.
    ///
    /// # Examples
    /// ```
    /// use neatarena_nn::{
    ///     genomics::{GeneticConfig, NNGenome},
    ///     networks::Network,
    /// };
    ///
    /// let genome = NNGenome::minimal(&GeneticConfig::zero());
    /// let network = Network::with_passes(&genome, 3);
    ///
    /// assert_eq!(network.passes(), 3);
    /// ```
    pub fn with_passes(genome: &NNGenome, passes: usize) -> Network {
        let nodes = genome.nodes();
        let node_ids: Box<[NodeId]> = nodes.iter().map(|n| n.id()).collect();
        let index_of: HashMap<NodeId, usize, RandomState> = node_ids
            .iter()
            .enumerate()
            .map(|(i, id)| (*id, i))
            .collect();

        let mut incoming = vec![vec![]; nodes.len()];
        for gene in genome.genes() {
            let source = index_of[&gene.input()];
            let destination = index_of[&gene.output()];
            incoming[destination].push(Connection::new(source, gene.weight(), gene.enabled()));
        }

        let indices_of = |node_type: NodeType| -> Box<[usize]> {
            nodes
                .iter()
                .enumerate()
                .filter(|(_, n)| n.node_type() == node_type)
                .map(|(i, _)| i)
                .collect()
        };
        let input_indices = indices_of(NodeType::Input);
        let output_indices = indices_of(NodeType::Output);

        let is_output = |i: &usize| nodes[*i].node_type() == NodeType::Output;
        let wired: Vec<usize> = (0..nodes.len()).filter(|i| !incoming[*i].is_empty()).collect();
        let schedule = wired
            .iter()
            .copied()
            .filter(|i| !is_output(i))
            .chain(wired.iter().copied().filter(|i| is_output(i)))
            .collect();

        Network {
            node_ids,
            input_indices,
            output_indices,
            schedule,
            incoming: incoming.into_iter().map(|v| v.into()).collect(),
            passes,
        }
    }

    /// Evaluates the network on the given inputs and returns
    /// the values of the output nodes, in ascending ID order.
    ///
    /// All node values start at zero. Each pass copies the inputs
    /// into the input nodes, then updates every non-output node
    /// and afterwards every output node, in ascending ID order:
    /// a node with incoming connections takes the sigmoid of the
    /// weighted sum of its enabled connections' source values.
    /// Values carry over between passes, so recurrent connections
    /// see the value written in the previous pass.
    ///
    /// The result depends only on the network and the inputs.
    ///
    /// # Panics
    /// Panics if `inputs` does not hold exactly one value per input node.
    ///
    /// # Examples
    /// ```
    /// use neatarena_nn::{
    ///     genomics::{GeneticConfig, NNGenome},
    ///     networks::Network,
    /// };
    /// use std::num::NonZeroUsize;
    ///
    /// let mut genome = NNGenome::minimal(&GeneticConfig {
    ///     input_count: NonZeroUsize::new(2).unwrap(),
    ///     output_count: NonZeroUsize::new(2).unwrap(),
    ///     ..GeneticConfig::zero()
    /// });
    /// genome.add_gene(1, 1, 2, 2.0);
    ///
    /// let network = Network::from(&genome);
    /// let outputs = network.evaluate(&[0.5, 1.0]);
    ///
    /// let sigmoid = |x: f32| 1.0 / (1.0 + (-x).exp());
    /// assert_eq!(outputs, vec![sigmoid(0.5 * 0.0 + 1.0 * 2.0), 0.0]);
    /// ```
    pub fn evaluate(&self, inputs: &[f32]) -> Vec<f32> {
        assert_eq!(
            inputs.len(),
            self.input_indices.len(),
            "network evaluated with {} inputs, expected {}",
            inputs.len(),
            self.input_indices.len()
        );

        let mut values = vec![0.0; self.node_ids.len()];
        for _ in 0..self.passes {
            for (index, input) in self.input_indices.iter().zip(inputs) {
                values[*index] = *input;
            }
            for &node in self.schedule.iter() {
                let sum: f32 = self.incoming[node].iter().map(|c| c.signal(&values)).sum();
                values[node] = sigmoid(sum);
            }
        }

        self.output_indices.iter().map(|i| values[*i]).collect()
    }

    /// Returns the number of input values the network expects.
    pub fn input_count(&self) -> usize {
        self.input_indices.len()
    }

    /// Returns the number of values the network outputs.
    pub fn output_count(&self) -> usize {
        self.output_indices.len()
    }

    /// Returns the number of relaxation passes per evaluation.
    pub fn passes(&self) -> usize {
        self.passes
    }

    /// Returns the node IDs backing each arena slot.
    pub fn node_ids(&self) -> &[NodeId] {
        &self.node_ids
    }
}

impl From<&NNGenome> for Network {
    /// Compiles a genome using [`DEFAULT_PASSES`] passes.
    fn from(genome: &NNGenome) -> Network {
        Network::with_passes(genome, DEFAULT_PASSES)
    }
}

/// The logistic function, `1 / (1 + e^-x)`.
fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}
