use crate::{Innovation, NodeId};

use thiserror::Error;

/// An error type indicating that externally
/// supplied genome data is malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenomeError {
    /// The genome has no nodes at all.
    #[error("genome has an empty node set")]
    EmptyNodeSet,
    /// The genome lacks input or output nodes.
    #[error("genome is missing its {0} boundary nodes")]
    MissingBoundary(&'static str),
    /// Two nodes share the same ID.
    #[error("duplicate node with id {0}")]
    DuplicateNode(NodeId),
    /// Two genes share the same innovation number.
    #[error("duplicate gene with innovation {0}")]
    DuplicateGene(Innovation),
    /// A gene references a node absent from the genome.
    #[error("gene {innovation} references nonexistant endpoint(s) {input} -> {output}")]
    DanglingEndpoint {
        innovation: Innovation,
        input: NodeId,
        output: NodeId,
    },
    /// A gene ends at an input node.
    #[error("gene {innovation} has input node {node} as destination")]
    InputDestination { innovation: Innovation, node: NodeId },
    /// A gene starts at an output node.
    #[error("gene {innovation} has output node {node} as source")]
    OutputSource { innovation: Innovation, node: NodeId },
}

/// An error type indicating a restored
/// innovation registry is inconsistent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryError {
    /// The same endpoint pair was recorded twice.
    #[error("endpoint pair {0} -> {1} recorded more than once")]
    DuplicateEndpoints(NodeId, NodeId),
}
