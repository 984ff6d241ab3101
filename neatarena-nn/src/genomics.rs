//! Genomes are the focus of evolution in NEAT.
//! They are a collection of genes and nodes that can be instantiated
//! as a phenotype (a neural network). Genomes can be progressively mutated,
//! thus adding complexity and functionality.

mod config;
mod crossover;
mod errors;
mod genes;
mod history;
mod mutation;
mod nodes;

pub use config::{GeneticConfig, PassCadence};
pub use crossover::GeneAlignment;
pub use errors::{GenomeError, HistoryError};
pub use genes::Gene;
pub use history::History;
pub use nodes::{Node, NodeType};

use crate::{Innovation, NodeId};

use ahash::RandomState;
use neatarena::Genome;
use rand::Rng;
use serde::{Deserialize, Serialize};

use std::collections::HashSet;
use std::convert::TryFrom;
use std::fmt;

/// A mutable collection of genes and nodes.
///
/// Nodes are kept in ascending ID order, and genes
/// in ascending innovation order. Every gene endpoint
/// refers to a node of the genome.
///
/// Supports Serde for convenient genome saving and loading.
/// Only the genetic structure is serialized: fitness values
/// and bracket depth are transient evaluation data.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "GenomeRecord", into = "GenomeRecord")]
pub struct NNGenome {
    nodes: Vec<Node>,
    genes: Vec<Gene>,
    fitness: f32,
    adjusted_fitness: f32,
    bracket: usize,
}

/// Serialized shape of an [`NNGenome`].
#[derive(Serialize, Deserialize)]
struct GenomeRecord {
    nodes: Vec<Node>,
    genes: Vec<Gene>,
}

impl NNGenome {
    /// Creates the minimal genome for the given configuration:
    /// `input_count` input nodes with IDs `0..I`, `output_count`
    /// output nodes with IDs `I..I+O`, and a single enabled
    /// seed gene from input `0` to output `I`, with weight 0
    /// and innovation number 0.
    ///
    /// # Examples
    /// ```
    /// use neatarena_nn::genomics::{GeneticConfig, NNGenome, NodeType};
    /// use std::num::NonZeroUsize;
    ///
    /// let genome = NNGenome::minimal(&GeneticConfig {
    ///     input_count: NonZeroUsize::new(3).unwrap(),
    ///     output_count: NonZeroUsize::new(2).unwrap(),
    ///     ..GeneticConfig::zero()
    /// });
    ///
    /// assert_eq!(genome.nodes().len(), 3 + 2);
    /// assert_eq!(genome.input_count(), 3);
    /// assert_eq!(genome.output_count(), 2);
    /// assert_eq!(genome.nodes()[3].node_type(), NodeType::Output);
    ///
    /// let seed = &genome.genes()[0];
    /// assert_eq!(genome.genes().len(), 1);
    /// assert_eq!((seed.innovation(), seed.input(), seed.output()), (0, 0, 3));
    /// assert_eq!(seed.weight(), 0.0);
    /// assert!(seed.enabled());
    /// ```
    pub fn minimal(config: &GeneticConfig) -> NNGenome {
        let input_count = config.input_count.get();
        let output_count = config.output_count.get();
        let nodes = (0..input_count)
            .map(|id| Node::new(id, NodeType::Input))
            .chain((input_count..input_count + output_count).map(|id| Node::new(id, NodeType::Output)))
            .collect();
        NNGenome {
            nodes,
            genes: vec![Gene::new(0, 0, input_count, 0.0)],
            fitness: 0.0,
            adjusted_fitness: 0.0,
            bracket: 0,
        }
    }

    /// Builds a genome from externally supplied nodes and genes,
    /// validating them and establishing the ordering invariants.
    ///
    /// # Errors
    /// Returns an error if the node set is empty or lacks inputs
    /// or outputs, if node IDs or gene innovations repeat, or if
    /// a gene references a missing node, ends at an input node,
    /// or starts at an output node.
    ///
    /// # Examples
    /// ```
    /// use neatarena_nn::genomics::{Gene, GenomeError, NNGenome, Node, NodeType};
    ///
    /// let nodes = vec![Node::new(1, NodeType::Output), Node::new(0, NodeType::Input)];
    ///
    /// let genome = NNGenome::from_parts(nodes.clone(), vec![Gene::new(0, 0, 1, 1.5)]).unwrap();
    /// assert_eq!(genome.nodes()[0].id(), 0);
    ///
    /// assert_eq!(
    ///     NNGenome::from_parts(nodes, vec![Gene::new(0, 0, 9, 1.5)]).unwrap_err(),
    ///     GenomeError::DanglingEndpoint { innovation: 0, input: 0, output: 9 },
    /// );
    /// ```
    pub fn from_parts(mut nodes: Vec<Node>, mut genes: Vec<Gene>) -> Result<NNGenome, GenomeError> {
        if nodes.is_empty() {
            return Err(GenomeError::EmptyNodeSet);
        }
        nodes.sort_unstable_by_key(|n| n.id());
        genes.sort_unstable_by_key(|g| g.innovation());

        if let Some(pair) = nodes.windows(2).find(|pair| pair[0].id() == pair[1].id()) {
            return Err(GenomeError::DuplicateNode(pair[0].id()));
        }
        if let Some(pair) = genes
            .windows(2)
            .find(|pair| pair[0].innovation() == pair[1].innovation())
        {
            return Err(GenomeError::DuplicateGene(pair[0].innovation()));
        }
        for (node_type, name) in [(NodeType::Input, "input"), (NodeType::Output, "output")] {
            if !nodes.iter().any(|n| n.node_type() == node_type) {
                return Err(GenomeError::MissingBoundary(name));
            }
        }

        let find = |id: NodeId| {
            nodes
                .binary_search_by_key(&id, |n| n.id())
                .ok()
                .map(|i| nodes[i])
        };
        for gene in &genes {
            let (input, output) = match (find(gene.input()), find(gene.output())) {
                (Some(input), Some(output)) => (input, output),
                _ => {
                    return Err(GenomeError::DanglingEndpoint {
                        innovation: gene.innovation(),
                        input: gene.input(),
                        output: gene.output(),
                    })
                }
            };
            if !input.can_emit() {
                return Err(GenomeError::OutputSource {
                    innovation: gene.innovation(),
                    node: input.id(),
                });
            }
            if !output.can_receive() {
                return Err(GenomeError::InputDestination {
                    innovation: gene.innovation(),
                    node: output.id(),
                });
            }
        }

        Ok(NNGenome {
            nodes,
            genes,
            fitness: 0.0,
            adjusted_fitness: 0.0,
            bracket: 0,
        })
    }

    /// Add a new gene to the genome, keeping genes
    /// in innovation order.
    /// Returns a reference to the new gene.
    ///
    /// # Panics
    ///
    /// This function panics if the innovation number
    /// is already present, if either endpoint does not
    /// exist, if the destination is an input node or
    /// the source is an output node, or if another
    /// gene already connects the same endpoints.
    ///
    /// # Examples
    /// ```
    /// use neatarena_nn::genomics::{GeneticConfig, NNGenome, NodeType};
    /// use std::num::NonZeroUsize;
    ///
    /// let mut genome = NNGenome::minimal(&GeneticConfig {
    ///     input_count: NonZeroUsize::new(2).unwrap(),
    ///     ..GeneticConfig::zero()
    /// });
    /// genome.add_node(3, NodeType::Hidden);
    ///
    /// let inserted = genome.add_gene(42, 1, 3, 2.5).clone();
    /// genome.add_gene(7, 3, 2, -1.0);
    ///
    /// assert_eq!(genome.genes().iter().map(|g| g.innovation()).collect::<Vec<_>>(), [0, 7, 42]);
    /// assert_eq!(inserted.weight(), 2.5);
    ///
    /// // Recurrent genes are allowed.
    /// genome.add_gene(43, 3, 3, 1.0);
    /// ```
    pub fn add_gene(
        &mut self,
        innovation: Innovation,
        input: NodeId,
        output: NodeId,
        weight: f32,
    ) -> &mut Gene {
        if let Err(e) = self.check_gene_viability(innovation, input, output) {
            panic!("{} in {}", e, self);
        }
        self.insert_gene(Gene::new(innovation, input, output, weight))
    }

    /// Inserts a gene at its innovation-ordered position.
    /// Assumes the gene is viable for the genome.
    fn insert_gene(&mut self, gene: Gene) -> &mut Gene {
        let position = self
            .genes
            .partition_point(|g| g.innovation() < gene.innovation());
        self.genes.insert(position, gene);
        &mut self.genes[position]
    }

    fn check_gene_viability(
        &self,
        innovation: Innovation,
        input: NodeId,
        output: NodeId,
    ) -> Result<(), String> {
        if self.gene(innovation).is_some() {
            return Err(format!("duplicate gene insertion with innovation {}", innovation));
        }
        match (self.node(input), self.node(output)) {
            (Some(i), Some(o)) => {
                if !i.can_emit() {
                    Err(format!("gene insertion with output node {} as source", input))
                } else if !o.can_receive() {
                    Err(format!("gene insertion with input node {} as destination", output))
                } else if self.genes.iter().any(|g| g.endpoints() == (input, output)) {
                    Err(format!(
                        "gene insertion with endpoints {} -> {} shadows gene with same endpoints",
                        input, output
                    ))
                } else {
                    Ok(())
                }
            }
            _ => Err(format!(
                "gene insertion between nonexistant endpoint(s) {} -> {}",
                input, output
            )),
        }
    }

    /// Add a new node to the genome, keeping
    /// nodes in ID order.
    /// Returns a reference to the newly created node.
    ///
    /// # Panics
    ///
    /// This function panics if a node of the
    /// same ID already existed in the genome.
    ///
    /// # Examples
    /// ```
    /// use neatarena_nn::genomics::{GeneticConfig, NNGenome, NodeType};
    ///
    /// let mut genome = NNGenome::minimal(&GeneticConfig::zero());
    /// genome.add_node(9, NodeType::Hidden);
    /// genome.add_node(4, NodeType::Hidden);
    ///
    /// assert_eq!(genome.nodes().iter().map(|n| n.id()).collect::<Vec<_>>(), [0, 1, 4, 9]);
    /// ```
    pub fn add_node(&mut self, id: NodeId, node_type: NodeType) -> &Node {
        match self.nodes.binary_search_by_key(&id, |n| n.id()) {
            Ok(_) => panic!("duplicate node insertion with id {} in {}", id, self),
            Err(position) => {
                self.nodes.insert(position, Node::new(id, node_type));
                &self.nodes[position]
            }
        }
    }

    /// Re-establishes the genome's ordering invariants:
    /// nodes by ascending ID, genes by ascending innovation.
    pub fn sort_topology(&mut self) {
        self.nodes.sort_unstable_by_key(|n| n.id());
        self.genes.sort_unstable_by_key(|g| g.innovation());
    }

    /// Returns the node with the given ID, if present.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes
            .binary_search_by_key(&id, |n| n.id())
            .ok()
            .map(|i| &self.nodes[i])
    }

    /// Returns the gene with the given innovation number, if present.
    pub fn gene(&self, innovation: Innovation) -> Option<&Gene> {
        self.genes
            .binary_search_by_key(&innovation, |g| g.innovation())
            .ok()
            .map(|i| &self.genes[i])
    }

    /// Returns the genome's nodes, in ascending ID order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Returns the genome's genes, in ascending innovation order.
    ///
    /// # Examples
    /// ```
    /// use neatarena_nn::genomics::{GeneticConfig, NNGenome};
    ///
    /// let genome = NNGenome::minimal(&GeneticConfig::zero());
    ///
    /// for gene in genome.genes() {
    ///     println!("{} -> {}", gene.input(), gene.output());
    /// }
    /// ```
    pub fn genes(&self) -> &[Gene] {
        &self.genes
    }

    /// Returns the number of input nodes.
    pub fn input_count(&self) -> usize {
        self.count_nodes(NodeType::Input)
    }

    /// Returns the number of output nodes.
    pub fn output_count(&self) -> usize {
        self.count_nodes(NodeType::Output)
    }

    fn count_nodes(&self, node_type: NodeType) -> usize {
        self.nodes.iter().filter(|n| n.node_type() == node_type).count()
    }

    /// Returns the highest innovation number in the genome.
    pub fn max_innovation(&self) -> Option<Innovation> {
        self.genes.last().map(Gene::innovation)
    }

    /// Returns the highest node ID in the genome.
    pub fn max_node_id(&self) -> Option<NodeId> {
        self.nodes.last().map(Node::id)
    }

    /// Returns the set of `(source, destination)` pairs
    /// already connected by a gene, enabled or not.
    fn connected_pairs(&self) -> HashSet<(NodeId, NodeId), RandomState> {
        self.genes.iter().map(Gene::endpoints).collect()
    }

    /// Returns the fitness the genome was last assigned.
    pub fn fitness(&self) -> f32 {
        self.fitness
    }

    /// Returns the genome's species-size adjusted fitness.
    pub fn adjusted_fitness(&self) -> f32 {
        self.adjusted_fitness
    }

    /// Returns the number of tournament rounds the genome
    /// advanced through in the latest tournament.
    pub fn bracket(&self) -> usize {
        self.bracket
    }
}

impl Genome for NNGenome {
    type Config = GeneticConfig;
    type InnovationHistory = History;

    fn new(config: &GeneticConfig) -> NNGenome {
        NNGenome::minimal(config)
    }

    fn genetic_distance(first: &NNGenome, second: &NNGenome, config: &GeneticConfig) -> f32 {
        NNGenome::speciation_distance(first, second, config)
    }

    fn mate<R: Rng>(parent1: &NNGenome, parent2: &NNGenome, rng: &mut R) -> NNGenome {
        NNGenome::produce_offspring(parent1, parent2, rng)
    }

    fn mutate<R: Rng>(&mut self, history: &mut History, config: &GeneticConfig, rng: &mut R) {
        self.mutate_all(history, config, rng);
    }

    fn set_fitness(&mut self, fitness: f32) {
        self.fitness = fitness;
    }

    fn fitness(&self) -> f32 {
        self.fitness
    }

    fn set_adjusted_fitness(&mut self, adjusted_fitness: f32) {
        self.adjusted_fitness = adjusted_fitness;
    }

    fn adjusted_fitness(&self) -> f32 {
        self.adjusted_fitness
    }

    fn set_bracket(&mut self, bracket: usize) {
        self.bracket = bracket;
    }

    fn bracket(&self) -> usize {
        self.bracket
    }
}

/// Genomes are equal when their genetic structure is;
/// fitness values and bracket depth are ignored.
impl PartialEq for NNGenome {
    fn eq(&self, other: &NNGenome) -> bool {
        self.nodes == other.nodes && self.genes == other.genes
    }
}

impl TryFrom<GenomeRecord> for NNGenome {
    type Error = GenomeError;

    fn try_from(record: GenomeRecord) -> Result<NNGenome, GenomeError> {
        NNGenome::from_parts(record.nodes, record.genes)
    }
}

impl From<NNGenome> for GenomeRecord {
    fn from(genome: NNGenome) -> GenomeRecord {
        GenomeRecord {
            nodes: genome.nodes,
            genes: genome.genes,
        }
    }
}

impl fmt::Display for NNGenome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Genome {{ nodes: [")?;
        for (i, node) in self.nodes.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}:{:?}", node.id(), node.node_type())?;
        }
        write!(f, "], genes: [")?;
        for (i, gene) in self.genes.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(
                f,
                "#{} {}->{} {:.3}{}",
                gene.innovation(),
                gene.input(),
                gene.output(),
                gene.weight(),
                if gene.enabled() { "" } else { " (off)" }
            )?;
        }
        write!(f, "], fitness: {} }}", self.fitness)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::num::NonZeroUsize;

    fn config(inputs: usize, outputs: usize) -> GeneticConfig {
        GeneticConfig {
            input_count: NonZeroUsize::new(inputs).unwrap(),
            output_count: NonZeroUsize::new(outputs).unwrap(),
            ..GeneticConfig::zero()
        }
    }

    #[test]
    fn minimal_layout() {
        for inputs in 1..8 {
            for outputs in 1..8 {
                let genome = NNGenome::minimal(&config(inputs, outputs));
                assert_eq!(genome.input_count(), inputs);
                assert_eq!(genome.output_count(), outputs);
                for (i, node) in genome.nodes().iter().enumerate() {
                    assert_eq!(node.id(), i);
                    let expected = if i < inputs {
                        NodeType::Input
                    } else {
                        NodeType::Output
                    };
                    assert_eq!(node.node_type(), expected);
                }
                assert_eq!(genome.genes(), &[Gene::new(0, 0, inputs, 0.0)]);
            }
        }
    }

    #[test]
    fn seed_gene_matches_history() {
        let config = config(4, 3);
        let history = History::new(&config);
        let genome = NNGenome::minimal(&config);
        let seed = &genome.genes()[0];
        assert_eq!(
            history.innovation_of(seed.input(), seed.output()),
            Some(seed.innovation())
        );
    }

    #[test]
    fn clone_is_independent() {
        let mut genome = NNGenome::minimal(&config(2, 1));
        let copy = genome.clone();
        genome.add_node(3, NodeType::Hidden);
        genome.genes[0].set_weight(4.0);
        assert_eq!(copy.nodes().len(), 3);
        assert_eq!(copy.genes()[0].weight(), 0.0);
    }

    #[test]
    fn equality_ignores_evaluation_data() {
        let mut genome = NNGenome::minimal(&config(2, 1));
        let copy = genome.clone();
        genome.set_fitness(12.0);
        genome.set_bracket(3);
        assert_eq!(genome, copy);
    }

    #[test]
    #[should_panic]
    fn add_gene_duplicate_innovation() {
        let mut genome = NNGenome::minimal(&config(2, 1));
        genome.add_gene(0, 1, 2, 1.0);
    }

    #[test]
    #[should_panic]
    fn add_gene_duplicate_endpoints() {
        let mut genome = NNGenome::minimal(&config(2, 1));
        genome.add_gene(5, 0, 2, 1.0);
    }

    #[test]
    #[should_panic]
    fn add_gene_into_input() {
        let mut genome = NNGenome::minimal(&config(2, 1));
        genome.add_node(3, NodeType::Hidden);
        genome.add_gene(5, 3, 1, 1.0);
    }

    #[test]
    #[should_panic]
    fn add_gene_missing_endpoint() {
        let mut genome = NNGenome::minimal(&config(2, 1));
        genome.add_gene(5, 0, 9, 1.0);
    }

    #[test]
    #[should_panic]
    fn add_node_duplicate() {
        let mut genome = NNGenome::minimal(&config(2, 1));
        genome.add_node(1, NodeType::Hidden);
    }

    #[test]
    fn sort_topology_restores_order() {
        let mut genome = NNGenome::minimal(&config(2, 1));
        genome.add_node(3, NodeType::Hidden);
        genome.add_gene(4, 1, 3, 1.0);
        genome.add_gene(2, 3, 2, 1.0);
        genome.genes.reverse();
        genome.nodes.reverse();
        genome.sort_topology();
        assert!(genome.genes().windows(2).all(|w| w[0].innovation() < w[1].innovation()));
        assert!(genome.nodes().windows(2).all(|w| w[0].id() < w[1].id()));
    }

    #[test]
    fn from_parts_validation() {
        use GenomeError::*;
        let boundary = vec![Node::new(0, NodeType::Input), Node::new(1, NodeType::Output)];

        assert_eq!(NNGenome::from_parts(vec![], vec![]), Err(EmptyNodeSet));
        assert_eq!(
            NNGenome::from_parts(vec![Node::new(0, NodeType::Input)], vec![]),
            Err(MissingBoundary("output"))
        );
        assert_eq!(
            NNGenome::from_parts(
                vec![boundary[0], boundary[1], Node::new(1, NodeType::Hidden)],
                vec![]
            ),
            Err(DuplicateNode(1))
        );
        assert_eq!(
            NNGenome::from_parts(
                boundary.clone(),
                vec![Gene::new(3, 0, 1, 1.0), Gene::new(3, 0, 1, 1.0)]
            ),
            Err(DuplicateGene(3))
        );
        assert_eq!(
            NNGenome::from_parts(boundary.clone(), vec![Gene::new(3, 1, 0, 1.0)]),
            Err(OutputSource {
                innovation: 3,
                node: 1
            })
        );
        assert_eq!(
            NNGenome::from_parts(boundary.clone(), vec![Gene::new(3, 0, 0, 1.0)]),
            Err(InputDestination {
                innovation: 3,
                node: 0
            })
        );
        assert!(NNGenome::from_parts(boundary, vec![Gene::new(3, 0, 1, 1.0)]).is_ok());
    }

    #[test]
    fn serde_roundtrip_keeps_structure_only() {
        let mut genome = NNGenome::minimal(&config(3, 2));
        genome.add_node(5, NodeType::Hidden);
        genome.add_gene(9, 2, 5, -0.5).set_enabled(false);
        genome.add_gene(10, 5, 4, 1.25);
        genome.set_fitness(30.0);

        let json = serde_json::to_string(&genome).unwrap();
        let restored: NNGenome = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, genome);
        assert_eq!(restored.fitness(), 0.0);
    }

    #[test]
    fn deserialization_rejects_dangling_genes() {
        let json = r#"{"nodes":[{"id":0,"node_type":"Input"},{"id":1,"node_type":"Output"}],
            "genes":[{"innovation":0,"input":0,"output":7,"weight":1.0,"enabled":true}]}"#;
        assert!(serde_json::from_str::<NNGenome>(json).is_err());
    }
}
