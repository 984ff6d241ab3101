use super::{Gene, GeneticConfig, NNGenome, Node, NodeType};
use crate::Innovation;

use rand::Rng;

use std::cmp::Ordering;

/// Alignment of two genomes' genes by innovation number.
///
/// Genes present in both genomes are _matching_. Genes present
/// in only one genome are _disjoint_ if their innovation number
/// is at most the smaller of the two genomes' highest innovation
/// numbers (the cutoff), and _excess_ otherwise. When either genome
/// has no genes there is no cutoff, and every gene is excess.
#[derive(Debug)]
pub struct GeneAlignment<'a> {
    /// Pairs of matching genes, `(first, second)`, in innovation order.
    pub matching: Vec<(&'a Gene, &'a Gene)>,
    /// Disjoint genes of both genomes, in innovation order.
    pub disjoint: Vec<&'a Gene>,
    /// Excess genes of both genomes, in innovation order.
    pub excess: Vec<&'a Gene>,
}

impl<'a> GeneAlignment<'a> {
    /// Aligns the genes of two genomes in a single merge
    /// pass over their innovation-ordered gene lists.
    ///
    /// # Examples
    /// ```
    /// use neatarena_nn::genomics::{GeneAlignment, GeneticConfig, NNGenome, NodeType};
    /// use std::num::NonZeroUsize;
    ///
    /// let config = GeneticConfig {
    ///     input_count: NonZeroUsize::new(2).unwrap(),
    ///     ..GeneticConfig::zero()
    /// };
    /// let mut first = NNGenome::minimal(&config);
    /// let mut second = NNGenome::minimal(&config);
    /// first.add_node(3, NodeType::Hidden);
    /// first.add_gene(1, 1, 2, 1.0);
    /// first.add_gene(5, 1, 3, 1.0);
    /// second.add_gene(3, 1, 2, 1.0);
    ///
    /// let alignment = GeneAlignment::of(&first, &second);
    ///
    /// // Cutoff at innovation 3, the lower of the two maxima.
    /// assert_eq!(alignment.matching.len(), 1);
    /// assert_eq!(alignment.disjoint.iter().map(|g| g.innovation()).collect::<Vec<_>>(), [1, 3]);
    /// assert_eq!(alignment.excess.iter().map(|g| g.innovation()).collect::<Vec<_>>(), [5]);
    /// ```
    pub fn of(first: &'a NNGenome, second: &'a NNGenome) -> GeneAlignment<'a> {
        let cutoff = match (first.max_innovation(), second.max_innovation()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            _ => None,
        };
        let mut alignment = GeneAlignment {
            matching: vec![],
            disjoint: vec![],
            excess: vec![],
        };

        let (mut a, mut b) = (first.genes().iter().peekable(), second.genes().iter().peekable());
        loop {
            let ordering = match (a.peek(), b.peek()) {
                (Some(x), Some(y)) => x.innovation().cmp(&y.innovation()),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => break,
            };
            match ordering {
                Ordering::Equal => {
                    if let (Some(x), Some(y)) = (a.next(), b.next()) {
                        alignment.matching.push((x, y));
                    }
                }
                Ordering::Less => {
                    if let Some(x) = a.next() {
                        alignment.classify_unmatched(x, cutoff);
                    }
                }
                Ordering::Greater => {
                    if let Some(y) = b.next() {
                        alignment.classify_unmatched(y, cutoff);
                    }
                }
            }
        }

        alignment
    }

    fn classify_unmatched(&mut self, gene: &'a Gene, cutoff: Option<Innovation>) {
        match cutoff {
            Some(cutoff) if gene.innovation() <= cutoff => self.disjoint.push(gene),
            _ => self.excess.push(gene),
        }
    }

    /// Returns the mean absolute weight difference
    /// over matching genes, or 0 if there are none.
    pub fn mean_weight_difference(&self) -> f32 {
        if self.matching.is_empty() {
            return 0.0;
        }
        self.matching
            .iter()
            .map(|(x, y)| (x.weight() - y.weight()).abs())
            .sum::<f32>()
            / self.matching.len() as f32
    }
}

impl NNGenome {
    /// Produces a child genome from two parents.
    ///
    /// Matching genes are copied whole from a randomly
    /// chosen parent, including its enabled flag. Disjoint
    /// and excess genes are inherited from whichever parent
    /// carries them. The child's boundary nodes are those of
    /// `first`, and a hidden node is added for every other
    /// node referenced by an inherited gene.
    ///
    /// No gene absent from both parents is ever created.
    ///
    /// # Examples
    /// ```
    /// use neatarena_nn::genomics::{GeneticConfig, NNGenome, NodeType};
    /// use rand::{rngs::StdRng, SeedableRng};
    /// use std::num::NonZeroUsize;
    ///
    /// let config = GeneticConfig {
    ///     input_count: NonZeroUsize::new(2).unwrap(),
    ///     ..GeneticConfig::zero()
    /// };
    /// let mut first = NNGenome::minimal(&config);
    /// let mut second = NNGenome::minimal(&config);
    /// first.add_node(3, NodeType::Hidden);
    /// first.add_gene(4, 1, 3, 1.0);
    /// second.add_gene(1, 1, 2, -1.0);
    ///
    /// let child = NNGenome::produce_offspring(&first, &second, &mut StdRng::seed_from_u64(5));
    ///
    /// assert_eq!(child.genes().iter().map(|g| g.innovation()).collect::<Vec<_>>(), [0, 1, 4]);
    /// assert_eq!(child.nodes().iter().map(|n| n.id()).collect::<Vec<_>>(), [0, 1, 2, 3]);
    /// ```
    pub fn produce_offspring<R: Rng>(first: &NNGenome, second: &NNGenome, rng: &mut R) -> NNGenome {
        let alignment = GeneAlignment::of(first, second);

        let mut genes: Vec<Gene> = alignment
            .matching
            .iter()
            .map(|(x, y)| if rng.gen::<bool>() { *x } else { *y })
            .chain(alignment.disjoint.iter().copied())
            .chain(alignment.excess.iter().copied())
            .cloned()
            .collect();
        genes.sort_unstable_by_key(|g| g.innovation());

        let mut nodes: Vec<Node> = first
            .nodes()
            .iter()
            .filter(|n| n.node_type().is_boundary())
            .copied()
            .collect();
        let mut hidden: Vec<_> = genes
            .iter()
            .flat_map(|g| [g.input(), g.output()])
            .filter(|id| {
                first
                    .node(*id)
                    .map_or(true, |n| !n.node_type().is_boundary())
            })
            .collect();
        hidden.sort_unstable();
        hidden.dedup();
        nodes.extend(hidden.into_iter().map(|id| Node::new(id, NodeType::Hidden)));

        let mut child = NNGenome {
            nodes,
            genes,
            fitness: 0.0,
            adjusted_fitness: 0.0,
            bracket: 0,
        };
        child.sort_topology();
        child
    }

    /// Calculates the _speciation distance_ between two genomes:
    ///
    /// `C1·E/N + C2·D/N + C3·W̄`
    ///
    /// where `E` and `D` are the excess and disjoint gene counts,
    /// `N` is the larger of the two gene counts, `W̄` is the mean
    /// absolute weight difference of matching genes, and the
    /// coefficients are the configured [excess], [disjoint] and
    /// [weight] factors. Two genomes without genes are at distance 0.
    ///
    /// [excess]: GeneticConfig::excess_gene_factor
    /// [disjoint]: GeneticConfig::disjoint_gene_factor
    /// [weight]: GeneticConfig::common_weight_factor
    ///
    /// # Examples
    /// ```
    /// use neatarena_nn::genomics::{GeneticConfig, NNGenome, NodeType};
    /// use std::num::NonZeroUsize;
    ///
    /// const EXCESS_FACTOR: f32 = 1.5;
    /// const DISJOINT_FACTOR: f32 = 0.5;
    /// const WEIGHT_FACTOR: f32 = 0.25;
    ///
    /// let config = GeneticConfig {
    ///     input_count: NonZeroUsize::new(2).unwrap(),
    ///     excess_gene_factor: EXCESS_FACTOR,
    ///     disjoint_gene_factor: DISJOINT_FACTOR,
    ///     common_weight_factor: WEIGHT_FACTOR,
    ///     ..GeneticConfig::zero()
    /// };
    ///
    /// let mut first = NNGenome::minimal(&config);
    /// let mut second = NNGenome::minimal(&config);
    /// first.add_node(3, NodeType::Hidden);
    /// second.add_node(3, NodeType::Hidden);
    ///
    /// // Matching gene, weight difference of 2.0 (the seed genes differ by 0.0).
    /// first.add_gene(1, 1, 2, 1.0);
    /// second.add_gene(1, 1, 2, -1.0);
    /// // Disjoint genes.
    /// first.add_gene(2, 0, 3, 1.0);
    /// second.add_gene(3, 1, 3, 1.0);
    /// // Excess gene.
    /// first.add_gene(4, 3, 2, 1.0);
    ///
    /// // N = 4 genes in the larger genome.
    /// assert_eq!(
    ///     NNGenome::speciation_distance(&first, &second, &config),
    ///     EXCESS_FACTOR * 1.0 / 4.0 + DISJOINT_FACTOR * 2.0 / 4.0 + WEIGHT_FACTOR * (0.0 + 2.0) / 2.0
    /// );
    /// ```
    pub fn speciation_distance(first: &NNGenome, second: &NNGenome, config: &GeneticConfig) -> f32 {
        let n = first.genes().len().max(second.genes().len());
        if n == 0 {
            return 0.0;
        }
        let alignment = GeneAlignment::of(first, second);
        let n = n as f32;

        config.excess_gene_factor * alignment.excess.len() as f32 / n
            + config.disjoint_gene_factor * alignment.disjoint.len() as f32 / n
            + config.common_weight_factor * alignment.mean_weight_difference()
    }
}
