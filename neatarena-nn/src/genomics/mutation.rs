use super::{Gene, GeneticConfig, History, NNGenome, NodeType};
use crate::{Innovation, NodeId};

use rand::prelude::{IteratorRandom, Rng, SliceRandom};

impl NNGenome {
    /// Runs every mutation pass once, in order: weight,
    /// gene addition, node addition, gene disabling and
    /// gene re-enabling. Each pass is repeated as many times
    /// as its configured rate dictates under the configured
    /// [`PassCadence`].
    ///
    /// Passes without a legal target are skipped silently.
    ///
    /// [`PassCadence`]: crate::genomics::PassCadence
    ///
    /// # Examples
    /// ```
    /// use neatarena_nn::genomics::{GeneticConfig, History, NNGenome, PassCadence};
    /// use rand::{rngs::StdRng, SeedableRng};
    /// use std::num::NonZeroUsize;
    ///
    /// let config = GeneticConfig {
    ///     input_count: NonZeroUsize::new(2).unwrap(),
    ///     node_addition_rate: 1.0,
    ///     pass_cadence: PassCadence::Truncate,
    ///     ..GeneticConfig::zero()
    /// };
    /// let mut history = History::new(&config);
    /// let mut genome = NNGenome::minimal(&config);
    ///
    /// genome.mutate_all(&mut history, &config, &mut StdRng::seed_from_u64(1));
    ///
    /// // The seed gene was split by a new hidden node.
    /// assert_eq!(genome.nodes().len(), 4);
    /// assert_eq!(genome.genes().len(), 3);
    /// ```
    pub fn mutate_all<R: Rng>(&mut self, history: &mut History, config: &GeneticConfig, rng: &mut R) {
        let cadence = config.pass_cadence;
        for _ in 0..cadence.repetitions(config.weight_mutation_rate, rng) {
            self.mutate_weight(config, rng);
        }
        for _ in 0..cadence.repetitions(config.gene_addition_rate, rng) {
            self.mutate_add_gene(history, config, rng);
        }
        for _ in 0..cadence.repetitions(config.node_addition_rate, rng) {
            self.mutate_add_node(history, rng);
        }
        for _ in 0..cadence.repetitions(config.gene_disable_rate, rng) {
            self.mutate_disable(rng);
        }
        for _ in 0..cadence.repetitions(config.gene_enable_rate, rng) {
            self.mutate_enable(rng);
        }
    }

    /// Mutates the weight of a randomly chosen gene. With
    /// probability [`weight_perturbation_chance`] the weight is
    /// perturbed by a small amount, otherwise it is replaced.
    /// Returns the mutated gene, or `None` if the genome
    /// has no genes.
    ///
    /// [`weight_perturbation_chance`]: GeneticConfig::weight_perturbation_chance
    ///
    /// # Examples
    /// ```
    /// use neatarena_nn::genomics::{GeneticConfig, NNGenome};
    /// use rand::{rngs::StdRng, SeedableRng};
    ///
    /// let config = GeneticConfig {
    ///     weight_bound: 2.0,
    ///     weight_perturbation_chance: 0.0,
    ///     ..GeneticConfig::zero()
    /// };
    /// let mut genome = NNGenome::minimal(&config);
    ///
    /// let gene = genome.mutate_weight(&config, &mut StdRng::seed_from_u64(2)).unwrap();
    ///
    /// assert!(gene.weight().abs() <= 2.0);
    /// ```
    pub fn mutate_weight<R: Rng>(&mut self, config: &GeneticConfig, rng: &mut R) -> Option<&Gene> {
        let gene = self.genes.choose_mut(rng)?;
        if rng.gen::<f32>() < config.weight_perturbation_chance {
            gene.perturb_weight(config, rng);
        } else {
            gene.randomize_weight(config, rng);
        }
        Some(gene)
    }

    /// Induces a _gene mutation_ in the genome: a new enabled gene
    /// with a random weight between a uniformly chosen pair of
    /// unconnected nodes. The destination may not be an input
    /// node, the source may not be an output node, and both
    /// must differ. The innovation number is drawn from `history`.
    ///
    /// Returns the newly added gene, or `None` if every legal
    /// pair is already connected.
    ///
    /// # Examples
    /// ```
    /// use neatarena_nn::genomics::{GeneticConfig, History, NNGenome};
    /// use rand::{rngs::StdRng, SeedableRng};
    /// use std::num::NonZeroUsize;
    ///
    /// let config = GeneticConfig {
    ///     input_count: NonZeroUsize::new(2).unwrap(),
    ///     ..GeneticConfig::zero()
    /// };
    /// let mut history = History::new(&config);
    /// let mut genome = NNGenome::minimal(&config);
    /// let mut rng = StdRng::seed_from_u64(0);
    ///
    /// // The only unconnected legal pair is 1 -> 2.
    /// let gene = genome.mutate_add_gene(&mut history, &config, &mut rng).unwrap();
    /// assert_eq!((gene.input(), gene.output()), (1, 2));
    /// assert_eq!(gene.innovation(), history.innovation_of(1, 2).unwrap());
    ///
    /// assert!(genome.mutate_add_gene(&mut history, &config, &mut rng).is_none());
    /// ```
    pub fn mutate_add_gene<R: Rng>(
        &mut self,
        history: &mut History,
        config: &GeneticConfig,
        rng: &mut R,
    ) -> Option<&Gene> {
        let (input, output) = self.choose_unconnected_pair(rng)?;
        let innovation = history.register_innovation(input, output);
        let weight = Gene::random_weight(config, rng);
        Some(self.insert_gene(Gene::new(innovation, input, output, weight)))
    }

    /// Chooses a uniformly random legal pair of nodes
    /// not yet connected by any gene.
    fn choose_unconnected_pair<R: Rng>(&self, rng: &mut R) -> Option<(NodeId, NodeId)> {
        let connected = self.connected_pairs();
        let sources = self.nodes.iter().filter(|n| n.can_emit());
        sources
            .flat_map(|source| {
                self.nodes
                    .iter()
                    .filter(|n| n.can_receive())
                    .map(move |destination| (source.id(), destination.id()))
            })
            .filter(|(source, destination)| {
                source != destination && !connected.contains(&(*source, *destination))
            })
            .choose(rng)
    }

    /// Induces a _node mutation_ in the genome: a randomly chosen
    /// enabled gene is disabled and split by a new hidden node,
    /// whose ID is one above the genome's highest node ID. The
    /// gene into the new node has weight 1, and the gene out of it
    /// inherits the split gene's weight. Both innovation numbers
    /// are drawn from `history`.
    ///
    /// Returns the new node's ID, or `None` if no gene is enabled.
    ///
    /// # Examples
    /// ```
    /// use neatarena_nn::genomics::{GeneticConfig, History, NNGenome, NodeType};
    /// use rand::{rngs::StdRng, SeedableRng};
    /// use std::num::NonZeroUsize;
    ///
    /// let config = GeneticConfig {
    ///     input_count: NonZeroUsize::new(2).unwrap(),
    ///     ..GeneticConfig::zero()
    /// };
    /// let mut history = History::new(&config);
    /// let mut genome = NNGenome::minimal(&config);
    ///
    /// let node = genome.mutate_add_node(&mut history, &mut StdRng::seed_from_u64(0)).unwrap();
    ///
    /// assert_eq!(node, 3);
    /// assert_eq!(genome.node(3).unwrap().node_type(), NodeType::Hidden);
    /// assert!(!genome.gene(0).unwrap().enabled());
    /// ```
    pub fn mutate_add_node<R: Rng>(&mut self, history: &mut History, rng: &mut R) -> Option<NodeId> {
        let split = self
            .genes
            .iter()
            .enumerate()
            .filter(|(_, g)| g.enabled())
            .map(|(i, _)| i)
            .choose(rng)?;
        let (input, output) = self.genes[split].endpoints();
        let weight = self.genes[split].weight();
        self.genes[split].set_enabled(false);

        let new_node = self.max_node_id().map_or(0, |id| id + 1);
        self.add_node(new_node, NodeType::Hidden);

        let into_innovation = history.register_innovation(input, new_node);
        let out_innovation = history.register_innovation(new_node, output);
        self.insert_gene(Gene::new(into_innovation, input, new_node, 1.0));
        self.insert_gene(Gene::new(out_innovation, new_node, output, weight));

        Some(new_node)
    }

    /// Re-enables a randomly chosen disabled gene.
    /// Returns its innovation number, or `None` if
    /// every gene is already enabled.
    pub fn mutate_enable<R: Rng>(&mut self, rng: &mut R) -> Option<Innovation> {
        self.toggle_random_gene(false, rng)
    }

    /// Disables a randomly chosen enabled gene.
    /// Returns its innovation number, or `None` if
    /// no gene is enabled.
    pub fn mutate_disable<R: Rng>(&mut self, rng: &mut R) -> Option<Innovation> {
        self.toggle_random_gene(true, rng)
    }

    /// Flips the expression of a random gene
    /// currently in the `enabled` state.
    fn toggle_random_gene<R: Rng>(&mut self, enabled: bool, rng: &mut R) -> Option<Innovation> {
        let gene = self
            .genes
            .iter_mut()
            .filter(|g| g.enabled() == enabled)
            .choose(rng)?;
        gene.set_enabled(!enabled);
        Some(gene.innovation())
    }
}
