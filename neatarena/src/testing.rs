//! A toy genome for exercising the population and tournament
//! machinery without a neural network implementation.
use crate::{Genome, InnovationHistory};

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Hands out one fresh "innovation" per mutation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BitHistory {
    next: u8,
}

impl InnovationHistory for BitHistory {
    type Config = ();

    fn new(_: &()) -> BitHistory {
        BitHistory::default()
    }
}

/// A genome made of bytes. Mating concatenates the
/// parents, mutation appends the next innovation, and
/// distance is the gap between the first bytes.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BitGenome {
    bits: Vec<u8>,
    fitness: f32,
    adjusted_fitness: f32,
    bracket: usize,
}

impl BitGenome {
    pub fn with_bits(bits: Vec<u8>) -> BitGenome {
        BitGenome {
            bits,
            fitness: 0.0,
            adjusted_fitness: 0.0,
            bracket: 0,
        }
    }

    pub fn bits(&self) -> &[u8] {
        &self.bits
    }

    pub fn head(&self) -> u8 {
        self.bits.first().copied().unwrap_or(0)
    }
}

impl PartialEq for BitGenome {
    fn eq(&self, other: &BitGenome) -> bool {
        self.bits == other.bits
    }
}

impl Genome for BitGenome {
    type Config = ();
    type InnovationHistory = BitHistory;

    fn new(_: &()) -> BitGenome {
        BitGenome::with_bits(vec![0])
    }

    fn genetic_distance(first: &BitGenome, second: &BitGenome, _: &()) -> f32 {
        (first.head() as f32 - second.head() as f32).abs()
    }

    fn mate<R: Rng>(parent1: &BitGenome, parent2: &BitGenome, _: &mut R) -> BitGenome {
        BitGenome::with_bits([parent1.bits(), parent2.bits()].concat())
    }

    fn mutate<R: Rng>(&mut self, history: &mut BitHistory, _: &(), _: &mut R) {
        self.bits.push(history.next);
        history.next = history.next.wrapping_add(1);
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
