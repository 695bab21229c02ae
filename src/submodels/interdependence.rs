/*!
## 7.7 Trait inter-dependence

Individuals hold any subset of a fixed number of binary traits. Traits are
not independent: some go well together, others clash. A symmetric
compatibility matrix assigns every pair of distinct traits +1 (compatible)
or −1 (incompatible). Whether an individual adopts a trait, by invention or
by copying, depends on how well it fits what it already holds: the
acceptance probability is the logistic function of the summed compatibility
of the new trait with all traits held.

With a random matrix this produces path dependence. With two blocks of
mutually compatible traits that clash with each other, populations settle on
one block or the other, depending on which happened to get a foothold first.

 */
use crate::error::{check_count, check_probability, ConfigError};
use crate::util::{logistic, uniform_index};
use crate::{Model, Population};
use bitvec::prelude::*;
use itertools::Itertools;
use rand::Rng;
use serde_derive::{Deserialize, Serialize};

/// The set of traits an individual holds. Bit `t` is set if trait `t` is
/// held.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Repertoire {
    bits: BitVec,
}

impl Repertoire {
    pub fn naive(traits: usize) -> Repertoire {
        Repertoire {
            bits: bitvec![0; traits],
        }
    }

    pub fn holds(&self, t: usize) -> bool {
        self.bits[t]
    }

    pub fn adopt(&mut self, t: usize) {
        self.bits.set(t, true);
    }

    pub fn size(&self) -> usize {
        self.bits.count_ones()
    }

    pub fn held(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits.iter_ones()
    }

    /// Traits `other` holds and `self` lacks, in increasing order.
    pub fn missing_from(&self, other: &Repertoire) -> Vec<usize> {
        other.held().filter(|t| !self.holds(*t)).collect()
    }
}

impl std::fmt::Binary for Repertoire {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for bit in self.bits.iter().by_vals() {
            write!(f, "{}", if bit { '1' } else { '0' })?;
        }
        Ok(())
    }
}

/// How the compatibility matrix of a repetition is made.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Compatibility {
    /// Every pair is compatible with probability `gamma`, independently.
    Random { gamma: f64 },
    /// Consecutive blocks of `block_size` traits; compatible within a
    /// block, incompatible between blocks.
    Blocks { block_size: usize },
}

/// Symmetric, with a zero diagonal. Entries are +1 or −1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompatibilityMatrix {
    entries: Vec<Vec<i8>>,
}

impl CompatibilityMatrix {
    /// One uniform per unordered pair (i, j) with i < j, in lexicographic
    /// order.
    pub fn random<R: Rng + ?Sized>(traits: usize, gamma: f64, rng: &mut R) -> CompatibilityMatrix {
        let mut entries = vec![vec![0; traits]; traits];
        for (i, j) in (0..traits).tuple_combinations() {
            let c = if rng.gen::<f64>() < gamma { 1 } else { -1 };
            entries[i][j] = c;
            entries[j][i] = c;
        }
        CompatibilityMatrix { entries }
    }

    pub fn blocks(traits: usize, block_size: usize) -> CompatibilityMatrix {
        let mut entries = vec![vec![0; traits]; traits];
        for (i, j) in (0..traits).tuple_combinations() {
            let c = if i / block_size == j / block_size { 1 } else { -1 };
            entries[i][j] = c;
            entries[j][i] = c;
        }
        CompatibilityMatrix { entries }
    }

    pub fn get(&self, t: usize, h: usize) -> i8 {
        self.entries[t][h]
    }

    /// Summed compatibility of trait `t` with everything else in
    /// `repertoire`. Zero for a naive individual.
    pub fn fit(&self, t: usize, repertoire: &Repertoire) -> f64 {
        repertoire
            .held()
            .filter(|h| *h != t)
            .map(|h| f64::from(self.get(t, h)))
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Interdependence {
    pub traits: usize,
    pub compatibility: Compatibility,
    pub innovation_rate: f64,
    /// Probability that an individual is replaced by a naive one.
    pub turnover: f64,
}

impl Default for Interdependence {
    fn default() -> Interdependence {
        Interdependence {
            traits: 10,
            compatibility: Compatibility::Random { gamma: 0.5 },
            innovation_rate: 0.01,
            turnover: 0.05,
        }
    }
}

impl Interdependence {
    /// Propose trait `t`: one uniform, unless it is already held.
    fn propose<R: Rng + ?Sized>(
        &self,
        t: usize,
        repertoire: &mut Repertoire,
        matrix: &CompatibilityMatrix,
        rng: &mut R,
    ) {
        if repertoire.holds(t) {
            return;
        }
        if rng.gen::<f64>() < logistic(matrix.fit(t, repertoire)) {
            repertoire.adopt(t);
        }
    }
}

impl Model for Interdependence {
    type Agent = Repertoire;
    type Environment = CompatibilityMatrix;

    const NAME: &'static str = "interdependence";

    fn statistics(&self) -> Vec<String> {
        (0..self.traits)
            .map(|t| format!("trait_{}", t))
            .chain(std::iter::once("mean_traits".to_string()))
            .collect()
    }

    fn validate(&self, _population_size: usize) -> Result<(), ConfigError> {
        check_count("traits", self.traits, 1)?;
        match self.compatibility {
            Compatibility::Random { gamma } => check_probability("gamma", gamma)?,
            Compatibility::Blocks { block_size } => check_count("block_size", block_size, 1)?,
        }
        check_probability("innovation_rate", self.innovation_rate)?;
        check_probability("turnover", self.turnover)
    }

    /// The matrix draws come first; everyone starts naive.
    fn initialize<R: Rng + ?Sized>(
        &self,
        population_size: usize,
        rng: &mut R,
    ) -> Population<Repertoire, CompatibilityMatrix> {
        let matrix = match self.compatibility {
            Compatibility::Random { gamma } => CompatibilityMatrix::random(self.traits, gamma, rng),
            Compatibility::Blocks { block_size } => {
                CompatibilityMatrix::blocks(self.traits, block_size)
            }
        };
        Population::new(vec![Repertoire::naive(self.traits); population_size], matrix)
    }

    /**
    Per agent: one uniform for turnover; one uniform for innovation, and if
    innovating one trait index and the acceptance uniform; one demonstrator
    index, and if the demonstrator holds anything new, one candidate index
    and the acceptance uniform.
     */
    fn step<R: Rng + ?Sized>(
        &self,
        previous: &Population<Repertoire, CompatibilityMatrix>,
        rng: &mut R,
    ) -> Population<Repertoire, CompatibilityMatrix> {
        let n = previous.size();
        let matrix = &previous.environment;
        let agents = previous
            .agents
            .iter()
            .map(|me| {
                let mut repertoire = if rng.gen::<f64>() < self.turnover {
                    Repertoire::naive(self.traits)
                } else {
                    me.clone()
                };
                if rng.gen::<f64>() < self.innovation_rate {
                    let t = uniform_index(self.traits, rng);
                    self.propose(t, &mut repertoire, matrix, rng);
                }
                let demonstrator = &previous.agents[uniform_index(n, rng)];
                let candidates = repertoire.missing_from(demonstrator);
                if !candidates.is_empty() {
                    let t = candidates[uniform_index(candidates.len(), rng)];
                    self.propose(t, &mut repertoire, matrix, rng);
                }
                repertoire
            })
            .collect();
        Population::new(agents, previous.environment.clone())
    }

    fn observe(&self, population: &Population<Repertoire, CompatibilityMatrix>) -> Vec<f64> {
        let n = population.size() as f64;
        let mut row: Vec<f64> = (0..self.traits)
            .map(|t| population.share(|r| r.holds(t)))
            .collect();
        row.push(population.agents.iter().map(|r| r.size()).sum::<usize>() as f64 / n);
        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{repetition_rng, run, RunSettings};

    #[test]
    fn random_matrix_is_symmetric() {
        let matrix = CompatibilityMatrix::random(8, 0.3, &mut repetition_rng(1, 0));
        for i in 0..8 {
            assert_eq!(matrix.get(i, i), 0);
            for j in 0..8 {
                assert_eq!(matrix.get(i, j), matrix.get(j, i));
                if i != j {
                    assert!(matrix.get(i, j) == 1 || matrix.get(i, j) == -1);
                }
            }
        }
    }

    #[test]
    fn blocks_clash_with_each_other() {
        let matrix = CompatibilityMatrix::blocks(6, 3);
        assert_eq!(matrix.get(0, 2), 1);
        assert_eq!(matrix.get(3, 5), 1);
        assert_eq!(matrix.get(2, 3), -1);
        let mut r = Repertoire::naive(6);
        assert_eq!(matrix.fit(4, &r), 0.);
        r.adopt(0);
        r.adopt(1);
        r.adopt(4);
        assert_eq!(matrix.fit(2, &r), 1.);
        assert_eq!(matrix.fit(4, &r), -2.);
    }

    #[test]
    fn candidates_are_what_the_demonstrator_adds() {
        let mut me = Repertoire::naive(5);
        me.adopt(1);
        let mut them = Repertoire::naive(5);
        them.adopt(1);
        them.adopt(3);
        them.adopt(4);
        assert_eq!(me.missing_from(&them), vec![3, 4]);
        assert!(them.missing_from(&me).is_empty());
        assert_eq!(format!("{:b}", them), "01011");
    }

    #[test]
    fn nothing_new_to_copy_draws_no_candidate() {
        let model = Interdependence {
            traits: 4,
            compatibility: Compatibility::Blocks { block_size: 2 },
            innovation_rate: 0.,
            turnover: 0.,
        };
        let mut held = Repertoire::naive(4);
        held.adopt(2);
        let previous = Population::new(vec![held.clone(), held], CompatibilityMatrix::blocks(4, 2));
        let mut rng = repetition_rng(5, 0);
        let next = model.step(&previous, &mut rng);
        assert_eq!(next, previous);

        // Per agent only turnover, innovation and the demonstrator index.
        let mut replay = repetition_rng(5, 0);
        for _ in 0..2 {
            let _ = replay.gen::<f64>();
            let _ = replay.gen::<f64>();
            let _ = uniform_index(2, &mut replay);
        }
        assert_eq!(rng.gen::<u64>(), replay.gen::<u64>());
    }

    #[test]
    fn compatible_traits_all_spread() {
        let model = Interdependence {
            traits: 10,
            compatibility: Compatibility::Random { gamma: 1. },
            innovation_rate: 0.01,
            turnover: 0.,
        };
        let settings = RunSettings {
            population_size: 100,
            generations: 200,
            repetitions: 3,
            seed: 8,
            parallel: true,
            log_every: 0,
        };
        let runs = run(&model, &settings).unwrap();
        for t in 0..10 {
            for f in runs.final_values(&format!("trait_{}", t)).unwrap() {
                assert!(f > 0.9, "trait {} at {}", t, f);
            }
        }
    }
}
