/*!
## 7.3 Many traits and innovation

Instead of two variants, individuals carry one of an open-ended set of
traits, identified by integer labels. Copying is unbiased, and with a small
probability an individual invents a trait no one has ever had. This is the
neutral "infinite alleles" model of cultural popularity.

 */
use crate::error::{check_count, check_probability, ConfigError};
use crate::util::uniform_index;
use crate::{Model, Population};
use rand::Rng;
use rustc_hash::FxHashMap;
use serde_derive::{Deserialize, Serialize};

pub type Label = u64;

/// Hands out trait labels that have never been used in this repetition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Innovations {
    pub next_label: Label,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MultipleTraits {
    /// Number of distinct traits, assigned uniformly, in the initial
    /// population.
    pub initial_traits: usize,
    pub innovation_rate: f64,
}

impl Default for MultipleTraits {
    fn default() -> MultipleTraits {
        MultipleTraits {
            initial_traits: 2,
            innovation_rate: 0.01,
        }
    }
}

/// Counts of every trait present.
pub fn trait_counts(labels: &[Label]) -> FxHashMap<Label, usize> {
    let mut counts = FxHashMap::default();
    for l in labels {
        *counts.entry(*l).or_insert(0) += 1;
    }
    counts
}

/**
Probability that two individuals drawn with replacement carry different
traits.

```rust
# use model::submodels::multiple::simpson_diversity;
assert_eq!(simpson_diversity(&[1, 1, 1, 1]), 0.0);
assert_eq!(simpson_diversity(&[1, 2, 1, 2]), 0.5);
```
 */
pub fn simpson_diversity(labels: &[Label]) -> f64 {
    let n = labels.len() as f64;
    let mut counts: Vec<usize> = trait_counts(labels).values().copied().collect();
    // Sum in a fixed order: hash map iteration order is not part of the
    // result.
    counts.sort_unstable();
    1. - counts
        .iter()
        .map(|&c| (c as f64 / n).powi(2))
        .sum::<f64>()
}

impl Model for MultipleTraits {
    type Agent = Label;
    type Environment = Innovations;

    const NAME: &'static str = "multiple";

    fn statistics(&self) -> Vec<String> {
        vec![
            "distinct_traits".to_string(),
            "most_common_frequency".to_string(),
            "simpson_diversity".to_string(),
        ]
    }

    fn validate(&self, _population_size: usize) -> Result<(), ConfigError> {
        check_count("initial_traits", self.initial_traits, 1)?;
        check_probability("innovation_rate", self.innovation_rate)
    }

    fn initialize<R: Rng + ?Sized>(
        &self,
        population_size: usize,
        rng: &mut R,
    ) -> Population<Label, Innovations> {
        let agents = (0..population_size)
            .map(|_| uniform_index(self.initial_traits, rng) as Label)
            .collect();
        Population::new(
            agents,
            Innovations {
                next_label: self.initial_traits as Label,
            },
        )
    }

    /// Per agent: one uniform deciding innovation, then, if not innovating,
    /// one demonstrator index.
    fn step<R: Rng + ?Sized>(
        &self,
        previous: &Population<Label, Innovations>,
        rng: &mut R,
    ) -> Population<Label, Innovations> {
        let n = previous.size();
        let mut innovations = previous.environment;
        let agents = (0..n)
            .map(|_| {
                if rng.gen::<f64>() < self.innovation_rate {
                    let label = innovations.next_label;
                    innovations.next_label += 1;
                    label
                } else {
                    previous.agents[uniform_index(n, rng)]
                }
            })
            .collect();
        Population::new(agents, innovations)
    }

    fn observe(&self, population: &Population<Label, Innovations>) -> Vec<f64> {
        let counts = trait_counts(&population.agents);
        let most_common = counts.values().copied().max().unwrap_or(0);
        vec![
            counts.len() as f64,
            most_common as f64 / population.size() as f64,
            simpson_diversity(&population.agents),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{repetition_rng, run, RunSettings};

    #[test]
    fn innovations_are_never_seen_before() {
        let model = MultipleTraits {
            initial_traits: 3,
            innovation_rate: 0.5,
        };
        let mut rng = repetition_rng(9, 0);
        let mut population = model.initialize(200, &mut rng);
        let mut seen: std::collections::HashSet<Label> =
            population.agents.iter().copied().collect();
        for _ in 0..20 {
            let next = model.step(&population, &mut rng);
            for label in next.agents.iter() {
                if *label >= population.environment.next_label {
                    assert!(!seen.contains(label));
                }
            }
            seen.extend(next.agents.iter().copied());
            population = next;
        }
    }

    #[test]
    fn without_innovation_diversity_is_lost() {
        let model = MultipleTraits {
            initial_traits: 10,
            innovation_rate: 0.,
        };
        let settings = RunSettings {
            population_size: 50,
            generations: 1000,
            repetitions: 3,
            seed: 2,
            parallel: false,
            log_every: 0,
        };
        for k in run(&model, &settings).unwrap().final_values("distinct_traits").unwrap() {
            assert_eq!(k, 1.);
        }
    }

    #[test]
    fn innovation_maintains_diversity() {
        let model = MultipleTraits {
            initial_traits: 1,
            innovation_rate: 0.05,
        };
        let settings = RunSettings {
            population_size: 200,
            generations: 100,
            repetitions: 3,
            seed: 2,
            parallel: false,
            log_every: 0,
        };
        for d in run(&model, &settings).unwrap().final_values("simpson_diversity").unwrap() {
            assert!(d > 0.5, "diversity {}", d);
        }
    }
}
