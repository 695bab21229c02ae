/*!
## 7.2 Vertical and horizontal transmission

Individuals first acquire a variant from two parents of the previous
generation (vertical transmission) and then, as adults, may switch after
observing peers of their own generation (horizontal transmission). Only the
favoured variant A spreads horizontally.

 */
use crate::error::{check_count, check_probability, ConfigError};
use crate::util::uniform_index;
use crate::{Model, Population, Variant};
use rand::Rng;
use serde_derive::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerticalHorizontal {
    pub initial_frequency: f64,
    /// Probability that the offspring of an A and a B parent holds A.
    pub vertical_bias: f64,
    /// Number of same-generation individuals observed horizontally. 0
    /// switches horizontal transmission off.
    pub horizontal_demonstrators: usize,
    /// Probability of switching to A after observing at least one A.
    pub horizontal_bias: f64,
}

impl Default for VerticalHorizontal {
    fn default() -> VerticalHorizontal {
        VerticalHorizontal {
            initial_frequency: 0.01,
            vertical_bias: 0.6,
            horizontal_demonstrators: 5,
            horizontal_bias: 0.1,
        }
    }
}

impl Model for VerticalHorizontal {
    type Agent = Variant;
    type Environment = ();

    const NAME: &'static str = "vertical";

    fn statistics(&self) -> Vec<String> {
        vec!["p".to_string()]
    }

    fn validate(&self, population_size: usize) -> Result<(), ConfigError> {
        check_probability("initial_frequency", self.initial_frequency)?;
        check_probability("vertical_bias", self.vertical_bias)?;
        check_probability("horizontal_bias", self.horizontal_bias)?;
        if self.horizontal_demonstrators > 0 {
            // Horizontal learners observe others, never themselves.
            check_count("population_size", population_size, 2)?;
        }
        Ok(())
    }

    fn initialize<R: Rng + ?Sized>(&self, population_size: usize, rng: &mut R) -> Population<Variant> {
        Population::new(
            (0..population_size)
                .map(|_| Variant::with_probability_a(self.initial_frequency, rng))
                .collect(),
            (),
        )
    }

    /**
    Vertical phase, per agent: two parent indices, then one uniform if the
    parents differ. Horizontal phase, per agent holding B: the demonstrator
    indices (redrawn while they hit the agent itself), then one uniform if one
    of them holds A.
     */
    fn step<R: Rng + ?Sized>(&self, previous: &Population<Variant>, rng: &mut R) -> Population<Variant> {
        let n = previous.size();
        let parents = &previous.agents;
        let offspring: Vec<Variant> = (0..n)
            .map(|_| {
                let mother = parents[uniform_index(n, rng)];
                let father = parents[uniform_index(n, rng)];
                if mother == father {
                    mother
                } else {
                    Variant::with_probability_a(self.vertical_bias, rng)
                }
            })
            .collect();

        if self.horizontal_demonstrators == 0 {
            return Population::new(offspring, ());
        }
        let adults = offspring
            .iter()
            .enumerate()
            .map(|(i, &variant)| {
                if variant.is_a() {
                    return variant;
                }
                let mut sees_a = false;
                for _ in 0..self.horizontal_demonstrators {
                    let mut j = uniform_index(n, rng);
                    while j == i {
                        j = uniform_index(n, rng);
                    }
                    sees_a |= offspring[j].is_a();
                }
                if sees_a && rng.gen::<f64>() < self.horizontal_bias {
                    Variant::A
                } else {
                    variant
                }
            })
            .collect();
        Population::new(adults, ())
    }

    fn observe(&self, population: &Population<Variant>) -> Vec<f64> {
        vec![population.share(|v| v.is_a())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{run, RunSettings};

    #[test]
    fn horizontal_transmission_accelerates_spread() {
        let vertical_only = VerticalHorizontal {
            horizontal_demonstrators: 0,
            initial_frequency: 0.1,
            ..VerticalHorizontal::default()
        };
        let both = VerticalHorizontal {
            horizontal_demonstrators: 5,
            horizontal_bias: 0.5,
            ..vertical_only.clone()
        };
        let settings = RunSettings {
            population_size: 1000,
            generations: 10,
            repetitions: 5,
            seed: 11,
            parallel: true,
            log_every: 0,
        };
        let slow = run(&vertical_only, &settings).unwrap().mean_series();
        let fast = run(&both, &settings).unwrap().mean_series();
        assert!(fast.final_value("p").unwrap() > slow.final_value("p").unwrap() + 0.2);
    }

    #[test]
    fn unbiased_parents_keep_the_frequency_on_average() {
        let model = VerticalHorizontal {
            initial_frequency: 0.5,
            vertical_bias: 0.5,
            horizontal_demonstrators: 0,
            ..VerticalHorizontal::default()
        };
        let settings = RunSettings {
            population_size: 2000,
            generations: 20,
            repetitions: 8,
            seed: 5,
            parallel: false,
            log_every: 0,
        };
        let mean = run(&model, &settings).unwrap().mean_series();
        assert!((mean.final_value("p").unwrap() - 0.5).abs() < 0.1);
    }

    #[test]
    fn horizontal_learning_needs_a_second_individual() {
        assert!(VerticalHorizontal::default().validate(1).is_err());
    }
}
