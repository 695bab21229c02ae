/*!
## 7.1 Transmission of a trait with two variants

The basic family of models: every individual holds variant A or B of a single
trait and, once per generation, acquires a variant from the previous
generation. How the variant is acquired (the copying policy) and how it may
change afterwards (the mutation policy) are configured independently, so that
unbiased transmission, unbiased and biased mutation, direct bias, conformist
bias and demonstrator-based (prestige) bias are all the same model with
different settings.

 */
use crate::error::{check_count, check_non_negative, check_probability, ConfigError};
use crate::util::uniform_index;
use crate::{Model, Population, Variant};
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use serde_derive::{Deserialize, Serialize};

#[derive(Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Individual {
    pub variant: Variant,
    /// Fixed for life. Only relevant for `Copying::Prestige`.
    pub high_status: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Copying {
    /// Copy one demonstrator chosen uniformly at random.
    Unbiased,
    /// Observe one random demonstrator; if it shows A, switch to A with
    /// probability `s`, otherwise keep the own variant.
    Direct { s: f64 },
    /// Observe `demonstrators` random individuals. With probability
    /// `strength` adopt their majority variant, otherwise copy one of them.
    Conformist { strength: f64, demonstrators: usize },
    /// Choose the demonstrator with weight 1 if it has high status and
    /// `low_status_weight` otherwise.
    Prestige { low_status_weight: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Mutation {
    Off,
    /// Flip the variant with probability `mu`.
    Unbiased { mu: f64 },
    /// Only B mutates, to A, with probability `mu_b`.
    Biased { mu_b: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BinaryTransmission {
    pub initial_frequency: f64,
    pub high_status_share: f64,
    pub copying: Copying,
    pub mutation: Mutation,
}

impl Default for BinaryTransmission {
    fn default() -> BinaryTransmission {
        BinaryTransmission {
            initial_frequency: 0.5,
            high_status_share: 0.1,
            copying: Copying::Unbiased,
            mutation: Mutation::Off,
        }
    }
}

impl BinaryTransmission {
    pub fn unbiased(initial_frequency: f64) -> Self {
        BinaryTransmission {
            initial_frequency,
            ..BinaryTransmission::default()
        }
    }

    fn acquire<R: Rng + ?Sized>(
        &self,
        me: &Individual,
        previous: &[Individual],
        weights: Option<&WeightedIndex<f64>>,
        rng: &mut R,
    ) -> Variant {
        let n = previous.len();
        match self.copying {
            Copying::Unbiased => previous[uniform_index(n, rng)].variant,
            Copying::Direct { s } => {
                let demonstrator = previous[uniform_index(n, rng)].variant;
                let copy = rng.gen::<f64>() < s;
                if copy && demonstrator.is_a() {
                    Variant::A
                } else {
                    me.variant
                }
            }
            Copying::Conformist {
                strength,
                demonstrators,
            } => {
                let observed: Vec<Variant> = (0..demonstrators)
                    .map(|_| previous[uniform_index(n, rng)].variant)
                    .collect();
                if rng.gen::<f64>() < strength {
                    let a = observed.iter().filter(|v| v.is_a()).count();
                    if 2 * a > demonstrators {
                        Variant::A
                    } else {
                        Variant::B
                    }
                } else {
                    observed[uniform_index(demonstrators, rng)]
                }
            }
            Copying::Prestige { .. } => match weights {
                Some(w) => previous[w.sample(rng)].variant,
                // Nobody can be chosen under the weights: fall back to
                // unbiased copying.
                None => previous[uniform_index(n, rng)].variant,
            },
        }
    }

    fn mutate<R: Rng + ?Sized>(&self, variant: Variant, rng: &mut R) -> Variant {
        match self.mutation {
            Mutation::Off => variant,
            Mutation::Unbiased { mu } => {
                if rng.gen::<f64>() < mu {
                    variant.other()
                } else {
                    variant
                }
            }
            Mutation::Biased { mu_b } => {
                if rng.gen::<f64>() < mu_b && variant == Variant::B {
                    Variant::A
                } else {
                    variant
                }
            }
        }
    }
}

impl Model for BinaryTransmission {
    type Agent = Individual;
    type Environment = ();

    const NAME: &'static str = "binary";

    fn statistics(&self) -> Vec<String> {
        vec!["p".to_string()]
    }

    fn validate(&self, _population_size: usize) -> Result<(), ConfigError> {
        check_probability("initial_frequency", self.initial_frequency)?;
        check_probability("high_status_share", self.high_status_share)?;
        match self.copying {
            Copying::Unbiased => {}
            Copying::Direct { s } => check_probability("s", s)?,
            Copying::Conformist {
                strength,
                demonstrators,
            } => {
                check_probability("strength", strength)?;
                check_count("demonstrators", demonstrators, 3)?;
                if demonstrators % 2 == 0 {
                    return Err(ConfigError::Incompatible {
                        parameter: "demonstrators",
                        reason: "an even number of demonstrators can tie".to_string(),
                    });
                }
            }
            Copying::Prestige { low_status_weight } => {
                check_non_negative("low_status_weight", low_status_weight)?
            }
        }
        match self.mutation {
            Mutation::Off => {}
            Mutation::Unbiased { mu } => check_probability("mu", mu)?,
            Mutation::Biased { mu_b } => check_probability("mu_b", mu_b)?,
        }
        Ok(())
    }

    /// Per agent: one uniform for the variant, one for the status.
    fn initialize<R: Rng + ?Sized>(&self, population_size: usize, rng: &mut R) -> Population<Individual> {
        let agents = (0..population_size)
            .map(|_| {
                let variant = Variant::with_probability_a(self.initial_frequency, rng);
                let high_status = rng.gen::<f64>() < self.high_status_share;
                Individual {
                    variant,
                    high_status,
                }
            })
            .collect();
        Population::new(agents, ())
    }

    /**
    Per agent: the copying draws (demonstrator indices first, then the
    uniform deciding whether to copy or conform, then for non-conforming
    conformists the index of the copied demonstrator), then one uniform for
    mutation unless mutation is off. Prestige bias draws one weighted index.
     */
    fn step<R: Rng + ?Sized>(&self, previous: &Population<Individual>, rng: &mut R) -> Population<Individual> {
        let weights = match self.copying {
            Copying::Prestige { low_status_weight } => WeightedIndex::new(
                previous
                    .agents
                    .iter()
                    .map(|a| if a.high_status { 1. } else { low_status_weight }),
            )
            .ok(),
            _ => None,
        };
        let agents = previous
            .agents
            .iter()
            .map(|me| {
                let acquired = self.acquire(me, &previous.agents, weights.as_ref(), rng);
                Individual {
                    variant: self.mutate(acquired, rng),
                    high_status: me.high_status,
                }
            })
            .collect();
        Population::new(agents, ())
    }

    fn observe(&self, population: &Population<Individual>) -> Vec<f64> {
        vec![population.share(|a| a.variant.is_a())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{repetition_rng, run, RunSettings};

    fn settings(population_size: usize, generations: usize) -> RunSettings {
        RunSettings {
            population_size,
            generations,
            repetitions: 4,
            seed: 3,
            parallel: false,
            log_every: 0,
        }
    }

    #[test]
    fn biased_mutation_converts_everyone_to_a() {
        let model = BinaryTransmission {
            initial_frequency: 0.,
            mutation: Mutation::Biased { mu_b: 0.1 },
            ..BinaryTransmission::default()
        };
        let runs = run(&model, &settings(500, 150)).unwrap();
        for p in runs.final_values("p").unwrap() {
            assert!(p > 0.95, "p = {}", p);
        }
    }

    #[test]
    fn direct_bias_spreads_the_favoured_variant() {
        let model = BinaryTransmission {
            initial_frequency: 0.1,
            copying: Copying::Direct { s: 0.2 },
            ..BinaryTransmission::default()
        };
        let runs = run(&model, &settings(1000, 150)).unwrap();
        for p in runs.final_values("p").unwrap() {
            assert!(p > 0.95, "p = {}", p);
        }
    }

    #[test]
    fn conformity_drives_the_majority_to_fixation() {
        let model = BinaryTransmission {
            initial_frequency: 0.7,
            copying: Copying::Conformist {
                strength: 1.,
                demonstrators: 3,
            },
            ..BinaryTransmission::default()
        };
        let runs = run(&model, &settings(1000, 50)).unwrap();
        for p in runs.final_values("p").unwrap() {
            assert!(p > 0.99, "p = {}", p);
        }
    }

    #[test]
    fn only_high_status_individuals_are_copied_when_low_status_has_no_weight() {
        let model = BinaryTransmission {
            copying: Copying::Prestige {
                low_status_weight: 0.,
            },
            ..BinaryTransmission::default()
        };
        let mut agents = vec![
            Individual {
                variant: Variant::B,
                high_status: false,
            };
            50
        ];
        agents[17] = Individual {
            variant: Variant::A,
            high_status: true,
        };
        let previous = Population::new(agents, ());
        let next = model.step(&previous, &mut repetition_rng(1, 0));
        assert_eq!(model.observe(&next), vec![1.0]);
        assert!(next.agents[17].high_status);
        assert!(!next.agents[0].high_status);
    }

    #[test]
    fn even_number_of_conformity_demonstrators_is_rejected() {
        let model = BinaryTransmission {
            copying: Copying::Conformist {
                strength: 0.5,
                demonstrators: 4,
            },
            ..BinaryTransmission::default()
        };
        assert!(model.validate(100).is_err());
    }

    #[test]
    fn status_shows_in_debug_output() {
        let individual = Individual {
            variant: Variant::A,
            high_status: true,
        };
        assert_eq!(
            format!("{:?}", individual),
            "Individual { variant: A, high_status: true }"
        );
    }

    #[test]
    fn a_single_conformity_demonstrator_is_rejected() {
        let model = BinaryTransmission {
            copying: Copying::Conformist {
                strength: 1.,
                demonstrators: 1,
            },
            ..BinaryTransmission::default()
        };
        assert_eq!(
            model.validate(100),
            Err(ConfigError::InvalidCount {
                parameter: "demonstrators",
                value: 1,
                minimum: 3
            })
        );
    }

    #[test]
    fn mutation_rates_outside_the_unit_interval_are_rejected() {
        let model = BinaryTransmission {
            mutation: Mutation::Unbiased { mu: -0.1 },
            ..BinaryTransmission::default()
        };
        assert_eq!(
            model.validate(100),
            Err(ConfigError::InvalidProbability {
                parameter: "mu",
                value: -0.1
            })
        );
    }
}
