/*!
## 7.8 Reproduction and transformation

A continuous trait in [0, 1], for instance the proportions of an artefact.
Each generation an individual copies a random member of the previous
generation imperfectly (reproduction), and then, independently of whom it
copied, nudges the result toward a culturally attractive value
(transformation). Even weak attraction, applied every generation, dominates
where the population ends up, while reproduction noise alone only spreads it
out.

 */
use crate::analysis::{mean, variance};
use crate::error::{check_non_negative, check_probability, ConfigError};
use crate::util::{clamp_to_unit, uniform_index};
use crate::{Model, Population};
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde_derive::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Attraction {
    /// Standard deviation of the copying error.
    pub copy_error: f64,
    /// Fraction of the distance to the attractor covered each generation.
    pub attraction: f64,
    pub attractor: f64,
}

impl Default for Attraction {
    fn default() -> Attraction {
        Attraction {
            copy_error: 0.05,
            attraction: 0.1,
            attractor: 0.8,
        }
    }
}

impl Model for Attraction {
    type Agent = f64;
    type Environment = ();

    const NAME: &'static str = "attraction";

    fn statistics(&self) -> Vec<String> {
        vec!["mean".to_string(), "variance".to_string()]
    }

    fn validate(&self, _population_size: usize) -> Result<(), ConfigError> {
        check_non_negative("copy_error", self.copy_error)?;
        check_probability("attraction", self.attraction)?;
        check_probability("attractor", self.attractor)
    }

    /// Per agent: one uniform.
    fn initialize<R: Rng + ?Sized>(&self, population_size: usize, rng: &mut R) -> Population<f64> {
        Population::new((0..population_size).map(|_| rng.gen::<f64>()).collect(), ())
    }

    /// Per agent: one demonstrator index, then one normal variate.
    fn step<R: Rng + ?Sized>(&self, previous: &Population<f64>, rng: &mut R) -> Population<f64> {
        let n = previous.size();
        let error = Normal::new(0., self.copy_error);
        let agents = (0..n)
            .map(|_| {
                let mut x = previous.agents[uniform_index(n, rng)];
                if let Ok(error) = &error {
                    x += error.sample(rng);
                }
                x += self.attraction * (self.attractor - x);
                clamp_to_unit(x)
            })
            .collect();
        Population::new(agents, ())
    }

    fn observe(&self, population: &Population<f64>) -> Vec<f64> {
        vec![mean(&population.agents), variance(&population.agents)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{run, RunSettings};

    #[test]
    fn population_converges_on_the_attractor() {
        let model = Attraction {
            copy_error: 0.02,
            attraction: 0.2,
            attractor: 0.3,
        };
        let settings = RunSettings {
            population_size: 200,
            generations: 100,
            repetitions: 3,
            seed: 5,
            parallel: false,
            log_every: 0,
        };
        let runs = run(&model, &settings).unwrap();
        for m in runs.final_values("mean").unwrap() {
            assert!((m - 0.3).abs() < 0.03, "mean {}", m);
        }
        for v in runs.final_values("variance").unwrap() {
            assert!(v < 0.01);
        }
    }

    #[test]
    fn attractor_outside_the_range_is_rejected() {
        let model = Attraction {
            attractor: 1.5,
            ..Attraction::default()
        };
        assert!(model.validate(10).is_err());
    }
}
