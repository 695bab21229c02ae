/*!
## 7.6 Social learning of social learning rules

Whether to learn socially at all is itself something that can be learned.
Every individual carries, besides a variant of an ordinary trait, an
openness: the probability of copying someone else in a generation. When it
copies, it copies both the demonstrator's variant and the demonstrator's
openness. Openness is then perturbed a little. Closed individuals keep what
they have, and occasionally reinvent the trait at random.

Openness is not under selection here: it drifts, carried along with whatever
variant it happens to be copied with. The covariance between openness and
holding A shows which variant is currently travelling with the open
individuals.

 */
use crate::analysis::{covariance, mean};
use crate::error::{check_non_negative, check_probability, ConfigError};
use crate::util::{clamp_to_unit, uniform_index};
use crate::{Model, Population, Variant};
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde_derive::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OpenAgent {
    pub variant: Variant,
    /// Probability of learning socially, in [0, 1].
    pub openness: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Openness {
    pub initial_frequency: f64,
    /// Initial openness is uniform in [`initial_openness_min`, `initial_openness_max`].
    pub initial_openness_min: f64,
    pub initial_openness_max: f64,
    /// Standard deviation of the change in openness each generation.
    pub openness_noise: f64,
    pub innovation_rate: f64,
}

impl Default for Openness {
    fn default() -> Openness {
        Openness {
            initial_frequency: 0.5,
            initial_openness_min: 0.,
            initial_openness_max: 1.,
            openness_noise: 0.05,
            innovation_rate: 0.01,
        }
    }
}

impl Model for Openness {
    type Agent = OpenAgent;
    type Environment = ();

    const NAME: &'static str = "openness";

    fn statistics(&self) -> Vec<String> {
        vec![
            "p".to_string(),
            "mean_openness".to_string(),
            "cov_openness_a".to_string(),
        ]
    }

    fn validate(&self, _population_size: usize) -> Result<(), ConfigError> {
        check_probability("initial_frequency", self.initial_frequency)?;
        check_probability("initial_openness_min", self.initial_openness_min)?;
        check_probability("initial_openness_max", self.initial_openness_max)?;
        if self.initial_openness_min > self.initial_openness_max {
            return Err(ConfigError::Incompatible {
                parameter: "initial_openness_min",
                reason: format!(
                    "larger than initial_openness_max ({})",
                    self.initial_openness_max
                ),
            });
        }
        check_non_negative("openness_noise", self.openness_noise)?;
        check_probability("innovation_rate", self.innovation_rate)
    }

    /// Per agent: one uniform for the variant, one for the openness.
    fn initialize<R: Rng + ?Sized>(&self, population_size: usize, rng: &mut R) -> Population<OpenAgent> {
        let width = self.initial_openness_max - self.initial_openness_min;
        let agents = (0..population_size)
            .map(|_| {
                let variant = Variant::with_probability_a(self.initial_frequency, rng);
                let openness = self.initial_openness_min + width * rng.gen::<f64>();
                OpenAgent { variant, openness }
            })
            .collect();
        Population::new(agents, ())
    }

    /**
    Per agent: one uniform deciding whether to copy, and if so one
    demonstrator index; one normal variate for the openness noise; one
    uniform deciding innovation, and if innovating one more uniform for the
    new variant.
     */
    fn step<R: Rng + ?Sized>(&self, previous: &Population<OpenAgent>, rng: &mut R) -> Population<OpenAgent> {
        let n = previous.size();
        let noise = Normal::new(0., self.openness_noise);
        let agents = previous
            .agents
            .iter()
            .map(|me| {
                let mut next = *me;
                if rng.gen::<f64>() < me.openness {
                    next = previous.agents[uniform_index(n, rng)];
                }
                if let Ok(noise) = &noise {
                    next.openness += noise.sample(rng);
                }
                next.openness = clamp_to_unit(next.openness);
                if rng.gen::<f64>() < self.innovation_rate {
                    next.variant = Variant::with_probability_a(0.5, rng);
                }
                next
            })
            .collect();
        Population::new(agents, ())
    }

    fn observe(&self, population: &Population<OpenAgent>) -> Vec<f64> {
        let openness: Vec<f64> = population.agents.iter().map(|a| a.openness).collect();
        let holds_a: Vec<f64> = population
            .agents
            .iter()
            .map(|a| if a.variant.is_a() { 1. } else { 0. })
            .collect();
        vec![
            mean(&holds_a),
            mean(&openness),
            covariance(&openness, &holds_a),
        ]
    }
}
