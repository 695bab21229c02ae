/*!
## 7.4 Demography and cumulative skill

Every individual tries to imitate the most skilled member of the previous
generation. Imitation is imperfect: a learner's skill is drawn from a Gumbel
distribution whose location lies a penalty α below the model's skill, with
scale β. Most learners end up worse than their model, but a few, by luck,
surpass it. Whether skill accumulates or decays depends on how many learners
there are to be lucky: with Gumbel noise, the maximum of N draws lies β·ln N
above the location, so the expected change of mean skill per generation is

```text
Δz̄ = −α + β (γ + ln N)
```

with γ the Euler–Mascheroni constant. Below the critical population size N*
where this is zero, skill is lost.

 */
use crate::analysis::mean_delta_of;
use crate::error::{check_finite, check_non_negative, check_positive, ConfigError, SweepError};
use crate::util::greater_of_two;
use crate::{analysis, run, Model, Population, RunSettings, Runs};
use rand::Rng;
use rand_distr::{Distribution, Gumbel};
use serde_derive::{Deserialize, Serialize};
use tracing::info;

pub const EULER_MASCHERONI: f64 = 0.577_215_664_901_532_9;

pub type Skill = f64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Demography {
    /// Imitation penalty α: how far below the model the typical learner
    /// lands.
    pub alpha: f64,
    /// Imitation noise β, the scale of the Gumbel distribution.
    pub beta: f64,
    pub initial_skill: Skill,
}

impl Default for Demography {
    fn default() -> Demography {
        Demography {
            alpha: 7.,
            beta: 1.,
            initial_skill: 0.,
        }
    }
}

impl Demography {
    /**
    Expected per-generation change of mean skill at population size `n`.

    ```rust
    # use model::submodels::Demography;
    let d = Demography { alpha: 7., beta: 1., initial_skill: 0. };
    assert!(d.expected_delta(10) < 0.);
    assert!(d.expected_delta(10_000) > 0.);
    ```
     */
    pub fn expected_delta(&self, n: usize) -> f64 {
        -self.alpha + self.beta * (EULER_MASCHERONI + (n as f64).ln())
    }

    /// The population size at which `expected_delta` vanishes.
    pub fn expected_critical_size(&self) -> f64 {
        (self.alpha / self.beta - EULER_MASCHERONI).exp()
    }
}

impl Model for Demography {
    type Agent = Skill;
    type Environment = ();

    const NAME: &'static str = "demography";

    fn statistics(&self) -> Vec<String> {
        vec!["mean_skill".to_string(), "max_skill".to_string()]
    }

    fn validate(&self, _population_size: usize) -> Result<(), ConfigError> {
        check_non_negative("alpha", self.alpha)?;
        check_positive("beta", self.beta)?;
        check_finite("initial_skill", self.initial_skill)
    }

    fn initialize<R: Rng + ?Sized>(&self, population_size: usize, _rng: &mut R) -> Population<Skill> {
        Population::new(vec![self.initial_skill; population_size], ())
    }

    /// Per agent: one Gumbel variate.
    fn step<R: Rng + ?Sized>(&self, previous: &Population<Skill>, rng: &mut R) -> Population<Skill> {
        let model_skill = previous
            .agents
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, greater_of_two);
        let location = model_skill - self.alpha;
        let agents = match Gumbel::new(location, self.beta) {
            Ok(imitation) => (0..previous.size()).map(|_| imitation.sample(rng)).collect(),
            Err(_) => vec![location; previous.size()],
        };
        Population::new(agents, ())
    }

    fn observe(&self, population: &Population<Skill>) -> Vec<f64> {
        let max = population
            .agents
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, greater_of_two);
        vec![analysis::mean(&population.agents), max]
    }
}

/// Mean per-generation change of mean skill, averaged over repetitions. The
/// first `burn_in` generations are skipped: starting from a uniform
/// population, the first generation has not yet profited from a lucky
/// maximum.
pub fn mean_skill_delta(runs: &Runs, burn_in: usize) -> Result<f64, SweepError> {
    let deltas = runs
        .repetitions
        .iter()
        .map(|s| mean_delta_of(s, "mean_skill", burn_in))
        .collect::<Result<Vec<f64>, _>>()?;
    Ok(analysis::mean(&deltas))
}

/// Result of sweeping the demography model over population sizes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriticalSize {
    /// (population size, mean per-generation change of mean skill)
    pub deltas: Vec<(usize, f64)>,
    pub critical_size: f64,
}

/**
Run the model once per population size in `sizes` (all other settings
shared), and estimate the critical population size from the log-linear
relationship between population size and skill change.
 */
pub fn estimate_critical_size(
    model: &Demography,
    sizes: &[usize],
    settings: &RunSettings,
    burn_in: usize,
) -> Result<CriticalSize, SweepError> {
    let mut deltas = Vec::with_capacity(sizes.len());
    for &n in sizes {
        let s = RunSettings {
            population_size: n,
            ..settings.clone()
        };
        let runs = run(model, &s)?;
        let delta = mean_skill_delta(&runs, burn_in)?;
        info!(population_size = n, delta, "mean skill change");
        deltas.push((n, delta));
    }
    let critical_size = analysis::critical_population_size(&deltas)?;
    Ok(CriticalSize {
        deltas,
        critical_size,
    })
}
