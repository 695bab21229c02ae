/*!
## 7.5 Rogers' paradox

Individuals either learn individually, paying a cost to find out what the
environment currently demands, or socially, cheaply copying the behaviour of
someone from the previous generation. Behaviour that matches the environment
earns a bonus, behaviour that does not a penalty. The environment
occasionally changes to a state that has never occurred before, making all
existing behaviour outdated.

Social learners free-ride on individual learners, and do better than them
while rare. Rogers (1988) showed that at the resulting equilibrium the mean
fitness of the population is no higher than that of a population of
individual learners only, as long as the environment changes at all. Allowing
a third strategy, critical social learners who copy first and only learn
individually when the copied behaviour turns out to be wrong, resolves the
paradox.

 */
use crate::error::{check_non_negative, check_probability, ConfigError};
use crate::util::uniform_index;
use crate::{Model, Population};
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use serde_derive::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strategy {
    Individual,
    Social,
    CriticalSocial,
}

impl Strategy {
    const ALL: [Strategy; 3] = [
        Strategy::Individual,
        Strategy::Social,
        Strategy::CriticalSocial,
    ];

    fn index(self) -> usize {
        match self {
            Strategy::Individual => 0,
            Strategy::Social => 1,
            Strategy::CriticalSocial => 2,
        }
    }
}

/// The environment's current state. Every change yields a state never seen
/// before, so it simply counts up.
pub type EnvironmentState = i64;

#[derive(Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Learner {
    pub strategy: Strategy,
    /// `None` until something has been learned; never matches the
    /// environment.
    pub behaviour: Option<EnvironmentState>,
    pub fitness: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rogers {
    /// Baseline fitness w.
    pub w: f64,
    /// Bonus (or penalty) b for matching (or missing) the environment.
    pub b: f64,
    /// Cost of individual learning, as a multiple of b.
    pub c: f64,
    /// Cost of social learning, as a multiple of b.
    pub s: f64,
    /// Probability that an offspring switches strategy.
    pub mu: f64,
    /// Probability that individual learning finds the current state.
    pub p: f64,
    /// Probability that the environment changes in a generation.
    pub u: f64,
    /// Allow critical social learners.
    pub critical_learners: bool,
}

impl Default for Rogers {
    fn default() -> Rogers {
        Rogers {
            w: 1.,
            b: 0.5,
            c: 0.9,
            s: 0.,
            mu: 0.001,
            p: 0.5,
            u: 0.2,
            critical_learners: false,
        }
    }
}

impl Rogers {
    /// Expected fitness of an individual learner, `w + b (2p − c − 1)`,
    /// which is also the mean fitness of a population of individual
    /// learners.
    pub fn individual_learner_fitness(&self) -> f64 {
        self.w + self.b * (2. * self.p - self.c - 1.)
    }

    fn enabled(&self) -> &'static [Strategy] {
        if self.critical_learners {
            &Strategy::ALL
        } else {
            &Strategy::ALL[..2]
        }
    }

    fn fitness(&self, behaviour: Option<EnvironmentState>, environment: EnvironmentState, cost: f64) -> f64 {
        let payoff = if behaviour == Some(environment) {
            self.w + self.b
        } else {
            self.w - self.b
        };
        payoff - self.b * cost
    }

    /// One uniform draw.
    fn learn_individually<R: Rng + ?Sized>(&self, environment: EnvironmentState, rng: &mut R) -> EnvironmentState {
        if rng.gen::<f64>() < self.p {
            environment
        } else {
            environment - 1
        }
    }

    /// One uniform draw, and one index draw among the other strategies if
    /// three are enabled.
    fn mutate<R: Rng + ?Sized>(&self, strategy: Strategy, rng: &mut R) -> Strategy {
        if rng.gen::<f64>() >= self.mu {
            return strategy;
        }
        let others: Vec<Strategy> = self
            .enabled()
            .iter()
            .copied()
            .filter(|s| *s != strategy)
            .collect();
        if others.len() == 1 {
            others[0]
        } else {
            others[uniform_index(others.len(), rng)]
        }
    }
}

impl Model for Rogers {
    type Agent = Learner;
    type Environment = EnvironmentState;

    const NAME: &'static str = "rogers";

    fn statistics(&self) -> Vec<String> {
        vec![
            "mean_fitness".to_string(),
            "social".to_string(),
            "critical_social".to_string(),
            "correct".to_string(),
        ]
    }

    fn validate(&self, _population_size: usize) -> Result<(), ConfigError> {
        check_non_negative("w", self.w)?;
        check_non_negative("b", self.b)?;
        check_non_negative("c", self.c)?;
        check_non_negative("s", self.s)?;
        check_probability("mu", self.mu)?;
        check_probability("p", self.p)?;
        check_probability("u", self.u)?;
        let (cost_parameter, worst_cost) = if self.critical_learners {
            ("c + s", self.c + self.s)
        } else if self.s > self.c {
            ("s", self.s)
        } else {
            ("c", self.c)
        };
        let worst_fitness = self.w - self.b - self.b * worst_cost;
        if worst_fitness >= 0. {
            Ok(())
        } else {
            Err(ConfigError::NegativeFitness {
                cost_parameter,
                worst_fitness,
            })
        }
    }

    /// Everyone starts as an individual learner in environment state 0. Per
    /// agent: one uniform for learning.
    fn initialize<R: Rng + ?Sized>(
        &self,
        population_size: usize,
        rng: &mut R,
    ) -> Population<Learner, EnvironmentState> {
        let environment = 0;
        let agents = (0..population_size)
            .map(|_| {
                let behaviour = Some(self.learn_individually(environment, rng));
                Learner {
                    strategy: Strategy::Individual,
                    behaviour,
                    fitness: self.fitness(behaviour, environment, self.c),
                }
            })
            .collect();
        Population::new(agents, environment)
    }

    /**
    First, one uniform decides whether the environment changes. Then, per
    agent: one weighted draw inheriting a strategy in proportion to the total
    fitness of each strategy in the previous generation, the mutation draws,
    and the learning draws: one uniform for individual learners, one
    demonstrator index for social learners, and for critical social learners
    a demonstrator index followed, if the copied behaviour is wrong, by one
    uniform.
     */
    fn step<R: Rng + ?Sized>(
        &self,
        previous: &Population<Learner, EnvironmentState>,
        rng: &mut R,
    ) -> Population<Learner, EnvironmentState> {
        let mut totals = [0.; 3];
        for a in previous.agents.iter() {
            totals[a.strategy.index()] += a.fitness;
        }
        let inheritance = WeightedIndex::new(&totals).ok();

        let mut environment = previous.environment;
        if rng.gen::<f64>() < self.u {
            environment += 1;
        }

        let n = previous.size();
        let agents = previous
            .agents
            .iter()
            .map(|parent| {
                let inherited = match &inheritance {
                    Some(w) => Strategy::ALL[w.sample(rng)],
                    None => parent.strategy,
                };
                let strategy = self.mutate(inherited, rng);
                let (behaviour, cost) = match strategy {
                    Strategy::Individual => {
                        (Some(self.learn_individually(environment, rng)), self.c)
                    }
                    Strategy::Social => (previous.agents[uniform_index(n, rng)].behaviour, self.s),
                    Strategy::CriticalSocial => {
                        let copied = previous.agents[uniform_index(n, rng)].behaviour;
                        if copied == Some(environment) {
                            (copied, self.s)
                        } else {
                            (
                                Some(self.learn_individually(environment, rng)),
                                self.s + self.c,
                            )
                        }
                    }
                };
                Learner {
                    strategy,
                    behaviour,
                    fitness: self.fitness(behaviour, environment, cost),
                }
            })
            .collect();
        Population::new(agents, environment)
    }

    fn observe(&self, population: &Population<Learner, EnvironmentState>) -> Vec<f64> {
        let n = population.size() as f64;
        let mean_fitness = population.agents.iter().map(|a| a.fitness).sum::<f64>() / n;
        let environment = population.environment;
        vec![
            mean_fitness,
            population.share(|a| a.strategy == Strategy::Social),
            population.share(|a| a.strategy == Strategy::CriticalSocial),
            population.share(|a| a.behaviour == Some(environment)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{analysis, run, RunSettings};

    #[test]
    fn costs_that_allow_negative_fitness_are_rejected() {
        let model = Rogers {
            w: 1.,
            b: 0.5,
            c: 1.2,
            ..Rogers::default()
        };
        match model.validate(100) {
            Err(ConfigError::NegativeFitness { cost_parameter, .. }) => {
                assert_eq!(cost_parameter, "c")
            }
            other => panic!("expected a fitness error, got {:?}", other),
        }
    }

    #[test]
    fn zero_worst_case_fitness_is_allowed() {
        let model = Rogers {
            w: 1.,
            b: 0.5,
            c: 1.,
            s: 0.,
            ..Rogers::default()
        };
        assert_eq!(model.validate(100), Ok(()));
        let model = Rogers { c: 1.01, ..model };
        match model.validate(100) {
            Err(ConfigError::NegativeFitness { worst_fitness, .. }) => assert!(worst_fitness < 0.),
            other => panic!("expected a fitness error, got {:?}", other),
        }
    }

    #[test]
    fn critical_learners_pay_both_costs_in_the_worst_case() {
        let model = Rogers {
            c: 0.9,
            s: 0.2,
            critical_learners: true,
            ..Rogers::default()
        };
        assert!(model.validate(100).is_err());
        let model = Rogers {
            critical_learners: false,
            ..model
        };
        assert!(model.validate(100).is_ok());
    }

    #[test]
    fn initial_population_learns_individually() {
        let model = Rogers::default();
        let population = model.initialize(1000, &mut crate::repetition_rng(0, 0));
        let row = model.observe(&population);
        assert_eq!(row[1], 0.);
        assert!((row[0] - model.individual_learner_fitness()).abs() < 0.05);
    }

    #[test]
    fn critical_social_learners_beat_individual_learners() {
        let model = Rogers {
            mu: 0.01,
            u: 0.2,
            critical_learners: true,
            ..Rogers::default()
        };
        let settings = RunSettings {
            population_size: 500,
            generations: 300,
            repetitions: 3,
            seed: 21,
            parallel: true,
            log_every: 0,
        };
        let runs = run(&model, &settings).unwrap();
        for series in runs.repetitions.iter() {
            let fitness = series.column("mean_fitness").unwrap();
            let critical = series.column("critical_social").unwrap();
            assert!(analysis::mean(&fitness[150..]) > model.individual_learner_fitness() + 0.2);
            assert!(analysis::mean(&critical[150..]) > 0.5);
        }
    }
}
