/*!
Model Description
=================

This crate collects small individual-based models of cultural transmission.
The description follows the ODD (Overview, Design concepts, Details) protocol
(Grimm et al., 2006; Grimm et al., 2010), written as literate documentation
next to the code that implements it.

# 1. Purpose

Each model asks how the distribution of cultural traits in a population
changes when individuals learn from each other under a particular rule:
unbiased copying, copying with mutation, content, frequency or demonstrator
biases, vertical and horizontal transmission, many-trait innovation, the
effect of population size on cumulative skill, the evolution of social versus
individual learning in a changing environment (Rogers' paradox), the social
learning of learning rules themselves, dependencies between traits,
reproduction versus transformation, network structure, and migration between
groups.

The models are deliberately minimal. They share one structure, so they share
one implementation of that structure: a population, a rule turning one
generation into the next, and a driver that repeats this for a number of
generations and independent repetitions while recording summary statistics.

 */

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde_derive::{Deserialize, Serialize};
use tracing::{debug, info, trace};

pub mod analysis;
pub mod argparse;
mod debug;
pub mod error;
pub mod observation;
pub mod parameters;
pub mod submodels;
pub mod util;

pub use error::{AnalysisError, ConfigError, SweepError};
pub use observation::{Runs, SummarySeries};
pub use parameters::RunSettings;

/**
# 2. Entities, state variables, and scales

Time is discrete. One time step is one generation, in which every individual
updates its traits simultaneously: all learning in generation `t + 1` observes
the population of generation `t`, never a partially updated one.

 */
pub type Generation = usize;

/**
## 2.1 Population

The population is an ordered collection of agents together with whatever
state belongs to the population as a whole rather than to any individual: the
current state of a changing environment, a matrix of trait compatibilities, a
social network, or the counter handing out fresh trait labels. What an agent
is depends on the model.

A population is created at the start of a repetition, replaced by its
successor every generation, and dropped at the end of the repetition. Nothing
is shared between repetitions.
 */
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Population<A, E = ()> {
    pub agents: Vec<A>,
    pub environment: E,
}

impl<A, E> Population<A, E> {
    pub fn new(agents: Vec<A>, environment: E) -> Self {
        Population {
            agents,
            environment,
        }
    }

    pub fn size(&self) -> usize {
        self.agents.len()
    }

    /// Share of agents for which `predicate` holds. Frequencies are always
    /// computed like this, never stored.
    pub fn share<F>(&self, predicate: F) -> f64
    where
        F: Fn(&A) -> bool,
    {
        if self.agents.is_empty() {
            return f64::NAN;
        }
        self.agents.iter().filter(|a| predicate(a)).count() as f64 / self.agents.len() as f64
    }
}

/**
## 2.2 Variants

Many of the models are about a single cultural trait with two variants, for
example two ways of making a pot. Following the usual convention, these are
called A and B.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Variant {
    A,
    B,
}

impl Variant {
    pub fn other(self) -> Variant {
        match self {
            Variant::A => Variant::B,
            Variant::B => Variant::A,
        }
    }

    pub fn is_a(self) -> bool {
        self == Variant::A
    }

    /// A with probability `p`, else B. Consumes exactly one uniform draw.
    pub fn with_probability_a<R: Rng + ?Sized>(p: f64, rng: &mut R) -> Variant {
        if rng.gen::<f64>() < p {
            Variant::A
        } else {
            Variant::B
        }
    }
}

/**
# 3. Process overview and scheduling

Every model implements the same capability: it can validate its parameters,
create the initial population, compute the next generation from the previous
one, and summarize a population as a row of named statistics.

The transition `step` borrows the previous generation immutably and returns a
new one, so the rule for any individual can consult the complete previous
generation no matter in which order individuals are processed. Within a step,
random numbers are drawn in agent-index order, following the per-model
contract documented in `submodels`; this is what makes a run reproducible from
its seed.

 */
pub trait Model: Sync {
    type Agent: Clone + Send;
    type Environment: Clone + Send;

    /// Short identifier, used in logs and output files.
    const NAME: &'static str;

    /// Names of the statistics `observe` reports, in order.
    fn statistics(&self) -> Vec<String>;

    /// Reject parameter combinations that cannot be simulated. Called once
    /// per run, before any population exists.
    fn validate(&self, population_size: usize) -> Result<(), ConfigError>;

    fn initialize<R: Rng + ?Sized>(
        &self,
        population_size: usize,
        rng: &mut R,
    ) -> Population<Self::Agent, Self::Environment>;

    fn step<R: Rng + ?Sized>(
        &self,
        previous: &Population<Self::Agent, Self::Environment>,
        rng: &mut R,
    ) -> Population<Self::Agent, Self::Environment>;

    fn observe(&self, population: &Population<Self::Agent, Self::Environment>) -> Vec<f64>;
}

/**
Each repetition draws from its own ChaCha stream, all derived from the run's
seed. The stream depends only on the repetition index, so it does not matter
whether repetitions run one after the other or in parallel.
 */
pub fn repetition_rng(seed: u64, repetition: usize) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(repetition as u64);
    rng
}

/**
One repetition: initialize, then apply the generation step `generations`
times, strictly in order, recording the statistics of every generation
including the initial one.
 */
pub fn repetition<M: Model>(model: &M, settings: &RunSettings, r: usize) -> SummarySeries {
    let mut rng = repetition_rng(settings.seed, r);
    let mut population = model.initialize(settings.population_size, &mut rng);
    let mut series = SummarySeries::with_capacity(model.statistics(), settings.generations + 1);
    series.push(model.observe(&population));
    for t in 1..=settings.generations {
        population = model.step(&population, &mut rng);
        let row = model.observe(&population);
        if (settings.log_every > 0) && (t % settings.log_every == 0) {
            debug!(model = M::NAME, repetition = r, generation = t, ?row);
        }
        series.push(row);
    }
    trace!(model = M::NAME, repetition = r, "repetition finished");
    series
}

/**
The run driver. The whole configuration is checked first; an invalid
configuration produces an error and no simulation work at all. Repetitions
are independent and are only combined into `Runs` once all have completed.
 */
pub fn run<M: Model>(model: &M, settings: &RunSettings) -> Result<Runs, ConfigError> {
    settings.validate()?;
    model.validate(settings.population_size)?;
    info!(
        model = M::NAME,
        population_size = settings.population_size,
        generations = settings.generations,
        repetitions = settings.repetitions,
        seed = settings.seed,
        "starting run"
    );
    let series: Vec<SummarySeries> = if settings.parallel {
        (0..settings.repetitions)
            .into_par_iter()
            .map(|r| repetition(model, settings, r))
            .collect()
    } else {
        (0..settings.repetitions)
            .map(|r| repetition(model, settings, r))
            .collect()
    };
    info!(model = M::NAME, "run finished");
    Ok(Runs::new(M::NAME, model.statistics(), series))
}

/**
# 4. Design concepts

Emergence, adaptation, learning and stochasticity are specific to each model
and are described with the submodels. Common to all is that stochasticity
enters only through the random source handed to `initialize` and `step`; a
model has no other hidden state, and no global parameters: every step reads
its configuration from `self`.

# 5. Initialization, 6. Input data, 7. Submodels

See the `submodels` module. None of the models use external input data.

# 8. Observation

See the `observation` module for the Summary Series, and `analysis` for the
post-processing that turns series into derived quantities such as the
critical population size.
 */
mod concepts {}
