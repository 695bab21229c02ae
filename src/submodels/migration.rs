/*!
## 7.10 Groups and migration

The population is split into demes, and individuals mostly learn from
members of their own deme. With probability `migration` the demonstrator is
instead drawn from the whole population, standing in for migrants carrying
their variants between demes. Demes start out maximally different, with A in
the even-numbered and B in the odd-numbered demes. Unbiased copying lets a
little migration erase these differences; conformist copying preserves them
against considerable migration.

Agent i belongs to deme `i mod groups`.

 */
use crate::analysis::variance;
use crate::error::{check_count, check_probability, ConfigError};
use crate::util::uniform_index;
use crate::{Model, Population, Variant};
use rand::Rng;
use serde_derive::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Migration {
    pub groups: usize,
    pub migration: f64,
    /// Probability of adopting the majority of `demonstrators` observed
    /// individuals instead of copying a single one.
    pub conformity: f64,
    pub demonstrators: usize,
}

impl Default for Migration {
    fn default() -> Migration {
        Migration {
            groups: 4,
            migration: 0.1,
            conformity: 0.,
            demonstrators: 3,
        }
    }
}

impl Migration {
    pub fn deme(&self, i: usize) -> usize {
        i % self.groups
    }

    fn deme_size(&self, deme: usize, population_size: usize) -> usize {
        (population_size - deme + self.groups - 1) / self.groups
    }

    /// One index draw, from the deme's members or from everybody.
    fn demonstrator<R: Rng + ?Sized>(&self, deme: Option<usize>, n: usize, rng: &mut R) -> usize {
        match deme {
            Some(g) => g + self.groups * uniform_index(self.deme_size(g, n), rng),
            None => uniform_index(n, rng),
        }
    }

    /// Frequency of A in every deme.
    pub fn deme_frequencies(&self, agents: &[Variant]) -> Vec<f64> {
        let mut a = vec![0usize; self.groups];
        let mut total = vec![0usize; self.groups];
        for (i, v) in agents.iter().enumerate() {
            total[self.deme(i)] += 1;
            if v.is_a() {
                a[self.deme(i)] += 1;
            }
        }
        a.iter()
            .zip(total.iter())
            .map(|(&a, &t)| a as f64 / t as f64)
            .collect()
    }
}

impl Model for Migration {
    type Agent = Variant;
    type Environment = ();

    const NAME: &'static str = "migration";

    fn statistics(&self) -> Vec<String> {
        vec!["p".to_string(), "between_group_variance".to_string()]
    }

    fn validate(&self, population_size: usize) -> Result<(), ConfigError> {
        check_count("groups", self.groups, 1)?;
        if self.groups > population_size {
            return Err(ConfigError::Incompatible {
                parameter: "groups",
                reason: format!("more demes than the {} individuals", population_size),
            });
        }
        check_probability("migration", self.migration)?;
        check_probability("conformity", self.conformity)?;
        check_count("demonstrators", self.demonstrators, 3)?;
        if self.demonstrators % 2 == 0 {
            return Err(ConfigError::Incompatible {
                parameter: "demonstrators",
                reason: "an even number of demonstrators can tie".to_string(),
            });
        }
        Ok(())
    }

    fn initialize<R: Rng + ?Sized>(&self, population_size: usize, _rng: &mut R) -> Population<Variant> {
        let agents = (0..population_size)
            .map(|i| {
                if self.deme(i) % 2 == 0 {
                    Variant::A
                } else {
                    Variant::B
                }
            })
            .collect();
        Population::new(agents, ())
    }

    /**
    Per agent: one uniform deciding whether the demonstrators come from the
    whole population, one uniform deciding conformist copying, then one
    demonstrator index, or `demonstrators` of them when conforming.
     */
    fn step<R: Rng + ?Sized>(&self, previous: &Population<Variant>, rng: &mut R) -> Population<Variant> {
        let n = previous.size();
        let agents = (0..n)
            .map(|i| {
                let pool = if rng.gen::<f64>() < self.migration {
                    None
                } else {
                    Some(self.deme(i))
                };
                if rng.gen::<f64>() < self.conformity {
                    let a = (0..self.demonstrators)
                        .filter(|_| previous.agents[self.demonstrator(pool, n, rng)].is_a())
                        .count();
                    if 2 * a > self.demonstrators {
                        Variant::A
                    } else {
                        Variant::B
                    }
                } else {
                    previous.agents[self.demonstrator(pool, n, rng)]
                }
            })
            .collect();
        Population::new(agents, ())
    }

    fn observe(&self, population: &Population<Variant>) -> Vec<f64> {
        vec![
            population.share(|v| v.is_a()),
            variance(&self.deme_frequencies(&population.agents)),
        ]
    }
}
