/*!
## 7.9 Social network structure

Individuals do not learn from just anyone, but from the people they are
connected to. The population is laid out on a small-world network: a ring in
which everybody is connected to `degree / 2` neighbours on either side, with
each connection rewired to a random individual with probability `rewiring`.
Without rewiring, variants form long local runs; a little rewiring is enough
to make the population behave almost as if it were well mixed.

The network is built once per repetition and does not change.

 */
use crate::error::{check_count, check_probability, ConfigError};
use crate::util::uniform_index;
use crate::{Model, Population, Variant};
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use rand::Rng;
use rustc_hash::FxHashSet;
use serde_derive::{Deserialize, Serialize};
use std::sync::Arc;

pub type SocialNetwork = UnGraph<(), ()>;

/**
Watts–Strogatz small world on `n` nodes. Edges are generated as (i, i + k)
for k in 1..=degree/2, node by node, and each draws one uniform deciding
whether to rewire it, followed by one node index for the new far end. A
rewiring that would create a self-loop or a duplicate edge keeps the old
edge.
 */
pub fn small_world<R: Rng + ?Sized>(n: usize, degree: usize, rewiring: f64, rng: &mut R) -> SocialNetwork {
    let mut edges: Vec<(usize, usize)> = Vec::with_capacity(n * degree / 2);
    let mut present: FxHashSet<(usize, usize)> = FxHashSet::default();
    let key = |a: usize, b: usize| if a < b { (a, b) } else { (b, a) };
    for i in 0..n {
        for k in 1..=(degree / 2) {
            let j = (i + k) % n;
            if present.insert(key(i, j)) {
                edges.push((i, j));
            }
        }
    }
    for e in edges.iter_mut() {
        if rng.gen::<f64>() < rewiring {
            let (i, j) = *e;
            let target = uniform_index(n, rng);
            if target != i && !present.contains(&key(i, target)) {
                present.remove(&key(i, j));
                present.insert(key(i, target));
                *e = (i, target);
            }
        }
    }

    let mut graph = SocialNetwork::with_capacity(n, edges.len());
    for _ in 0..n {
        graph.add_node(());
    }
    for (i, j) in edges {
        graph.add_edge(NodeIndex::new(i), NodeIndex::new(j), ());
    }
    graph
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkTransmission {
    pub initial_frequency: f64,
    /// Number of neighbours in the ring lattice before rewiring. Even.
    pub degree: usize,
    pub rewiring: f64,
    pub mu: f64,
}

impl Default for NetworkTransmission {
    fn default() -> NetworkTransmission {
        NetworkTransmission {
            initial_frequency: 0.5,
            degree: 4,
            rewiring: 0.05,
            mu: 0.,
        }
    }
}

/// Share of edges joining two individuals with the same variant.
pub fn assortment(variants: &[Variant], network: &SocialNetwork) -> f64 {
    let mut equal = 0;
    let mut total = 0;
    for e in network.edge_references() {
        total += 1;
        if variants[e.source().index()] == variants[e.target().index()] {
            equal += 1;
        }
    }
    if total == 0 {
        f64::NAN
    } else {
        equal as f64 / total as f64
    }
}

impl Model for NetworkTransmission {
    type Agent = Variant;
    type Environment = Arc<SocialNetwork>;

    const NAME: &'static str = "network";

    fn statistics(&self) -> Vec<String> {
        vec!["p".to_string(), "assortment".to_string()]
    }

    fn validate(&self, population_size: usize) -> Result<(), ConfigError> {
        check_probability("initial_frequency", self.initial_frequency)?;
        check_count("degree", self.degree, 2)?;
        if self.degree % 2 != 0 {
            return Err(ConfigError::Incompatible {
                parameter: "degree",
                reason: "a ring lattice needs an even degree".to_string(),
            });
        }
        if self.degree >= population_size {
            return Err(ConfigError::Incompatible {
                parameter: "degree",
                reason: format!("must be smaller than the population size {}", population_size),
            });
        }
        check_probability("rewiring", self.rewiring)?;
        check_probability("mu", self.mu)
    }

    /// The network draws come first, then one uniform per agent.
    fn initialize<R: Rng + ?Sized>(
        &self,
        population_size: usize,
        rng: &mut R,
    ) -> Population<Variant, Arc<SocialNetwork>> {
        let network = small_world(population_size, self.degree, self.rewiring, rng);
        let agents = (0..population_size)
            .map(|_| Variant::with_probability_a(self.initial_frequency, rng))
            .collect();
        Population::new(agents, Arc::new(network))
    }

    /// Per agent: one neighbour index, unless isolated, then one uniform
    /// for mutation.
    fn step<R: Rng + ?Sized>(
        &self,
        previous: &Population<Variant, Arc<SocialNetwork>>,
        rng: &mut R,
    ) -> Population<Variant, Arc<SocialNetwork>> {
        let network = &previous.environment;
        let agents = previous
            .agents
            .iter()
            .enumerate()
            .map(|(i, own)| {
                let neighbours: Vec<NodeIndex> = network.neighbors(NodeIndex::new(i)).collect();
                let mut variant = if neighbours.is_empty() {
                    *own
                } else {
                    previous.agents[neighbours[uniform_index(neighbours.len(), rng)].index()]
                };
                if rng.gen::<f64>() < self.mu {
                    variant = variant.other();
                }
                variant
            })
            .collect();
        Population::new(agents, Arc::clone(network))
    }

    fn observe(&self, population: &Population<Variant, Arc<SocialNetwork>>) -> Vec<f64> {
        vec![
            population.share(|v| v.is_a()),
            assortment(&population.agents, &population.environment),
        ]
    }
}
