/*!
# 7. Submodels

Each submodel is one transition rule, implementing `crate::Model`. The
parameters of a submodel are a plain serializable struct whose `Default` gives
reference values, so a JSON file only needs to list what differs.

The random-draw contract shared by all rules: within a generation, agents are
processed in index order, and each agent consumes its draws in the order listed
in the documentation of the rule's `step`. Draws that belong to the population
as a whole (a change of the environment, for instance) come before the first
agent.

 */
pub mod attraction;
pub mod binary;
pub mod demography;
pub mod interdependence;
pub mod migration;
pub mod multiple;
pub mod network;
pub mod openness;
pub mod rogers;
pub mod vertical;

pub use attraction::Attraction;
pub use binary::BinaryTransmission;
pub use demography::Demography;
pub use interdependence::Interdependence;
pub use migration::Migration;
pub use multiple::MultipleTraits;
pub use network::NetworkTransmission;
pub use openness::Openness;
pub use rogers::Rogers;
pub use vertical::VerticalHorizontal;
