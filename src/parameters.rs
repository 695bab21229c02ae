use crate::error::{check_count, ConfigError};
use crate::Generation;
use serde::de::DeserializeOwned;
use serde_derive::{Deserialize, Serialize};
use std::fs;

/**
The model-independent part of a simulation run: how many agents, for how long,
how often, and from which seed. Model-specific parameters live next to their
submodel.
 */
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct RunSettings {
    pub population_size: usize,
    pub generations: Generation,
    pub repetitions: usize,
    /// All repetitions derive their random streams from this one seed.
    pub seed: u64,
    /// Run repetitions on the rayon thread pool. Results are identical
    /// either way.
    pub parallel: bool,
    /// Period, in generations, of progress logging. 0 switches it off.
    pub log_every: usize,
}

impl Default for RunSettings {
    fn default() -> RunSettings {
        RunSettings {
            population_size: 100,
            generations: 200,
            repetitions: 5,
            seed: 0,
            parallel: true,
            log_every: 0,
        }
    }
}

impl RunSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_count("population_size", self.population_size, 1)?;
        check_count("generations", self.generations, 1)?;
        check_count("repetitions", self.repetitions, 1)?;
        Ok(())
    }
}

/**
Read model parameters from a JSON file. Fields missing from the file keep
their default values; an empty file name means all defaults.
 */
pub fn load_parameters<P: DeserializeOwned + Default>(filename: &str) -> Result<P, String> {
    if filename.is_empty() {
        return Ok(P::default());
    }
    let contents = match fs::read_to_string(filename) {
        Ok(c) => c,
        Err(e) => return Err(format!("Could not read {}: {}", filename, e)),
    };
    match serde_json::from_str(&contents) {
        Ok(p) => Ok(p),
        Err(e) => Err(format!("Could not parse {}: {}", filename, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_population_is_rejected() {
        let settings = RunSettings {
            population_size: 0,
            ..RunSettings::default()
        };
        assert_eq!(
            settings.validate(),
            Err(ConfigError::InvalidCount {
                parameter: "population_size",
                value: 0,
                minimum: 1
            })
        );
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let settings: RunSettings =
            serde_json::from_str(r#"{"population_size": 42, "seed": 7}"#).unwrap();
        assert_eq!(settings.population_size, 42);
        assert_eq!(settings.seed, 7);
        assert_eq!(settings.generations, RunSettings::default().generations);
    }

    #[test]
    fn no_parameter_file_means_defaults() {
        let settings: RunSettings = load_parameters("").unwrap();
        assert_eq!(settings, RunSettings::default());
        assert!(load_parameters::<RunSettings>("/nonexistent/parameters.json").is_err());
    }
}
