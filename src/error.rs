use thiserror::Error;

/// A configuration that cannot be simulated. Raised by `validate`, before
/// the first random number is drawn.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("parameter `{parameter}` must be a probability in [0, 1], got {value}")]
    InvalidProbability { parameter: &'static str, value: f64 },
    #[error("parameter `{parameter}` must be positive, got {value}")]
    NotPositive { parameter: &'static str, value: f64 },
    #[error("parameter `{parameter}` must not be negative, got {value}")]
    Negative { parameter: &'static str, value: f64 },
    #[error("parameter `{parameter}` must be finite, got {value}")]
    NotFinite { parameter: &'static str, value: f64 },
    #[error("count `{parameter}` is {value}, but must be at least {minimum}")]
    InvalidCount {
        parameter: &'static str,
        value: usize,
        minimum: usize,
    },
    #[error("fitness can drop to {worst_fitness} (w − b − b·{cost_parameter}); fitness must never be negative")]
    NegativeFitness {
        cost_parameter: &'static str,
        worst_fitness: f64,
    },
    #[error("parameter `{parameter}` is incompatible with the rest of the configuration: {reason}")]
    Incompatible {
        parameter: &'static str,
        reason: String,
    },
}

/// Failures of the deterministic post-processing of Summary Series.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("need at least {needed} data points, got {got}")]
    TooFewPoints { needed: usize, got: usize },
    #[error("population size must be at least 1, got {0}")]
    InvalidPopulationSize(usize),
    #[error("no critical threshold found (slope {slope}, intercept {intercept})")]
    NoCriticalThreshold { intercept: f64, slope: f64 },
    #[error("statistic `{0}` is not part of this series")]
    UnknownStatistic(String),
}

/// Anything that can go wrong in a parameter sweep: a bad configuration
/// before simulating, or a degenerate result afterwards.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SweepError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

pub(crate) fn check_probability(parameter: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidProbability { parameter, value })
    }
}

pub(crate) fn check_finite(parameter: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotFinite { parameter, value })
    }
}

pub(crate) fn check_positive(parameter: &'static str, value: f64) -> Result<(), ConfigError> {
    check_finite(parameter, value)?;
    if value > 0. {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { parameter, value })
    }
}

pub(crate) fn check_non_negative(parameter: &'static str, value: f64) -> Result<(), ConfigError> {
    check_finite(parameter, value)?;
    if value >= 0. {
        Ok(())
    } else {
        Err(ConfigError::Negative { parameter, value })
    }
}

pub(crate) fn check_count(
    parameter: &'static str,
    value: usize,
    minimum: usize,
) -> Result<(), ConfigError> {
    if value >= minimum {
        Ok(())
    } else {
        Err(ConfigError::InvalidCount {
            parameter,
            value,
            minimum,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probability_bounds_are_inclusive() {
        assert!(check_probability("mu", 0.).is_ok());
        assert!(check_probability("mu", 1.).is_ok());
        assert_eq!(
            check_probability("mu", 1.5),
            Err(ConfigError::InvalidProbability {
                parameter: "mu",
                value: 1.5
            })
        );
        assert!(check_probability("mu", f64::NAN).is_err());
    }

    #[test]
    fn the_offending_parameter_is_named() {
        let e = check_positive("beta", 0.).unwrap_err();
        assert!(e.to_string().contains("`beta`"));
    }
}
