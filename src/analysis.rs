/*!
Post-processing of Summary Series. Everything here is deterministic: sums are
taken sequentially in input order, so the same series always give the same
bits.
 */
use crate::error::AnalysisError;
use crate::observation::SummarySeries;

/// Slopes smaller than this in absolute value do not define a root.
pub const MINIMUM_SLOPE: f64 = 1e-12;

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population variance (divisor n).
pub fn variance(values: &[f64]) -> f64 {
    covariance(values, values)
}

/// Population covariance (divisor n) of two equally long samples.
pub fn covariance(xs: &[f64], ys: &[f64]) -> f64 {
    assert_eq!(xs.len(), ys.len());
    let mx = mean(xs);
    let my = mean(ys);
    xs.iter()
        .zip(ys.iter())
        .map(|(x, y)| (x - mx) * (y - my))
        .sum::<f64>()
        / xs.len() as f64
}

/// Mean first difference of a time series, ie. the average change per
/// generation.
pub fn mean_delta(values: &[f64]) -> Result<f64, AnalysisError> {
    if values.len() < 2 {
        return Err(AnalysisError::TooFewPoints {
            needed: 2,
            got: values.len(),
        });
    }
    let deltas: Vec<f64> = values.windows(2).map(|w| w[1] - w[0]).collect();
    Ok(mean(&deltas))
}

/// Mean per-generation change of `statistic`, skipping the first `burn_in`
/// generations.
pub fn mean_delta_of(
    series: &SummarySeries,
    statistic: &str,
    burn_in: usize,
) -> Result<f64, AnalysisError> {
    let column = series.column(statistic)?;
    mean_delta(column.get(burn_in..).unwrap_or(&[]))
}

/// Ordinary least squares fit `y = intercept + slope · x`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub intercept: f64,
    pub slope: f64,
}

pub fn linear_regression(points: &[(f64, f64)]) -> Result<LinearFit, AnalysisError> {
    if points.len() < 2 {
        return Err(AnalysisError::TooFewPoints {
            needed: 2,
            got: points.len(),
        });
    }
    let xs: Vec<f64> = points.iter().map(|(x, _)| *x).collect();
    let ys: Vec<f64> = points.iter().map(|(_, y)| *y).collect();
    let var_x = variance(&xs);
    let slope = if var_x > 0. {
        covariance(&xs, &ys) / var_x
    } else {
        // All x equal: no line through the points is better than another.
        0.
    };
    let intercept = mean(&ys) - slope * mean(&xs);
    Ok(LinearFit { intercept, slope })
}

/**
Critical population size from (population size, mean per-generation delta)
pairs: fit `delta = intercept + slope · ln N` and solve for `delta = 0`.

```rust
# use model::analysis::critical_population_size;
let points: Vec<(usize, f64)> = [10, 100, 1000]
    .iter()
    .map(|&n| (n, 2.0 - 0.5 * (n as f64).ln()))
    .collect();
let n_star = critical_population_size(&points).unwrap();
assert!((n_star - 4.0_f64.exp()).abs() < 1e-9);
```
 */
pub fn critical_population_size(points: &[(usize, f64)]) -> Result<f64, AnalysisError> {
    let mut log_points = Vec::with_capacity(points.len());
    for (n, delta) in points {
        if *n == 0 {
            return Err(AnalysisError::InvalidPopulationSize(*n));
        }
        log_points.push(((*n as f64).ln(), *delta));
    }
    let fit = linear_regression(&log_points)?;
    let degenerate = AnalysisError::NoCriticalThreshold {
        intercept: fit.intercept,
        slope: fit.slope,
    };
    if !fit.slope.is_finite() || fit.slope.abs() < MINIMUM_SLOPE {
        return Err(degenerate);
    }
    let n_star = (-fit.intercept / fit.slope).exp();
    if n_star.is_finite() && n_star > 0. {
        Ok(n_star)
    } else {
        Err(degenerate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn recovers_a_known_line() {
        let fit = linear_regression(&[(0., 1.), (1., 3.), (2., 5.)]).unwrap();
        assert_abs_diff_eq!(fit.intercept, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(fit.slope, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn critical_size_from_synthetic_log_linear_data() {
        let points: Vec<(usize, f64)> = [5, 20, 50, 200, 1000, 5000]
            .iter()
            .map(|&n| (n, 2.0 + -0.5 * (n as f64).ln()))
            .collect();
        let n_star = critical_population_size(&points).unwrap();
        assert_abs_diff_eq!(n_star, 54.598_150_033_144_236, epsilon = 1e-8);
    }

    #[test]
    fn critical_size_is_bit_reproducible() {
        let points = vec![(10, -1.3), (100, 0.2), (1000, 1.9), (10000, 3.1)];
        let a = critical_population_size(&points).unwrap();
        let b = critical_population_size(&points).unwrap();
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn flat_relationship_has_no_threshold() {
        let points = vec![(10, 0.3), (100, 0.3), (1000, 0.3)];
        match critical_population_size(&points) {
            Err(AnalysisError::NoCriticalThreshold { .. }) => {}
            other => panic!("expected no threshold, got {:?}", other),
        }
    }

    #[test]
    fn a_single_population_size_has_no_threshold() {
        let points = vec![(50, 0.3), (50, -0.1)];
        assert!(matches!(
            critical_population_size(&points),
            Err(AnalysisError::NoCriticalThreshold { .. })
        ));
    }

    #[test]
    fn empty_population_is_rejected() {
        assert_eq!(
            critical_population_size(&[(0, 1.), (10, 2.)]),
            Err(AnalysisError::InvalidPopulationSize(0))
        );
    }

    #[test]
    fn deltas() {
        assert_eq!(mean_delta(&[1., 2., 4.]).unwrap(), 1.5);
        assert!(mean_delta(&[1.]).is_err());
        assert_abs_diff_eq!(covariance(&[1., 2., 3.], &[2., 4., 6.]), 4. / 3., epsilon = 1e-12);
    }
}
