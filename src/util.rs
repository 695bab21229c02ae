use rand::Rng;

pub fn smaller_of_two<T: PartialOrd>(a: T, b: T) -> T {
    if a < b {
        a
    } else {
        b
    }
}

pub fn greater_of_two<T: PartialOrd>(a: T, b: T) -> T {
    if b < a {
        a
    } else {
        b
    }
}

/**
Clamp a continuous trait into its declared range [0, 1]. NaN ends up at the
lower bound.

```rust
# use model::util::clamp_to_unit;
assert_eq!(clamp_to_unit(1.3), 1.0);
assert_eq!(clamp_to_unit(-0.2), 0.0);
assert_eq!(clamp_to_unit(0.25), 0.25);
```
 */
pub fn clamp_to_unit(x: f64) -> f64 {
    smaller_of_two(greater_of_two(x, 0.), 1.)
}

pub fn logistic(x: f64) -> f64 {
    1. / (1. + (-x).exp())
}

/// Index of a uniformly chosen member of a population of size `n`.
pub fn uniform_index<R: Rng + ?Sized>(n: usize, rng: &mut R) -> usize {
    rng.gen_range(0..n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logistic_is_symmetric_around_one_half() {
        assert_eq!(logistic(0.), 0.5);
        assert!((logistic(2.) + logistic(-2.) - 1.).abs() < 1e-12);
        assert!(logistic(40.) > 0.999_999);
    }

    #[test]
    fn nan_is_clamped_to_zero() {
        assert_eq!(clamp_to_unit(f64::NAN), 0.);
    }
}
