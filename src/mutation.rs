use rand::Rng;
use serde::{Deserialize, Serialize};

/// Inclusive valid range of a numeric gene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParamRange {
    pub min: f64,
    pub max: f64,
}

impl ParamRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// How aggressively numeric genes change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MutationRates {
    /// Probability that the gene changes at all.
    pub mutate_chance: f64,
    /// Probability that a change is a fresh uniform draw rather than a nudge.
    pub replace_chance: f64,
    /// Perturbation standard deviation as a fraction of the range width.
    pub fraction: f64,
}

/// Normally distributed sample with standard deviation `fraction` of the
/// range width (Marsaglia polar form of Box-Muller).
pub fn gaussian_perturbation<R: Rng + ?Sized>(rng: &mut R, range: ParamRange, fraction: f64) -> f64 {
    let std_dev = range.width() * fraction;
    loop {
        let u = 2.0 * rng.r#gen::<f64>() - 1.0;
        let v = 2.0 * rng.r#gen::<f64>() - 1.0;
        let s = u * u + v * v;
        if s > 0.0 && s < 1.0 {
            return u * (-2.0 * s.ln() / s).sqrt() * std_dev;
        }
    }
}

pub fn mutate_float<R: Rng + ?Sized>(
    rng: &mut R,
    value: f64,
    range: ParamRange,
    rates: &MutationRates,
) -> f64 {
    if rng.r#gen::<f64>() < 1.0 - rates.mutate_chance {
        return value;
    }
    let mutated = if rng.r#gen::<f64>() < rates.replace_chance && range.max > range.min {
        rng.gen_range(range.min..range.max)
    } else {
        value + gaussian_perturbation(rng, range, rates.fraction)
    };
    range.clamp(mutated)
}

/// Integer variant: replacement draws from the inclusive range and the
/// perturbation is truncated toward zero.
pub fn mutate_int<R: Rng + ?Sized>(
    rng: &mut R,
    value: i64,
    range: ParamRange,
    rates: &MutationRates,
) -> i64 {
    if rng.r#gen::<f64>() < 1.0 - rates.mutate_chance {
        return value;
    }
    let (min, max) = (range.min as i64, range.max as i64);
    let mutated = if rng.r#gen::<f64>() < rates.replace_chance {
        rng.gen_range(min..=max)
    } else {
        value + gaussian_perturbation(rng, range, rates.fraction) as i64
    };
    mutated.clamp(min, max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const ALWAYS: MutationRates = MutationRates {
        mutate_chance: 1.0,
        replace_chance: 0.05,
        fraction: 0.1,
    };

    #[test]
    fn float_mutation_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(11);
        let range = ParamRange::new(0.51, 1.0);
        let mut value = 0.99;
        for _ in 0..2000 {
            value = mutate_float(&mut rng, value, range, &ALWAYS);
            assert!(range.contains(value), "{value}");
        }
    }

    #[test]
    fn int_mutation_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(12);
        let range = ParamRange::new(3.0, 20.0);
        let rates = MutationRates {
            replace_chance: 0.5,
            fraction: 1.0,
            ..ALWAYS
        };
        let mut value = 3;
        for _ in 0..2000 {
            value = mutate_int(&mut rng, value, range, &rates);
            assert!((3..=20).contains(&value), "{value}");
        }
    }

    #[test]
    fn zero_mutate_chance_never_changes() {
        let mut rng = StdRng::seed_from_u64(13);
        let rates = MutationRates {
            mutate_chance: 0.0,
            ..ALWAYS
        };
        let range = ParamRange::new(0.0, 1.0);
        for _ in 0..100 {
            assert_eq!(mutate_float(&mut rng, 0.3, range, &rates), 0.3);
        }
    }

    #[test]
    fn perturbation_is_centered_and_scaled() {
        let mut rng = StdRng::seed_from_u64(14);
        let range = ParamRange::new(0.0, 10.0);
        let n = 20_000;
        let samples: Vec<f64> = (0..n)
            .map(|_| gaussian_perturbation(&mut rng, range, 0.1))
            .collect();
        let mean = samples.iter().sum::<f64>() / n as f64;
        let var = samples.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n as f64;
        assert!(mean.abs() < 0.05, "{mean}");
        assert!((var.sqrt() - 1.0).abs() < 0.05, "{}", var.sqrt());
    }
}
