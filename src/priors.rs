/*!
Stock prior distributions for building model parameters.

Each prior implements [`Parameter`] and can be constructed either as a scalar
or as a vector of iid components. The priors double as proposal kernels: the
jump proposals resample a parameter by calling its `sample` and weigh the move
with its `log_pdf`.

# Examples

```rust
use rand::rngs::SmallRng;
use rand::SeedableRng;
use pta_jumps::model::Parameter;
use pta_jumps::priors::UniformPrior;

let prior = UniformPrior::new("rn_gamma", 0.0, 7.0);
let mut rng = SmallRng::seed_from_u64(42);
let value = prior.sample(&mut rng);
assert!(value[0] >= 0.0 && value[0] < 7.0);
assert!((prior.log_pdf(&value) + 7.0f64.ln()).abs() < 1e-12);
```
*/

use rand::{Rng, RngCore};
use rand_distr::{Distribution, Normal};

use crate::model::{ParamKind, Parameter};

/// A flat prior on the closed interval `[low, high]`.
#[derive(Debug, Clone)]
pub struct UniformPrior {
    name: String,
    low: f64,
    high: f64,
    kind: ParamKind,
}

impl UniformPrior {
    /// Creates a scalar uniform prior on `[low, high]`.
    pub fn new(name: impl Into<String>, low: f64, high: f64) -> Self {
        assert!(low < high, "expected low < high, got [{low}, {high}]");
        Self {
            name: name.into(),
            low,
            high,
            kind: ParamKind::Scalar,
        }
    }

    /// Creates a vector prior of `size` iid uniform components.
    pub fn vector(name: impl Into<String>, low: f64, high: f64, size: usize) -> Self {
        assert!(low < high, "expected low < high, got [{low}, {high}]");
        assert!(size >= 1, "vector parameter needs at least one component");
        Self {
            name: name.into(),
            low,
            high,
            kind: ParamKind::Vector(size),
        }
    }
}

impl Parameter for UniformPrior {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ParamKind {
        self.kind
    }

    fn sample(&self, rng: &mut dyn RngCore) -> Vec<f64> {
        (0..self.dim())
            .map(|_| rng.gen_range(self.low..self.high))
            .collect()
    }

    fn log_pdf(&self, value: &[f64]) -> f64 {
        let per_component = -(self.high - self.low).ln();
        value
            .iter()
            .map(|&v| {
                if v < self.low || v > self.high {
                    f64::NEG_INFINITY
                } else {
                    per_component
                }
            })
            .sum()
    }
}

/// A Gaussian prior with the given mean and standard deviation.
#[derive(Debug, Clone)]
pub struct NormalPrior {
    name: String,
    mean: f64,
    std: f64,
    kind: ParamKind,
}

impl NormalPrior {
    /// Creates a scalar Gaussian prior.
    pub fn new(name: impl Into<String>, mean: f64, std: f64) -> Self {
        assert!(std > 0.0, "expected a positive standard deviation");
        Self {
            name: name.into(),
            mean,
            std,
            kind: ParamKind::Scalar,
        }
    }

    /// Creates a vector prior of `size` iid Gaussian components.
    pub fn vector(name: impl Into<String>, mean: f64, std: f64, size: usize) -> Self {
        assert!(std > 0.0, "expected a positive standard deviation");
        assert!(size >= 1, "vector parameter needs at least one component");
        Self {
            name: name.into(),
            mean,
            std,
            kind: ParamKind::Vector(size),
        }
    }
}

impl Parameter for NormalPrior {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ParamKind {
        self.kind
    }

    fn sample(&self, rng: &mut dyn RngCore) -> Vec<f64> {
        let normal = Normal::new(self.mean, self.std)
            .expect("Expecting creation of normal distribution to succeed.");
        (0..self.dim()).map(|_| normal.sample(&mut *rng)).collect()
    }

    fn log_pdf(&self, value: &[f64]) -> f64 {
        let per_component_norm =
            -self.std.ln() - 0.5 * (2.0 * std::f64::consts::PI).ln();
        value
            .iter()
            .map(|&v| {
                let z = (v - self.mean) / self.std;
                per_component_norm - 0.5 * z * z
            })
            .sum()
    }
}

/// A reciprocal (log-uniform) prior on `[low, high]` with `low > 0`.
///
/// The density is proportional to `1/v`, i.e. uniform in `ln v`; the usual
/// scale prior for strictly positive amplitudes.
#[derive(Debug, Clone)]
pub struct LogUniformPrior {
    name: String,
    low: f64,
    high: f64,
    kind: ParamKind,
}

impl LogUniformPrior {
    /// Creates a scalar log-uniform prior on `[low, high]`.
    pub fn new(name: impl Into<String>, low: f64, high: f64) -> Self {
        assert!(
            low > 0.0 && low < high,
            "expected 0 < low < high, got [{low}, {high}]"
        );
        Self {
            name: name.into(),
            low,
            high,
            kind: ParamKind::Scalar,
        }
    }

    /// Creates a vector prior of `size` iid log-uniform components.
    pub fn vector(name: impl Into<String>, low: f64, high: f64, size: usize) -> Self {
        assert!(
            low > 0.0 && low < high,
            "expected 0 < low < high, got [{low}, {high}]"
        );
        assert!(size >= 1, "vector parameter needs at least one component");
        Self {
            name: name.into(),
            low,
            high,
            kind: ParamKind::Vector(size),
        }
    }
}

impl Parameter for LogUniformPrior {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ParamKind {
        self.kind
    }

    fn sample(&self, rng: &mut dyn RngCore) -> Vec<f64> {
        let (log_low, log_high) = (self.low.ln(), self.high.ln());
        (0..self.dim())
            .map(|_| rng.gen_range(log_low..log_high).exp())
            .collect()
    }

    fn log_pdf(&self, value: &[f64]) -> f64 {
        let log_norm = (self.high / self.low).ln().ln();
        value
            .iter()
            .map(|&v| {
                if v < self.low || v > self.high {
                    f64::NEG_INFINITY
                } else {
                    -v.ln() - log_norm
                }
            })
            .sum()
    }
}
