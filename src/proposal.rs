/*!
Prior-draw jump proposals for Metropolis–Hastings sampling.

[`JumpProposal`] proposes a candidate state by resampling a single parameter
(or a single component of a vector-valued parameter) from its own prior and
returns the candidate together with the Hastings log-density correction
`lqxy` that keeps the move reversible. Because the prior doubles as the
proposal kernel, the correction reduces to the old slice's prior log-density
minus the new slice's, evaluated over the changed parameter only; the
untouched coordinates cancel.

Draws either range over the full parameter list or are restricted to one
signal category, so a host sampler can mix global moves with targeted moves
on, say, the common background process. Every draw operation copies the
caller's state vector and leaves the original untouched.

# Examples

```rust
use std::sync::Arc;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use pta_jumps::model::{Parameter, Signal, SignalCollection, SignalModel};
use pta_jumps::priors::UniformPrior;
use pta_jumps::proposal::{JumpProposal, StepContext};

let log10_a: Arc<dyn Parameter> = Arc::new(UniformPrior::new("gw_log10_A", -18.0, -11.0));
let gamma: Arc<dyn Parameter> = Arc::new(UniformPrior::new("gw_gamma", 0.0, 7.0));
let collection = SignalCollection::new(vec![Signal::new("red noise", vec![log10_a, gamma])]);
let model = SignalModel::new(vec![collection]);

let jump = JumpProposal::new(&model).unwrap();
let mut rng = SmallRng::seed_from_u64(42);
let x = vec![-14.0, 3.0];
let (q, lqxy) = jump
    .draw_from_prior(&x, StepContext::default(), &mut rng)
    .unwrap();
assert_eq!(q.len(), x.len());
assert!(lqxy.is_finite());
```
*/

use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use thiserror::Error;

use crate::index::{IndexError, ParamIndex};
use crate::model::{Model, ParamKind};

/// Category label of the common stochastic background signals.
pub const GWB_CATEGORY: &str = "red noise";

/// Category label of burst-with-memory signals.
pub const BWM_CATEGORY: &str = "bwm";

/// Category label of solar-system ephemeris correction signals.
pub const EPHEM_CATEGORY: &str = "phys_ephem";

/// Errors raised by the draw operations.
#[derive(Debug, Error)]
pub enum ProposalError {
    /// The parameter index could not be built from the model.
    #[error(transparent)]
    Index(#[from] IndexError),

    /// The model exposes no parameters, so an unrestricted draw has no
    /// candidate to pick.
    #[error("model has no parameters to draw from")]
    EmptyModel,

    /// The requested signal category has no associated parameters.
    #[error("signal category `{0}` has no parameters to draw from")]
    EmptyCategory(String),
}

/// Per-step metadata forwarded by the host sampler.
///
/// Host engines pass the iteration number and the chain's inverse temperature
/// to every proposal. The draws here depend on neither, so both fields are
/// accepted and ignored; the type exists for call-signature compatibility and
/// caller-side extensions.
#[derive(Debug, Clone, Copy)]
pub struct StepContext {
    /// Iteration number of the calling chain.
    pub iteration: usize,
    /// Inverse temperature (beta) of the calling chain.
    pub beta: f64,
}

impl StepContext {
    pub fn new(iteration: usize, beta: f64) -> Self {
        Self { iteration, beta }
    }
}

impl Default for StepContext {
    /// Iteration zero of an untempered chain.
    fn default() -> Self {
        Self {
            iteration: 0,
            beta: 1.0,
        }
    }
}

/// Prior-draw proposal generator over a fixed parameter index.
#[derive(Clone)]
pub struct JumpProposal {
    index: ParamIndex,
}

impl JumpProposal {
    /// Builds the proposal generator, constructing the parameter index from
    /// the model.
    pub fn new(model: &dyn Model) -> Result<Self, ProposalError> {
        Ok(Self {
            index: ParamIndex::new(model)?,
        })
    }

    /// Wraps an index built elsewhere.
    pub fn from_index(index: ParamIndex) -> Self {
        Self { index }
    }

    /// The underlying parameter index.
    pub fn index(&self) -> &ParamIndex {
        &self.index
    }

    /// Proposes a candidate by resampling one parameter, drawn uniformly
    /// from the full parameter list, from its prior.
    ///
    /// Returns the candidate vector and the Hastings log-density correction.
    /// `x` is copied, never mutated; its length must equal
    /// [`ParamIndex::ndim`].
    pub fn draw_from_prior(
        &self,
        x: &[f64],
        _step: StepContext,
        rng: &mut dyn RngCore,
    ) -> Result<(Vec<f64>, f64), ProposalError> {
        self.draw(x, None, rng)
    }

    /// Proposes a candidate by resampling one parameter drawn uniformly from
    /// the named signal category's pool.
    pub fn draw_from_signal_prior(
        &self,
        category: &str,
        x: &[f64],
        _step: StepContext,
        rng: &mut dyn RngCore,
    ) -> Result<(Vec<f64>, f64), ProposalError> {
        self.draw(x, Some(category), rng)
    }

    /// Restricted draw over the common stochastic background parameters
    /// ([`GWB_CATEGORY`]).
    pub fn draw_from_gwb_prior(
        &self,
        x: &[f64],
        _step: StepContext,
        rng: &mut dyn RngCore,
    ) -> Result<(Vec<f64>, f64), ProposalError> {
        self.draw(x, Some(GWB_CATEGORY), rng)
    }

    /// Restricted draw over the burst-with-memory parameters
    /// ([`BWM_CATEGORY`]).
    pub fn draw_from_bwm_prior(
        &self,
        x: &[f64],
        _step: StepContext,
        rng: &mut dyn RngCore,
    ) -> Result<(Vec<f64>, f64), ProposalError> {
        self.draw(x, Some(BWM_CATEGORY), rng)
    }

    /// Restricted draw over the solar-system ephemeris correction parameters
    /// ([`EPHEM_CATEGORY`]).
    pub fn draw_from_ephem_prior(
        &self,
        x: &[f64],
        _step: StepContext,
        rng: &mut dyn RngCore,
    ) -> Result<(Vec<f64>, f64), ProposalError> {
        self.draw(x, Some(EPHEM_CATEGORY), rng)
    }

    fn draw(
        &self,
        x: &[f64],
        pool: Option<&str>,
        rng: &mut dyn RngCore,
    ) -> Result<(Vec<f64>, f64), ProposalError> {
        assert_eq!(
            x.len(),
            self.index.ndim(),
            "state vector length must match the model dimension"
        );

        // randomly choose a parameter from the candidate pool
        let ordinal = match pool {
            None => {
                if self.index.npar() == 0 {
                    return Err(ProposalError::EmptyModel);
                }
                rng.gen_range(0..self.index.npar())
            }
            Some(category) => *self
                .index
                .category(category)
                .unwrap_or(&[])
                .choose(&mut *rng)
                .ok_or_else(|| ProposalError::EmptyCategory(category.to_string()))?,
        };

        let param = self.index.param(ordinal);
        let slice = self.index.slice(ordinal);
        let mut q = x.to_vec();

        match param.kind() {
            // vector parameter: jump in one random component
            ParamKind::Vector(size) => {
                let component = rng.gen_range(0..size);
                let fresh = param.sample(&mut *rng);
                q[slice.start + component] = fresh[component];
            }
            ParamKind::Scalar => {
                q[slice.start] = param.sample(&mut *rng)[0];
            }
        }

        // forward-backward jump probability over the changed slice
        let lqxy = param.log_pdf(&x[slice.clone()]) - param.log_pdf(&q[slice]);

        Ok((q, lqxy))
    }
}
