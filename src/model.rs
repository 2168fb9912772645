//! Core abstractions shared by the proposal generator and the group
//! partitioner.
//!
//! A [`Model`] exposes an ordered flat parameter list together with its
//! decomposition into [`SignalCollection`]s (typically one per pulsar), each
//! holding [`Signal`]s that own a subset of the parameters. Parameters are
//! shared between the flat list and the signals via [`Arc`], so a process
//! common to several collections contributes the same parameter objects to
//! each of them.

use std::collections::HashSet;
use std::sync::Arc;

use rand::RngCore;

/// Shape of a model parameter.
///
/// Scalar parameters occupy a single coordinate of the flat parameter vector;
/// vector parameters occupy `size` contiguous coordinates. A vector size of
/// at least 1 is expected everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Scalar,
    Vector(usize),
}

impl ParamKind {
    /// Number of flat-vector coordinates the parameter occupies.
    pub fn dim(&self) -> usize {
        match self {
            ParamKind::Scalar => 1,
            ParamKind::Vector(size) => *size,
        }
    }
}

/// A named model parameter with a prior distribution.
///
/// Implementations provide the two prior operations the jump proposals rely
/// on: drawing a fresh value and evaluating the joint log-density of a value.
/// Parameters are immutable once constructed; all randomness flows through
/// the injected `rng` handle, so callers control seeding.
pub trait Parameter: Send + Sync {
    /// The parameter's name, unique within a model.
    fn name(&self) -> &str;

    /// Whether the parameter is scalar or vector-valued.
    fn kind(&self) -> ParamKind;

    /// Number of flat-vector coordinates occupied by this parameter.
    fn dim(&self) -> usize {
        self.kind().dim()
    }

    /// Draws a complete value from the prior.
    ///
    /// Must return exactly [`dim`](Parameter::dim) entries.
    fn sample(&self, rng: &mut dyn RngCore) -> Vec<f64>;

    /// Joint log-density of `value` (length [`dim`](Parameter::dim)) under
    /// the prior.
    ///
    /// Values outside the support yield `f64::NEG_INFINITY`; non-finite
    /// results are propagated to callers unchanged.
    fn log_pdf(&self, value: &[f64]) -> f64;
}

/// One signal of the model: a category label plus the parameters it owns.
///
/// Signals with the same category label may appear in several collections
/// (e.g. a background process common to every pulsar); the parameter index
/// merges their lists into one candidate pool per label.
#[derive(Clone)]
pub struct Signal {
    category: String,
    params: Vec<Arc<dyn Parameter>>,
}

impl Signal {
    pub fn new(category: impl Into<String>, params: Vec<Arc<dyn Parameter>>) -> Self {
        Self {
            category: category.into(),
            params,
        }
    }

    /// The category label identifying this signal's kind.
    pub fn category(&self) -> &str {
        &self.category
    }

    /// The parameters owned by this signal, in order.
    pub fn params(&self) -> &[Arc<dyn Parameter>] {
        &self.params
    }

    /// Names of the owned parameters, in order.
    pub fn param_names(&self) -> Vec<String> {
        self.params.iter().map(|p| p.name().to_string()).collect()
    }
}

/// An ordered container of signals, typically one per pulsar.
#[derive(Clone)]
pub struct SignalCollection {
    signals: Vec<Signal>,
}

impl SignalCollection {
    pub fn new(signals: Vec<Signal>) -> Self {
        Self { signals }
    }

    pub fn signals(&self) -> &[Signal] {
        &self.signals
    }

    /// Names of all parameters owned by this collection's signals, in order.
    pub fn param_names(&self) -> Vec<String> {
        self.signals
            .iter()
            .flat_map(|signal| signal.param_names())
            .collect()
    }
}

/// The probabilistic model as seen by the proposal generator: an ordered flat
/// parameter list plus its decomposition into signal collections.
///
/// The flat list determines parameter ordinals and flat-vector offsets; the
/// decomposition determines category pools and sampling groups. Both are
/// read-only views, never mutated by this crate.
pub trait Model {
    /// The ordered flat parameter list.
    fn params(&self) -> &[Arc<dyn Parameter>];

    /// The signal decomposition.
    fn signal_collections(&self) -> &[SignalCollection];

    /// Number of parameters in the flat list.
    fn npar(&self) -> usize {
        self.params().len()
    }

    /// Names of the flat parameter list, in order.
    fn param_names(&self) -> Vec<String> {
        self.params().iter().map(|p| p.name().to_string()).collect()
    }
}

/// A ready-made [`Model`] assembled from signal collections.
///
/// The flat parameter list contains the distinct parameters referenced by the
/// collections' signals, deduplicated by name in first-appearance order, so a
/// parameter shared by several signals appears exactly once.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use pta_jumps::model::{Model, Parameter, Signal, SignalCollection, SignalModel};
/// use pta_jumps::priors::UniformPrior;
///
/// let gamma: Arc<dyn Parameter> = Arc::new(UniformPrior::new("rn_gamma", 0.0, 7.0));
/// let collection = SignalCollection::new(vec![Signal::new("red noise", vec![gamma])]);
/// let model = SignalModel::new(vec![collection]);
/// assert_eq!(model.npar(), 1);
/// assert_eq!(model.param_names(), vec!["rn_gamma".to_string()]);
/// ```
#[derive(Clone)]
pub struct SignalModel {
    params: Vec<Arc<dyn Parameter>>,
    collections: Vec<SignalCollection>,
}

impl SignalModel {
    pub fn new(collections: Vec<SignalCollection>) -> Self {
        let mut params: Vec<Arc<dyn Parameter>> = Vec::new();
        let mut seen = HashSet::new();
        for collection in &collections {
            for signal in collection.signals() {
                for param in signal.params() {
                    if seen.insert(param.name().to_string()) {
                        params.push(Arc::clone(param));
                    }
                }
            }
        }
        Self {
            params,
            collections,
        }
    }
}

impl Model for SignalModel {
    fn params(&self) -> &[Arc<dyn Parameter>] {
        &self.params
    }

    fn signal_collections(&self) -> &[SignalCollection] {
        &self.collections
    }
}
