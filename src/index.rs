//! One-time lookup structures mapping a model's parameters to flat-vector
//! offsets, list ordinals, and per-category candidate pools.

use std::collections::HashMap;
use std::ops::Range;
use std::sync::Arc;

use thiserror::Error;

use crate::model::{Model, Parameter};

/// Error raised when the lookup structures cannot be built from a model.
#[derive(Debug, Error)]
pub enum IndexError {
    /// A signal owns a parameter whose name is missing from the model's flat
    /// parameter list.
    #[error("signal `{signal}` references unknown parameter `{param}`")]
    UnknownParameter { signal: String, param: String },
}

/// Immutable lookup structures built once per model:
///
/// * per-parameter offset slices tiling `[0, ndim)` with no overlap and no
///   gap,
/// * parameter name → ordinal in the flat parameter list,
/// * signal category → candidate pool of parameter ordinals.
#[derive(Clone)]
pub struct ParamIndex {
    params: Vec<Arc<dyn Parameter>>,
    slices: Vec<Range<usize>>,
    ndim: usize,
    by_name: HashMap<String, usize>,
    by_category: HashMap<String, Vec<usize>>,
}

impl std::fmt::Debug for ParamIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParamIndex")
            .field("slices", &self.slices)
            .field("ndim", &self.ndim)
            .field("by_name", &self.by_name)
            .field("by_category", &self.by_category)
            .finish_non_exhaustive()
    }
}

impl ParamIndex {
    /// Builds the index in one pass over the model's parameters and signals.
    ///
    /// A zero-parameter model builds successfully with `ndim == 0` and empty
    /// maps; draw operations over such an index fail explicitly instead.
    pub fn new(model: &dyn Model) -> Result<Self, IndexError> {
        let params: Vec<Arc<dyn Parameter>> = model.params().to_vec();

        let mut slices = Vec::with_capacity(params.len());
        let mut by_name = HashMap::with_capacity(params.len());
        let mut offset = 0;
        for (ordinal, param) in params.iter().enumerate() {
            let dim = param.kind().dim();
            slices.push(offset..offset + dim);
            offset += dim;
            by_name.insert(param.name().to_string(), ordinal);
        }
        let ndim = offset;

        let mut by_category: HashMap<String, Vec<usize>> = HashMap::new();
        for collection in model.signal_collections() {
            for signal in collection.signals() {
                for param in signal.params() {
                    let ordinal = *by_name.get(param.name()).ok_or_else(|| {
                        IndexError::UnknownParameter {
                            signal: signal.category().to_string(),
                            param: param.name().to_string(),
                        }
                    })?;
                    by_category
                        .entry(signal.category().to_string())
                        .or_default()
                        .push(ordinal);
                }
            }
        }

        Ok(Self {
            params,
            slices,
            ndim,
            by_name,
            by_category,
        })
    }

    /// Number of parameters in the flat list.
    pub fn npar(&self) -> usize {
        self.params.len()
    }

    /// Total number of flat-vector coordinates.
    pub fn ndim(&self) -> usize {
        self.ndim
    }

    /// The parameter at `ordinal`.
    pub fn param(&self, ordinal: usize) -> &dyn Parameter {
        self.params[ordinal].as_ref()
    }

    /// The flat-vector slice `[offset, offset + dim)` of the parameter at
    /// `ordinal`.
    pub fn slice(&self, ordinal: usize) -> Range<usize> {
        self.slices[ordinal].clone()
    }

    /// Ordinal of the parameter named `name`, if present.
    pub fn ordinal(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    /// Candidate pool for a signal category: the ordinals of every parameter
    /// owned by a signal with that label, concatenated over signals in model
    /// order.
    ///
    /// Signals sharing a label are merged rather than overwriting one
    /// another, so a parameter owned by several of them appears once per
    /// owner; pools are deliberately not deduplicated.
    pub fn category(&self, name: &str) -> Option<&[usize]> {
        self.by_category.get(name).map(|pool| pool.as_slice())
    }
}
