//! Parameter groupings for block-update proposals.
//!
//! The host sampler perturbs one group of coordinates at a time; grouping
//! related parameters (all of them, the globally shared ones, each signal's
//! own) mixes better than single-coordinate updates. Groupings are pure
//! functions of the model, recomputed on demand and never cached.

use std::collections::HashMap;

use crate::model::Model;

/// Splits the parameter names of a model into global and individual ones.
///
/// A name is global if it occurs more than once across the collections'
/// name-lists, i.e. is shared between signals (a background parameter common
/// to every pulsar, say). Global names are returned sorted and deduplicated;
/// individual names keep their appearance order.
pub fn global_parameters(model: &dyn Model) -> (Vec<String>, Vec<String>) {
    let mut names = Vec::new();
    for collection in model.signal_collections() {
        names.extend(collection.param_names());
    }

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for name in &names {
        *counts.entry(name.as_str()).or_insert(0) += 1;
    }

    let mut global: Vec<String> = names
        .iter()
        .filter(|name| counts[name.as_str()] > 1)
        .cloned()
        .collect();
    global.sort();
    global.dedup();

    let individual = names
        .iter()
        .filter(|name| !global.contains(*name))
        .cloned()
        .collect();

    (global, individual)
}

/// Index groups for block updates: all parameters, the jointly-updated global
/// parameters (if any), then each signal's own non-global parameters.
///
/// Indices are ordinals into the model's parameter name list, not flat-vector
/// offsets; callers slicing the flat vector must translate through
/// [`ParamIndex::slice`](crate::index::ParamIndex::slice) when a grouped
/// parameter is vector-valued. Per-signal groups left empty after excluding
/// the global names are omitted, so a signal whose parameters are all shared
/// contributes no extra group.
pub fn parameter_groups(model: &dyn Model) -> Vec<Vec<usize>> {
    let names = model.param_names();
    let position: HashMap<&str, usize> = names
        .iter()
        .enumerate()
        .map(|(ordinal, name)| (name.as_str(), ordinal))
        .collect();

    let mut groups = vec![(0..names.len()).collect::<Vec<_>>()];

    let (global, _) = global_parameters(model);
    if !global.is_empty() {
        groups.push(
            global
                .iter()
                .filter_map(|name| position.get(name.as_str()).copied())
                .collect(),
        );
    }

    for collection in model.signal_collections() {
        for signal in collection.signals() {
            let own: Vec<usize> = signal
                .param_names()
                .iter()
                .filter(|name| !global.contains(*name))
                .filter_map(|name| position.get(name.as_str()).copied())
                .collect();
            if !own.is_empty() {
                groups.push(own);
            }
        }
    }

    groups
}
