//! Tree merge algebra and dotted-key nesting
//!
//! Every other piece of the crate builds on [`merge`]: nesting folds
//! per-key chains together with it, the expansion engine uses it to pair
//! sibling keys, and the combination operator folds product tuples with it.
//! The algebra is pure; inputs are never mutated.

use std::collections::BTreeMap;

use crate::error::ExpandError;
use crate::param::{ParamTree, SweepConfig};

/// Deep-merge two trees.
///
/// Both sides must be groups. The result's key set is the union of both key
/// sets; a key present on both sides recurses, which requires both values to
/// be groups in turn. Two scalars (or a scalar and a group) under the same
/// key cannot be merged — that is the conflict case and fails with
/// [`ExpandError::TypeMismatch`].
pub fn merge(a: &ParamTree, b: &ParamTree) -> Result<ParamTree, ExpandError> {
    match (a, b) {
        (ParamTree::Group(left), ParamTree::Group(right)) => {
            Ok(ParamTree::Group(merge_entries(left, right)?))
        }
        _ => Err(ExpandError::TypeMismatch {
            left: a.to_string(),
            right: b.to_string(),
        }),
    }
}

/// [`merge`] applied directly to two top-level configurations.
pub fn merge_configs(a: &SweepConfig, b: &SweepConfig) -> Result<SweepConfig, ExpandError> {
    merge_entries(a, b)
}

fn merge_entries(
    a: &BTreeMap<String, ParamTree>,
    b: &BTreeMap<String, ParamTree>,
) -> Result<BTreeMap<String, ParamTree>, ExpandError> {
    let mut merged = BTreeMap::new();
    for (key, left) in a {
        match b.get(key) {
            Some(right) => {
                merged.insert(key.clone(), merge(left, right)?);
            }
            None => {
                merged.insert(key.clone(), left.clone());
            }
        }
    }
    for (key, right) in b {
        if !a.contains_key(key) {
            merged.insert(key.clone(), right.clone());
        }
    }
    Ok(merged)
}

/// Convert a flat configuration with dot-separated keys into a nested one.
///
/// `{"Slit.worldPosition.z": 1000.0}` becomes
/// `{"Slit": {"worldPosition": {"z": 1000.0}}}`. Each key builds a
/// single-branch chain; the chains fold together with [`merge`], so
/// overlapping paths that collide (a scalar where another key needs a group)
/// fail with [`ExpandError::TypeMismatch`] regardless of fold order. Only
/// the keys of `flat` itself are interpreted; keys inside nested groups pass
/// through verbatim.
pub fn nest(flat: &SweepConfig) -> Result<SweepConfig, ExpandError> {
    let mut nested = SweepConfig::new();
    for (key, value) in flat {
        let mut parts = key.split('.').rev();
        // split always yields at least one part
        let leaf = parts.next().unwrap_or(key.as_str());
        let mut chain = value.clone();
        let mut chain_key = leaf.to_string();
        for part in parts {
            chain = ParamTree::Group(BTreeMap::from([(chain_key, chain)]));
            chain_key = part.to_string();
        }
        let branch = SweepConfig::from([(chain_key, chain)]);
        nested = merge_configs(&nested, &branch)?;
    }
    Ok(nested)
}
