//! Expansion engine and combination operator
//!
//! [`expand`] turns a mixed tree of scalars, alternative lists, and groups
//! into the ordered list of fully-resolved trees it denotes.
//!
//! Sibling keys inside one group pair in **lockstep**: equal-length
//! expansions zip index-by-index, and unequal lengths are an error. This is
//! deliberate — it lets correlated parameters vary together — but it is easy
//! to misuse, because two unrelated parameters that happen to share a
//! cardinality will silently zip instead of crossing. A cross product is
//! only ever produced by [`all_combinations`], across separately supplied
//! groups.

use crate::error::ExpandError;
use crate::merge::{merge, merge_configs, nest};
use crate::param::{ParamSpec, ParamTree, SweepConfig};

/// Expand a spec into the ordered list of resolved trees it denotes.
///
/// - a scalar expands to itself, alone;
/// - an alternative list expands every element and concatenates the results
///   in element order (an empty list expands to nothing);
/// - a group expands each key and pairs sibling keys in lockstep; the first
///   key (in lexicographic order) fixes the group's length, and any sibling
///   whose expansion differs in length fails with
///   [`ExpandError::LengthMismatch`].
pub fn expand(spec: &ParamSpec) -> Result<Vec<ParamTree>, ExpandError> {
    match spec {
        ParamSpec::Value(v) => Ok(vec![ParamTree::Value(v.clone())]),
        ParamSpec::Alternatives(items) => {
            let mut expanded = Vec::new();
            for item in items {
                expanded.extend(expand(item)?);
            }
            Ok(expanded)
        }
        ParamSpec::Group(entries) => {
            let mut accumulator: Vec<ParamTree> = Vec::new();
            for (index, (key, value)) in entries.iter().enumerate() {
                let expanded = expand(value)?;
                if index == 0 {
                    accumulator = expanded
                        .into_iter()
                        .map(|v| {
                            ParamTree::Group(SweepConfig::from([(key.clone(), v)]))
                        })
                        .collect();
                } else if expanded.len() == accumulator.len() {
                    for (partial, v) in accumulator.iter_mut().zip(expanded) {
                        let branch = ParamTree::Group(SweepConfig::from([(key.clone(), v)]));
                        *partial = merge(partial, &branch)?;
                    }
                } else {
                    return Err(ExpandError::LengthMismatch {
                        expected: accumulator.len(),
                        got: expanded.len(),
                    });
                }
            }
            Ok(accumulator)
        }
    }
}

/// Expand a spec into ready-to-apply configurations.
///
/// Runs [`expand`], requires every resolved tree to be a group (a bare
/// scalar has no element to attach to), and nests the dotted keys of each
/// via [`nest`].
pub fn normalize(spec: &ParamSpec) -> Result<Vec<SweepConfig>, ExpandError> {
    let mut configs = Vec::new();
    for tree in expand(spec)? {
        match tree {
            ParamTree::Group(entries) => configs.push(nest(&entries)?),
            other => {
                return Err(ExpandError::TypeMismatch {
                    left: other.to_string(),
                    right: "a top-level group".to_string(),
                });
            }
        }
    }
    Ok(configs)
}

/// Cartesian product across independent parameter groups.
///
/// Each group is normalized on its own, then every combination of one
/// configuration per group is merged into a single configuration. The
/// leftmost group is the outer loop, so its index varies slowest. The result
/// length is the product of the per-group lengths — zero if any group
/// normalizes to nothing. Two groups assigning conflicting scalars under the
/// same path fail with [`ExpandError::TypeMismatch`].
pub fn all_combinations(groups: &[ParamSpec]) -> Result<Vec<SweepConfig>, ExpandError> {
    let normalized: Vec<Vec<SweepConfig>> = groups
        .iter()
        .map(normalize)
        .collect::<Result<_, _>>()?;

    if normalized.iter().any(Vec::is_empty) {
        return Ok(Vec::new());
    }

    // Odometer over per-group indices; the last index ticks fastest.
    let mut combined = Vec::new();
    let mut indices = vec![0usize; normalized.len()];
    loop {
        let mut config = SweepConfig::new();
        for (group, &index) in normalized.iter().zip(indices.iter()) {
            config = merge_configs(&config, &group[index])?;
        }
        combined.push(config);

        let mut carry = true;
        for (index, group) in indices.iter_mut().zip(normalized.iter()).rev() {
            if carry {
                *index += 1;
                if *index >= group.len() {
                    *index = 0;
                } else {
                    carry = false;
                }
            }
        }
        if carry {
            break;
        }
    }
    Ok(combined)
}
