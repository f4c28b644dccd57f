//! Sweep execution driver
//!
//! Applies resolved configurations onto a mutable target, runs one trace per
//! configuration, and puts every touched field back exactly as it was.
//!
//! The driver never reflects over the target. It depends on two small
//! capability traits: [`SweepTarget`] for element lookup and tracing, and
//! [`FieldAccess`] for path-scoped reads and writes on one element. Adapters
//! around the real simulation object graph implement both.
//!
//! Instead of deep-copying whole elements up front, the driver snapshots
//! only the scalar fields that some configuration in the batch actually
//! touches, and restores exactly those paths after each step. A step is
//! never left half-applied: failures while applying or tracing restore the
//! step's fields before propagating.

use std::collections::BTreeMap;
use std::error::Error;

use rustc_hash::FxHashMap;
use tracing::{debug, info};

use crate::error::{FieldError, SweepError};
use crate::expand::normalize;
use crate::param::{display_config, ParamSpec, ParamTree, Scalar, SweepConfig};

/// Path-scoped access to the fields of one target element.
///
/// A path walks nested sub-objects by name and ends at a scalar field.
/// Implementations report failures per segment through [`FieldError`]; the
/// driver adds the element context.
pub trait FieldAccess {
    /// Read the scalar at `path`.
    fn get(&self, path: &[String]) -> Result<Scalar, FieldError>;

    /// Overwrite the scalar at `path`.
    fn set(&mut self, path: &[String], value: &Scalar) -> Result<(), FieldError>;
}

/// The contract a sweepable target fulfils: named element lookup plus a
/// trace operation producing an opaque per-run output.
pub trait SweepTarget {
    /// Whatever one trace run produces; the driver hands it back untouched.
    type Output;

    /// Look up a named element for reading.
    fn element(&self, name: &str) -> Option<&dyn FieldAccess>;

    /// Look up a named element for writing.
    fn element_mut(&mut self, name: &str) -> Option<&mut dyn FieldAccess>;

    /// Run the target once under its current field state. May be expensive;
    /// the driver calls it exactly once per configuration.
    fn trace(&mut self) -> Result<Self::Output, Box<dyn Error + Send + Sync>>;
}

/// One sweep step's outcome: the configuration that was applied and the
/// output its trace produced.
#[derive(Debug)]
pub struct SweepRecord<R> {
    pub params: SweepConfig,
    pub output: R,
}

/// A fully-resolved field location on the target.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct FieldPath {
    element: String,
    segments: Vec<String>,
}

impl FieldPath {
    fn dotted(&self) -> String {
        self.segments.join(".")
    }
}

/// Pre-sweep values of every field any configuration in the batch touches.
type Snapshot = FxHashMap<FieldPath, Scalar>;

/// Run `target.trace()` once per configuration, in order.
///
/// Before any mutation, the current value of every field mentioned by any
/// configuration is captured once. Each step then applies its
/// configuration's leaves, traces, and restores exactly the paths it set.
/// When the call returns — successfully or not — every field it ever wrote
/// holds its pre-sweep value again; the only exception is a failing restore,
/// reported via [`SweepError::Restore`] so the caller knows the target may
/// be corrupted.
pub fn run_sweep<T: SweepTarget>(
    target: &mut T,
    configs: &[SweepConfig],
) -> Result<Vec<SweepRecord<T::Output>>, SweepError> {
    let snapshot = capture_snapshot(target, configs)?;
    let mut records = Vec::with_capacity(configs.len());

    for config in configs {
        info!(params = %display_config(config), "running sweep step");

        let mut touched = Vec::new();
        if let Err(error) = apply_config(target, config, &mut touched) {
            return Err(unwind(target, &snapshot, &touched, error));
        }

        match target.trace() {
            Ok(output) => {
                restore_paths(target, &snapshot, &touched)?;
                records.push(SweepRecord {
                    params: config.clone(),
                    output,
                });
            }
            Err(error) => {
                return Err(unwind(target, &snapshot, &touched, SweepError::Trace(error)));
            }
        }
    }
    Ok(records)
}

/// Normalize a parameter spec and run the resulting configurations.
///
/// Convenience composition of [`normalize`](crate::normalize) and
/// [`run_sweep`]; a malformed spec fails before the target is touched.
pub fn sweep<T: SweepTarget>(
    target: &mut T,
    spec: &ParamSpec,
) -> Result<Vec<SweepRecord<T::Output>>, SweepError> {
    let configs = normalize(spec)?;
    run_sweep(target, &configs)
}

fn wrap_field(path: &FieldPath, error: FieldError) -> SweepError {
    SweepError::Field {
        element: path.element.clone(),
        path: path.dotted(),
        error,
    }
}

/// Flatten one configuration into `(path, value)` leaves, element by
/// element. Fails if an element's value is a bare scalar rather than an
/// attribute group.
fn config_leaves(config: &SweepConfig) -> Result<Vec<(FieldPath, &Scalar)>, SweepError> {
    let mut leaves = Vec::new();
    for (element, tree) in config {
        match tree {
            ParamTree::Group(attrs) => {
                let mut prefix = Vec::new();
                collect_leaves(element, attrs, &mut prefix, &mut leaves);
            }
            ParamTree::Value(_) => return Err(SweepError::NotAGroup(element.clone())),
        }
    }
    Ok(leaves)
}

fn collect_leaves<'a>(
    element: &str,
    attrs: &'a BTreeMap<String, ParamTree>,
    prefix: &mut Vec<String>,
    out: &mut Vec<(FieldPath, &'a Scalar)>,
) {
    for (key, value) in attrs {
        prefix.push(key.clone());
        match value {
            ParamTree::Value(v) => out.push((
                FieldPath {
                    element: element.to_string(),
                    segments: prefix.clone(),
                },
                v,
            )),
            ParamTree::Group(nested) => collect_leaves(element, nested, prefix, out),
        }
        prefix.pop();
    }
}

/// Capture the current value of every field any configuration touches.
///
/// Runs before any mutation, so lookup failures abort the sweep with the
/// target still in its original state.
fn capture_snapshot<T: SweepTarget>(
    target: &T,
    configs: &[SweepConfig],
) -> Result<Snapshot, SweepError> {
    let mut snapshot = Snapshot::default();
    for config in configs {
        for (path, _) in config_leaves(config)? {
            if snapshot.contains_key(&path) {
                continue;
            }
            let element = target
                .element(&path.element)
                .ok_or_else(|| SweepError::UnknownElement(path.element.clone()))?;
            let value = element
                .get(&path.segments)
                .map_err(|error| wrap_field(&path, error))?;
            snapshot.insert(path, value);
        }
    }
    Ok(snapshot)
}

/// Apply every leaf of `config`, recording each successfully set path in
/// `touched` so the caller can restore exactly those on failure.
fn apply_config<T: SweepTarget>(
    target: &mut T,
    config: &SweepConfig,
    touched: &mut Vec<FieldPath>,
) -> Result<(), SweepError> {
    for (path, value) in config_leaves(config)? {
        let element = target
            .element_mut(&path.element)
            .ok_or_else(|| SweepError::UnknownElement(path.element.clone()))?;
        element
            .set(&path.segments, value)
            .map_err(|error| wrap_field(&path, error))?;
        debug!(element = %path.element, path = %path.dotted(), %value, "set field");
        touched.push(path);
    }
    Ok(())
}

/// Put every touched path back to its snapshot value.
fn restore_paths<T: SweepTarget>(
    target: &mut T,
    snapshot: &Snapshot,
    touched: &[FieldPath],
) -> Result<(), SweepError> {
    for path in touched {
        // Every touched path was captured up front; a miss cannot happen.
        let Some(value) = snapshot.get(path) else {
            continue;
        };
        let element = target
            .element_mut(&path.element)
            .ok_or_else(|| SweepError::UnknownElement(path.element.clone()))?;
        element
            .set(&path.segments, value)
            .map_err(|error| wrap_field(&path, error))?;
        debug!(element = %path.element, path = %path.dotted(), %value, "restored field");
    }
    Ok(())
}

/// Restore a failed step's fields, then hand back the original error — or
/// both, if the restore itself fails.
fn unwind<T: SweepTarget>(
    target: &mut T,
    snapshot: &Snapshot,
    touched: &[FieldPath],
    error: SweepError,
) -> SweepError {
    match restore_paths(target, snapshot, touched) {
        Ok(()) => error,
        Err(restore_error) => SweepError::Restore {
            error: Box::new(restore_error),
            while_handling: Box::new(error),
        },
    }
}
