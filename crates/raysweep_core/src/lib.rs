//! Parameter-sweep expansion and execution for beamline simulations
//!
//! This crate turns a mixed tree of scalars, alternative lists, and nested
//! groups into an enumerated list of fully-resolved configurations, and
//! drives a mutable simulation target through them: apply, trace, restore,
//! one configuration at a time.
//!
//! A word of warning on sibling keys: inside one group, keys whose
//! alternatives have equal length pair **in lockstep** (index-by-index), and
//! unequal lengths are an error. Cross products only come from
//! [`all_combinations`], across separately supplied groups.
//!
//! # Example
//!
//! ```ignore
//! use raysweep_core::{all_combinations, run_sweep, ParamSpec};
//!
//! // 3 lockstep slit settings x 2 source settings = 6 configurations
//! let slit = ParamSpec::group([(
//!     "Slit",
//!     ParamSpec::group([
//!         ("openingWidth", ParamSpec::alternatives([2.0.into(), 3.0.into(), 4.0.into()])),
//!         ("openingHeight", ParamSpec::alternatives([1.0.into(), 2.0.into(), 3.0.into()])),
//!     ]),
//! )]);
//! let source = ParamSpec::group([(
//!     "Matrix Source",
//!     ParamSpec::group([("numberOfRays", ParamSpec::alternatives([1e3.into(), 1e4.into()]))]),
//! )]);
//!
//! let configs = all_combinations(&[slit, source])?;
//! let records = run_sweep(&mut beamline, &configs)?;
//! for record in &records {
//!     println!("{:?}", record.output);
//! }
//! ```

// ============================================================================
// Core modules
// ============================================================================

pub mod error;
pub mod expand;
pub mod merge;
pub mod param;
pub mod sweep;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use error::{ExpandError, FieldError, SweepError};
pub use expand::{all_combinations, expand, normalize};
pub use merge::{merge, merge_configs, nest};
pub use param::{display_config, ParamSpec, ParamTree, Scalar, SweepConfig};
pub use sweep::{run_sweep, sweep, FieldAccess, SweepRecord, SweepTarget};
