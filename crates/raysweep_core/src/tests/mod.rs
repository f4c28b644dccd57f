//! Integration tests for the sweep core
//!
//! Tests are organized by topic:
//! - `mock` - A mock beamline target implementing the driver traits
//! - `driver` - Sweep driver mechanics: apply, trace, restore, unwinding
//! - `end_to_end` - Full slit-scan shaped sweeps from JSON specs


mod end_to_end;
