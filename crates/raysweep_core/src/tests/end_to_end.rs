//! Full slit-scan shaped sweeps, specs written as JSON literals
//!
//! Mirrors the typical driver script: a cross product of slit and source
//! settings, plus one extra flat configuration with dotted keys, all run
//! against the mock beamline in a single batch.

use serde_json::json;

use super::mock::slit_beamline;
use crate::{all_combinations, normalize, sweep, ParamSpec, Scalar};

fn spec(value: serde_json::Value) -> ParamSpec {
    serde_json::from_value(value).unwrap()
}

#[test]
fn slit_scan_cross_product_with_extra_flat_config() {
    let slit = spec(json!({
        "Slit": {
            "openingWidth": [2.0, 3.0, 4.0],
            "openingHeight": [1.0, 2.0, 3.0]
        }
    }));
    let source = spec(json!({
        "Matrix Source": {
            "numberOfRays": [1e3, 1e4]
        }
    }));

    let mut configs = all_combinations(&[slit, source]).unwrap();
    assert_eq!(configs.len(), 6);

    let flat = spec(json!({
        "Slit.worldPosition.z": 1000.0,
        "Slit.distancePreceding": 1000.0
    }));
    configs.extend(normalize(&flat).unwrap());
    assert_eq!(configs.len(), 7);

    let mut beamline = slit_beamline();
    let before = beamline.state();
    let records = crate::run_sweep(&mut beamline, &configs).unwrap();

    assert_eq!(records.len(), 7);
    // Cross product: source setting ticks fastest, slit lockstep pair slowest.
    assert_eq!(records[0].output["Slit.openingWidth"], Scalar::Float(2.0));
    assert_eq!(records[0].output["Slit.openingHeight"], Scalar::Float(1.0));
    assert_eq!(
        records[0].output["Matrix Source.numberOfRays"],
        Scalar::Float(1e3)
    );
    assert_eq!(
        records[1].output["Matrix Source.numberOfRays"],
        Scalar::Float(1e4)
    );
    assert_eq!(records[1].output["Slit.openingWidth"], Scalar::Float(2.0));
    assert_eq!(records[5].output["Slit.openingWidth"], Scalar::Float(4.0));
    assert_eq!(records[5].output["Slit.openingHeight"], Scalar::Float(3.0));

    // The extra flat config runs last, with the cross-product fields back at
    // their scene values.
    assert_eq!(
        records[6].output["Slit.worldPosition.z"],
        Scalar::Float(1000.0)
    );
    assert_eq!(
        records[6].output["Slit.distancePreceding"],
        Scalar::Float(1000.0)
    );
    assert_eq!(records[6].output["Slit.openingWidth"], Scalar::Float(1.0));

    assert_eq!(beamline.state(), before);
}

#[test]
fn sweep_normalizes_and_runs_in_one_call() {
    // Lockstep pair straight from a JSON spec: 2 runs, not 4.
    let mut beamline = slit_beamline();
    let before = beamline.state();

    let records = sweep(
        &mut beamline,
        &spec(json!({
            "Slit": {
                "openingWidth": [2.0, 3.0],
                "openingHeight": [0.5, 1.5]
            }
        })),
    )
    .unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].output["Slit.openingWidth"], Scalar::Float(2.0));
    assert_eq!(records[0].output["Slit.openingHeight"], Scalar::Float(0.5));
    assert_eq!(records[1].output["Slit.openingWidth"], Scalar::Float(3.0));
    assert_eq!(records[1].output["Slit.openingHeight"], Scalar::Float(1.5));
    assert_eq!(beamline.state(), before);
}

#[test]
fn sweep_rejects_mismatched_lockstep_lengths_without_tracing() {
    let mut beamline = slit_beamline();

    let error = sweep(
        &mut beamline,
        &spec(json!({
            "Slit": {
                "openingWidth": [2.0, 3.0],
                "openingHeight": [0.5, 1.5, 2.5]
            }
        })),
    )
    .unwrap_err();

    // Keys are processed in lexicographic order, so the height list (length
    // 3) seeds the accumulator before the width list (length 2) fails it.
    assert!(matches!(
        error,
        crate::SweepError::Expand(crate::ExpandError::LengthMismatch { expected: 3, got: 2 })
    ));
    assert_eq!(beamline.trace_calls, 0);
}

#[test]
fn integer_spec_values_coerce_onto_float_fields() {
    // JSON integers arrive as `Scalar::Int`; the element adapter stores them
    // as the doubles the beamline actually holds.
    let mut beamline = slit_beamline();
    let before = beamline.state();

    let records = sweep(
        &mut beamline,
        &spec(json!({ "Matrix Source": { "numberOfRays": [1000, 10000] } })),
    )
    .unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(
        records[0].output["Matrix Source.numberOfRays"],
        Scalar::Float(1000.0)
    );
    assert_eq!(
        records[1].output["Matrix Source.numberOfRays"],
        Scalar::Float(10000.0)
    );
    assert_eq!(beamline.state(), before);
}

#[test]
fn dotted_and_nested_spellings_produce_the_same_configs() {
    let dotted = spec(json!({ "Slit.worldPosition.z": [800.0, 900.0] }));
    let nested = spec(json!({ "Slit": { "worldPosition": { "z": [800.0, 900.0] } } }));

    assert_eq!(normalize(&dotted).unwrap(), normalize(&nested).unwrap());
}
