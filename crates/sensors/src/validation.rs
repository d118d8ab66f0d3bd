//! Invariant checks shared by every kind
//!
//! Each check appends to a [`ValidationReport`]; nothing short-circuits, so one pass
//! reports every violation.

use contracts::{
    Axis, NoiseParameter, SensorKind, SensorResults, SensorSpec, ValidationReport, Violation,
    WorldSpec,
};

use crate::kinds::common::{
    GRID_RESOLUTION, NOISE_ALPHA, NOISE_BETA, SENSOR_LOCATIONS, SENSOR_READINGS,
};

/// Locations, voxelisation and noise
///
/// `axes` names the world bounds this kind checks locations against.
pub fn check_geometry<S: SensorSpec>(
    kind: SensorKind,
    world: &WorldSpec,
    spec: &S,
    axes: &[Axis],
    report: &mut ValidationReport,
) {
    check_locations(kind, world, spec, axes, report);
    check_voxelisation(kind, spec, report);
    check_noise(kind, spec, report);
}

pub fn check_locations<S: SensorSpec>(
    kind: SensorKind,
    world: &WorldSpec,
    spec: &S,
    axes: &[Axis],
    report: &mut ValidationReport,
) {
    if spec.locations().is_empty() {
        report.push(kind, SENSOR_LOCATIONS, None, Violation::NoLocations);
        return;
    }

    for (index, location) in spec.locations().iter().enumerate() {
        for &axis in axes {
            let bounds = world.bounds(axis);
            let value = location.component(axis);
            if !bounds.contains(value) {
                report.push(
                    kind,
                    SENSOR_LOCATIONS,
                    Some(index),
                    Violation::LocationOutOfBounds {
                        axis,
                        value,
                        bounds,
                    },
                );
            }
        }
    }
}

pub fn check_voxelisation<S: SensorSpec>(
    kind: SensorKind,
    spec: &S,
    report: &mut ValidationReport,
) {
    for axis in Axis::ALL {
        let value = spec.voxelisation().resolution(axis);
        if value <= 0 {
            report.push(
                kind,
                GRID_RESOLUTION,
                None,
                Violation::NonPositiveResolution { axis, value },
            );
        }
    }
}

pub fn check_noise<S: SensorSpec>(kind: SensorKind, spec: &S, report: &mut ValidationReport) {
    let noise = spec.noise();
    for (field, parameter, value) in [
        (NOISE_ALPHA, NoiseParameter::Alpha, noise.inverse_gamma_alpha),
        (NOISE_BETA, NoiseParameter::Beta, noise.inverse_gamma_beta),
    ] {
        if value.is_nan() || value <= 0.0 {
            report.push(
                kind,
                field,
                None,
                Violation::NonPositiveNoise { parameter, value },
            );
        }
    }
}

/// Reading count must match the location count whenever readings are present
pub fn check_readings<S: SensorSpec, R: SensorResults>(
    kind: SensorKind,
    spec: &S,
    results: &R,
    report: &mut ValidationReport,
) {
    if let Some(readings) = results.readings() {
        let locations = spec.locations().len();
        if readings.len() != locations {
            report.push(
                kind,
                SENSOR_READINGS,
                None,
                Violation::ReadingCountMismatch {
                    locations,
                    readings: readings.len(),
                },
            );
        }
    }
}

/// Report the first non-finite value, if any
pub fn check_finite(
    kind: SensorKind,
    field: &'static str,
    values: &[f64],
    report: &mut ValidationReport,
) {
    if let Some(&value) = values.iter().find(|v| !v.is_finite()) {
        report.push(kind, field, None, Violation::NonFinite { value });
    }
}
