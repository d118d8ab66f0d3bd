//! Validation diagnostics
//!
//! Validators accumulate every violation into a [`ValidationReport`] instead of
//! stopping at the first one.

use std::fmt;

use serde::Serialize;

use crate::{Axis, Bounds, SensorKind, ValidationFailure};

/// Noise hyperparameter named by a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoiseParameter {
    Alpha,
    Beta,
}

impl fmt::Display for NoiseParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Alpha => "alpha",
            Self::Beta => "beta",
        })
    }
}

/// A single broken invariant
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "violation", rename_all = "snake_case")]
pub enum Violation {
    /// Enabled sensor with zero locations
    NoLocations,
    LocationOutOfBounds {
        axis: Axis,
        value: f64,
        bounds: Bounds,
    },
    NonPositiveResolution {
        axis: Axis,
        value: i32,
    },
    NonPositiveNoise {
        parameter: NoiseParameter,
        value: f64,
    },
    ReadingCountMismatch {
        locations: usize,
        readings: usize,
    },
    NonFinite {
        value: f64,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoLocations => write!(
                f,
                "no locations specified; disable the sensor if it is not used"
            ),
            Self::LocationOutOfBounds {
                axis,
                value,
                bounds,
            } => write!(f, "{axis} = {value} is outside world {axis} bounds {bounds}"),
            Self::NonPositiveResolution { axis, value } => {
                write!(f, "{axis} resolution must be greater than 0, got {value}")
            }
            Self::NonPositiveNoise { parameter, value } => {
                write!(f, "noise {parameter} must be greater than 0, got {value}")
            }
            Self::ReadingCountMismatch {
                locations,
                readings,
            } => write!(
                f,
                "{readings} readings for {locations} locations; remove or add locations"
            ),
            Self::NonFinite { value } => write!(f, "value must be finite, got {value}"),
        }
    }
}

/// Violation plus the context needed to act on it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub kind: SensorKind,
    /// Option field the violation traces back to, e.g. `sensorLocations`
    pub field: &'static str,
    /// Location index (0-based) when the violation concerns a single location
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    #[serde(flatten)]
    pub violation: Violation,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.kind, self.field)?;
        if let Some(index) = self.index {
            write!(f, "[{index}]")?;
        }
        write!(f, ": {}", self.violation)
    }
}

/// Accumulated diagnostics for one or more sensor kinds
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    diagnostics: Vec<Diagnostic>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(
        &mut self,
        kind: SensorKind,
        field: &'static str,
        index: Option<usize>,
        violation: Violation,
    ) {
        self.diagnostics.push(Diagnostic {
            kind,
            field,
            index,
            violation,
        });
    }

    pub fn is_valid(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn merge(&mut self, other: ValidationReport) {
        self.diagnostics.extend(other.diagnostics);
    }

    pub fn into_result(self) -> Result<(), ValidationFailure> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(ValidationFailure {
                diagnostics: self.diagnostics,
            })
        }
    }
}
