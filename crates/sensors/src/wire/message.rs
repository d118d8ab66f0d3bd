//! Body messages shared by every sensor kind
//!
//! Variable-length data is flattened next to an explicit element count; decoding
//! checks the two agree before a record is rebuilt.

use contracts::{CodecError, NoiseSpec, RecordType, SensorKind, Vector3, Voxelisation};
use serde::{Deserialize, Serialize};

/// Sample locations, flattened `x0 y0 z0 x1 y1 z1 …`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationsMessage {
    pub num_locations: u64,
    pub coordinates: Vec<f64>,
}

impl LocationsMessage {
    pub fn from_points(points: &[Vector3]) -> Self {
        Self {
            num_locations: points.len() as u64,
            coordinates: points.iter().flat_map(|p| p.to_array()).collect(),
        }
    }

    pub fn into_points(
        self,
        kind: SensorKind,
        record: RecordType,
    ) -> Result<Vec<Vector3>, CodecError> {
        let expected = self.num_locations.checked_mul(3);
        if expected != Some(self.coordinates.len() as u64) {
            return Err(CodecError::CountMismatch {
                kind,
                record,
                field: "num_locations",
                declared: self.num_locations,
                actual: self.coordinates.len() as u64 / 3,
            });
        }

        Ok(self
            .coordinates
            .chunks_exact(3)
            .map(|c| Vector3::new(c[0], c[1], c[2]))
            .collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoxelisationMessage {
    pub x_resolution: i32,
    pub y_resolution: i32,
    pub z_resolution: i32,
    pub supersample: u32,
}

impl From<&Voxelisation> for VoxelisationMessage {
    fn from(v: &Voxelisation) -> Self {
        Self {
            x_resolution: v.x_resolution,
            y_resolution: v.y_resolution,
            z_resolution: v.z_resolution,
            supersample: v.supersample,
        }
    }
}

impl From<VoxelisationMessage> for Voxelisation {
    fn from(m: VoxelisationMessage) -> Self {
        Self {
            x_resolution: m.x_resolution,
            y_resolution: m.y_resolution,
            z_resolution: m.z_resolution,
            supersample: m.supersample,
        }
    }
}

/// Inverse-gamma hyperparameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoiseMessage {
    pub alpha: f64,
    pub beta: f64,
}

impl From<&NoiseSpec> for NoiseMessage {
    fn from(n: &NoiseSpec) -> Self {
        Self {
            alpha: n.inverse_gamma_alpha,
            beta: n.inverse_gamma_beta,
        }
    }
}

impl From<NoiseMessage> for NoiseSpec {
    fn from(m: NoiseMessage) -> Self {
        Self {
            inverse_gamma_alpha: m.alpha,
            inverse_gamma_beta: m.beta,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingsMessage {
    pub num_readings: u64,
    pub readings: Vec<f64>,
}

impl ReadingsMessage {
    pub fn from_slice(readings: &[f64]) -> Self {
        Self {
            num_readings: readings.len() as u64,
            readings: readings.to_vec(),
        }
    }

    pub fn into_readings(self, kind: SensorKind) -> Result<Vec<f64>, CodecError> {
        if self.num_readings != self.readings.len() as u64 {
            return Err(CodecError::CountMismatch {
                kind,
                record: RecordType::Results,
                field: "num_readings",
                declared: self.num_readings,
                actual: self.readings.len() as u64,
            });
        }
        Ok(self.readings)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamsMessage {
    pub return_sensor_data: bool,
}

/// Likelihood plus readings behind a presence flag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultsMessage {
    pub likelihood: f64,
    pub readings: Option<ReadingsMessage>,
}

impl ResultsMessage {
    pub fn new(readings: Option<&[f64]>, likelihood: f64) -> Self {
        Self {
            likelihood,
            readings: readings.map(ReadingsMessage::from_slice),
        }
    }

    /// Split into `(readings, likelihood)`
    pub fn into_parts(self, kind: SensorKind) -> Result<(Option<Vec<f64>>, f64), CodecError> {
        let readings = self
            .readings
            .map(|message| message.into_readings(kind))
            .transpose()?;
        Ok((readings, self.likelihood))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locations_count_mismatch() {
        let message = LocationsMessage {
            num_locations: 2,
            coordinates: vec![0.0, 1.0, 2.0],
        };
        let err = message
            .into_points(SensorKind::Gravity, RecordType::Spec)
            .unwrap_err();
        assert!(matches!(
            err,
            CodecError::CountMismatch {
                declared: 2,
                actual: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_locations_reject_partial_point() {
        let message = LocationsMessage {
            num_locations: 1,
            coordinates: vec![0.0, 1.0, 2.0, 3.0],
        };
        assert!(message
            .into_points(SensorKind::Thermal, RecordType::Spec)
            .is_err());
    }

    #[test]
    fn test_locations_overflowing_count() {
        let message = LocationsMessage {
            num_locations: u64::MAX,
            coordinates: vec![],
        };
        assert!(message
            .into_points(SensorKind::Magnetism, RecordType::Spec)
            .is_err());
    }

    #[test]
    fn test_results_parts() {
        let message = ResultsMessage::new(Some(&[1.0, 2.0]), -3.5);
        assert_eq!(
            message.into_parts(SensorKind::Gravity).unwrap(),
            (Some(vec![1.0, 2.0]), -3.5)
        );

        let empty = ResultsMessage::new(None, 0.0);
        assert_eq!(empty.into_parts(SensorKind::Gravity).unwrap(), (None, 0.0));
    }

    #[test]
    fn test_readings_count_mismatch() {
        let message = ResultsMessage {
            likelihood: 0.0,
            readings: Some(ReadingsMessage {
                num_readings: 5,
                readings: vec![1.0],
            }),
        };
        let err = message.into_parts(SensorKind::Magnetism).unwrap_err();
        assert_eq!(err.reason(), "count_mismatch");
    }
}
