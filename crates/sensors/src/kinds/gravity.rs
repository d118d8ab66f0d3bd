//! Gravity sensor
//!
//! Point gravimeters over the surface; locations are checked against the world's
//! horizontal bounds only.

use contracts::{
    Axis, CodecError, ConfigError, NoiseSpec, OptionSchema, OptionSet, PropertyMask, RecordType,
    RockProperty, SensorKind, SensorModel, ValidationReport, Vector3, Voxelisation, WireRecord,
    WorldSpec,
};
use serde::{Deserialize, Serialize};

use crate::kinds::common;
use crate::macros::{define_run_records, impl_sensor_spec};
use crate::validation;
use crate::wire::{LocationsMessage, NoiseMessage, VoxelisationMessage};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Gravity;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GravitySpec {
    pub locations: Vec<Vector3>,
    pub voxelisation: Voxelisation,
    pub noise: NoiseSpec,
}

impl_sensor_spec!(GravitySpec);

define_run_records!(
    SensorKind::Gravity,
    GravityParams,
    GravityResults,
    GravityPrior
);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GravitySpecMessage {
    pub locations: LocationsMessage,
    pub voxelisation: VoxelisationMessage,
    pub noise: NoiseMessage,
}

impl WireRecord for GravitySpec {
    const KIND: SensorKind = SensorKind::Gravity;
    const RECORD: RecordType = RecordType::Spec;

    type Message = GravitySpecMessage;

    fn to_message(&self) -> GravitySpecMessage {
        GravitySpecMessage {
            locations: LocationsMessage::from_points(&self.locations),
            voxelisation: (&self.voxelisation).into(),
            noise: (&self.noise).into(),
        }
    }

    fn from_message(message: GravitySpecMessage) -> Result<Self, CodecError> {
        Ok(Self {
            locations: message.locations.into_points(Self::KIND, Self::RECORD)?,
            voxelisation: message.voxelisation.into(),
            noise: message.noise.into(),
        })
    }
}

impl SensorModel for Gravity {
    const KIND: SensorKind = SensorKind::Gravity;

    type Spec = GravitySpec;
    type Params = GravityParams;
    type Results = GravityResults;
    type Prior = GravityPrior;

    fn declared_options() -> OptionSchema {
        common::base_schema(Self::KIND)
    }

    fn parse_spec(options: &OptionSet) -> Result<GravitySpec, ConfigError> {
        let geometry = common::parse_geometry(Self::KIND, options)?;
        Ok(GravitySpec {
            locations: geometry.locations,
            voxelisation: geometry.voxelisation,
            noise: geometry.noise,
        })
    }

    fn parse_params(options: &OptionSet) -> Result<GravityParams, ConfigError> {
        Ok(GravityParams {
            return_sensor_data: common::parse_return_sensor_data(Self::KIND, options)?,
        })
    }

    fn parse_prior(_options: &OptionSet) -> Result<GravityPrior, ConfigError> {
        Ok(GravityPrior)
    }

    fn parse_sensor_readings(options: &OptionSet) -> Result<GravityResults, ConfigError> {
        Ok(GravityResults {
            readings: common::parse_readings(Self::KIND, options)?,
            likelihood: 0.0,
        })
    }

    fn write_spec(prefix: &str, spec: &GravitySpec) -> Result<OptionSet, ConfigError> {
        common::write_geometry(
            Self::KIND,
            prefix,
            &spec.locations,
            &spec.voxelisation,
            &spec.noise,
        )
    }

    fn write_params(params: &GravityParams) -> OptionSet {
        common::write_return_sensor_data(Self::KIND, params.return_sensor_data)
    }

    fn write_results(prefix: &str, results: &GravityResults) -> Result<OptionSet, ConfigError> {
        common::write_readings(Self::KIND, prefix, results.readings.as_deref())
    }

    fn validate(
        world: &WorldSpec,
        spec: &GravitySpec,
        results: &GravityResults,
    ) -> ValidationReport {
        let mut report = ValidationReport::new();
        validation::check_geometry(Self::KIND, world, spec, &Axis::HORIZONTAL, &mut report);
        validation::check_readings(Self::KIND, spec, results, &mut report);
        report
    }

    fn enable_properties(mask: &mut PropertyMask) {
        mask.enable(RockProperty::Density);
    }
}
