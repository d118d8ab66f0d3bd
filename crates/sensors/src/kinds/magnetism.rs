//! Magnetism sensor
//!
//! Total-field magnetometers; the ambient field the anomaly is measured against is
//! part of the Spec.

use contracts::{
    Axis, CodecError, ConfigError, NoiseSpec, OptionRole, OptionSchema, OptionSet, PropertyMask,
    RecordType, RockProperty, SensorKind, SensorModel, ValidationReport, Vector3, Voxelisation,
    WireRecord, WorldSpec,
};
use serde::{Deserialize, Serialize};

use crate::kinds::common;
use crate::macros::{define_run_records, impl_sensor_spec};
use crate::validation;
use crate::wire::{LocationsMessage, NoiseMessage, VoxelisationMessage};

pub const MAGNETIC_FIELD: &str = "magneticField";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Magnetism;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MagnetismSpec {
    pub locations: Vec<Vector3>,
    pub voxelisation: Voxelisation,
    pub noise: NoiseSpec,
    /// Background (inducing) field vector
    pub background_field: Vector3,
}

impl_sensor_spec!(MagnetismSpec);

define_run_records!(
    SensorKind::Magnetism,
    MagnetismParams,
    MagnetismResults,
    MagnetismPrior
);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MagnetismSpecMessage {
    pub locations: LocationsMessage,
    pub voxelisation: VoxelisationMessage,
    pub noise: NoiseMessage,
    pub background_field: [f64; 3],
}

impl WireRecord for MagnetismSpec {
    const KIND: SensorKind = SensorKind::Magnetism;
    const RECORD: RecordType = RecordType::Spec;

    type Message = MagnetismSpecMessage;

    fn to_message(&self) -> MagnetismSpecMessage {
        MagnetismSpecMessage {
            locations: LocationsMessage::from_points(&self.locations),
            voxelisation: (&self.voxelisation).into(),
            noise: (&self.noise).into(),
            background_field: self.background_field.to_array(),
        }
    }

    fn from_message(message: MagnetismSpecMessage) -> Result<Self, CodecError> {
        Ok(Self {
            locations: message.locations.into_points(Self::KIND, Self::RECORD)?,
            voxelisation: message.voxelisation.into(),
            noise: message.noise.into(),
            background_field: Vector3::from_array(message.background_field),
        })
    }
}

impl SensorModel for Magnetism {
    const KIND: SensorKind = SensorKind::Magnetism;

    type Spec = MagnetismSpec;
    type Params = MagnetismParams;
    type Results = MagnetismResults;
    type Prior = MagnetismPrior;

    fn declared_options() -> OptionSchema {
        common::base_schema(Self::KIND).required::<Vector3>(
            MAGNETIC_FIELD,
            OptionRole::Spec,
            "background magnetic field vector (x, y, z)",
        )
    }

    fn parse_spec(options: &OptionSet) -> Result<MagnetismSpec, ConfigError> {
        let geometry = common::parse_geometry(Self::KIND, options)?;
        Ok(MagnetismSpec {
            locations: geometry.locations,
            voxelisation: geometry.voxelisation,
            noise: geometry.noise,
            background_field: options.required(&Self::KIND.option(MAGNETIC_FIELD))?,
        })
    }

    fn parse_params(options: &OptionSet) -> Result<MagnetismParams, ConfigError> {
        Ok(MagnetismParams {
            return_sensor_data: common::parse_return_sensor_data(Self::KIND, options)?,
        })
    }

    fn parse_prior(_options: &OptionSet) -> Result<MagnetismPrior, ConfigError> {
        Ok(MagnetismPrior)
    }

    fn parse_sensor_readings(options: &OptionSet) -> Result<MagnetismResults, ConfigError> {
        Ok(MagnetismResults {
            readings: common::parse_readings(Self::KIND, options)?,
            likelihood: 0.0,
        })
    }

    fn write_spec(prefix: &str, spec: &MagnetismSpec) -> Result<OptionSet, ConfigError> {
        let mut options = common::write_geometry(
            Self::KIND,
            prefix,
            &spec.locations,
            &spec.voxelisation,
            &spec.noise,
        )?;
        options.set(Self::KIND.option(MAGNETIC_FIELD), &spec.background_field);
        Ok(options)
    }

    fn write_params(params: &MagnetismParams) -> OptionSet {
        common::write_return_sensor_data(Self::KIND, params.return_sensor_data)
    }

    fn write_results(
        prefix: &str,
        results: &MagnetismResults,
    ) -> Result<OptionSet, ConfigError> {
        common::write_readings(Self::KIND, prefix, results.readings.as_deref())
    }

    fn validate(
        world: &WorldSpec,
        spec: &MagnetismSpec,
        results: &MagnetismResults,
    ) -> ValidationReport {
        let mut report = ValidationReport::new();
        validation::check_geometry(Self::KIND, world, spec, &Axis::HORIZONTAL, &mut report);
        validation::check_finite(
            Self::KIND,
            MAGNETIC_FIELD,
            &spec.background_field.to_array(),
            &mut report,
        );
        validation::check_readings(Self::KIND, spec, results, &mut report);
        report
    }

    fn enable_properties(mask: &mut PropertyMask) {
        mask.enable(RockProperty::LogSusceptibility);
    }
}
