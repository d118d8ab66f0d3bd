//! Thermal sensor
//!
//! Borehole temperature probes. They sit inside the model volume, so unlike the
//! surface kinds every location is also checked against the vertical bound.

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

pub const SURFACE_TEMPERATURE: &str = "surfaceTemperature";
pub const LOWER_BOUNDARY: &str = "lowerBoundary";
pub const LOWER_BOUNDARY_IS_HEAT_FLOW: &str = "lowerBoundaryIsHeatFlow";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Thermal;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThermalSpec {
    pub locations: Vec<Vector3>,
    pub voxelisation: Voxelisation,
    pub noise: NoiseSpec,
    /// Fixed temperature at the top of the model
    pub surface_temperature: f64,
    /// Temperature, or heat flow when `lower_boundary_is_heat_flow`, at the base
    pub lower_boundary: f64,
    pub lower_boundary_is_heat_flow: bool,
}

impl_sensor_spec!(ThermalSpec);

define_run_records!(
    SensorKind::Thermal,
    ThermalParams,
    ThermalResults,
    ThermalPrior
);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThermalSpecMessage {
    pub locations: LocationsMessage,
    pub voxelisation: VoxelisationMessage,
    pub noise: NoiseMessage,
    pub surface_temperature: f64,
    pub lower_boundary: f64,
    pub lower_boundary_is_heat_flow: bool,
}

impl WireRecord for ThermalSpec {
    const KIND: SensorKind = SensorKind::Thermal;
    const RECORD: RecordType = RecordType::Spec;

    type Message = ThermalSpecMessage;

    fn to_message(&self) -> ThermalSpecMessage {
        ThermalSpecMessage {
            locations: LocationsMessage::from_points(&self.locations),
            voxelisation: (&self.voxelisation).into(),
            noise: (&self.noise).into(),
            surface_temperature: self.surface_temperature,
            lower_boundary: self.lower_boundary,
            lower_boundary_is_heat_flow: self.lower_boundary_is_heat_flow,
        }
    }

    fn from_message(message: ThermalSpecMessage) -> Result<Self, CodecError> {
        Ok(Self {
            locations: message.locations.into_points(Self::KIND, Self::RECORD)?,
            voxelisation: message.voxelisation.into(),
            noise: message.noise.into(),
            surface_temperature: message.surface_temperature,
            lower_boundary: message.lower_boundary,
            lower_boundary_is_heat_flow: message.lower_boundary_is_heat_flow,
        })
    }
}

impl SensorModel for Thermal {
    const KIND: SensorKind = SensorKind::Thermal;

    type Spec = ThermalSpec;
    type Params = ThermalParams;
    type Results = ThermalResults;
    type Prior = ThermalPrior;

    fn declared_options() -> OptionSchema {
        common::base_schema(Self::KIND)
            .required::<f64>(
                SURFACE_TEMPERATURE,
                OptionRole::Spec,
                "temperature held at the top of the model",
            )
            .required::<f64>(
                LOWER_BOUNDARY,
                OptionRole::Spec,
                "temperature or heat flow held at the base of the model",
            )
            .optional::<bool>(
                LOWER_BOUNDARY_IS_HEAT_FLOW,
                OptionRole::Spec,
                "treat lowerBoundary as a heat flow instead of a temperature",
            )
    }

    fn parse_spec(options: &OptionSet) -> Result<ThermalSpec, ConfigError> {
        let geometry = common::parse_geometry(Self::KIND, options)?;
        Ok(ThermalSpec {
            locations: geometry.locations,
            voxelisation: geometry.voxelisation,
            noise: geometry.noise,
            surface_temperature: options.required(&Self::KIND.option(SURFACE_TEMPERATURE))?,
            lower_boundary: options.required(&Self::KIND.option(LOWER_BOUNDARY))?,
            lower_boundary_is_heat_flow: options
                .flag(&Self::KIND.option(LOWER_BOUNDARY_IS_HEAT_FLOW))?,
        })
    }

    fn parse_params(options: &OptionSet) -> Result<ThermalParams, ConfigError> {
        Ok(ThermalParams {
            return_sensor_data: common::parse_return_sensor_data(Self::KIND, options)?,
        })
    }

    fn parse_prior(_options: &OptionSet) -> Result<ThermalPrior, ConfigError> {
        Ok(ThermalPrior)
    }

    fn parse_sensor_readings(options: &OptionSet) -> Result<ThermalResults, ConfigError> {
        Ok(ThermalResults {
            readings: common::parse_readings(Self::KIND, options)?,
            likelihood: 0.0,
        })
    }

    fn write_spec(prefix: &str, spec: &ThermalSpec) -> Result<OptionSet, ConfigError> {
        let mut options = common::write_geometry(
            Self::KIND,
            prefix,
            &spec.locations,
            &spec.voxelisation,
            &spec.noise,
        )?;
        options.set(
            Self::KIND.option(SURFACE_TEMPERATURE),
            &spec.surface_temperature,
        );
        options.set(Self::KIND.option(LOWER_BOUNDARY), &spec.lower_boundary);
        options.set(
            Self::KIND.option(LOWER_BOUNDARY_IS_HEAT_FLOW),
            &spec.lower_boundary_is_heat_flow,
        );
        Ok(options)
    }

    fn write_params(params: &ThermalParams) -> OptionSet {
        common::write_return_sensor_data(Self::KIND, params.return_sensor_data)
    }

    fn write_results(prefix: &str, results: &ThermalResults) -> Result<OptionSet, ConfigError> {
        common::write_readings(Self::KIND, prefix, results.readings.as_deref())
    }

    fn validate(
        world: &WorldSpec,
        spec: &ThermalSpec,
        results: &ThermalResults,
    ) -> ValidationReport {
        let mut report = ValidationReport::new();
        validation::check_geometry(Self::KIND, world, spec, &Axis::ALL, &mut report);
        validation::check_finite(
            Self::KIND,
            SURFACE_TEMPERATURE,
            &[spec.surface_temperature],
            &mut report,
        );
        validation::check_finite(
            Self::KIND,
            LOWER_BOUNDARY,
            &[spec.lower_boundary],
            &mut report,
        );
        validation::check_readings(Self::KIND, spec, results, &mut report);
        report
    }

    fn enable_properties(mask: &mut PropertyMask) {
        mask.enable(RockProperty::ThermalConductivity);
        mask.enable(RockProperty::ThermalProductivity);
    }
}
