//! SensorModel trait - the capability set every sensor kind implements
//!
//! A kind supplies four record types and the operations over them. The registry in
//! the `sensors` crate wraps these operations with the enabled/disabled short-circuit,
//! logging and metrics; the methods here only ever see enabled kinds.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::{
    CodecError, ConfigError, NoiseSpec, OptionSchema, OptionSet, PropertyMask, RecordType,
    SensorKind, ValidationReport, Vector3, Voxelisation, WorldSpec,
};

/// Plain record: owned, comparable, with a zero value for disabled kinds
pub trait Record: fmt::Debug + Clone + PartialEq + Default + Send + Sync + 'static {}

impl<T> Record for T where T: fmt::Debug + Clone + PartialEq + Default + Send + Sync + 'static {}

/// Geometry shared by every Spec
pub trait SensorSpec: Record {
    fn locations(&self) -> &[Vector3];
    fn voxelisation(&self) -> &Voxelisation;
    fn noise(&self) -> &NoiseSpec;
}

/// Readings shared by every Results
pub trait SensorResults: Record {
    /// `None` until a forward-model run (or observed data) supplies them
    fn readings(&self) -> Option<&[f64]>;
    fn likelihood(&self) -> f64;
}

/// Distribution over a kind's free parameters
pub trait ParamsPrior: Record {
    type Params: Record;

    /// Number of free parameters
    fn dimension(&self) -> usize;

    /// Draw a Params value; kinds without free parameters return the point mass
    fn sample(&self) -> Self::Params;
}

/// Record that crosses the process boundary
///
/// `Message` is the logical wire layout; counts and presence flags live there so the
/// record itself stays free of transport concerns.
pub trait WireRecord: Record {
    const KIND: SensorKind;
    const RECORD: RecordType;

    type Message: Serialize + DeserializeOwned;

    fn to_message(&self) -> Self::Message;

    /// Rebuild the record, rejecting messages whose counts disagree with their data
    fn from_message(message: Self::Message) -> Result<Self, CodecError>;
}

/// Per-kind capability set
pub trait SensorModel: Send + Sync + 'static {
    const KIND: SensorKind;

    type Spec: SensorSpec + WireRecord;
    type Params: Record + WireRecord;
    type Results: SensorResults + WireRecord;
    type Prior: ParamsPrior<Params = Self::Params>;

    /// Every option this kind reads or writes
    fn declared_options() -> OptionSchema;

    fn parse_spec(options: &OptionSet) -> Result<Self::Spec, ConfigError>;

    fn parse_params(options: &OptionSet) -> Result<Self::Params, ConfigError>;

    fn parse_prior(options: &OptionSet) -> Result<Self::Prior, ConfigError>;

    /// Observed readings; likelihood starts at 0 until a forward-model run sets it
    fn parse_sensor_readings(options: &OptionSet) -> Result<Self::Results, ConfigError>;

    /// Emit the Spec-role options, writing tables to `prefix + "<field>.csv"`
    fn write_spec(prefix: &str, spec: &Self::Spec) -> Result<OptionSet, ConfigError>;

    fn write_params(params: &Self::Params) -> OptionSet;

    /// Emit the Results-role options, writing tables to `prefix + "<field>.csv"`
    fn write_results(prefix: &str, results: &Self::Results) -> Result<OptionSet, ConfigError>;

    fn validate(world: &WorldSpec, spec: &Self::Spec, results: &Self::Results)
        -> ValidationReport;

    /// Set the rock properties this kind's forward model reads
    fn enable_properties(mask: &mut PropertyMask);
}
