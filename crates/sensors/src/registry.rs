//! Sensor registry
//!
//! [`dispatch`] is the one place a runtime [`SensorKind`] turns into a typed
//! [`SensorModel`]; every kind-erased operation goes through it. The generic wrappers
//! add the disabled-kind short-circuit, logging and metrics around the per-kind
//! operations.

use std::collections::BTreeSet;

use config_loader::parse_world;
use contracts::{
    ConfigError, OptionSchema, OptionSet, PropertyMask, SensorKind, SensorModel, SensorSpec,
    ValidationReport, WorldSpec,
};
use tracing::{debug, error};

use crate::kinds::{Gravity, Magnetism, Thermal};

/// Operation generic over the sensor model, run for a kind chosen at runtime
pub trait KindVisitor {
    type Output;

    fn visit<M: RegisteredSensor>(&mut self) -> Self::Output;
}

/// Hand the visitor the model registered for `kind`
pub fn dispatch<V: KindVisitor>(kind: SensorKind, visitor: &mut V) -> V::Output {
    match kind {
        SensorKind::Gravity => visitor.visit::<Gravity>(),
        SensorKind::Magnetism => visitor.visit::<Magnetism>(),
        SensorKind::Thermal => visitor.visit::<Thermal>(),
    }
}

/// Model with a slot in [`SensorSuite`]
pub trait RegisteredSensor: SensorModel + std::fmt::Debug + Clone + Default + PartialEq {
    fn records(suite: &SensorSuite) -> &SensorRecords<Self>;

    fn records_mut(suite: &mut SensorSuite) -> &mut SensorRecords<Self>;
}

impl RegisteredSensor for Gravity {
    fn records(suite: &SensorSuite) -> &SensorRecords<Self> {
        &suite.gravity
    }

    fn records_mut(suite: &mut SensorSuite) -> &mut SensorRecords<Self> {
        &mut suite.gravity
    }
}

impl RegisteredSensor for Magnetism {
    fn records(suite: &SensorSuite) -> &SensorRecords<Self> {
        &suite.magnetism
    }

    fn records_mut(suite: &mut SensorSuite) -> &mut SensorRecords<Self> {
        &mut suite.magnetism
    }
}

impl RegisteredSensor for Thermal {
    fn records(suite: &SensorSuite) -> &SensorRecords<Self> {
        &suite.thermal
    }

    fn records_mut(suite: &mut SensorSuite) -> &mut SensorRecords<Self> {
        &mut suite.thermal
    }
}

/// Kinds whose `<kind>.enabled` flag is set
pub fn enabled_kinds(options: &OptionSet) -> Result<BTreeSet<SensorKind>, ConfigError> {
    let mut enabled = BTreeSet::new();
    for kind in SensorKind::ALL {
        if options.flag(&kind.option("enabled"))? {
            enabled.insert(kind);
        }
    }
    Ok(enabled)
}

pub fn parse_spec<M: SensorModel>(
    options: &OptionSet,
    enabled: &BTreeSet<SensorKind>,
) -> Result<M::Spec, ConfigError> {
    if !enabled.contains(&M::KIND) {
        return Ok(M::Spec::default());
    }
    let spec = M::parse_spec(options)?;
    debug!(kind = %M::KIND, locations = spec.locations().len(), "spec parsed");
    Ok(spec)
}

pub fn parse_params<M: SensorModel>(
    options: &OptionSet,
    enabled: &BTreeSet<SensorKind>,
) -> Result<M::Params, ConfigError> {
    if !enabled.contains(&M::KIND) {
        return Ok(M::Params::default());
    }
    M::parse_params(options)
}

pub fn parse_prior<M: SensorModel>(
    options: &OptionSet,
    enabled: &BTreeSet<SensorKind>,
) -> Result<M::Prior, ConfigError> {
    if !enabled.contains(&M::KIND) {
        return Ok(M::Prior::default());
    }
    M::parse_prior(options)
}

pub fn parse_sensor_readings<M: SensorModel>(
    options: &OptionSet,
    enabled: &BTreeSet<SensorKind>,
) -> Result<M::Results, ConfigError> {
    if !enabled.contains(&M::KIND) {
        return Ok(M::Results::default());
    }
    M::parse_sensor_readings(options)
}

/// Validate one kind, logging every diagnostic
pub fn validate<M: SensorModel>(
    world: &WorldSpec,
    spec: &M::Spec,
    results: &M::Results,
) -> ValidationReport {
    let report = M::validate(world, spec, results);
    for diagnostic in report.diagnostics() {
        error!(
            kind = %diagnostic.kind,
            field = diagnostic.field,
            index = ?diagnostic.index,
            "{}",
            diagnostic.violation
        );
    }
    observability::record_validation(M::KIND, &report);
    report
}

pub fn declared_options(kind: SensorKind) -> OptionSchema {
    struct Declared;

    impl KindVisitor for Declared {
        type Output = OptionSchema;

        fn visit<M: RegisteredSensor>(&mut self) -> OptionSchema {
            M::declared_options()
        }
    }

    dispatch(kind, &mut Declared)
}

/// Schemas of every registered kind
pub fn all_declared_options() -> Vec<OptionSchema> {
    SensorKind::ALL.into_iter().map(declared_options).collect()
}

pub fn enable_properties(kind: SensorKind, mask: &mut PropertyMask) {
    struct Enable<'a>(&'a mut PropertyMask);

    impl KindVisitor for Enable<'_> {
        type Output = ();

        fn visit<M: RegisteredSensor>(&mut self) {
            M::enable_properties(self.0);
        }
    }

    dispatch(kind, &mut Enable(mask));
}

/// Every record of one kind
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SensorRecords<M: SensorModel> {
    pub spec: M::Spec,
    pub params: M::Params,
    pub prior: M::Prior,
    pub results: M::Results,
}

impl<M: SensorModel> SensorRecords<M> {
    /// Parse all four records; a disabled kind yields zero values
    pub fn from_options(
        options: &OptionSet,
        enabled: &BTreeSet<SensorKind>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            spec: parse_spec::<M>(options, enabled)?,
            params: parse_params::<M>(options, enabled)?,
            prior: parse_prior::<M>(options, enabled)?,
            results: parse_sensor_readings::<M>(options, enabled)?,
        })
    }

    /// Emit the options that parse back to these records
    pub fn to_options(&self, prefix: &str) -> Result<OptionSet, ConfigError> {
        let mut options = M::write_spec(prefix, &self.spec)?;
        options.merge(M::write_params(&self.params));
        options.merge(M::write_results(prefix, &self.results)?);
        Ok(options)
    }
}

/// Records of every kind side by side, plus the world they are checked against
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SensorSuite {
    pub enabled: BTreeSet<SensorKind>,
    pub world: WorldSpec,
    pub gravity: SensorRecords<Gravity>,
    pub magnetism: SensorRecords<Magnetism>,
    pub thermal: SensorRecords<Thermal>,
}

impl SensorSuite {
    /// Build every kind's records from one option set
    ///
    /// World bounds are only required once some kind is enabled.
    pub fn from_options(options: &OptionSet) -> Result<Self, ConfigError> {
        let enabled = enabled_kinds(options)?;
        let world = if enabled.is_empty() {
            WorldSpec::default()
        } else {
            parse_world(options)?
        };

        let suite = Self {
            gravity: SensorRecords::from_options(options, &enabled)?,
            magnetism: SensorRecords::from_options(options, &enabled)?,
            thermal: SensorRecords::from_options(options, &enabled)?,
            enabled,
            world,
        };
        debug!(enabled = ?suite.enabled, "sensor suite built");
        Ok(suite)
    }

    pub fn is_enabled(&self, kind: SensorKind) -> bool {
        self.enabled.contains(&kind)
    }

    pub fn records<M: RegisteredSensor>(&self) -> &SensorRecords<M> {
        M::records(self)
    }

    pub fn records_mut<M: RegisteredSensor>(&mut self) -> &mut SensorRecords<M> {
        M::records_mut(self)
    }

    /// Validate every enabled kind into one report
    pub fn validate(&self) -> ValidationReport {
        struct Validate<'a> {
            suite: &'a SensorSuite,
        }

        impl KindVisitor for Validate<'_> {
            type Output = ValidationReport;

            fn visit<M: RegisteredSensor>(&mut self) -> ValidationReport {
                let records = M::records(self.suite);
                validate::<M>(&self.suite.world, &records.spec, &records.results)
            }
        }

        let mut report = ValidationReport::new();
        for &kind in &self.enabled {
            report.merge(dispatch(kind, &mut Validate { suite: self }));
        }
        report
    }

    /// Rock properties the enabled kinds need
    pub fn property_mask(&self) -> PropertyMask {
        let mut mask = PropertyMask::new();
        for &kind in &self.enabled {
            enable_properties(kind, &mut mask);
        }
        mask
    }

    /// Emit the world and every kind's options
    ///
    /// Tables go to `prefix + "<kind>_<field>.csv"`. Disabled kinds only get their
    /// switch. The likelihood is not an option and is not written.
    pub fn to_options(&self, prefix: &str) -> Result<OptionSet, ConfigError> {
        struct WriteKind<'a> {
            suite: &'a SensorSuite,
            prefix: &'a str,
        }

        impl KindVisitor for WriteKind<'_> {
            type Output = Result<OptionSet, ConfigError>;

            fn visit<M: RegisteredSensor>(&mut self) -> Self::Output {
                let mut options = OptionSet::new();
                let enabled = self.suite.is_enabled(M::KIND);
                options.set(M::KIND.option("enabled"), &enabled);
                if enabled {
                    let prefix = format!("{}{}_", self.prefix, M::KIND.heading());
                    options.merge(M::records(self.suite).to_options(&prefix)?);
                }
                Ok(options)
            }
        }

        let mut options = if self.enabled.is_empty() {
            OptionSet::new()
        } else {
            config_loader::write_world(&self.world)
        };
        for kind in SensorKind::ALL {
            options.merge(dispatch(kind, &mut WriteKind { suite: self, prefix })?);
        }
        debug!(prefix, options = options.len(), "sensor suite written");
        Ok(options)
    }
}
