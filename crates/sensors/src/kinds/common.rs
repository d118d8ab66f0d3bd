//! Option handling shared by every kind
//!
//! Geometry (locations, voxelisation, noise), the `returnSensorData` knob and the
//! observed readings are declared, parsed and written the same way for all kinds.

use std::path::PathBuf;

use config_loader::table;
use contracts::{
    ConfigError, NoiseSpec, OptionRole, OptionSchema, OptionSet, SensorKind, Vector3,
    Voxelisation,
};

pub const SENSOR_LOCATIONS: &str = "sensorLocations";
pub const GRID_RESOLUTION: &str = "gridResolution";
pub const SUPERSAMPLE: &str = "supersample";
pub const NOISE_ALPHA: &str = "noiseAlpha";
pub const NOISE_BETA: &str = "noiseBeta";
pub const RETURN_SENSOR_DATA: &str = "returnSensorData";
pub const SENSOR_READINGS: &str = "sensorReadings";

/// Schema with the switch, geometry, params and results options every kind has
///
/// Kind extras are appended by the caller.
pub(crate) fn base_schema(kind: SensorKind) -> OptionSchema {
    OptionSchema::new(kind)
        .required::<PathBuf>(
            SENSOR_LOCATIONS,
            OptionRole::Spec,
            "CSV file of sensor locations, one x,y,z row per sensor",
        )
        .required::<[i32; 3]>(
            GRID_RESOLUTION,
            OptionRole::Spec,
            "grid points per cube side along x, y and z",
        )
        .required::<u32>(
            SUPERSAMPLE,
            OptionRole::Spec,
            "supersampling exponent applied to the voxel grid",
        )
        .required::<f64>(
            NOISE_ALPHA,
            OptionRole::Spec,
            "inverse gamma alpha parameter of the noise prior",
        )
        .required::<f64>(
            NOISE_BETA,
            OptionRole::Spec,
            "inverse gamma beta parameter of the noise prior",
        )
        .optional::<bool>(
            RETURN_SENSOR_DATA,
            OptionRole::Params,
            "return simulated readings from each evaluation",
        )
        .optional::<PathBuf>(
            SENSOR_READINGS,
            OptionRole::Results,
            "CSV file of observed readings, one per sensor",
        )
}

/// Geometry common to every Spec
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Geometry {
    pub locations: Vec<Vector3>,
    pub voxelisation: Voxelisation,
    pub noise: NoiseSpec,
}

pub(crate) fn parse_geometry(
    kind: SensorKind,
    options: &OptionSet,
) -> Result<Geometry, ConfigError> {
    let locations_option = kind.option(SENSOR_LOCATIONS);
    let path: PathBuf = options.required(&locations_option)?;
    let locations = table::read_points(&locations_option, &path)?;

    let [x_resolution, y_resolution, z_resolution] =
        options.required::<[i32; 3]>(&kind.option(GRID_RESOLUTION))?;

    Ok(Geometry {
        locations,
        voxelisation: Voxelisation {
            x_resolution,
            y_resolution,
            z_resolution,
            supersample: options.required(&kind.option(SUPERSAMPLE))?,
        },
        noise: NoiseSpec {
            inverse_gamma_alpha: options.required(&kind.option(NOISE_ALPHA))?,
            inverse_gamma_beta: options.required(&kind.option(NOISE_BETA))?,
        },
    })
}

/// Write the geometry options; locations go to `prefix + "sensorLocations.csv"`
pub(crate) fn write_geometry(
    kind: SensorKind,
    prefix: &str,
    locations: &[Vector3],
    voxelisation: &Voxelisation,
    noise: &NoiseSpec,
) -> Result<OptionSet, ConfigError> {
    let path = table_path(prefix, SENSOR_LOCATIONS);
    table::write_points(&path, locations)?;

    let mut options = OptionSet::new();
    options.set(kind.option(SENSOR_LOCATIONS), &path);
    options.set(kind.option(GRID_RESOLUTION), &voxelisation.resolutions());
    options.set(kind.option(SUPERSAMPLE), &voxelisation.supersample);
    options.set(kind.option(NOISE_ALPHA), &noise.inverse_gamma_alpha);
    options.set(kind.option(NOISE_BETA), &noise.inverse_gamma_beta);
    Ok(options)
}

pub(crate) fn parse_return_sensor_data(
    kind: SensorKind,
    options: &OptionSet,
) -> Result<bool, ConfigError> {
    options.flag(&kind.option(RETURN_SENSOR_DATA))
}

pub(crate) fn write_return_sensor_data(kind: SensorKind, value: bool) -> OptionSet {
    let mut options = OptionSet::new();
    options.set(kind.option(RETURN_SENSOR_DATA), &value);
    options
}

/// Observed readings, `None` when no readings table is configured
pub(crate) fn parse_readings(
    kind: SensorKind,
    options: &OptionSet,
) -> Result<Option<Vec<f64>>, ConfigError> {
    let readings_option = kind.option(SENSOR_READINGS);
    options
        .optional::<PathBuf>(&readings_option)?
        .map(|path| table::read_column(&readings_option, &path))
        .transpose()
}

/// Write the readings table, if any, to `prefix + "sensorReadings.csv"`
pub(crate) fn write_readings(
    kind: SensorKind,
    prefix: &str,
    readings: Option<&[f64]>,
) -> Result<OptionSet, ConfigError> {
    let mut options = OptionSet::new();
    if let Some(readings) = readings {
        let path = table_path(prefix, SENSOR_READINGS);
        table::write_column(&path, readings)?;
        options.set(kind.option(SENSOR_READINGS), &path);
    }
    Ok(options)
}

fn table_path(prefix: &str, field: &str) -> PathBuf {
    PathBuf::from(format!("{prefix}{field}.csv"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_schema_roles() {
        let schema = base_schema(SensorKind::Gravity);
        assert_eq!(
            schema.names_for(OptionRole::Spec).into_iter().collect::<Vec<_>>(),
            vec![
                "gravity.gridResolution",
                "gravity.noiseAlpha",
                "gravity.noiseBeta",
                "gravity.sensorLocations",
                "gravity.supersample",
            ]
        );
        assert!(!schema.get("gravity.sensorReadings").unwrap().required);
    }

    #[test]
    fn test_geometry_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = format!("{}/grav_", dir.path().display());
        let geometry = Geometry {
            locations: vec![Vector3::new(1.0, 2.0, 3.0), Vector3::new(-0.5, 0.25, 1e6)],
            voxelisation: Voxelisation {
                x_resolution: 4,
                y_resolution: -2,
                z_resolution: 0,
                supersample: 3,
            },
            noise: NoiseSpec {
                inverse_gamma_alpha: 0.1,
                inverse_gamma_beta: 1.0 / 3.0,
            },
        };

        let options = write_geometry(
            SensorKind::Gravity,
            &prefix,
            &geometry.locations,
            &geometry.voxelisation,
            &geometry.noise,
        )
        .unwrap();
        assert_eq!(
            options.get_raw("gravity.sensorLocations"),
            Some(format!("{prefix}sensorLocations.csv").as_str())
        );
        assert_eq!(parse_geometry(SensorKind::Gravity, &options).unwrap(), geometry);
    }

    #[test]
    fn test_missing_locations_option() {
        let err = parse_geometry(SensorKind::Magnetism, &OptionSet::new()).unwrap_err();
        assert!(
            err.to_string().contains("magnetism.sensorLocations"),
            "got: {err}"
        );
    }

    #[test]
    fn test_readings_absent_and_present() {
        assert_eq!(
            parse_readings(SensorKind::Thermal, &OptionSet::new()).unwrap(),
            None
        );
        assert!(write_readings(SensorKind::Thermal, "unused_", None)
            .unwrap()
            .is_empty());

        let dir = tempfile::tempdir().unwrap();
        let prefix = format!("{}/th_", dir.path().display());
        let options = write_readings(SensorKind::Thermal, &prefix, Some(&[20.5, 21.0])).unwrap();
        assert_eq!(
            parse_readings(SensorKind::Thermal, &options).unwrap(),
            Some(vec![20.5, 21.0])
        );
    }
}
