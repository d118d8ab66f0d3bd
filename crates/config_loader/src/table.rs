//! Tabular data files referenced by options
//!
//! Headerless CSV, one row per location or reading. Values are written with the
//! shortest round-tripping decimal form, so a write followed by a read is bit-exact.

use std::fs;
use std::path::Path;

use contracts::{ConfigError, Vector3};
use tracing::debug;

/// Read a three-column table of locations
pub fn read_points(option: &str, path: &Path) -> Result<Vec<Vector3>, ConfigError> {
    let rows = read_rows::<3>(option, path)?;
    Ok(rows.into_iter().map(Vector3::from_array).collect())
}

/// Read a single-column table of readings
pub fn read_column(option: &str, path: &Path) -> Result<Vec<f64>, ConfigError> {
    let rows = read_rows::<1>(option, path)?;
    Ok(rows.into_iter().map(|[value]| value).collect())
}

pub fn write_points(path: &Path, points: &[Vector3]) -> Result<(), ConfigError> {
    write_rows(path, points.iter().map(|p| p.to_array()))
}

pub fn write_column(path: &Path, values: &[f64]) -> Result<(), ConfigError> {
    write_rows(path, values.iter().map(|v| [*v]))
}

fn read_rows<const N: usize>(option: &str, path: &Path) -> Result<Vec<[f64; N]>, ConfigError> {
    let table_read = |message: String| ConfigError::TableRead {
        option: option.to_string(),
        path: path.to_path_buf(),
        message,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| table_read(e.to_string()))?;

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let row = i + 1;
        let record = record.map_err(|e| table_read(e.to_string()))?;
        if record.len() != N {
            return Err(ConfigError::TableShape {
                option: option.to_string(),
                path: path.to_path_buf(),
                row,
                expected: N,
                found: record.len(),
            });
        }

        let mut values = [0.0; N];
        for (slot, field) in values.iter_mut().zip(record.iter()) {
            *slot = field
                .parse()
                .map_err(|e| table_read(format!("row {row}: '{field}' is not a number: {e}")))?;
        }
        rows.push(values);
    }

    debug!(option, path = %path.display(), rows = rows.len(), "table loaded");
    Ok(rows)
}

fn write_rows<const N: usize>(
    path: &Path,
    rows: impl Iterator<Item = [f64; N]>,
) -> Result<(), ConfigError> {
    let table_write = |message: String| ConfigError::TableWrite {
        path: path.to_path_buf(),
        message,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|e| table_write(e.to_string()))?;

    let mut count = 0usize;
    for row in rows {
        writer
            .write_record(row.iter().map(|v| v.to_string()))
            .map_err(|e| table_write(e.to_string()))?;
        count += 1;
    }
    writer.flush()?;

    debug!(path = %path.display(), rows = count, "table written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_points_round_trip_bit_exact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("locations.csv");
        let points = vec![
            Vector3::new(0.1, 0.2, 0.3),
            Vector3::new(-1.0 / 3.0, 1e-300, 6.02214076e23),
        ];

        write_points(&path, &points).unwrap();
        let back = read_points("gravity.sensorLocations", &path).unwrap();
        assert_eq!(back, points);
        for (a, b) in back.iter().zip(&points) {
            assert_eq!(a.x.to_bits(), b.x.to_bits());
        }
    }

    #[test]
    fn test_read_trims_whitespace_and_skips_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("readings.csv");
        fs::write(&path, " 1.5\n\n2.5 \n").unwrap();
        assert_eq!(read_column("gravity.sensorReadings", &path).unwrap(), vec![1.5, 2.5]);
    }

    #[test]
    fn test_wrong_column_count() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("locations.csv");
        fs::write(&path, "0,0,0\n1,2\n").unwrap();

        let err = read_points("magnetism.sensorLocations", &path).unwrap_err();
        match err {
            ConfigError::TableShape {
                row,
                expected,
                found,
                option,
                ..
            } => {
                assert_eq!(row, 2);
                assert_eq!(expected, 3);
                assert_eq!(found, 2);
                assert_eq!(option, "magnetism.sensorLocations");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_file() {
        let err = read_column("thermal.sensorReadings", Path::new("/nonexistent/readings.csv"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::TableRead { .. }));
    }

    #[test]
    fn test_non_numeric_cell() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("readings.csv");
        fs::write(&path, "1.0\nabc\n").unwrap();
        let err = read_column("gravity.sensorReadings", &path).unwrap_err();
        assert!(err.to_string().contains("row 2"), "got: {err}");
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out/readings.csv");
        write_column(&path, &[]).unwrap();
        assert_eq!(read_column("x", &path).unwrap(), Vec::<f64>::new());
    }
}
