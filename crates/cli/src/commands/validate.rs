//! `validate` command implementation.

use anyhow::Context;
use contracts::{Diagnostic, RockProperty, SensorKind};
use serde::Serialize;
use tracing::info;

use super::load_suite;
use crate::cli::ValidateArgs;
use crate::error::{CliError, Result};

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<SuiteSummary>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    diagnostics: Vec<Diagnostic>,
}

#[derive(Serialize)]
struct SuiteSummary {
    enabled: Vec<SensorKind>,
    locations: Vec<(SensorKind, usize)>,
    properties: Vec<RockProperty>,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating sensor options");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if !result.diagnostics.is_empty() {
        return Err(CliError::Validation {
            count: result.diagnostics.len(),
        });
    }
    match result.error {
        Some(error) => Err(anyhow::anyhow!(error).into()),
        None => Ok(()),
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    let (suite, warnings) = match load_suite(&args.config) {
        Ok(loaded) => loaded,
        Err(e) => {
            return ValidationResult {
                valid: false,
                config_path,
                error: Some(e.to_string()),
                warnings: Vec::new(),
                summary: None,
                diagnostics: Vec::new(),
            }
        }
    };

    let report = suite.validate();
    let summary = SuiteSummary {
        enabled: suite.enabled.iter().copied().collect(),
        locations: vec![
            (SensorKind::Gravity, suite.gravity.spec.locations.len()),
            (SensorKind::Magnetism, suite.magnetism.spec.locations.len()),
            (SensorKind::Thermal, suite.thermal.spec.locations.len()),
        ]
        .into_iter()
        .filter(|(kind, _)| suite.is_enabled(*kind))
        .collect(),
        properties: suite.property_mask().enabled().collect(),
    };

    ValidationResult {
        valid: report.is_valid(),
        config_path,
        error: None,
        warnings,
        summary: Some(summary),
        diagnostics: report.diagnostics().to_vec(),
    }
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Sensor options are valid: {}", result.config_path);
    } else {
        println!("✗ Sensor options are invalid: {}", result.config_path);
    }

    if let Some(ref error) = result.error {
        println!("\n  Error: {}", error);
    }

    if let Some(ref summary) = result.summary {
        if summary.enabled.is_empty() {
            println!("\n  No sensor kinds enabled");
        }
        for (kind, count) in &summary.locations {
            println!("\n  {}: {} location(s)", kind, count);
        }
        if !summary.properties.is_empty() {
            println!("  Rock properties: {:?}", summary.properties);
        }
    }

    if !result.diagnostics.is_empty() {
        println!("\n✗ Diagnostics:");
        for diagnostic in &result.diagnostics {
            println!("  - {}", diagnostic);
        }
    }

    if !result.warnings.is_empty() {
        println!("\n⚠ Unknown options:");
        for warning in &result.warnings {
            println!("  - {}", warning);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_config(dir: &std::path::Path, y: f64) -> std::path::PathBuf {
        let locations = dir.join("grav_locations.csv");
        fs::write(&locations, format!("10,10,0\n20,{y},0\n")).unwrap();

        let config = dir.join("sensors.toml");
        fs::write(
            &config,
            format!(
                r#"
[world]
xBounds = "0 100"
yBounds = "0 100"

[gravity]
enabled = true
sensorLocations = "{}"
gridResolution = [4, 4, 4]
supersample = 1
noiseAlpha = 1.0
noiseBeta = 1.0
noiseGamma = 2.0
"#,
                locations.display()
            ),
        )
        .unwrap();
        config
    }

    #[test]
    fn test_valid_config_reports_summary_and_warnings() {
        let dir = tempfile::tempdir().unwrap();
        let args = ValidateArgs {
            config: write_config(dir.path(), 50.0),
            json: true,
        };

        let result = validate_config(&args);
        assert!(result.valid);
        assert_eq!(result.warnings, vec!["gravity.noiseGamma".to_string()]);
        let summary = result.summary.unwrap();
        assert_eq!(summary.locations, vec![(SensorKind::Gravity, 2)]);
        assert_eq!(summary.properties, vec![RockProperty::Density]);
    }

    #[test]
    fn test_invalid_config_fails_command() {
        let dir = tempfile::tempdir().unwrap();
        let args = ValidateArgs {
            config: write_config(dir.path(), 150.0),
            json: true,
        };

        let result = validate_config(&args);
        assert!(!result.valid);
        assert_eq!(result.diagnostics.len(), 1);
        assert!(matches!(
            run_validate(&args),
            Err(CliError::Validation { count: 1 })
        ));
    }

    #[test]
    fn test_missing_file() {
        let args = ValidateArgs {
            config: "/nonexistent/sensors.toml".into(),
            json: false,
        };
        let result = validate_config(&args);
        assert!(!result.valid);
        assert!(result.error.unwrap().contains("not found"));
    }
}
