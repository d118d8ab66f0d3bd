//! Command implementations.

mod rewrite;
mod roundtrip;
mod schema;
mod validate;

pub use rewrite::run_rewrite;
pub use roundtrip::run_roundtrip;
pub use schema::run_schema;
pub use validate::run_validate;

use std::path::Path;

use config_loader::{ConfigLoader, OptionSet};
use sensors::SensorSuite;
use tracing::{info, warn};

use crate::error::{CliError, Result};

/// Load an option file and build the suite of every kind's records
///
/// Option names no schema declares are logged and returned, not rejected.
pub(crate) fn load_suite(path: &Path) -> Result<(SensorSuite, Vec<String>)> {
    if !path.exists() {
        return Err(CliError::config_not_found(path.display().to_string()));
    }

    let options: OptionSet = ConfigLoader::load_from_path(path)?;
    let unknown = config_loader::lint::unknown_options(&options, &sensors::all_declared_options());
    for name in &unknown {
        warn!(option = %name, "option is not declared by any sensor kind");
    }

    let suite = SensorSuite::from_options(&options)?;
    info!(
        config = %path.display(),
        enabled = ?suite.enabled,
        "sensor records loaded"
    );
    Ok((suite, unknown))
}
