//! `rewrite` command implementation.

use std::path::PathBuf;

use config_loader::ConfigLoader;
use tracing::{info, warn};

use super::load_suite;
use crate::cli::RewriteArgs;
use crate::error::Result;

/// Execute the `rewrite` command
///
/// Writes every table under `prefix` and an option file that references them, so the
/// bundle reproduces the parsed records without the original inputs.
pub fn run_rewrite(args: &RewriteArgs) -> Result<()> {
    let output = rewrite(args)?;
    println!("✓ Options written: {}", output.display());
    Ok(())
}

fn rewrite(args: &RewriteArgs) -> Result<PathBuf> {
    let (suite, _) = load_suite(&args.config)?;

    let report = suite.validate();
    if !report.is_valid() {
        warn!(
            diagnostics = report.len(),
            "rewriting records that do not validate"
        );
    }

    let options = suite.to_options(&args.prefix)?;
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("{}options.toml", args.prefix)));
    ConfigLoader::write_to_path(&output, &options)?;

    info!(
        output = %output.display(),
        options = options.len(),
        "option bundle written"
    );
    Ok(output)
}
