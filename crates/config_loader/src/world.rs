//! World geometry options (`world.xBounds`, `world.yBounds`, `world.zBounds`)

use contracts::{Bounds, ConfigError, OptionSet, WorldSpec};

pub const X_BOUNDS: &str = "world.xBounds";
pub const Y_BOUNDS: &str = "world.yBounds";
pub const Z_BOUNDS: &str = "world.zBounds";

/// Every option name in the `world` section
pub const WORLD_OPTIONS: [&str; 3] = [X_BOUNDS, Y_BOUNDS, Z_BOUNDS];

/// Parse the world extent; the vertical bound defaults to unbounded
pub fn parse_world(options: &OptionSet) -> Result<WorldSpec, ConfigError> {
    Ok(WorldSpec {
        x_bounds: options.required(X_BOUNDS)?,
        y_bounds: options.required(Y_BOUNDS)?,
        z_bounds: options.optional(Z_BOUNDS)?.unwrap_or(Bounds::UNBOUNDED),
    })
}

pub fn write_world(world: &WorldSpec) -> OptionSet {
    let mut options = OptionSet::new();
    options.set(X_BOUNDS, &world.x_bounds);
    options.set(Y_BOUNDS, &world.y_bounds);
    options.set(Z_BOUNDS, &world.z_bounds);
    options
}
