//! # Contracts
//!
//! Frozen interface contracts shared by the sensor registry, the option loader and
//! the worker transport. Business crates depend on this crate only; reverse
//! dependencies are prohibited.
//!
//! ## Record model
//! - Each [`SensorKind`] owns a Spec, Params, Results and Prior record
//! - Disabled kinds carry the zero value of each record, never `None`
//! - Records crossing the process boundary implement [`WireRecord`]

mod error;
mod geometry;
mod kind;
mod model;
mod options;
mod property;
mod validation;

pub use error::*;
pub use geometry::*;
pub use kind::*;
pub use model::*;
pub use options::*;
pub use property::*;
pub use validation::*;
