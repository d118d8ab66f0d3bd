//! 传感器类型实现
//!
//! 每个类型提供 Spec / Params / Results / Prior 记录及其 `SensorModel` 实现。

pub mod common;
pub mod gravity;
pub mod magnetism;
pub mod thermal;

pub use gravity::{Gravity, GravityParams, GravityPrior, GravityResults, GravitySpec};
pub use magnetism::{
    Magnetism, MagnetismParams, MagnetismPrior, MagnetismResults, MagnetismSpec,
};
pub use thermal::{Thermal, ThermalParams, ThermalPrior, ThermalResults, ThermalSpec};
