//! # Sensors
//!
//! 传感器记录注册表：解析、写回、校验、属性掩码与传输编解码。
//!
//! ## 模块
//!
//! - [`kinds`]: gravity / magnetism / thermal 的记录类型与 `SensorModel` 实现
//! - [`registry`]: 按 `SensorKind` 分派，禁用类型返回零值记录
//! - [`validation`]: 各类型共用的不变量检查
//! - [`wire`]: 载荷编解码
//! - [`transport`]: 按载荷头路由的编解码辅助
//!
//! ## 使用示例
//!
//! ```ignore
//! use sensors::{wire, SensorSuite};
//!
//! let suite = SensorSuite::from_options(&options)?;
//! suite.validate().into_result()?;
//! let payload = wire::encode(&suite.gravity.spec)?;
//! ```

pub mod kinds;
mod macros;
pub mod registry;
pub mod transport;
pub mod validation;
pub mod wire;

pub use kinds::{Gravity, Magnetism, Thermal};
pub use registry::{
    all_declared_options, declared_options, dispatch, enable_properties, enabled_kinds,
    KindVisitor, RegisteredSensor, SensorRecords, SensorSuite,
};
pub use transport::{encode_kind, encode_suite, verify_payload, Envelope};
pub use wire::{decode, encode, Header};
