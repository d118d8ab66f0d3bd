//! 选项集检查
//!
//! 检查规则：
//! - 选项名必须由某个传感器的 schema 或 world 段声明
//! - 未声明的选项只作为警告返回，不中断加载 (常见原因是拼写错误)

use std::collections::BTreeSet;

use contracts::{OptionSchema, OptionSet};

use crate::world::WORLD_OPTIONS;

/// Option names that no schema declares
pub fn unknown_options(options: &OptionSet, schemas: &[OptionSchema]) -> Vec<String> {
    let declared: BTreeSet<&str> = schemas
        .iter()
        .flat_map(|schema| schema.options.iter().map(|decl| decl.name.as_str()))
        .chain(WORLD_OPTIONS)
        .collect();

    options
        .names()
        .filter(|name| !declared.contains(name))
        .map(str::to_string)
        .collect()
}
