//! OptionSet / OptionSchema - the flat `<kind>.<field>` configuration surface
//!
//! Values are kept as text until a typed read; [`OptionValue`] owns both directions
//! so whatever the writer formats, the parser accepts unchanged.

use std::collections::btree_map;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::{Bounds, ConfigError, SensorKind, Vector3};

/// Flat option set keyed by full option name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionSet(BTreeMap<String, String>);

impl OptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    /// Insert a typed value using its canonical text form
    pub fn set<T: OptionValue>(&mut self, name: impl Into<String>, value: &T) {
        self.0.insert(name.into(), value.format_option());
    }

    pub fn get_raw(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Merge `other` into `self`; values in `other` win
    pub fn merge(&mut self, other: OptionSet) {
        self.0.extend(other.0);
    }

    /// Read a required typed option
    pub fn required<T: OptionValue>(&self, name: &str) -> Result<T, ConfigError> {
        self.optional(name)?
            .ok_or_else(|| ConfigError::missing(name))
    }

    /// Read an optional typed option; present-but-malformed is still an error
    pub fn optional<T: OptionValue>(&self, name: &str) -> Result<Option<T>, ConfigError> {
        match self.get_raw(name) {
            None => Ok(None),
            Some(raw) => T::parse_option(raw)
                .map(Some)
                .map_err(|reason| ConfigError::malformed(name, raw, reason)),
        }
    }

    /// Read a boolean flag that defaults to `false`
    pub fn flag(&self, name: &str) -> Result<bool, ConfigError> {
        Ok(self.optional::<bool>(name)?.unwrap_or(false))
    }
}

impl FromIterator<(String, String)> for OptionSet {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<(String, String)> for OptionSet {
    fn extend<I: IntoIterator<Item = (String, String)>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl IntoIterator for OptionSet {
    type Item = (String, String);
    type IntoIter = btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Declared type of an option value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionType {
    Bool,
    UnsignedInt,
    Float,
    IntVector3,
    FloatVector3,
    FloatPair,
    Path,
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Bool => "bool",
            Self::UnsignedInt => "uint",
            Self::Float => "float",
            Self::IntVector3 => "int[3]",
            Self::FloatVector3 => "float[3]",
            Self::FloatPair => "float[2]",
            Self::Path => "path",
        })
    }
}

/// Which record an option feeds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionRole {
    /// `<kind>.enabled`
    Switch,
    Spec,
    Params,
    Results,
}

/// One declared option
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionDecl {
    pub name: String,
    pub value_type: OptionType,
    pub role: OptionRole,
    pub required: bool,
    pub description: &'static str,
}

/// Every option a sensor kind reads or writes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionSchema {
    pub kind: SensorKind,
    pub options: Vec<OptionDecl>,
}

impl OptionSchema {
    /// Start a schema with the `<kind>.enabled` switch already declared
    pub fn new(kind: SensorKind) -> Self {
        Self {
            kind,
            options: vec![OptionDecl {
                name: kind.option("enabled"),
                value_type: OptionType::Bool,
                role: OptionRole::Switch,
                required: false,
                description: "enable sensor",
            }],
        }
    }

    pub fn required<T: OptionValue>(
        self,
        field: &str,
        role: OptionRole,
        description: &'static str,
    ) -> Self {
        self.declare::<T>(field, role, true, description)
    }

    pub fn optional<T: OptionValue>(
        self,
        field: &str,
        role: OptionRole,
        description: &'static str,
    ) -> Self {
        self.declare::<T>(field, role, false, description)
    }

    fn declare<T: OptionValue>(
        mut self,
        field: &str,
        role: OptionRole,
        required: bool,
        description: &'static str,
    ) -> Self {
        self.options.push(OptionDecl {
            name: self.kind.option(field),
            value_type: T::TYPE,
            role,
            required,
            description,
        });
        self
    }

    pub fn get(&self, name: &str) -> Option<&OptionDecl> {
        self.options.iter().find(|decl| decl.name == name)
    }

    pub fn names(&self) -> BTreeSet<&str> {
        self.options.iter().map(|decl| decl.name.as_str()).collect()
    }

    pub fn names_for(&self, role: OptionRole) -> BTreeSet<&str> {
        self.options
            .iter()
            .filter(|decl| decl.role == role)
            .map(|decl| decl.name.as_str())
            .collect()
    }
}

/// Typed option value with a canonical text form
pub trait OptionValue: Sized {
    const TYPE: OptionType;

    fn parse_option(raw: &str) -> Result<Self, String>;

    fn format_option(&self) -> String;
}

/// Split a vector value on whitespace and/or commas
fn split_components(raw: &str) -> Vec<&str> {
    raw.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|part| !part.is_empty())
        .collect()
}

fn parse_components<T: std::str::FromStr, const N: usize>(raw: &str) -> Result<[T; N], String>
where
    T::Err: fmt::Display,
{
    let parts = split_components(raw);
    if parts.len() != N {
        return Err(format!("expected {N} components, got {}", parts.len()));
    }
    let values = parts
        .into_iter()
        .map(|part| {
            part.parse::<T>()
                .map_err(|e| format!("component '{part}': {e}"))
        })
        .collect::<Result<Vec<T>, String>>()?;
    values
        .try_into()
        .map_err(|_| format!("expected {N} components"))
}

fn join_components<T: fmt::Display>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

impl OptionValue for bool {
    const TYPE: OptionType = OptionType::Bool;

    fn parse_option(raw: &str) -> Result<Self, String> {
        match raw.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            other => Err(format!("'{other}' is not a boolean")),
        }
    }

    fn format_option(&self) -> String {
        self.to_string()
    }
}

impl OptionValue for u32 {
    const TYPE: OptionType = OptionType::UnsignedInt;

    fn parse_option(raw: &str) -> Result<Self, String> {
        raw.trim().parse().map_err(|e| format!("{e}"))
    }

    fn format_option(&self) -> String {
        self.to_string()
    }
}

impl OptionValue for f64 {
    const TYPE: OptionType = OptionType::Float;

    fn parse_option(raw: &str) -> Result<Self, String> {
        raw.trim().parse().map_err(|e| format!("{e}"))
    }

    // `Display` for f64 is the shortest string that parses back to the same bits
    fn format_option(&self) -> String {
        self.to_string()
    }
}

impl OptionValue for PathBuf {
    const TYPE: OptionType = OptionType::Path;

    fn parse_option(raw: &str) -> Result<Self, String> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err("empty path".to_string());
        }
        Ok(PathBuf::from(trimmed))
    }

    fn format_option(&self) -> String {
        self.display().to_string()
    }
}

impl OptionValue for [i32; 3] {
    const TYPE: OptionType = OptionType::IntVector3;

    fn parse_option(raw: &str) -> Result<Self, String> {
        parse_components::<i32, 3>(raw)
    }

    fn format_option(&self) -> String {
        join_components(self)
    }
}

impl OptionValue for Vector3 {
    const TYPE: OptionType = OptionType::FloatVector3;

    fn parse_option(raw: &str) -> Result<Self, String> {
        parse_components::<f64, 3>(raw).map(Vector3::from_array)
    }

    fn format_option(&self) -> String {
        join_components(&self.to_array())
    }
}

impl OptionValue for Bounds {
    const TYPE: OptionType = OptionType::FloatPair;

    fn parse_option(raw: &str) -> Result<Self, String> {
        let [min, max] = parse_components::<f64, 2>(raw)?;
        if min > max {
            return Err(format!("lower bound {min} exceeds upper bound {max}"));
        }
        Ok(Bounds::new(min, max))
    }

    fn format_option(&self) -> String {
        join_components(&[self.min, self.max])
    }
}
