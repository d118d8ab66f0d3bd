//! SensorKind / RecordType - the axes every registry operation is indexed by

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Closed set of forward-model sensor kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorKind {
    Gravity,
    Magnetism,
    Thermal,
}

impl SensorKind {
    /// Every registered kind, in option-file order
    pub const ALL: [SensorKind; 3] = [Self::Gravity, Self::Magnetism, Self::Thermal];

    /// Option namespace heading, e.g. `magnetism` in `magnetism.noiseAlpha`
    pub fn heading(self) -> &'static str {
        match self {
            Self::Gravity => "gravity",
            Self::Magnetism => "magnetism",
            Self::Thermal => "thermal",
        }
    }

    /// Full option name for a field of this kind
    pub fn option(self, field: &str) -> String {
        format!("{}.{}", self.heading(), field)
    }

    /// Wire tag (never 0, so an all-zero header is rejected)
    pub fn tag(self) -> u8 {
        match self {
            Self::Gravity => 1,
            Self::Magnetism => 2,
            Self::Thermal => 3,
        }
    }

    pub fn from_tag(tag: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }

    pub fn from_heading(heading: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.heading() == heading)
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.heading())
    }
}

impl FromStr for SensorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_heading(&s.to_lowercase())
            .ok_or_else(|| format!("unknown sensor kind '{s}'"))
    }
}

/// Record types that cross the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordType {
    Spec,
    Params,
    Results,
}

impl RecordType {
    pub const ALL: [RecordType; 3] = [Self::Spec, Self::Params, Self::Results];

    pub fn tag(self) -> u8 {
        match self {
            Self::Spec => 1,
            Self::Params => 2,
            Self::Results => 3,
        }
    }

    pub fn from_tag(tag: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|record| record.tag() == tag)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Spec => "spec",
            Self::Params => "params",
            Self::Results => "results",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
