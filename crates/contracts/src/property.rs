//! Rock properties and the mask of properties the enabled sensors depend on

use serde::Serialize;

/// Physical rock properties carried by the world model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RockProperty {
    Density,
    LogSusceptibility,
    ThermalConductivity,
    ThermalProductivity,
    LogResistivity,
    ResistivityPhase,
    PWaveVelocity,
}

impl RockProperty {
    pub const COUNT: usize = 7;

    pub const ALL: [RockProperty; Self::COUNT] = [
        Self::Density,
        Self::LogSusceptibility,
        Self::ThermalConductivity,
        Self::ThermalProductivity,
        Self::LogResistivity,
        Self::ResistivityPhase,
        Self::PWaveVelocity,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// One flag per [`RockProperty`]
///
/// Sensors only ever set flags; nothing in the registry clears one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PropertyMask([bool; RockProperty::COUNT]);

impl PropertyMask {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enable(&mut self, property: RockProperty) {
        self.0[property.index()] = true;
    }

    pub fn is_enabled(&self, property: RockProperty) -> bool {
        self.0[property.index()]
    }

    /// Enabled properties in declaration order
    pub fn enabled(&self) -> impl Iterator<Item = RockProperty> + '_ {
        RockProperty::ALL
            .into_iter()
            .filter(|property| self.is_enabled(*property))
    }

    pub fn count(&self) -> usize {
        self.0.iter().filter(|flag| **flag).count()
    }

    /// Dense 0/1 vector indexed by [`RockProperty::index`]
    pub fn to_vec(&self) -> Vec<u8> {
        self.0.iter().map(|flag| u8::from(*flag)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_matches_discriminants() {
        for (i, property) in RockProperty::ALL.into_iter().enumerate() {
            assert_eq!(property.index(), i);
        }
    }

    #[test]
    fn test_enable_sets_single_flag() {
        let mut mask = PropertyMask::new();
        mask.enable(RockProperty::LogSusceptibility);
        assert!(mask.is_enabled(RockProperty::LogSusceptibility));
        assert!(!mask.is_enabled(RockProperty::Density));
        assert_eq!(mask.count(), 1);
        assert_eq!(mask.to_vec(), vec![0, 1, 0, 0, 0, 0, 0]);
    }
}
