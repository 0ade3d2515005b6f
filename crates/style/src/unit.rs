//! Lengths that are either absolute or relative to a containing width.
use crate::error::StyleError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnitType {
    Point,
    Percent,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnitValue {
    pub value: f32,
    pub unit: UnitType,
}

impl UnitValue {
    pub fn point(value: f32) -> Self {
        Self {
            value,
            unit: UnitType::Point,
        }
    }

    pub fn percent(value: f32) -> Self {
        Self {
            value,
            unit: UnitType::Percent,
        }
    }

    pub fn is_percent(&self) -> bool {
        self.unit == UnitType::Percent
    }

    /// Resolves the value in points; percentages are taken of `base`.
    pub fn resolve(&self, base: f32) -> f32 {
        match self.unit {
            UnitType::Point => self.value,
            UnitType::Percent => self.value * base / 100.0,
        }
    }
}

impl fmt::Display for UnitValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.unit {
            UnitType::Point => write!(f, "{}pt", self.value),
            UnitType::Percent => write!(f, "{}%", self.value),
        }
    }
}

impl FromStr for UnitValue {
    type Err = StyleError;

    /// Accepts `"12"`, `"12pt"` and `"50%"`. Any other suffix is rejected.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let input = input.trim();
        let (number, unit) = if let Some(val) = input.strip_suffix('%') {
            (val, UnitType::Percent)
        } else if let Some(val) = input.strip_suffix("pt") {
            (val, UnitType::Point)
        } else {
            (input, UnitType::Point)
        };
        let number = number.trim();
        if number.ends_with(|c: char| c.is_ascii_alphabetic()) {
            return Err(StyleError::UnsupportedUnit(input.to_string()));
        }
        let value = number
            .parse::<f32>()
            .map_err(|e| StyleError::InvalidNumber(format!("{}: {}", input, e)))?;
        Ok(Self { value, unit })
    }
}
