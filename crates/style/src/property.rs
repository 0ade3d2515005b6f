//! Property keys and the tagged values stored against them.
//!
//! Every renderer and model element carries a [`PropertyBag`]. Values are a
//! closed set of variants; typed accessors check the tag and report a
//! [`StyleError::PropertyType`] on mismatch.
use crate::action::Action;
use crate::background::Background;
use crate::border::Border;
use crate::error::StyleError;
use crate::list::{ListSymbol, ListSymbolAlignment};
use crate::position::Position;
use crate::text::{HorizontalAlignment, Leading, TextAlignment, VerticalAlignment};
use crate::unit::UnitValue;
use quire_types::Color;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "kebab-case")]
pub enum Property {
    MarginTop,
    MarginRight,
    MarginBottom,
    MarginLeft,
    PaddingTop,
    PaddingRight,
    PaddingBottom,
    PaddingLeft,
    Border,
    BorderTop,
    BorderRight,
    BorderBottom,
    BorderLeft,
    Width,
    Height,
    Position,
    Top,
    Bottom,
    Left,
    Right,
    TextAlignment,
    HorizontalAlignment,
    VerticalAlignment,
    KeepTogether,
    ForcedPlacement,
    RotationAngle,
    Leading,
    FirstLineIndent,
    Destination,
    Action,
    ListSymbol,
    ListSymbolAlignment,
    ListSymbolIndent,
    ListStart,
    Background,
    Font,
    FontSize,
    FontColor,
    ColumnCount,
}

impl Property {
    /// Inherited keys fall back to the nearest ancestor's resolved value.
    pub fn is_inherited(self) -> bool {
        matches!(
            self,
            Property::Font
                | Property::FontSize
                | Property::FontColor
                | Property::TextAlignment
                | Property::FirstLineIndent
                | Property::ForcedPlacement
                | Property::ListSymbol
                | Property::ListSymbolAlignment
                | Property::ListSymbolIndent
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "kebab-case")]
pub enum PropertyValue {
    /// Explicitly unset. Stops resolution at the level where it is stored.
    None,
    Float(f32),
    Int(i32),
    Bool(bool),
    Text(String),
    Unit(UnitValue),
    Border(Border),
    Color(Color),
    Background(Background),
    Leading(Leading),
    Position(Position),
    TextAlignment(TextAlignment),
    HorizontalAlignment(HorizontalAlignment),
    VerticalAlignment(VerticalAlignment),
    ListSymbolAlignment(ListSymbolAlignment),
    ListSymbol(ListSymbol),
    Action(Action),
}

macro_rules! typed_accessor {
    ($name:ident, $variant:ident, $ty:ty) => {
        pub fn $name(&self) -> Result<$ty, StyleError> {
            match self {
                PropertyValue::$variant(v) => Ok(v.clone()),
                other => Err(StyleError::PropertyType {
                    expected: stringify!($variant),
                    found: other.variant_name(),
                }),
            }
        }
    };
}

impl PropertyValue {
    /// Maps the explicit `None` marker to `Option::None`.
    pub fn into_option(self) -> Option<PropertyValue> {
        match self {
            PropertyValue::None => None,
            value => Some(value),
        }
    }

    pub fn variant_name(&self) -> &'static str {
        match self {
            PropertyValue::None => "None",
            PropertyValue::Float(_) => "Float",
            PropertyValue::Int(_) => "Int",
            PropertyValue::Bool(_) => "Bool",
            PropertyValue::Text(_) => "Text",
            PropertyValue::Unit(_) => "Unit",
            PropertyValue::Border(_) => "Border",
            PropertyValue::Color(_) => "Color",
            PropertyValue::Background(_) => "Background",
            PropertyValue::Leading(_) => "Leading",
            PropertyValue::Position(_) => "Position",
            PropertyValue::TextAlignment(_) => "TextAlignment",
            PropertyValue::HorizontalAlignment(_) => "HorizontalAlignment",
            PropertyValue::VerticalAlignment(_) => "VerticalAlignment",
            PropertyValue::ListSymbolAlignment(_) => "ListSymbolAlignment",
            PropertyValue::ListSymbol(_) => "ListSymbol",
            PropertyValue::Action(_) => "Action",
        }
    }

    /// Integers widen to floats; nothing else converts.
    pub fn as_float(&self) -> Result<f32, StyleError> {
        match self {
            PropertyValue::Float(v) => Ok(*v),
            PropertyValue::Int(v) => Ok(*v as f32),
            other => Err(StyleError::PropertyType {
                expected: "Float",
                found: other.variant_name(),
            }),
        }
    }

    pub fn as_text(&self) -> Result<&str, StyleError> {
        match self {
            PropertyValue::Text(v) => Ok(v),
            other => Err(StyleError::PropertyType {
                expected: "Text",
                found: other.variant_name(),
            }),
        }
    }

    /// Bare numbers are accepted as point values.
    pub fn as_unit(&self) -> Result<UnitValue, StyleError> {
        match self {
            PropertyValue::Unit(v) => Ok(*v),
            PropertyValue::Float(v) => Ok(UnitValue::point(*v)),
            other => Err(StyleError::PropertyType {
                expected: "Unit",
                found: other.variant_name(),
            }),
        }
    }

    typed_accessor!(as_int, Int, i32);
    typed_accessor!(as_bool, Bool, bool);
    typed_accessor!(as_border, Border, Border);
    typed_accessor!(as_color, Color, Color);
    typed_accessor!(as_background, Background, Background);
    typed_accessor!(as_leading, Leading, Leading);
    typed_accessor!(as_position, Position, Position);
    typed_accessor!(as_text_alignment, TextAlignment, TextAlignment);
    typed_accessor!(as_horizontal_alignment, HorizontalAlignment, HorizontalAlignment);
    typed_accessor!(as_vertical_alignment, VerticalAlignment, VerticalAlignment);
    typed_accessor!(as_list_symbol_alignment, ListSymbolAlignment, ListSymbolAlignment);
    typed_accessor!(as_list_symbol, ListSymbol, ListSymbol);
    typed_accessor!(as_action, Action, Action);
}

macro_rules! value_from {
    ($ty:ty, $variant:ident) => {
        impl From<$ty> for PropertyValue {
            fn from(value: $ty) -> Self {
                PropertyValue::$variant(value)
            }
        }
    };
}

value_from!(f32, Float);
value_from!(i32, Int);
value_from!(bool, Bool);
value_from!(String, Text);
value_from!(UnitValue, Unit);
value_from!(Border, Border);
value_from!(Color, Color);
value_from!(Background, Background);
value_from!(Leading, Leading);
value_from!(Position, Position);
value_from!(TextAlignment, TextAlignment);
value_from!(HorizontalAlignment, HorizontalAlignment);
value_from!(VerticalAlignment, VerticalAlignment);
value_from!(ListSymbolAlignment, ListSymbolAlignment);
value_from!(ListSymbol, ListSymbol);
value_from!(Action, Action);

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Text(value.to_string())
    }
}

impl<T: Into<PropertyValue>> From<Option<T>> for PropertyValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(PropertyValue::None, Into::into)
    }
}

/// Per-node property storage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyBag {
    values: HashMap<Property, PropertyValue>,
}

impl PropertyBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// The stored value, including an explicit `PropertyValue::None`.
    pub fn get(&self, key: Property) -> Option<&PropertyValue> {
        self.values.get(&key)
    }

    pub fn contains(&self, key: Property) -> bool {
        self.values.contains_key(&key)
    }

    pub fn set(&mut self, key: Property, value: impl Into<PropertyValue>) {
        self.values.insert(key, value.into());
    }

    pub fn remove(&mut self, key: Property) -> Option<PropertyValue> {
        self.values.remove(&key)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Property, &PropertyValue)> {
        self.values.iter().map(|(k, v)| (*k, v))
    }

    /// Copies every entry of `other` over this bag.
    pub fn extend_from(&mut self, other: &PropertyBag) {
        for (key, value) in other.iter() {
            self.values.insert(key, value.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_none_is_stored() {
        let mut bag = PropertyBag::new();
        bag.set(Property::Border, PropertyValue::None);
        assert!(bag.contains(Property::Border));
        assert_eq!(bag.get(Property::Border).cloned().and_then(PropertyValue::into_option), None);
    }

    #[test]
    fn test_typed_accessor_mismatch() {
        let value = PropertyValue::from(true);
        assert_eq!(
            value.as_float(),
            Err(StyleError::PropertyType {
                expected: "Float",
                found: "Bool"
            })
        );
        assert_eq!(PropertyValue::Int(3).as_float(), Ok(3.0));
        assert_eq!(PropertyValue::from(2.0).as_unit(), Ok(UnitValue::point(2.0)));
        assert!(PropertyValue::from("x").as_border().is_err());
    }

    #[test]
    fn test_inherited_keys() {
        assert!(Property::FontSize.is_inherited());
        assert!(Property::ForcedPlacement.is_inherited());
        assert!(!Property::KeepTogether.is_inherited());
        assert!(!Property::MarginLeft.is_inherited());
    }
}
