//! Four-sided spacing values and page formats.
use crate::unit::UnitValue;
use quire_types::Rect;
use serde::{de, ser::SerializeMap, Deserialize, Deserializer, Serialize, Serializer};

/// Top/right/bottom/left values used for margins, paddings and border widths.
#[derive(Serialize, Debug, Default, Clone, Copy, PartialEq)]
pub struct Margins {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Margins {
    pub fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    pub fn all(value: f32) -> Self {
        Self::new(value, value, value, value)
    }

    /// Shrinks `rect` by these values, or grows it when `reverse` is set.
    pub fn apply_to(&self, rect: &Rect, reverse: bool) -> Rect {
        rect.apply_margins(self.top, self.right, self.bottom, self.left, reverse)
    }

    /// Parse CSS-style shorthand (1, 2, or 4 values, each `pt` or unitless)
    fn parse_shorthand(input: &str) -> Result<Self, String> {
        let values = input
            .split_whitespace()
            .map(|part| {
                let unit: UnitValue = part.parse().map_err(|e| format!("{}", e))?;
                if unit.is_percent() {
                    return Err(format!("Percentages are not allowed in margins: {}", part));
                }
                Ok(unit.value)
            })
            .collect::<Result<Vec<f32>, String>>()?;

        match values.as_slice() {
            [all] => Ok(Margins::all(*all)),
            [y, x] => Ok(Margins::new(*y, *x, *y, *x)),
            [top, right, bottom, left] => Ok(Margins::new(*top, *right, *bottom, *left)),
            _ => Err(format!(
                "Invalid margin shorthand: expected 1, 2, or 4 values, got {}",
                values.len()
            )),
        }
    }
}

impl<'de> Deserialize<'de> for Margins {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct MarginsVisitor;
        impl<'de> de::Visitor<'de> for MarginsVisitor {
            type Value = Margins;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a number, a string like '10pt 20pt' or a map")
            }

            fn visit_f64<E>(self, value: f64) -> Result<Margins, E>
            where
                E: de::Error,
            {
                Ok(Margins::all(value as f32))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Margins, E>
            where
                E: de::Error,
            {
                Ok(Margins::all(value as f32))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Margins, E>
            where
                E: de::Error,
            {
                Ok(Margins::all(value as f32))
            }

            fn visit_str<E>(self, value: &str) -> Result<Margins, E>
            where
                E: de::Error,
            {
                Margins::parse_shorthand(value).map_err(E::custom)
            }

            fn visit_map<A>(self, mut map: A) -> Result<Margins, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut margins = Margins::default();
                while let Some(key) = map.next_key::<String>()? {
                    match key.as_str() {
                        "top" => margins.top = map.next_value()?,
                        "right" => margins.right = map.next_value()?,
                        "bottom" => margins.bottom = map.next_value()?,
                        "left" => margins.left = map.next_value()?,
                        _ => {
                            map.next_value::<de::IgnoredAny>()?;
                        }
                    }
                }
                Ok(margins)
            }
        }
        deserializer.deserialize_any(MarginsVisitor)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PageSize {
    #[default]
    A4,
    Letter,
    Legal,
    Custom { width: f32, height: f32 },
}

impl Serialize for PageSize {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            PageSize::A4 => serializer.serialize_str("A4"),
            PageSize::Letter => serializer.serialize_str("Letter"),
            PageSize::Legal => serializer.serialize_str("Legal"),
            PageSize::Custom { width, height } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("width", width)?;
                map.serialize_entry("height", height)?;
                map.end()
            }
        }
    }
}

impl PageSize {
    pub fn dimensions_pt(&self) -> (f32, f32) {
        match self {
            PageSize::A4 => (595.28, 841.89),
            PageSize::Letter => (612.0, 792.0),
            PageSize::Legal => (612.0, 1008.0),
            PageSize::Custom { width, height } => (*width, *height),
        }
    }

    /// The same format turned on its side.
    pub fn rotate(&self) -> PageSize {
        let (width, height) = self.dimensions_pt();
        PageSize::Custom {
            width: height,
            height: width,
        }
    }

    pub fn to_rect(&self) -> Rect {
        let (width, height) = self.dimensions_pt();
        Rect::new(0.0, 0.0, width, height)
    }

    fn parse(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "a4" => Ok(PageSize::A4),
            "letter" => Ok(PageSize::Letter),
            "legal" => Ok(PageSize::Legal),
            _ => Err(format!("Unknown page size: {}", s)),
        }
    }
}

impl<'de> Deserialize<'de> for PageSize {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum PageSizeDef {
            Str(String),
            Map { width: f32, height: f32 },
        }

        match PageSizeDef::deserialize(deserializer)? {
            PageSizeDef::Str(s) => Self::parse(&s).map_err(de::Error::custom),
            PageSizeDef::Map { width, height } => Ok(PageSize::Custom { width, height }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_margin_shorthand() {
        let m: Margins = serde_json::from_str("\"10pt 20\"").unwrap();
        assert_eq!(m, Margins::new(10.0, 20.0, 10.0, 20.0));
        let m: Margins = serde_json::from_str("36").unwrap();
        assert_eq!(m, Margins::all(36.0));
        assert!(serde_json::from_str::<Margins>("\"1 2 3\"").is_err());
        assert!(serde_json::from_str::<Margins>("\"10%\"").is_err());
    }

    #[test]
    fn test_rotated_page_size() {
        assert_eq!(PageSize::A4.rotate().dimensions_pt(), (841.89, 595.28));
        let parsed: PageSize = serde_json::from_str("\"letter\"").unwrap();
        assert_eq!(parsed, PageSize::Letter);
    }
}
