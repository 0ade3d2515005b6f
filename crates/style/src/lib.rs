pub mod action;
pub mod background;
pub mod border;
pub mod dimension;
pub mod error;
pub mod list;
pub mod position;
pub mod property;
pub mod text;
pub mod unit;

pub use action::Action;
pub use background::Background;
pub use border::{Border, BorderStyle};
pub use dimension::{Margins, PageSize};
pub use error::StyleError;
pub use list::{ListNumbering, ListSymbol, ListSymbolAlignment};
pub use position::Position;
pub use property::{Property, PropertyBag, PropertyValue};
pub use text::{HorizontalAlignment, Leading, TextAlignment, VerticalAlignment};
pub use unit::{UnitType, UnitValue};
