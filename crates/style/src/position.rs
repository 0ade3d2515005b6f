use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Position {
    #[default]
    Static,
    /// Laid out in flow, then shifted by the offset properties when drawn.
    Relative,
    /// Taken out of flow and placed at absolute page coordinates.
    Fixed,
}
