use serde::{Deserialize, Serialize};

/// Target of a link annotation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "type", content = "target", rename_all = "kebab-case")]
pub enum Action {
    Uri(String),
    /// Jump to a named destination inside the document.
    GoTo(String),
}
