use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StyleError {
    #[error("Unsupported unit in '{0}': expected 'pt' or '%'.")]
    UnsupportedUnit(String),
    #[error("Invalid number: {0}")]
    InvalidNumber(String),
    #[error("Property type mismatch: expected {expected}, found {found}.")]
    PropertyType {
        expected: &'static str,
        found: &'static str,
    },
}
