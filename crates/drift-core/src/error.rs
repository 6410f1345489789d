//! Error types for Drift

use thiserror::Error;

/// The main error type for Drift operations
#[derive(Debug, Error)]
pub enum DriftError {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Value out of range: {field} must be between {min} and {max}, got {value}")]
    ValueOutOfRange {
        field: String,
        min: f64,
        max: f64,
        value: f64,
    },

    #[error("Unknown preset: {name} is not one of {allowed:?}")]
    UnknownPreset { name: String, allowed: Vec<String> },

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Surface error: {0}")]
    Surface(String),

    #[error("TOML parse error: {0}")]
    TomlParse(String),

    #[error("TOML serialization error: {0}")]
    TomlSer(String),
}

/// Result type alias for Drift operations
pub type Result<T> = std::result::Result<T, DriftError>;

impl From<toml::de::Error> for DriftError {
    fn from(err: toml::de::Error) -> Self {
        DriftError::TomlParse(err.to_string())
    }
}

impl From<toml::ser::Error> for DriftError {
    fn from(err: toml::ser::Error) -> Self {
        DriftError::TomlSer(err.to_string())
    }
}

impl DriftError {
    /// Build a `ValueOutOfRange` error for a named config field
    pub fn out_of_range(field: impl Into<String>, min: f64, max: f64, value: f64) -> Self {
        DriftError::ValueOutOfRange {
            field: field.into(),
            min,
            max,
            value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_message() {
        let err = DriftError::out_of_range("ambient.density", 1.0, 1e9, 0.0);
        assert_eq!(
            err.to_string(),
            "Value out of range: ambient.density must be between 1 and 1000000000, got 0"
        );
    }

    #[test]
    fn toml_error_converts() {
        let parsed: std::result::Result<toml::Value, _> = toml::from_str("= broken");
        let err: DriftError = parsed.unwrap_err().into();
        assert!(matches!(err, DriftError::TomlParse(_)));
    }
}
