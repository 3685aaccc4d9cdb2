//! Error types for conversion and policy configuration.

use value_core::ValueKind;

/// Error raised by a conversion call.
///
/// Any error fails the whole call; there are no partial results.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// A value hit a policy configured to reject it.
    #[error("Unsupported {kind:?} value: '{policy}' is set to '{mode}'")]
    Unsupported {
        policy: &'static str,
        mode: &'static str,
        kind: ValueKind,
    },

    /// A custom converter failed.
    #[error("Custom converter '{key}' failed: {source}")]
    Custom {
        key: String,
        #[source]
        source: anyhow::Error,
    },

    /// An encoded array in stored data would need more empty slots than
    /// the conversion has left.
    #[error("Encoded array needs {holes} empty slots but only {remaining} remain for this conversion")]
    SparseArray { holes: usize, remaining: usize },

    /// The installed function compiler rejected stored source text.
    #[error("Failed to compile stored function '{name}': {source}")]
    FunctionCompile {
        name: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Error raised while loading or validating a conversion policy.
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    /// Error reading a policy file
    #[error("Failed to read policy file: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing YAML
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Error parsing TOML
    #[error("Failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),

    /// Policy file has an extension we cannot parse
    #[error("Unsupported policy file format: {0}")]
    UnsupportedFormat(String),

    /// A mode string names no known option, or a field is invalid
    #[error("Invalid value '{value}' for policy '{policy}'")]
    Violation { policy: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, ConvertError>;
