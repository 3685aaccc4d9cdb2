//! Conversion policy.
//!
//! A [`ConversionPolicy`] decides every ambiguous case of a conversion:
//! undefined fields, nested arrays, functions, class instances and values
//! that match no known case. Policies are immutable once a converter is
//! built. They can be assembled in code or loaded from YAML/TOML files:
//!
//! ```yaml
//! undefinedValues: "null"
//! multidimensionalArrays: error
//! functions: convert
//! constructorKey: __class
//! ```

use crate::error::PolicyError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Default reserved property name for typed plain objects.
pub const DEFAULT_CONSTRUCTOR_KEY: &str = "_constructor";

/// Default number of empty array slots one inbound conversion may fill in.
pub const DEFAULT_MAX_ARRAY_HOLES: usize = 1 << 16;

macro_rules! policy_mode {
    (
        $(#[$meta:meta])*
        $name:ident, $policy:literal {
            $($(#[$vmeta:meta])* $variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase", try_from = "String")]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            /// Name of the policy field this mode configures.
            pub const POLICY: &'static str = $policy;

            /// Mode name as written in configuration.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = PolicyError;

            fn from_str(s: &str) -> Result<Self, PolicyError> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(PolicyError::Violation {
                        policy: $policy,
                        value: other.to_string(),
                    }),
                }
            }
        }

        impl TryFrom<String> for $name {
            type Error = PolicyError;

            fn try_from(s: String) -> Result<Self, PolicyError> {
                s.parse()
            }
        }
    };
}

policy_mode! {
    /// How an undefined value is represented outbound.
    UndefinedPolicy, "undefinedValues" {
        /// Drop the field
        Omit => "omit",
        /// Store null
        Null => "null",
    }
}

policy_mode! {
    /// How an array found inside another array is handled.
    MultidimensionalArrayPolicy, "multidimensionalArrays" {
        /// Drop the inner array
        Omit => "omit",
        /// Encode the inner array as a typed plain object
        Convert => "convert",
        /// Fail the conversion
        Error => "error",
    }
}

policy_mode! {
    /// How function values are handled outbound.
    FunctionPolicy, "functions" {
        /// Drop the function
        Omit => "omit",
        /// Encode name and source as a typed plain object
        Convert => "convert",
        /// Fail the conversion
        Error => "error",
    }
}

policy_mode! {
    /// How class instances are handled outbound.
    ClassInstancePolicy, "classInstances" {
        /// Encode own fields as a typed plain object tagged with the class name
        Convert => "convert",
    }
}

policy_mode! {
    /// How values matching no known case are handled.
    FallbackPolicy, "fallback" {
        /// Pass the value through unchanged
        Return => "return",
        /// Drop the value
        Omit => "omit",
        /// Fail the conversion
        Error => "error",
    }
}

/// Conversion policy.
///
/// Every field is independently settable; unset fields keep their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct ConversionPolicy {
    /// Undefined field handling (default: omit)
    pub undefined_values: UndefinedPolicy,

    /// Nested array handling (default: convert)
    pub multidimensional_arrays: MultidimensionalArrayPolicy,

    /// Function handling (default: omit)
    pub functions: FunctionPolicy,

    /// Class instance handling (always convert)
    pub class_instances: ClassInstancePolicy,

    /// Handling of values matching no known case (default: return)
    pub fallback: FallbackPolicy,

    /// Reserved property name tagging typed plain objects.
    ///
    /// Must not collide with a real data field. Collisions are not detected.
    pub constructor_key: String,

    /// Empty slots that decoding sparse encoded arrays may create, summed
    /// over one inbound conversion (default: 65536)
    pub max_array_holes: usize,
}

impl Default for ConversionPolicy {
    fn default() -> Self {
        Self {
            undefined_values: UndefinedPolicy::Omit,
            multidimensional_arrays: MultidimensionalArrayPolicy::Convert,
            functions: FunctionPolicy::Omit,
            class_instances: ClassInstancePolicy::Convert,
            fallback: FallbackPolicy::Return,
            constructor_key: DEFAULT_CONSTRUCTOR_KEY.to_string(),
            max_array_holes: DEFAULT_MAX_ARRAY_HOLES,
        }
    }
}

impl ConversionPolicy {
    /// Create a policy with all defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set undefined field handling.
    pub fn with_undefined_values(mut self, mode: UndefinedPolicy) -> Self {
        self.undefined_values = mode;
        self
    }

    /// Set nested array handling.
    pub fn with_multidimensional_arrays(mut self, mode: MultidimensionalArrayPolicy) -> Self {
        self.multidimensional_arrays = mode;
        self
    }

    /// Set function handling.
    pub fn with_functions(mut self, mode: FunctionPolicy) -> Self {
        self.functions = mode;
        self
    }

    /// Set fallback handling.
    pub fn with_fallback(mut self, mode: FallbackPolicy) -> Self {
        self.fallback = mode;
        self
    }

    /// Set the reserved tag key.
    pub fn with_constructor_key(mut self, key: impl Into<String>) -> Self {
        self.constructor_key = key.into();
        self
    }

    /// Set how many empty array slots one inbound conversion may create.
    pub fn with_max_array_holes(mut self, holes: usize) -> Self {
        self.max_array_holes = holes;
        self
    }

    /// Check field values that the type system cannot rule out.
    pub fn validate(&self) -> Result<(), PolicyError> {
        if self.constructor_key.is_empty() {
            return Err(PolicyError::Violation {
                policy: "constructorKey",
                value: self.constructor_key.clone(),
            });
        }
        Ok(())
    }

    /// Load a policy from a YAML or TOML file, chosen by extension.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, PolicyError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml(&content),
            Some("toml") => Self::from_toml(&content),
            _ => Err(PolicyError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Parse and validate a policy from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, PolicyError> {
        let policy: ConversionPolicy = serde_yaml::from_str(yaml)?;
        policy.validate()?;
        Ok(policy)
    }

    /// Parse and validate a policy from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, PolicyError> {
        let policy: ConversionPolicy = toml::from_str(toml_str)?;
        policy.validate()?;
        Ok(policy)
    }
}
