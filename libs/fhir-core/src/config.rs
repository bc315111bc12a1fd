//! Model construction settings
//!
//! Passed explicitly to `Builder::build_with`; `build()` uses the defaults.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ModelConfig {
    /// Check reference targets against each field's allowed resource types
    pub check_reference_types: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            check_reference_types: true,
        }
    }
}

impl ModelConfig {
    /// Settings that skip reference target checks, for loading data whose
    /// references are known to be loose.
    pub fn lenient() -> Self {
        Self {
            check_reference_types: false,
        }
    }

    pub fn from_json(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_keys_fall_back_to_defaults() {
        let config = ModelConfig::from_json(json!({})).expect("empty config deserializes");
        assert_eq!(config, ModelConfig::default());
        assert!(config.check_reference_types);
    }

    #[test]
    fn test_camel_case_keys() {
        let config = ModelConfig::from_json(json!({ "checkReferenceTypes": false }))
            .expect("config deserializes");
        assert_eq!(config, ModelConfig::lenient());
    }
}
