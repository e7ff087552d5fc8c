use std::{collections::BTreeSet, sync::Arc};

use serde::Deserialize;

use crate::core::mapping::AttributeMapping;

/// An explicit mapping registered for a class and its subclasses.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassMapping {
    pub class: String,
    pub columns: Arc<AttributeMapping>,
}

/// Global policy of a [`ClassMappingRegistry`](crate::core::registry::ClassMappingRegistry).
///
/// Classes are referred to by name. With `decompose_by_default` off (the
/// default), only classes listed in `decompose_classes` are split into
/// columns; everything else is rendered through
/// [`Record::opaque_text`](crate::core::item::Record::opaque_text). A class
/// with an explicit mapping must then also be listed in `decompose_classes`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SerializationConfig {
    /// Emit a header row before the data.
    pub write_headers: bool,
    /// Treat unknown classes as decomposable rather than opaque.
    pub decompose_by_default: bool,
    /// Classes always rendered as a single opaque field.
    pub opaque_classes: BTreeSet<String>,
    /// Classes always decomposed, even when opaque is the default.
    pub decompose_classes: BTreeSet<String>,
    /// Explicit mappings, in registration order.
    pub mappings: Vec<ClassMapping>,
}

impl SerializationConfig {
    /// Reads a configuration from JSON.
    ///
    /// ```
    /// use csv_mapper::core::config::SerializationConfig;
    ///
    /// let config = SerializationConfig::from_json(r#"{
    ///     "write_headers": true,
    ///     "decompose_classes": ["Person", "UsAddress"],
    ///     "mappings": [
    ///         {"class": "Person", "columns": [
    ///             {"header": "LastName", "property": "lastName"}
    ///         ]}
    ///     ]
    /// }"#).unwrap();
    ///
    /// assert!(config.write_headers);
    /// assert!(!config.decompose_by_default);
    /// assert_eq!(config.mappings[0].columns.len(), 1);
    /// ```
    #[cfg(feature = "json")]
    pub fn from_json(json: &str) -> Result<SerializationConfig, crate::error::CsvError> {
        serde_json::from_str(json).map_err(|error| crate::error::CsvError::Config(error.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_opaque_without_headers() {
        let config = SerializationConfig::default();

        assert!(!config.write_headers);
        assert!(!config.decompose_by_default);
        assert!(config.opaque_classes.is_empty());
        assert!(config.mappings.is_empty());
    }

    #[cfg(feature = "json")]
    #[test]
    fn missing_fields_take_defaults() {
        let config = SerializationConfig::from_json(r#"{"decompose_by_default": true, "opaque_classes": ["Date"]}"#).unwrap();

        assert!(config.decompose_by_default);
        assert!(!config.write_headers);
        assert!(config.opaque_classes.contains("Date"));
    }

    #[cfg(feature = "json")]
    #[test]
    fn unreadable_config_is_reported() {
        let result = SerializationConfig::from_json("{\"write_headers\": \"yes\"}");

        assert!(matches!(result, Err(crate::error::CsvError::Config(message)) if message.contains("expected a boolean")));
    }
}
