//! Binding options and run-time record schemas.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bind::NameStyle;
use crate::bind::dynamic::{DynamicRecord, FieldType};

/// Errors that can occur when loading or validating a schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// JSON deserialization failed.
    #[error("invalid schema JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// A field declaration is unusable.
    #[error("invalid {field}: {reason}")]
    InvalidField {
        /// The offending field (or `fields` for list-level problems).
        field: String,
        /// A human-readable explanation.
        reason: String,
    },
}

/// What to do with a keyword whose key matches no field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UnknownKeys {
    /// Fail with an unknown-field error.
    #[default]
    Error,
    /// Skip the argument.
    Ignore,
}

/// Whether a failed bind may leave earlier assignments in place.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BindMode {
    /// Stop at the first error; fields already written keep their values.
    #[default]
    BestEffort,
    /// Bind into a copy and commit only if every argument succeeds.
    Atomic,
}

/// Options controlling how arguments are bound into a record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BindOptions {
    /// Key and field-name normalization.
    pub naming: NameStyle,
    /// Policy for keys with no matching field.
    pub unknown_keys: UnknownKeys,
    /// Failure semantics.
    pub mode: BindMode,
}

/// One field declaration in a [`Schema`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Field name, matched against keyword keys after normalization.
    pub name: String,
    /// Declared type, e.g. `"int"`, `"?string"`, `"[float]"`.
    #[serde(rename = "type")]
    pub ty: FieldType,
}

/// A record layout declared in JSON.
///
/// ```json
/// {
///   "fields": [
///     { "name": "count", "type": "int" },
///     { "name": "tags", "type": "[string]" }
///   ],
///   "options": { "naming": "kebab", "unknownKeys": "ignore" }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    /// Fields in positional order.
    pub fields: Vec<FieldSpec>,
    /// Binding options; defaults apply when omitted.
    #[serde(default)]
    pub options: BindOptions,
}

impl Schema {
    /// Check the structural rules a schema must satisfy.
    ///
    /// - at least one field
    /// - names non-empty and unique
    /// - names still unique after normalization under `options.naming`
    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.fields.is_empty() {
            return Err(SchemaError::InvalidField {
                field: "fields".into(),
                reason: "must declare at least one field".into(),
            });
        }
        let mut seen = HashSet::new();
        let mut normalized = HashSet::new();
        for spec in &self.fields {
            if spec.name.trim().is_empty() {
                return Err(SchemaError::InvalidField {
                    field: "fields".into(),
                    reason: "field names must not be empty".into(),
                });
            }
            if !seen.insert(spec.name.as_str()) {
                return Err(SchemaError::InvalidField {
                    field: spec.name.clone(),
                    reason: "declared more than once".into(),
                });
            }
            let key = self.options.naming.normalize(&spec.name);
            if !normalized.insert(key.clone()) {
                return Err(SchemaError::InvalidField {
                    field: spec.name.clone(),
                    reason: format!("collides with another field as {key:?}"),
                });
            }
        }
        Ok(())
    }

    /// A zero-valued record with this schema's fields.
    pub fn record(&self) -> DynamicRecord {
        self.fields
            .iter()
            .fold(DynamicRecord::new(), |rec, spec| {
                rec.with_field(spec.name.clone(), spec.ty.clone())
            })
    }
}

/// Parse and validate a schema from JSON.
pub fn load_schema_from_str(s: &str) -> Result<Schema, SchemaError> {
    let schema: Schema = serde_json::from_str(s)?;
    schema.validate()?;
    Ok(schema)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_default_when_omitted() {
        let schema = load_schema_from_str(r#"{"fields":[{"name":"a","type":"int"}]}"#).unwrap();
        assert_eq!(schema.options, BindOptions::default());
        assert_eq!(schema.options.naming, NameStyle::Kebab);
        assert_eq!(schema.options.unknown_keys, UnknownKeys::Error);
        assert_eq!(schema.options.mode, BindMode::BestEffort);
    }

    #[test]
    fn options_are_camel_case() {
        let schema = load_schema_from_str(
            r#"{"fields":[{"name":"a","type":"int"}],
                "options":{"naming":"snake","unknownKeys":"ignore","mode":"atomic"}}"#,
        )
        .unwrap();
        assert_eq!(schema.options.naming, NameStyle::Snake);
        assert_eq!(schema.options.unknown_keys, UnknownKeys::Ignore);
        assert_eq!(schema.options.mode, BindMode::Atomic);
    }

    #[test]
    fn bad_type_is_json_error() {
        let err = load_schema_from_str(r#"{"fields":[{"name":"a","type":"map"}]}"#).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidJson(_)), "{err}");
        assert!(err.to_string().contains("unknown field type"), "{err}");
    }

    #[test]
    fn empty_and_duplicate_fields_are_rejected() {
        let err = load_schema_from_str(r#"{"fields":[]}"#).unwrap_err();
        assert!(err.to_string().contains("at least one field"), "{err}");

        let err = load_schema_from_str(
            r#"{"fields":[{"name":"a","type":"int"},{"name":"a","type":"bool"}]}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("more than once"), "{err}");

        let err = load_schema_from_str(
            r#"{"fields":[{"name":"numField","type":"int"},{"name":"num_field","type":"int"}]}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("collides"), "{err}");
    }

    #[test]
    fn exact_naming_allows_case_variants() {
        let schema = load_schema_from_str(
            r#"{"fields":[{"name":"numField","type":"int"},{"name":"num_field","type":"int"}],
                "options":{"naming":"exact"}}"#,
        )
        .unwrap();
        assert_eq!(schema.record().iter().count(), 2);
    }
}
