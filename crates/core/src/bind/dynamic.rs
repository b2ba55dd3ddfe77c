use std::fmt;
use std::str::FromStr;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use super::{Field, FieldError, FieldKind, Record};

/// Declared type of a schema field.
///
/// Written as `bool`, `int`, `uint`, `float`, `string`, `?T` for an
/// optional `T`, or `[T]` for a sequence of `T`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FieldType {
    /// `bool`
    Bool,
    /// `int` (signed 64-bit)
    Int,
    /// `uint` (unsigned 64-bit)
    Uint,
    /// `float` (64-bit)
    Float,
    /// `string`
    String,
    /// `?T`
    Optional(Box<FieldType>),
    /// `[T]`
    Sequence(Box<FieldType>),
}

impl FieldType {
    /// Storage class of a field with this type.
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldType::Bool => FieldKind::Bool,
            FieldType::Int => FieldKind::Int,
            FieldType::Uint => FieldKind::Uint,
            FieldType::Float => FieldKind::Float,
            FieldType::String => FieldKind::String,
            FieldType::Optional(_) => FieldKind::Optional,
            FieldType::Sequence(_) => FieldKind::Sequence,
        }
    }
}

impl FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(inner) = s.strip_prefix('?') {
            return Ok(FieldType::Optional(Box::new(inner.parse()?)));
        }
        if let Some(inner) = s.strip_prefix('[').and_then(|r| r.strip_suffix(']')) {
            return Ok(FieldType::Sequence(Box::new(inner.parse()?)));
        }
        match s {
            "bool" => Ok(FieldType::Bool),
            "int" => Ok(FieldType::Int),
            "uint" => Ok(FieldType::Uint),
            "float" => Ok(FieldType::Float),
            "string" => Ok(FieldType::String),
            other => Err(format!(
                "unknown field type {other:?} (expected bool, int, uint, float, string, ?T or [T])"
            )),
        }
    }
}

impl TryFrom<String> for FieldType {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<FieldType> for String {
    fn from(ty: FieldType) -> Self {
        ty.to_string()
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Bool => f.write_str("bool"),
            FieldType::Int => f.write_str("int"),
            FieldType::Uint => f.write_str("uint"),
            FieldType::Float => f.write_str("float"),
            FieldType::String => f.write_str("string"),
            FieldType::Optional(inner) => write!(f, "?{inner}"),
            FieldType::Sequence(inner) => write!(f, "[{inner}]"),
        }
    }
}

/// Stored value of a [`DynField`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DynValue {
    /// Boolean value.
    Bool(bool),
    /// Signed value.
    Int(i64),
    /// Unsigned value.
    Uint(u64),
    /// Float value.
    Float(f64),
    /// Text value.
    String(String),
    /// Optional value; `None` serializes as `null`.
    Optional(Option<Box<DynField>>),
    /// Sequence value.
    Sequence(Vec<DynField>),
}

impl DynValue {
    /// Zero value for `ty`.
    pub fn zero(ty: &FieldType) -> Self {
        match ty {
            FieldType::Bool => DynValue::Bool(false),
            FieldType::Int => DynValue::Int(0),
            FieldType::Uint => DynValue::Uint(0),
            FieldType::Float => DynValue::Float(0.0),
            FieldType::String => DynValue::String(String::new()),
            FieldType::Optional(_) => DynValue::Optional(None),
            FieldType::Sequence(_) => DynValue::Sequence(Vec::new()),
        }
    }
}

/// A typed slot whose type is chosen at run time.
#[derive(Debug, Clone, PartialEq)]
pub struct DynField {
    ty: FieldType,
    value: DynValue,
}

impl DynField {
    /// A zero-valued field of type `ty`.
    pub fn new(ty: FieldType) -> Self {
        let value = DynValue::zero(&ty);
        Self { ty, value }
    }

    /// Declared type.
    pub fn ty(&self) -> &FieldType {
        &self.ty
    }

    /// Current value.
    pub fn value(&self) -> &DynValue {
        &self.value
    }
}

impl Serialize for DynField {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value.serialize(serializer)
    }
}

impl Field for DynField {
    fn kind(&self) -> FieldKind {
        self.ty.kind()
    }

    fn set_zero(&mut self) {
        self.value = DynValue::zero(&self.ty);
    }

    fn set_bool(&mut self, value: bool) -> Result<(), FieldError> {
        match &mut self.value {
            DynValue::Bool(slot) => {
                *slot = value;
                Ok(())
            }
            _ => Err(FieldError::Unsupported),
        }
    }

    fn set_int(&mut self, value: i64) -> Result<(), FieldError> {
        match &mut self.value {
            DynValue::Int(slot) => {
                *slot = value;
                Ok(())
            }
            _ => Err(FieldError::Unsupported),
        }
    }

    fn set_uint(&mut self, value: u64) -> Result<(), FieldError> {
        match &mut self.value {
            DynValue::Uint(slot) => {
                *slot = value;
                Ok(())
            }
            _ => Err(FieldError::Unsupported),
        }
    }

    fn set_float(&mut self, value: f64) -> Result<(), FieldError> {
        match &mut self.value {
            DynValue::Float(slot) => {
                *slot = value;
                Ok(())
            }
            _ => Err(FieldError::Unsupported),
        }
    }

    fn set_string(&mut self, value: &str) -> Result<(), FieldError> {
        match &mut self.value {
            DynValue::String(slot) => {
                value.clone_into(slot);
                Ok(())
            }
            _ => Err(FieldError::Unsupported),
        }
    }

    fn set_sequence(&mut self, len: usize) -> Result<Vec<&mut dyn Field>, FieldError> {
        let FieldType::Sequence(element) = &self.ty else {
            return Err(FieldError::Unsupported);
        };
        let items = (0..len).map(|_| DynField::new((**element).clone())).collect();
        self.value = DynValue::Sequence(items);
        match &mut self.value {
            DynValue::Sequence(items) => {
                Ok(items.iter_mut().map(|item| item as &mut dyn Field).collect())
            }
            _ => Err(FieldError::Unsupported),
        }
    }

    fn unwrap_optional(&mut self) -> Result<&mut dyn Field, FieldError> {
        let FieldType::Optional(inner) = &self.ty else {
            return Err(FieldError::Unsupported);
        };
        if let DynValue::Optional(slot @ None) = &mut self.value {
            *slot = Some(Box::new(DynField::new((**inner).clone())));
        }
        match &mut self.value {
            DynValue::Optional(Some(field)) => Ok(&mut **field as &mut dyn Field),
            _ => Err(FieldError::Unsupported),
        }
    }
}

/// A record whose fields are declared at run time, typically from a
/// [`Schema`](crate::config::Schema).
///
/// Serializes as a JSON object in declaration order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DynamicRecord {
    fields: Vec<(String, DynField)>,
}

impl DynamicRecord {
    /// An empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a zero-valued field (builder pattern).
    pub fn with_field(mut self, name: impl Into<String>, ty: FieldType) -> Self {
        self.fields.push((name.into(), DynField::new(ty)));
        self
    }

    /// Current value of field `name` (exact match).
    pub fn get(&self, name: &str) -> Option<&DynValue> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, f)| f.value())
    }

    /// Field names and values in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DynValue)> {
        self.fields.iter().map(|(n, f)| (n.as_str(), f.value()))
    }
}

impl Record for DynamicRecord {
    fn field_count(&self) -> usize {
        self.fields.len()
    }

    fn field_name(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(|(n, _)| n.as_str())
    }

    fn field_mut(&mut self, index: usize) -> Option<&mut dyn Field> {
        self.fields
            .get_mut(index)
            .map(|(_, f)| f as &mut dyn Field)
    }
}

impl Serialize for DynamicRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, field) in &self.fields {
            map.serialize_entry(name, field)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_type_strings() {
        assert_eq!("int".parse::<FieldType>().unwrap(), FieldType::Int);
        assert_eq!(
            "?[string]".parse::<FieldType>().unwrap(),
            FieldType::Optional(Box::new(FieldType::Sequence(Box::new(FieldType::String))))
        );
        assert_eq!(
            "[?float]".parse::<FieldType>().unwrap().to_string(),
            "[?float]"
        );
        let err = "map".parse::<FieldType>().unwrap_err();
        assert!(err.contains("\"map\""), "{err}");
        assert!("[int".parse::<FieldType>().is_err());
    }

    #[test]
    fn field_type_serde() {
        let ty: FieldType = serde_json::from_str("\"?uint\"").unwrap();
        assert_eq!(ty, FieldType::Optional(Box::new(FieldType::Uint)));
        assert_eq!(serde_json::to_string(&ty).unwrap(), "\"?uint\"");
    }

    #[test]
    fn setters_follow_declared_type() {
        let mut f = DynField::new(FieldType::Int);
        assert_eq!(f.set_int(-3), Ok(()));
        assert_eq!(f.value(), &DynValue::Int(-3));
        assert_eq!(f.set_uint(3), Err(FieldError::Unsupported));
        assert_eq!(f.set_string("x"), Err(FieldError::Unsupported));
    }

    #[test]
    fn optional_and_sequence() {
        let mut f = DynField::new(FieldType::Optional(Box::new(FieldType::Bool)));
        f.unwrap_optional().unwrap().set_bool(true).unwrap();
        assert_eq!(serde_json::to_value(&f).unwrap(), serde_json::json!(true));
        f.set_zero();
        assert_eq!(serde_json::to_value(&f).unwrap(), serde_json::Value::Null);

        let mut f = DynField::new(FieldType::Sequence(Box::new(FieldType::String)));
        for (slot, text) in f.set_sequence(2).unwrap().into_iter().zip(["a", "b"]) {
            slot.set_string(text).unwrap();
        }
        assert_eq!(serde_json::to_value(&f).unwrap(), serde_json::json!(["a", "b"]));
    }

    #[test]
    fn record_serializes_in_declaration_order() {
        let mut rec = DynamicRecord::new()
            .with_field("zeta", FieldType::Uint)
            .with_field("alpha", FieldType::String);
        rec.field_mut(0).unwrap().set_uint(9).unwrap();
        let json = serde_json::to_string(&rec).unwrap();
        assert_eq!(json, r#"{"zeta":9,"alpha":""}"#);
        assert_eq!(rec.get("zeta"), Some(&DynValue::Uint(9)));
        assert_eq!(rec.iter().count(), 2);
    }
}
