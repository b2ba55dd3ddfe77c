//! Writes resolved tag arguments into typed records.
//!
//! A record exposes its fields through the [`Record`] trait; each field is
//! reached as a `&mut dyn` [`Field`], a capability interface with one
//! setter per value class. The binder never inspects concrete types.

/// Name normalization for keyword matching.
pub mod case;
/// Schema-driven records built at run time.
pub mod dynamic;
/// [`Field`] implementations for standard types.
pub mod field;

use std::fmt;

use log::debug;
use serde::Serialize;
use thiserror::Error;

use crate::config::{BindOptions, UnknownKeys};
use crate::error::TagError;
use crate::grammar::ast::{Argument, Number, Value};
use crate::grammar::diag::codes;
use crate::resolve::ResolvedArgs;

pub use case::NameStyle;

/// Storage class of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKind {
    /// Boolean.
    Bool,
    /// Signed integer of some width.
    Int,
    /// Unsigned integer of some width.
    Uint,
    /// Floating point.
    Float,
    /// Text.
    String,
    /// An optional holder around another field.
    Optional,
    /// A growable sequence of fields.
    Sequence,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FieldKind::Bool => "bool",
            FieldKind::Int => "int",
            FieldKind::Uint => "uint",
            FieldKind::Float => "float",
            FieldKind::String => "string",
            FieldKind::Optional => "optional",
            FieldKind::Sequence => "sequence",
        })
    }
}

/// Why a field refused a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FieldError {
    /// The field has no setter for this value class.
    #[error("unsupported value for field")]
    Unsupported,
    /// The value does not fit the field's width.
    #[error("value out of range for field")]
    OutOfRange,
}

/// A writable slot in a record.
///
/// Setters default to [`FieldError::Unsupported`]; an implementation
/// overrides the ones matching its [`FieldKind`].
pub trait Field {
    /// Storage class of this field.
    fn kind(&self) -> FieldKind;

    /// Reset to the zero value (`false`, `0`, empty, or absent).
    fn set_zero(&mut self);

    /// Store a boolean.
    fn set_bool(&mut self, _value: bool) -> Result<(), FieldError> {
        Err(FieldError::Unsupported)
    }

    /// Store a signed integer.
    fn set_int(&mut self, _value: i64) -> Result<(), FieldError> {
        Err(FieldError::Unsupported)
    }

    /// Store an unsigned integer.
    fn set_uint(&mut self, _value: u64) -> Result<(), FieldError> {
        Err(FieldError::Unsupported)
    }

    /// Store a float.
    fn set_float(&mut self, _value: f64) -> Result<(), FieldError> {
        Err(FieldError::Unsupported)
    }

    /// Store text.
    fn set_string(&mut self, _value: &str) -> Result<(), FieldError> {
        Err(FieldError::Unsupported)
    }

    /// Replace the contents with `len` zero-valued elements and return them.
    fn set_sequence(&mut self, _len: usize) -> Result<Vec<&mut dyn Field>, FieldError> {
        Err(FieldError::Unsupported)
    }

    /// Make an optional field present (allocating a zero value if absent)
    /// and return the inner field.
    fn unwrap_optional(&mut self) -> Result<&mut dyn Field, FieldError> {
        Err(FieldError::Unsupported)
    }
}

/// A value with named, ordered fields that tags can be bound into.
///
/// Usually implemented with the [`record!`](crate::record) macro.
pub trait Record {
    /// Number of fields.
    fn field_count(&self) -> usize;

    /// Declared name of the field at `index`.
    fn field_name(&self, index: usize) -> Option<&str>;

    /// Mutable access to the field at `index`.
    fn field_mut(&mut self, index: usize) -> Option<&mut dyn Field>;

    /// Index of the field whose normalized name equals the normalized `key`.
    fn field_index(&self, key: &str, style: NameStyle) -> Option<usize> {
        let key = style.normalize(key);
        (0..self.field_count())
            .find(|&i| self.field_name(i).is_some_and(|n| style.normalize(n) == key))
    }

    /// Mutable access to the field matching `key`.
    fn field_by_name(&mut self, key: &str, style: NameStyle) -> Option<&mut dyn Field> {
        let index = self.field_index(key, style)?;
        self.field_mut(index)
    }
}

/// Bind `args` into `record`.
///
/// Positional values go to fields by index, then keyword values to fields
/// by normalized name. The first failure is returned; fields assigned
/// before it keep their new values.
pub fn bind<R: Record + ?Sized>(
    args: &ResolvedArgs<'_>,
    record: &mut R,
    options: &BindOptions,
) -> Result<(), TagError> {
    for (index, value) in args.positional.iter().copied().enumerate() {
        let count = record.field_count();
        let name = record.field_name(index).map(str::to_owned);
        let Some(field) = record.field_mut(index) else {
            return Err(TagError::binding(
                codes::BIND_INDEX_OUT_OF_RANGE,
                format!("positional argument #{index} has no field; record has {count}"),
                None,
                Some(value.span()),
            ));
        };
        debug!("bind #{index} -> {}", name.as_deref().unwrap_or("?"));
        assign(field, value).map_err(|m| m.into_error(name.as_deref()))?;
    }

    for (&key, arg) in &args.keyword {
        let Some(index) = record.field_index(key, options.naming) else {
            match options.unknown_keys {
                UnknownKeys::Ignore => {
                    debug!("ignoring unknown key {key:?}");
                    continue;
                }
                UnknownKeys::Error => {
                    return Err(TagError::binding(
                        codes::BIND_UNKNOWN_FIELD,
                        format!("unknown field {key:?}"),
                        Some(key),
                        Some(arg.span),
                    ));
                }
            }
        };
        let name = record.field_name(index).map(str::to_owned);
        let Some(field) = record.field_mut(index) else {
            return Err(TagError::binding(
                codes::BIND_UNKNOWN_FIELD,
                format!("unknown field {key:?}"),
                Some(key),
                Some(arg.span),
            ));
        };
        debug!("bind {key:?} -> {}", name.as_deref().unwrap_or(key));
        assign(field, &arg.value).map_err(|m| m.into_error(name.as_deref().or(Some(key))))?;
    }
    Ok(())
}

/// Bind into a scratch copy and commit only on success.
///
/// On failure `record` is left untouched.
pub fn bind_atomic<R: Record + Clone>(
    args: &ResolvedArgs<'_>,
    record: &mut R,
    options: &BindOptions,
) -> Result<(), TagError> {
    let mut scratch = record.clone();
    bind(args, &mut scratch, options)?;
    *record = scratch;
    Ok(())
}

/// Keyword arguments that [`bind`] skips because no field matches them.
///
/// Always empty under [`UnknownKeys::Error`], where such keys fail the bind.
pub fn ignored_keys<'a, R: Record + ?Sized>(
    args: &ResolvedArgs<'a>,
    record: &R,
    options: &BindOptions,
) -> Vec<(&'a str, &'a Argument)> {
    if options.unknown_keys != UnknownKeys::Ignore {
        return Vec::new();
    }
    args.keyword
        .iter()
        .filter(|(key, _)| record.field_index(key, options.naming).is_none())
        .map(|(&key, &arg)| (key, arg))
        .collect()
}

// ─── Assignment ─────────────────────────────────────────────────────────────

/// A value a field refused, with the reason.
struct Mismatch<'v> {
    value: &'v Value,
    kind: FieldKind,
    error: FieldError,
}

impl Mismatch<'_> {
    fn into_error(self, field: Option<&str>) -> TagError {
        let target = match field {
            Some(name) => format!("{} field {name:?}", self.kind),
            None => format!("{} field", self.kind),
        };
        let (code, message) = match self.error {
            FieldError::Unsupported => (
                codes::BIND_TYPE_MISMATCH,
                format!(
                    "cannot assign {} `{}` to {target}",
                    self.value.kind_name(),
                    self.value
                ),
            ),
            FieldError::OutOfRange => (
                codes::BIND_VALUE_OUT_OF_RANGE,
                format!("{} `{}` out of range for {target}", self.value.kind_name(), self.value),
            ),
        };
        TagError::binding(code, message, field, Some(self.value.span()))
    }
}

/// Write one value into one field.
///
/// `nil` zeroes the field. Any other value is written through optional
/// holders, which are allocated on demand.
fn assign<'v>(field: &mut dyn Field, value: &'v Value) -> Result<(), Mismatch<'v>> {
    if let Value::Nil { .. } = value {
        field.set_zero();
        return Ok(());
    }
    let kind = field.kind();
    let fail = |error| Mismatch { value, kind, error };
    if kind == FieldKind::Optional {
        let inner = field.unwrap_optional().map_err(fail)?;
        return assign(inner, value);
    }
    match value {
        Value::Nil { .. } => {
            field.set_zero();
            Ok(())
        }
        Value::Bool { value: b, .. } => field.set_bool(*b),
        Value::Switch { enabled, .. } => field.set_bool(*enabled),
        Value::Identifier(ident) => field.set_string(&ident.name),
        Value::String(s) => field.set_string(&s.text),
        Value::Number(n) => assign_number(field, n),
        Value::Slice { values, .. } => {
            let elements = field.set_sequence(values.len()).map_err(fail)?;
            for (element, v) in elements.into_iter().zip(values) {
                assign(element, v)?;
            }
            return Ok(());
        }
    }
    .map_err(fail)
}

/// Pick the number's interpretation matching the field's class.
fn assign_number(field: &mut dyn Field, n: &Number) -> Result<(), FieldError> {
    match field.kind() {
        FieldKind::Int => field.set_int(n.int.ok_or(FieldError::Unsupported)?),
        FieldKind::Uint => field.set_uint(n.uint.ok_or(FieldError::Unsupported)?),
        FieldKind::Float => field.set_float(n.float.ok_or(FieldError::Unsupported)?),
        _ => Err(FieldError::Unsupported),
    }
}

/// Implement [`Record`] for a struct whose fields all implement [`Field`].
///
/// Fields are listed in positional order; only listed fields are bindable.
///
/// ```
/// use fieldtag_core::{record, Tag};
///
/// #[derive(Default)]
/// struct Opts {
///     count: i32,
///     name: String,
///     verbose: bool,
/// }
/// record!(Opts { count, name, verbose });
///
/// let mut opts = Opts::default();
/// Tag::new("opts", "3,~verbose").fill(&mut opts).unwrap();
/// assert_eq!(opts.count, 3);
/// assert!(opts.verbose);
/// ```
#[macro_export]
macro_rules! record {
    ($ty:ty { $($field:ident),* $(,)? }) => {
        impl $crate::bind::Record for $ty {
            fn field_count(&self) -> usize {
                const NAMES: &[&str] = &[$(stringify!($field)),*];
                NAMES.len()
            }

            fn field_name(&self, index: usize) -> Option<&str> {
                const NAMES: &[&str] = &[$(stringify!($field)),*];
                NAMES.get(index).copied()
            }

            #[allow(unused_assignments, unused_mut)]
            fn field_mut(&mut self, index: usize) -> Option<&mut dyn $crate::bind::Field> {
                let mut i = 0usize;
                $(
                    if index == i {
                        return Some(&mut self.$field as &mut dyn $crate::bind::Field);
                    }
                    i += 1;
                )*
                None
            }
        }
    };
}
