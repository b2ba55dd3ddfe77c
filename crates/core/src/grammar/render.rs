use std::fmt::{self, Display, Write};

use super::ast::{Argument, Identifier, List, Number, QuotedString, Value};

/// Render a parsed tag back to tag text.
///
/// Literals keep their source spelling, so re-parsing the output yields a
/// tree equal to the input apart from spans.
pub fn render(list: &List) -> String {
    list.to_string()
}

/// Separator between arguments.
const ARGUMENT_SEPARATOR: char = ',';
/// Separator between slice elements.
const LIST_SEPARATOR: char = ';';

impl Display for List {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_char(ARGUMENT_SEPARATOR)?;
            }
            write!(f, "{arg}")?;
        }
        Ok(())
    }
}

impl Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.name, &self.value) {
            // A switch renders its own name.
            (_, Value::Switch { .. }) | (None, _) => {}
            (Some(name), _) => write!(f, "{name}=")?,
        }
        write!(f, "{}", self.value)
    }
}

impl Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl Display for QuotedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.quoted)
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil { .. } => f.write_str("nil"),
            Value::Bool { value, .. } => write!(f, "{value}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::String(s) => write!(f, "{s}"),
            Value::Identifier(i) => write!(f, "{i}"),
            Value::Slice { values, .. } => {
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_char(LIST_SEPARATOR)?;
                    }
                    write!(f, "{v}")?;
                }
                Ok(())
            }
            Value::Switch { name, enabled, .. } => {
                f.write_char(if *enabled { '~' } else { '!' })?;
                write!(f, "{name}")
            }
        }
    }
}
