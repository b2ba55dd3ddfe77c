//! Key and field-name normalization.

use serde::{Deserialize, Serialize};

/// How keyword keys are matched against record field names.
///
/// Both sides are normalized with the same style before comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NameStyle {
    /// `switchField`, `switch_field` and `switch-field` all become `switch-field`.
    #[default]
    Kebab,
    /// Same word splitting as `Kebab`, joined with `_`.
    Snake,
    /// Names must match byte for byte.
    Exact,
}

impl NameStyle {
    /// Normalize `name` under this style.
    pub fn normalize(self, name: &str) -> String {
        match self {
            NameStyle::Kebab => to_kebab_case(name),
            NameStyle::Snake => to_snake_case(name),
            NameStyle::Exact => name.to_string(),
        }
    }
}

/// `HTTPServerName` → `http-server-name`, `field_2` → `field-2`.
pub fn to_kebab_case(name: &str) -> String {
    words(name).join("-")
}

/// `HTTPServerName` → `http_server_name`.
pub fn to_snake_case(name: &str) -> String {
    words(name).join("_")
}

/// Lowercased words of `name`.
///
/// Words break at `_`, `-` and whitespace, at a lowercase letter or digit
/// followed by an uppercase letter, and before the last capital of an
/// acronym that runs into a capitalized word.
fn words(name: &str) -> Vec<String> {
    let chars: Vec<char> = name.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();
    for (i, &c) in chars.iter().enumerate() {
        if c == '_' || c == '-' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_numeric() || (prev.is_uppercase() && next_is_lower) {
                words.push(std::mem::take(&mut current));
            }
        }
        current.extend(c.to_lowercase());
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kebab_case() {
        let cases = [
            ("switchField", "switch-field"),
            ("SwitchField", "switch-field"),
            ("switch_field", "switch-field"),
            ("switch-field", "switch-field"),
            ("HTTPServer", "http-server"),
            ("parseURL", "parse-url"),
            ("ID", "id"),
            ("field2Name", "field2-name"),
            ("items", "items"),
            ("__private", "private"),
            ("", ""),
        ];
        for (input, want) in cases {
            assert_eq!(to_kebab_case(input), want, "input {input:?}");
        }
    }

    #[test]
    fn snake_case() {
        assert_eq!(to_snake_case("numField"), "num_field");
        assert_eq!(to_snake_case("num-field"), "num_field");
    }

    #[test]
    fn styles() {
        assert_eq!(NameStyle::Kebab.normalize("NumField"), "num-field");
        assert_eq!(NameStyle::Snake.normalize("NumField"), "num_field");
        assert_eq!(NameStyle::Exact.normalize("NumField"), "NumField");
        assert_eq!(NameStyle::default(), NameStyle::Kebab);
    }
}
