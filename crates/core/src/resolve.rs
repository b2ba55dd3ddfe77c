//! Splits a parsed tag into positional and keyword arguments.

use std::collections::BTreeMap;

use log::debug;
use serde::Serialize;

use crate::error::TagError;
use crate::grammar::ast::{Argument, List, Value};

/// Positional and keyword arguments of one tag, borrowed from its [`List`].
///
/// Positional values keep their source order. Keyword and switch arguments
/// are keyed by their name as written; when a key repeats, the later
/// argument wins.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedArgs<'a> {
    /// Unnamed argument values, in source order.
    pub positional: Vec<&'a Value>,
    /// Named arguments (keyword and switch), by key.
    pub keyword: BTreeMap<&'a str, &'a Argument>,
}

impl<'a> ResolvedArgs<'a> {
    /// Value of the keyword argument `key`, if present.
    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.keyword.get(key).map(|arg| &arg.value)
    }

    /// Whether there are no arguments at all.
    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.keyword.is_empty()
    }
}

/// Split `list` into positional and keyword arguments.
///
/// Fails if a positional argument appears after any keyword or switch.
pub fn resolve(list: &List) -> Result<ResolvedArgs<'_>, TagError> {
    let mut positional = Vec::new();
    let mut keyword = BTreeMap::new();
    for arg in &list.args {
        match &arg.name {
            Some(name) => {
                if keyword.insert(name.name.as_str(), arg).is_some() {
                    debug!("duplicate key {:?}; later value wins", name.name);
                }
            }
            None if !keyword.is_empty() => {
                return Err(TagError::ArgumentOrder { span: arg.span });
            }
            None => positional.push(&arg.value),
        }
    }
    Ok(ResolvedArgs {
        positional,
        keyword,
    })
}

impl List {
    /// Shorthand for [`resolve`].
    pub fn resolve(&self) -> Result<ResolvedArgs<'_>, TagError> {
        resolve(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::diag::{Span, codes};
    use crate::grammar::parser::parse_str;

    #[test]
    fn splits_positional_and_keyword() {
        let list = parse_str("12,name,~switch,count=3").unwrap();
        let args = resolve(&list).unwrap();
        assert_eq!(args.positional.len(), 2);
        assert_eq!(args.keyword.len(), 2);
        assert!(matches!(args.get("switch"), Some(Value::Switch { enabled: true, .. })));
        assert!(matches!(args.get("count"), Some(Value::Number(n)) if n.int == Some(3)));
    }

    #[test]
    fn positional_after_keyword_is_rejected() {
        let list = parse_str("a=1,b").unwrap();
        let err = resolve(&list).unwrap_err();
        assert_eq!(err.code(), codes::POSITIONAL_AFTER_KEYWORD);
        assert_eq!(err.span(), Some(Span::new(4, 5)));
    }

    #[test]
    fn positional_after_switch_is_rejected() {
        let list = parse_str("!off,1").unwrap();
        assert!(matches!(
            resolve(&list),
            Err(TagError::ArgumentOrder { .. })
        ));
    }

    #[test]
    fn later_duplicate_key_wins() {
        let list = parse_str("a=1,a=2").unwrap();
        let args = list.resolve().unwrap();
        assert_eq!(args.keyword.len(), 1);
        assert!(matches!(args.get("a"), Some(Value::Number(n)) if n.int == Some(2)));
    }

    #[test]
    fn empty_tag_resolves_to_nothing() {
        let list = parse_str("").unwrap();
        assert!(resolve(&list).unwrap().is_empty());
    }
}
