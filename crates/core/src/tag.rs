//! Tag lookup and the one-call fill entry points.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::bind::{Record, bind, bind_atomic};
use crate::config::{BindMode, BindOptions};
use crate::error::TagError;
use crate::grammar::ast::List;
use crate::grammar::parser::parse_str;
use crate::resolve::resolve;

/// Tag value meaning "leave this record alone".
pub const IGNORE: &str = "-";

/// Anything that can look up a raw tag string by key, such as the
/// annotations attached to a struct field.
pub trait TagSource {
    /// Raw tag text stored under `key`.
    fn get_tag(&self, key: &str) -> Option<&str>;
}

impl<S: BuildHasher> TagSource for HashMap<String, String, S> {
    fn get_tag(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }
}

impl TagSource for BTreeMap<String, String> {
    fn get_tag(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }
}

impl TagSource for [(&str, &str)] {
    fn get_tag(&self, key: &str) -> Option<&str> {
        self.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
    }
}

/// A named raw tag string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Key the tag was found under.
    pub name: String,
    /// Raw tag text.
    pub value: String,
}

impl Tag {
    /// A tag with the given key and text.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Find the tag stored under `key`.
    pub fn lookup<S: TagSource + ?Sized>(source: &S, key: &str) -> Option<Tag> {
        source.get_tag(key).map(|value| Tag::new(key, value))
    }

    /// Whether the value is the `-` sentinel.
    pub fn is_ignored(&self) -> bool {
        self.value == IGNORE
    }

    /// Parse the raw value.
    pub fn parse(&self) -> Result<List, TagError> {
        parse_str(&self.value)
    }

    /// Parse, resolve and bind into `record` with default options.
    ///
    /// The `-` sentinel leaves `record` untouched and succeeds.
    pub fn fill<R: Record + ?Sized>(&self, record: &mut R) -> Result<(), TagError> {
        if self.is_ignored() {
            debug!("tag {:?} is '-'; skipping", self.name);
            return Ok(());
        }
        let list = self.parse()?;
        let args = resolve(&list)?;
        bind(&args, record, &BindOptions::default())
    }

    /// Like [`fill`](Self::fill), honouring `options` (including
    /// [`BindMode::Atomic`]).
    pub fn fill_with<R: Record + Clone>(
        &self,
        record: &mut R,
        options: &BindOptions,
    ) -> Result<(), TagError> {
        if self.is_ignored() {
            debug!("tag {:?} is '-'; skipping", self.name);
            return Ok(());
        }
        let list = self.parse()?;
        let args = resolve(&list)?;
        match options.mode {
            BindMode::BestEffort => bind(&args, record, options),
            BindMode::Atomic => bind_atomic(&args, record, options),
        }
    }
}
