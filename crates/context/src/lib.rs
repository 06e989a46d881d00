//! Context documents for tagfmt: which tags a template may use, fixed
//! parameter values, and the records to render.

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tagfmt_core::grammar::tables::ParsingMethod;
use tagfmt_core::{Registry, RegistryBuilder};
use thiserror::Error;
use tracing::debug;

/// Schema version written by [`Context::default`].
pub const CURRENT_SCHEMA_VERSION: &str = "1.0.0";

/// Major schema version this crate understands.
pub const SUPPORTED_SCHEMA_MAJOR: u64 = 1;

/// Errors that can occur when loading or validating a context document.
#[derive(Debug, Error)]
pub enum ContextError {
    /// JSON deserialization failed.
    #[error("invalid context JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// A field value is not acceptable.
    #[error("invalid {field}: {reason}")]
    InvalidField {
        /// Path of the field that failed validation (e.g. `records[2].city`).
        field: String,
        /// A human-readable explanation of why the field value is invalid.
        reason: String,
    },
}

/// One row of tag values. Tags missing from the row resolve to the empty
/// string.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Record(BTreeMap<String, String>);

impl Record {
    /// An empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, returning the record for chaining.
    pub fn with(mut self, tag: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(tag.into(), value.into());
        self
    }

    /// The value for `tag`, or `""`.
    pub fn get(&self, tag: &str) -> &str {
        self.0.get(tag).map_or("", String::as_str)
    }

    /// Field names present in this record.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// A context document.
///
/// # Example
/// ```
/// let ctx = tagfmt_context::load_context_from_str(r#"{
///     "schema_version": "1.0.0",
///     "tags": ["name"],
///     "parameters": { "greeting": "Hello" },
///     "records": [{ "name": "Ada" }]
/// }"#).unwrap();
/// let registry = ctx.registry().unwrap();
/// let tpl = registry.compile("{!greeting}, {name}!").unwrap();
/// assert_eq!(tpl.resolve(&ctx.records()[0]).unwrap(), "Hello, Ada!");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Context {
    /// Document schema version (e.g., `"1.0.0"`).
    pub schema_version: String,
    /// Tag names that records may fill.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Parameter tag names and their fixed values.
    #[serde(default)]
    pub parameters: BTreeMap<String, String>,
    /// Rows to render.
    #[serde(default)]
    pub records: Vec<Record>,
}

impl Default for Context {
    fn default() -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION.into(),
            tags: Vec::new(),
            parameters: BTreeMap::new(),
            records: Vec::new(),
        }
    }
}

impl Context {
    /// The records to render; a single empty record when none are given.
    pub fn records(&self) -> Cow<'_, [Record]> {
        if self.records.is_empty() {
            Cow::Owned(vec![Record::new()])
        } else {
            Cow::Borrowed(&self.records)
        }
    }

    /// A registry builder with every declared tag and parameter registered.
    ///
    /// Add filters before building.
    pub fn registry_builder(&self) -> RegistryBuilder<Record> {
        let mut builder = Registry::builder();
        for tag in &self.tags {
            let key = tag.clone();
            builder = builder.tag(tag.clone(), move |record: &Record| {
                record.get(&key).to_string()
            });
        }
        for (name, value) in &self.parameters {
            let value = value.clone();
            builder = builder.parameter_tag(name.clone(), move || value.clone());
        }
        builder
    }

    /// A registry with the declared tags and parameters and no filters.
    pub fn registry(&self) -> Result<Registry<Record>, tagfmt_core::RegistryError> {
        self.registry_builder().build()
    }
}

/// Load and validate a [`Context`] from a JSON string.
///
/// Performs structural validation after deserialization:
/// - `schema_version` must be non-empty with major version 1
/// - tag and parameter names must be valid tag names (letters, `-`, `_`)
/// - tags must be unique, and no name may be both a tag and a parameter
/// - records may only set declared tags
pub fn load_context_from_str(s: &str) -> Result<Context, ContextError> {
    let context: Context = serde_json::from_str(s)?;

    // -- Schema version --
    check_schema_version(&context.schema_version)?;

    // -- Tag names --
    let mut declared = BTreeSet::new();
    for (idx, tag) in context.tags.iter().enumerate() {
        if !ParsingMethod::Name.accepts_all(tag) {
            return Err(ContextError::InvalidField {
                field: format!("tags[{idx}]"),
                reason: format!("'{tag}' is not a valid tag name"),
            });
        }
        if !declared.insert(tag.as_str()) {
            return Err(ContextError::InvalidField {
                field: format!("tags[{idx}]"),
                reason: format!("'{tag}' is declared twice"),
            });
        }
    }

    // -- Parameter names --
    for name in context.parameters.keys() {
        if !ParsingMethod::Name.accepts_all(name) {
            return Err(ContextError::InvalidField {
                field: format!("parameters.{name}"),
                reason: format!("'{name}' is not a valid parameter name"),
            });
        }
        if declared.contains(name.as_str()) {
            return Err(ContextError::InvalidField {
                field: format!("parameters.{name}"),
                reason: format!("'{name}' is also declared as a tag"),
            });
        }
    }

    // -- Records --
    for (idx, record) in context.records.iter().enumerate() {
        if let Some(key) = record.keys().find(|k| !declared.contains(k)) {
            return Err(ContextError::InvalidField {
                field: format!("records[{idx}].{key}"),
                reason: format!("'{key}' is not a declared tag"),
            });
        }
    }

    debug!(
        tags = context.tags.len(),
        parameters = context.parameters.len(),
        records = context.records.len(),
        "loaded context"
    );
    Ok(context)
}

fn check_schema_version(version: &str) -> Result<(), ContextError> {
    let invalid = |reason: String| ContextError::InvalidField {
        field: "schema_version".into(),
        reason,
    };
    if version.trim().is_empty() {
        return Err(invalid("must not be empty".into()));
    }
    let major = version
        .split('.')
        .next()
        .and_then(|m| m.parse::<u64>().ok())
        .ok_or_else(|| invalid(format!("'{version}' is not a version number")))?;
    if major != SUPPORTED_SCHEMA_MAJOR {
        return Err(invalid(format!(
            "major version {major} is not supported (expected {SUPPORTED_SCHEMA_MAJOR})"
        )));
    }
    Ok(())
}
