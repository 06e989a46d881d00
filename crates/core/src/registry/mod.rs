//! Tag, parameter tag, and filter registry.
//!
//! A [`RegistryBuilder`] collects named callables and checks their names
//! against the grammar when built. The resulting [`Registry`] is immutable and
//! provides the `validate` / `compile` / `resolve` entry points.

/// Filter definitions.
pub mod filter;
/// Compiled templates.
pub mod template;
/// Static validation of templates against a registry.
pub mod validate;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::grammar::tables::{ParsingMethod, ResolutionMethod};
use crate::resolve::dispatch::{Callable, DispatchTable};
pub use filter::Filter;
pub use template::{Template, TemplateError};
pub use validate::ValidationResult;

type TagFn<T> = Arc<dyn Fn(&T) -> String + Send + Sync>;
type ParameterFn = Arc<dyn Fn() -> String + Send + Sync>;

/// Which set of names a registry entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    /// Value-producing tags.
    Tag,
    /// Zero-argument tags.
    ParameterTag,
    /// Filter names and alternative names.
    Filter,
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Namespace::Tag => write!(f, "tag"),
            Namespace::ParameterTag => write!(f, "parameter tag"),
            Namespace::Filter => write!(f, "filter"),
        }
    }
}

/// Errors detected when a registry is built.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// The name cannot be written in a template.
    #[error("invalid {namespace} name '{name}'")]
    InvalidName {
        /// Where the name was registered.
        namespace: Namespace,
        /// The rejected name.
        name: String,
    },
    /// The name is already registered in the same namespace.
    #[error("duplicate {namespace} name '{name}'")]
    Duplicate {
        /// Where the name was registered.
        namespace: Namespace,
        /// The repeated name.
        name: String,
    },
}

/// Fluent builder for a [`Registry`].
pub struct RegistryBuilder<T> {
    tags: Vec<(String, TagFn<T>)>,
    parameter_tags: Vec<(String, ParameterFn)>,
    filters: Vec<Filter>,
}

impl<T> Default for RegistryBuilder<T> {
    fn default() -> Self {
        Self {
            tags: Vec::new(),
            parameter_tags: Vec::new(),
            filters: Vec::new(),
        }
    }
}

impl<T> RegistryBuilder<T> {
    /// An empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tag that reads the carrier value.
    pub fn tag(
        mut self,
        name: impl Into<String>,
        resolve: impl Fn(&T) -> String + Send + Sync + 'static,
    ) -> Self {
        self.tags.push((name.into(), Arc::new(resolve)));
        self
    }

    /// Register a zero-argument tag, referenced as `{!name}`.
    pub fn parameter_tag(
        mut self,
        name: impl Into<String>,
        resolve: impl Fn() -> String + Send + Sync + 'static,
    ) -> Self {
        self.parameter_tags.push((name.into(), Arc::new(resolve)));
        self
    }

    /// Register a filter.
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Register several filters.
    pub fn filters(mut self, filters: impl IntoIterator<Item = Filter>) -> Self {
        self.filters.extend(filters);
        self
    }

    /// Check every name and build the registry.
    pub fn build(self) -> Result<Registry<T>, RegistryError> {
        let mut tags = HashMap::with_capacity(self.tags.len());
        for (name, resolve) in self.tags {
            check_name(Namespace::Tag, &name, ParsingMethod::Name)?;
            if tags.contains_key(&name) {
                return Err(RegistryError::Duplicate {
                    namespace: Namespace::Tag,
                    name,
                });
            }
            tags.insert(name, resolve);
        }

        let mut parameter_tags = HashMap::with_capacity(self.parameter_tags.len());
        for (name, resolve) in self.parameter_tags {
            check_name(Namespace::ParameterTag, &name, ParsingMethod::Name)?;
            if parameter_tags.contains_key(&name) {
                return Err(RegistryError::Duplicate {
                    namespace: Namespace::ParameterTag,
                    name,
                });
            }
            parameter_tags.insert(name, resolve);
        }

        let mut filter_index = HashMap::new();
        for (idx, filter) in self.filters.iter().enumerate() {
            for name in std::iter::once(filter.name()).chain(filter.alias()) {
                check_name(Namespace::Filter, name, ParsingMethod::NameOrSymbol)?;
                if filter_index.insert(name.to_string(), idx).is_some() {
                    return Err(RegistryError::Duplicate {
                        namespace: Namespace::Filter,
                        name: name.to_string(),
                    });
                }
            }
        }

        debug!(
            tags = tags.len(),
            parameter_tags = parameter_tags.len(),
            filters = self.filters.len(),
            "built registry"
        );

        Ok(Registry {
            tags,
            parameter_tags,
            filters: self.filters,
            filter_index,
        })
    }
}

fn check_name(namespace: Namespace, name: &str, method: ParsingMethod) -> Result<(), RegistryError> {
    if method.accepts_all(name) {
        Ok(())
    } else {
        Err(RegistryError::InvalidName {
            namespace,
            name: name.to_string(),
        })
    }
}

/// Immutable set of tags, parameter tags, and filters.
///
/// `T` is the carrier value that tags read from when a template is resolved.
pub struct Registry<T> {
    tags: HashMap<String, TagFn<T>>,
    parameter_tags: HashMap<String, ParameterFn>,
    filters: Vec<Filter>,
    filter_index: HashMap<String, usize>,
}

impl<T> Registry<T> {
    /// Start a new builder.
    pub fn builder() -> RegistryBuilder<T> {
        RegistryBuilder::new()
    }

    /// Whether a tag with this name is registered.
    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.contains_key(name)
    }

    /// Whether a parameter tag with this name is registered.
    pub fn has_parameter_tag(&self, name: &str) -> bool {
        self.parameter_tags.contains_key(name)
    }

    /// Find a filter by name or alternative name.
    pub fn filter(&self, name: &str) -> Option<&Filter> {
        self.filter_index.get(name).map(|&idx| &self.filters[idx])
    }

    /// Registered filters in registration order.
    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    /// The dispatch table that resolves templates against this registry and
    /// `value`.
    ///
    /// Unknown names resolve to the empty string; [`Registry::compile`]
    /// rejects them beforehand.
    pub fn resolution_table<'a>(&'a self, value: &'a T) -> DispatchTable<'a> {
        DispatchTable::from_methods(|method| {
            let callable: Callable<'a> = match method {
                ResolutionMethod::Tag => Box::new(move |args: &[String]| {
                    args.first()
                        .and_then(|name| self.tags.get(name))
                        .map(|resolve| resolve(value))
                        .unwrap_or_default()
                }),
                ResolutionMethod::ParameterTag => Box::new(move |args: &[String]| {
                    args.first()
                        .and_then(|name| self.parameter_tags.get(name))
                        .map(|resolve| resolve())
                        .unwrap_or_default()
                }),
                ResolutionMethod::Filter => Box::new(move |args: &[String]| match args {
                    [name, input, arguments @ ..] => self
                        .filter(name)
                        .map(|f| f.apply(input, arguments))
                        .unwrap_or_default(),
                    _ => String::new(),
                }),
                ResolutionMethod::Name => {
                    Box::new(|args: &[String]| args.first().cloned().unwrap_or_default())
                }
            };
            Some(callable)
        })
    }

    /// Parse, validate, and resolve `input` once.
    pub fn resolve(&self, input: &str, value: &T) -> Result<String, TemplateError> {
        self.compile(input)?.resolve(value)
    }
}

impl<T> fmt::Debug for Registry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tags: Vec<_> = self.tags.keys().collect();
        tags.sort();
        let mut parameter_tags: Vec<_> = self.parameter_tags.keys().collect();
        parameter_tags.sort();
        f.debug_struct("Registry")
            .field("tags", &tags)
            .field("parameter_tags", &parameter_tags)
            .field("filters", &self.filters)
            .finish()
    }
}
