use std::collections::HashMap;
use std::fmt;

use crate::grammar::tables::{self, PLACEHOLDER_KINDS, ResolutionMethod, TokenKind};
use crate::grammar::token::TokenDefinition;

/// A resolution callable: receives the token's argument vector, returns text.
///
/// Tags and arguments receive `[data]`; filters receive
/// `[filter_name, inner_value, arguments...]`.
pub type Callable<'a> = Box<dyn FnMut(&[String]) -> String + 'a>;

/// Composite key selecting a callable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DispatchKey {
    /// Token kind.
    pub kind: TokenKind,
    /// Operator prefix symbol.
    pub operator: Option<char>,
    /// Indicator prefix symbol.
    pub indicator: Option<char>,
}

impl DispatchKey {
    /// Build a key from its three parts.
    pub fn new(kind: TokenKind, operator: Option<char>, indicator: Option<char>) -> Self {
        Self {
            kind,
            operator,
            indicator,
        }
    }
}

impl From<&TokenDefinition> for DispatchKey {
    fn from(token: &TokenDefinition) -> Self {
        Self::new(token.kind, token.operator, token.indicator)
    }
}

/// Callables keyed by (kind, operator, indicator).
///
/// Built fresh for every resolution pass. A key with no callable resolves to
/// the empty string.
#[derive(Default)]
pub struct DispatchTable<'a> {
    entries: HashMap<DispatchKey, Callable<'a>>,
}

impl<'a> DispatchTable<'a> {
    /// An empty table; every token resolves to the empty string.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table with one callable per (kind, operator, indicator) entry of
    /// the operator table, created from the entry's resolution method.
    ///
    /// `make` returning `None` leaves that entry unregistered.
    pub fn from_methods(mut make: impl FnMut(ResolutionMethod) -> Option<Callable<'a>>) -> Self {
        let mut table = Self::new();
        for kind in PLACEHOLDER_KINDS {
            for op in tables::group(kind).all_operators() {
                for ind in op.all_indicators() {
                    if let Some(callable) = make(ind.resolution) {
                        table
                            .entries
                            .insert(DispatchKey::new(kind, op.symbol, ind.symbol), callable);
                    }
                }
            }
        }
        table
    }

    /// Register (or replace) the callable for `key`.
    pub fn insert(
        &mut self,
        key: DispatchKey,
        callable: impl FnMut(&[String]) -> String + 'a,
    ) -> &mut Self {
        self.entries.insert(key, Box::new(callable));
        self
    }

    /// Builder-style [`DispatchTable::insert`].
    pub fn with(
        mut self,
        key: DispatchKey,
        callable: impl FnMut(&[String]) -> String + 'a,
    ) -> Self {
        self.insert(key, callable);
        self
    }

    /// Whether a callable is registered for `key`.
    pub fn contains(&self, key: &DispatchKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of registered callables.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no callables are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Invoke the callable for `key`, or return the empty string when absent.
    pub fn call(&mut self, key: DispatchKey, args: &[String]) -> String {
        match self.entries.get_mut(&key) {
            Some(callable) => callable(args),
            None => String::new(),
        }
    }
}

impl fmt::Debug for DispatchTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchTable")
            .field("keys", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}
