use std::fmt;
use std::sync::Arc;

type ApplyFn = Arc<dyn Fn(&str, &[String]) -> String + Send + Sync>;
type ArgumentCheck = Arc<dyn Fn(&[String]) -> bool + Send + Sync>;

/// Whether a filter argument is a tag reference whose value is only known at
/// resolution time.
///
/// During validation tag-reference arguments are passed as empty strings;
/// literal arguments are never empty.
pub fn is_deferred(argument: &str) -> bool {
    argument.is_empty()
}

/// A named, chainable text transformation.
///
/// `apply` receives the resolved input and the resolved arguments. The
/// argument check receives the arguments as written (see [`is_deferred`]) and
/// accepts everything unless one is set.
#[derive(Clone)]
pub struct Filter {
    name: String,
    alias: Option<String>,
    apply: ApplyFn,
    check: Option<ArgumentCheck>,
}

impl Filter {
    /// Create a filter that accepts any arguments.
    pub fn new(
        name: impl Into<String>,
        apply: impl Fn(&str, &[String]) -> String + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            alias: None,
            apply: Arc::new(apply),
            check: None,
        }
    }

    /// Set the alternative (usually symbolic) name.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Set the argument check.
    pub fn with_argument_check(
        mut self,
        check: impl Fn(&[String]) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.check = Some(Arc::new(check));
        self
    }

    /// Primary name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Alternative name, if any.
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// Apply the filter.
    pub fn apply(&self, input: &str, arguments: &[String]) -> String {
        (self.apply)(input, arguments)
    }

    /// Run the argument check.
    pub fn accepts(&self, arguments: &[String]) -> bool {
        self.check.as_ref().is_none_or(|check| check(arguments))
    }
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Filter")
            .field("name", &self.name)
            .field("alias", &self.alias)
            .field("checked", &self.check.is_some())
            .finish()
    }
}
