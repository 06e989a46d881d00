pub use tagfmt_diagnostics::{Diagnostic, Severity, Span, codes};
