pub use fieldtag_diagnostics::{Diagnostic, Severity, Span, codes};
