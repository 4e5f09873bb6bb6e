pub mod analyzer;
pub mod diagnostics;
pub mod eval;

pub use analyzer::{analyze, AnalysisResult};
pub use diagnostics::{Diagnostic, Severity};
