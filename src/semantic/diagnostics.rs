use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// Renders as the reference's `[SEM ERROR] <message> [line:N]` /
/// `[SEM WARNING] ...` wire format, which downstream tooling and the test
/// suite both depend on byte-for-byte.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub line: u32,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let tag = match self.severity {
            Severity::Error => "[SEM ERROR]",
            Severity::Warning => "[SEM WARNING]",
        };
        write!(f, "{} {} [line:{}]", tag, self.message, self.line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_error_line() {
        let d = Diagnostic {
            severity: Severity::Error,
            message: "Redeclaration of variable 'x'".to_string(),
            line: 3,
        };
        assert_eq!(d.to_string(), "[SEM ERROR] Redeclaration of variable 'x' [line:3]");
    }

    #[test]
    fn formats_warning_line() {
        let d = Diagnostic {
            severity: Severity::Warning,
            message: "Unused variable 'y'".to_string(),
            line: 1,
        };
        assert_eq!(d.to_string(), "[SEM WARNING] Unused variable 'y' [line:1]");
    }
}
