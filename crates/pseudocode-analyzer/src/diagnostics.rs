use std::fmt;

use pseudocode_syntax::ast::Line;

/// Semantic rule that a diagnostic reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// A name redeclared within the same scope
    IdentifierAlreadyDefined,
    /// FOR and NEXT name different loop variables
    IdentifiersDontMatch,
}

impl DiagnosticKind {
    pub fn code(self) -> &'static str {
        match self {
            DiagnosticKind::IdentifierAlreadyDefined => "E0001",
            DiagnosticKind::IdentifiersDontMatch => "E0002",
        }
    }

    fn describe(self) -> &'static str {
        match self {
            DiagnosticKind::IdentifierAlreadyDefined => "Identifier already defined",
            DiagnosticKind::IdentifiersDontMatch => "Identifiers in 'FOR' and 'NEXT' do not match",
        }
    }
}

/// A line-numbered semantic error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// The offending identifier
    pub name: String,
    pub line: Line,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, name: impl Into<String>, line: Line) -> Self {
        Self {
            kind,
            name: name.into(),
            line,
        }
    }

    /// `name` redeclared on `line`
    pub fn already_defined(name: impl Into<String>, line: Line) -> Self {
        Self::new(DiagnosticKind::IdentifierAlreadyDefined, name, line)
    }

    /// NEXT marker naming `name` on `line` does not match its FOR
    pub fn identifiers_dont_match(name: impl Into<String>, line: Line) -> Self {
        Self::new(DiagnosticKind::IdentifiersDontMatch, name, line)
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn message(&self) -> String {
        format!("{}: {}", self.kind.describe(), self.name)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Error at line {}: semantic error, {}",
            self.line,
            self.message()
        )
    }
}
