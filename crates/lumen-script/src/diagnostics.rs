use std::fmt;

/// One token the generator dropped, and why.
///
/// Generation is tolerant by design: none of these abort compilation, and
/// the offending token contributes zero bytes to the output. The list rides
/// along with the compiled bytes so callers can inspect what was skipped
/// instead of grepping logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// Identifier with no entry in the pinned opcode table.
    UnknownWord { lexeme: String },
    /// Color literal with the wrong shape (anything but `#rrggbb`).
    MalformedColor { lexeme: String },
    /// Integer literal that does not fit the 4-byte operand field.
    MalformedNumber { lexeme: String },
    /// Percentage whose numeric part does not parse.
    MalformedPercentage { lexeme: String },
    /// Input no lexer pattern claimed.
    UnknownInput { lexeme: String },
}

impl Diagnostic {
    /// The offending lexeme.
    pub fn lexeme(&self) -> &str {
        match self {
            Diagnostic::UnknownWord { lexeme }
            | Diagnostic::MalformedColor { lexeme }
            | Diagnostic::MalformedNumber { lexeme }
            | Diagnostic::MalformedPercentage { lexeme }
            | Diagnostic::UnknownInput { lexeme } => lexeme,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnknownWord { lexeme } => write!(f, "unknown word '{lexeme}'"),
            Diagnostic::MalformedColor { lexeme } => write!(f, "malformed color '{lexeme}'"),
            Diagnostic::MalformedNumber { lexeme } => write!(f, "malformed number '{lexeme}'"),
            Diagnostic::MalformedPercentage { lexeme } => {
                write!(f, "malformed percentage '{lexeme}'")
            }
            Diagnostic::UnknownInput { lexeme } => write!(f, "unrecognized input '{lexeme}'"),
        }
    }
}
