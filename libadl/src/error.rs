//! Diagnostics reported while parsing and resolving ADL text.

use thiserror::Error;

use crate::source::Source;

/// How much lookahead a syntax diagnostic captures.
const SNIPPET_CHARS: usize = 20;

/// A non-fatal problem found while parsing or resolving definitions.
///
/// Diagnostics are collected, never thrown: a syntax diagnostic makes the
/// innermost grammar rule fail, a resolution diagnostic abandons one
/// definition, and in both cases the parse itself carries on as far as the
/// input allows.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A required sub-production was absent after its introducer committed.
    #[error("{line}:{column}, {context} MISSING {expected}: {ahead}")]
    Syntax {
        /// The production that was being matched.
        context: String,
        /// What the production required next.
        expected: String,
        line: u32,
        column: u32,
        /// Lookahead at the point of failure, at most [`SNIPPET_CHARS`] long.
        ahead: String,
    },

    /// The first outermost definition did not name the root.
    #[error("Top object must be called TOP")]
    MalformedTop,

    /// The root was re-opened with a supertype other than `Object`.
    #[error("TOP must be Object")]
    TopMustBeObject,

    /// A definition nested inside one that failed to resolve.
    #[error("Child skipped because parent is missing")]
    MissingParent,

    /// A leading path segment named no object in scope.
    #[error("Parent object name not found: {0}")]
    UnresolvedParent(String),

    /// A pathname segment named no object during lookup.
    #[error("Can't find name: {0}")]
    UnresolvedName(String),

    /// A supertype pathname named no object.
    #[error("Supertype name not found: {0}")]
    UnresolvedSupertype(String),

    /// An existing object was re-opened with a different supertype.
    #[error("Cannot change supertype of {0}")]
    SupertypeConflict(String),
}

impl Diagnostic {
    /// Build a syntax diagnostic at a cursor position, capturing a short
    /// snippet of the unconsumed input.
    pub fn syntax<S: Source>(context: &str, expected: &str, at: &S) -> Self {
        Diagnostic::Syntax {
            context: context.to_string(),
            expected: expected.to_string(),
            line: at.line(),
            column: at.column(),
            ahead: at.rest().chars().take(SNIPPET_CHARS).collect(),
        }
    }

    /// Whether this diagnostic came from the grammar rather than from
    /// resolution.
    pub fn is_syntax(&self) -> bool {
        matches!(self, Diagnostic::Syntax { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Cursor;

    #[test]
    fn test_syntax_rendering() {
        let mut at = Cursor::new("x\nabcdefghijklmnopqrstuvwxyz");
        at.advance();
        at.advance();
        let d = Diagnostic::syntax("block", "closing }", &at);
        assert!(d.is_syntax());
        assert_eq!(d.to_string(), "2:1, block MISSING closing }: abcdefghijklmnopqrst");
    }

    #[test]
    fn test_resolution_rendering() {
        let d = Diagnostic::UnresolvedSupertype("Colour".to_string());
        assert!(!d.is_syntax());
        assert_eq!(d.to_string(), "Supertype name not found: Colour");
    }
}
