//! Values assigned to objects.
//!
//! Values keep their lexical form: numbers are not converted, string escapes
//! are not interpreted until asked for. What was written is what is stored.

use std::fmt;

/// A value assigned to an object definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// A bare numeric run, as written, sign and decimal point included.
    Number(String),
    /// The contents of a quoted string, escapes still in place.
    String(String),
    /// A pathname naming another object.
    Reference(String),
    /// A literal accepted by a declared syntax.
    Matched(String),
    /// The contents of a pattern literal, between the slashes.
    Pegexp(String),
    /// An inline object literal.
    Object,
}

impl Value {
    /// The raw text of a textual value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Number(s)
            | Value::String(s)
            | Value::Reference(s)
            | Value::Matched(s)
            | Value::Pegexp(s) => Some(s),
            Value::Object => None,
        }
    }

    /// A string value with its backslash escapes removed, so that `a\'b`
    /// reads back as `a'b`.
    pub fn unescaped(&self) -> Option<String> {
        let Value::String(s) = self else {
            return None;
        };
        let mut out = String::with_capacity(s.len());
        let mut chars = s.chars();
        while let Some(ch) = chars.next() {
            if ch == '\\' {
                if let Some(next) = chars.next() {
                    out.push(next);
                }
            } else {
                out.push(ch);
            }
        }
        Some(out)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(s) | Value::Reference(s) | Value::Matched(s) => write!(f, "{}", s),
            Value::String(s) => write!(f, "'{}'", s),
            Value::Pegexp(s) => write!(f, "/{}/", s),
            Value::Object => write!(f, "{{object}}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unescape_string() {
        let v = Value::String(r"a\'b \\c".to_string());
        assert_eq!(v.unescaped().as_deref(), Some(r"a'b \c"));
        assert_eq!(Value::Number("1".into()).unescaped(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Number("-1.5".into()).to_string(), "-1.5");
        assert_eq!(Value::String("hi".into()).to_string(), "'hi'");
        assert_eq!(Value::Pegexp("a+".into()).to_string(), "/a+/");
    }
}
