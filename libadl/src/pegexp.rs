//! The pegexp micro-grammar: pattern literals between slashes.
//!
//! A pegexp is validated structurally here; it is not compiled or executed.
//! The reported span is the text between the slashes, which a consumer
//! stores as the pattern's definition.

use crate::parser::Parser;
use crate::sink::Sink;
use crate::source::Source;

/// Escapes that stand for themselves or a named control character.
const SIMPLE_ESCAPES: &str = ".0befntr\\*+?()|/[";

/// Characters that may not appear unescaped in a pattern.
const UNESCAPED_FORBIDDEN: &str = "*+?()|/\\[";

/// Operators that become ordinary characters inside a class.
const CLASS_OPERATORS: &str = "*+?()|/";

impl<'k, K: Sink> Parser<'k, K> {
    /// `'/' pegexp_sequence '/'`
    pub(crate) fn pegexp_literal(&mut self, source: &mut K::Source) -> bool {
        let mut probe = *source;
        if probe.peek() != Some('/') {
            return false;
        }
        probe.advance();
        let start = probe;
        if !self.pegexp_sequence(&mut probe) {
            return false;
        }
        if probe.peek() != Some('/') {
            self.error("Pegexp", "closing /", &probe);
            return false;
        }
        self.sink.pegexp_literal(&start, &probe);
        probe.advance();
        self.space(&mut probe);
        *source = probe;
        true
    }

    /// `+('|' +pegexp_atom) | *pegexp_atom`
    ///
    /// A sequence that opens with `|` is an alternation, each branch
    /// needing at least one atom; otherwise it is a plain run of atoms,
    /// possibly empty.
    fn pegexp_sequence(&mut self, source: &mut K::Source) -> bool {
        let mut probe = *source;
        if probe.peek() == Some('|') {
            while probe.peek() == Some('|') {
                probe.advance();
                let mut any = false;
                while self.pegexp_atom(&mut probe) {
                    any = true;
                }
                if !any {
                    self.error("pegexp_sequence", "atom", &probe);
                    return false;
                }
            }
            *source = probe;
            return true;
        }
        while self.pegexp_atom(&mut probe) {}
        *source = probe;
        true
    }

    /// `?[*+?] (pegexp_lookahead | pegexp_char | pegexp_class | pegexp_group)`
    ///
    /// Repetition operators are prefix in this notation.
    fn pegexp_atom(&mut self, source: &mut K::Source) -> bool {
        let mut probe = *source;
        if matches!(probe.peek(), Some('*') | Some('+') | Some('?')) {
            probe.advance();
        }
        if self.pegexp_lookahead(&mut probe)
            || self.pegexp_char(&mut probe)
            || self.pegexp_class(&mut probe)
            || self.pegexp_group(&mut probe)
        {
            *source = probe;
            return true;
        }
        false
    }

    /// `'(' pegexp_sequence ')'`
    fn pegexp_group(&mut self, source: &mut K::Source) -> bool {
        let mut probe = *source;
        if probe.peek() != Some('(') {
            return false;
        }
        probe.advance();
        if !self.pegexp_sequence(&mut probe) {
            self.error("pegexp_group", "sequence", &probe);
            return false;
        }
        if probe.peek() != Some(')') {
            self.error("pegexp_group", "closing )", &probe);
            return false;
        }
        probe.advance();
        *source = probe;
        true
    }

    /// `[&!] pegexp_atom`
    fn pegexp_lookahead(&mut self, source: &mut K::Source) -> bool {
        let mut probe = *source;
        if !matches!(probe.peek(), Some('&') | Some('!')) {
            return false;
        }
        probe.advance();
        if !self.pegexp_atom(&mut probe) {
            return false;
        }
        *source = probe;
        true
    }

    /// One literal or escaped character.
    ///
    /// Escapes: character properties `\a \d \h \s \w \L \U`, octal (`\0`-`\3`
    /// take up to two more digits, `\4`-`\7` one more), hex `\xHH` and
    /// `\x{...}`, Unicode `\uHHHH` and `\u{...}` (braced forms take up to 8
    /// digits), property names `\p{Name}`/`\P{Name}`, and the literal
    /// specials of [`SIMPLE_ESCAPES`]. Unescaped characters may not be
    /// control characters, whitespace, or pattern operators.
    fn pegexp_char(&mut self, source: &mut K::Source) -> bool {
        let mut probe = *source;
        let Some(ch) = probe.peek() else {
            return false;
        };

        if ch == '\\' {
            probe.advance();
            let Some(esc) = probe.peek() else {
                return false;
            };
            match esc {
                'a' | 'd' | 'h' | 's' | 'w' | 'L' | 'U' => probe.advance(),
                '0'..='7' => {
                    let short = esc > '3';
                    probe.advance();
                    if matches!(probe.peek(), Some(c) if ('0'..='7').contains(&c)) {
                        probe.advance();
                        if !short && matches!(probe.peek(), Some(c) if ('0'..='7').contains(&c)) {
                            probe.advance();
                        }
                    }
                }
                'x' | 'u' => {
                    probe.advance();
                    let braced = probe.peek() == Some('{');
                    if braced {
                        probe.advance();
                    }
                    let max = if braced {
                        8
                    } else if esc == 'x' {
                        2
                    } else {
                        4
                    };
                    if !matches!(probe.peek(), Some(c) if c.is_ascii_hexdigit()) {
                        return false;
                    }
                    let mut digits = 0;
                    while digits < max
                        && matches!(probe.peek(), Some(c) if c.is_ascii_hexdigit())
                    {
                        probe.advance();
                        digits += 1;
                    }
                    if braced {
                        if probe.peek() != Some('}') {
                            return false;
                        }
                        probe.advance();
                    }
                }
                'p' | 'P' => {
                    probe.advance();
                    if probe.peek() != Some('{') {
                        return false;
                    }
                    probe.advance();
                    let mut any = false;
                    while matches!(
                        probe.peek(),
                        Some(c) if c.is_ascii_alphanumeric() || c == '_' || c == ' '
                    ) {
                        any = true;
                        probe.advance();
                    }
                    if !any || probe.peek() != Some('}') {
                        return false;
                    }
                    probe.advance();
                }
                _ if SIMPLE_ESCAPES.contains(esc) => probe.advance(),
                _ => return false,
            }
            *source = probe;
            return true;
        }

        if ch <= ' ' || UNESCAPED_FORBIDDEN.contains(ch) {
            return false;
        }
        probe.advance();
        *source = probe;
        true
    }

    /// `'[' ?'^' ?'-' +pegexp_class_part ']'`
    ///
    /// A leading `^` negates; a hyphen meant literally must come first.
    fn pegexp_class(&mut self, source: &mut K::Source) -> bool {
        let mut probe = *source;
        if probe.peek() != Some('[') {
            return false;
        }
        probe.advance();
        if probe.peek() == Some('^') {
            probe.advance();
        }
        if probe.peek() == Some('-') {
            probe.advance();
        }
        if !self.pegexp_class_part(&mut probe) {
            self.error("pegexp_class", "valid class", &probe);
            return false;
        }
        while self.pegexp_class_part(&mut probe) {}
        if probe.peek() != Some(']') {
            self.error("pegexp_class", "]", &probe);
            return false;
        }
        probe.advance();
        *source = probe;
        true
    }

    /// `!']' pegexp_class_char ?('-' !']' pegexp_class_char)`
    fn pegexp_class_part(&mut self, source: &mut K::Source) -> bool {
        let mut probe = *source;
        if probe.peek() == Some(']') {
            return false;
        }
        if !self.pegexp_class_char(&mut probe) {
            self.error("pegexp_class_part", "valid class character", &probe);
            return false;
        }
        if probe.peek() == Some('-') {
            probe.advance();
            if probe.peek() == Some(']') {
                return false;
            }
            if !self.pegexp_class_char(&mut probe) {
                return false;
            }
        }
        *source = probe;
        true
    }

    /// `(!'-' pegexp_char) | [*+?()|/]`
    fn pegexp_class_char(&mut self, source: &mut K::Source) -> bool {
        let mut probe = *source;
        let Some(ch) = probe.peek() else {
            return false;
        };
        if ch != '-' && self.pegexp_char(&mut probe) {
            *source = probe;
            return true;
        }
        if !CLASS_OPERATORS.contains(ch) {
            return false;
        }
        probe.advance();
        *source = probe;
        true
    }
}
