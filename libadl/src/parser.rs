//! The grammar engine: a single-pass, backtracking recursive-descent parser
//! for ADL definitions, generic over its [`Source`] and [`Sink`].
//!
//! Every rule takes a `&mut` cursor, copies it into a probe, works on the
//! probe, and assigns the probe back only on success. A rule that fails
//! leaves its caller's cursor untouched. Failure is silent and triggers
//! backtracking; a diagnostic (reported through `Sink::error`) marks a
//! committed production whose required continuation was absent, and the
//! rule then fails without consuming input.
//!
//! Pattern literals (`/.../`) are handled by the pegexp half of this
//! parser, in the `pegexp` module.

use crate::sink::Sink;
use crate::source::Source;

/// The recursive-descent grammar engine. All structure it discovers is
/// reported to the sink as events; the engine itself keeps no state.
pub struct Parser<'k, K: Sink> {
    pub(crate) sink: &'k mut K,
}

impl<'k, K: Sink> Parser<'k, K> {
    pub fn new(sink: &'k mut K) -> Self {
        Parser { sink }
    }

    pub(crate) fn error(&mut self, context: &str, expected: &str, at: &K::Source) {
        self.sink.error(context, expected, at);
    }

    /// `?BOM space *definition`
    ///
    /// The top production cannot fail; input that stops matching simply
    /// stops being consumed, and the caller compares the cursor's offset
    /// against the input length.
    pub fn parse(&mut self, source: &mut K::Source) {
        let mut probe = *source;
        if probe.peek() == Some('\u{FEFF}') {
            probe.advance();
        }
        self.space(&mut probe);
        while self.definition(&mut probe) {}
        *source = probe;
    }

    /// `&. !'}' ?path_name body ?';'`
    fn definition(&mut self, source: &mut K::Source) -> bool {
        let mut probe = *source;
        match probe.peek() {
            None | Some('}') => return false,
            _ => {}
        }
        self.sink.definition_starts();
        self.path_name(&mut probe);
        self.sink.object_name();
        if !self.body(&mut probe) {
            return false;
        }
        if probe.peek() == Some(';') {
            probe.advance();
            self.space(&mut probe);
        }
        self.sink.definition_ends();
        *source = probe;
        true
    }

    /// `*'.' ?(name *('.' name))`
    ///
    /// Matches if there is at least one leading dot or one name. A trailing
    /// dot with no name after it is left unconsumed.
    fn path_name(&mut self, source: &mut K::Source) -> bool {
        let mut probe = *source;
        let mut ok = false;

        while probe.peek() == Some('.') {
            ok = true;
            probe.advance();
            self.sink.ascend();
            self.space(&mut probe);
        }

        if self.name(&mut probe) {
            ok = true;
            *source = probe;
            while probe.peek() == Some('.') {
                probe.advance();
                self.sink.descend();
                self.space(&mut probe);
                if !self.name(&mut probe) {
                    self.sink.pathname(true);
                    return true;
                }
                *source = probe;
            }
        }
        if ok {
            *source = probe;
        }
        self.sink.pathname(ok);
        ok
    }

    /// `+(symbol | integer)`
    ///
    /// One pathname segment: adjacent words separated only by spaces, each
    /// reported as its own `name` event.
    fn name(&mut self, source: &mut K::Source) -> bool {
        let mut probe = *source;
        let mut ok = false;
        loop {
            let start = probe;
            if !self.symbol(&mut probe) && !self.integer(&mut probe) {
                return ok;
            }
            ok = true;
            self.sink.name(&start, &probe);
            self.space(&mut probe);
            *source = probe;
        }
    }

    /// `reference | alias_from | (?supertype ?block ?post_body EOB)`
    ///
    /// In the last alternative a block satisfies the end-of-body
    /// requirement by itself.
    fn body(&mut self, source: &mut K::Source) -> bool {
        if self.reference(source) {
            return true;
        }
        if self.alias_from(source) {
            return true;
        }

        let mut probe = *source;
        let type_at = probe;
        self.supertype(&mut probe);
        let has_block = self.block(&mut probe);
        self.post_body(&mut probe, &type_at);

        if !has_block && !self.eob(&probe) {
            return false;
        }
        *source = probe;
        true
    }

    /// `&';' | &'}' | EOF` (consumes nothing)
    fn eob(&self, source: &K::Source) -> bool {
        matches!(source.peek(), None | Some(';') | Some('}'))
    }

    /// `('->' | '=>') path_name ?block ?assignment EOB`
    fn reference(&mut self, source: &mut K::Source) -> bool {
        let mut probe = *source;
        let ch = probe.peek();
        if ch != Some('-') && ch != Some('=') {
            return false;
        }
        probe.advance();
        if probe.peek() != Some('>') {
            return false;
        }
        probe.advance();
        self.space(&mut probe);

        let type_at = probe;
        if !self.path_name(&mut probe) {
            self.error("reference", "typename", &probe);
            return false;
        }
        self.sink.reference_type(ch == Some('='));

        self.block(&mut probe);
        self.assignment(&mut probe, &type_at);

        let ok = self.eob(&probe);
        self.sink.reference_done(ok);
        if ok {
            *source = probe;
        }
        ok
    }

    /// `'!' path_name EOB`
    fn alias_from(&mut self, source: &mut K::Source) -> bool {
        let mut probe = *source;
        if probe.peek() != Some('!') {
            return false;
        }
        probe.advance();
        self.space(&mut probe);
        if !self.path_name(&mut probe) {
            return false;
        }
        if !self.eob(&probe) {
            return false;
        }
        self.sink.alias();
        *source = probe;
        true
    }

    /// `':' ?path_name`
    ///
    /// The supertype event fires even for an empty path; an empty path
    /// means the default supertype.
    fn supertype(&mut self, source: &mut K::Source) -> bool {
        let mut probe = *source;
        if probe.peek() != Some(':') {
            return false;
        }
        probe.advance();
        self.space(&mut probe);
        self.path_name(&mut probe);
        self.sink.supertype();
        self.space(&mut probe);
        *source = probe;
        true
    }

    /// `'{' *definition '}'`
    fn block(&mut self, source: &mut K::Source) -> bool {
        let mut probe = *source;
        if probe.peek() != Some('{') {
            return false;
        }
        probe.advance();
        self.space(&mut probe);
        self.sink.block_start();
        while self.definition(&mut probe) {}
        if probe.peek() != Some('}') {
            self.error("block", "closing }", &probe);
            return false;
        }
        probe.advance();
        self.sink.block_end();
        self.space(&mut probe);
        *source = probe;
        true
    }

    /// `('[]' ?assignment) | assignment`
    fn post_body(&mut self, source: &mut K::Source, type_at: &K::Source) -> bool {
        let mut probe = *source;
        let mut is_array = false;
        if probe.peek() == Some('[') {
            probe.advance();
            if probe.peek() != Some(']') {
                self.error("array_indicator", "closing ]", &probe);
                return false;
            }
            probe.advance();
            self.sink.is_array();
            self.space(&mut probe);
            is_array = true;
        }
        let has_assignment = self.assignment(&mut probe, type_at);
        if !is_array && !has_assignment {
            return false;
        }
        *source = probe;
        true
    }

    /// `final_assignment | tentative_assignment`
    fn assignment(&mut self, source: &mut K::Source, type_at: &K::Source) -> bool {
        self.final_assignment(source, type_at) || self.tentative_assignment(source, type_at)
    }

    /// `'=' value`
    fn final_assignment(&mut self, source: &mut K::Source, type_at: &K::Source) -> bool {
        let mut probe = *source;
        if probe.peek() != Some('=') {
            return false;
        }
        probe.advance();
        self.space(&mut probe);
        if !self.value(&mut probe, type_at) {
            self.error("final_assignment", "value", &probe);
            return false;
        }
        self.sink.assignment(true);
        self.space(&mut probe);
        *source = probe;
        true
    }

    /// `'~=' value`
    fn tentative_assignment(&mut self, source: &mut K::Source, type_at: &K::Source) -> bool {
        let mut probe = *source;
        if probe.peek() != Some('~') {
            return false;
        }
        probe.advance();
        if probe.peek() != Some('=') {
            return false;
        }
        probe.advance();
        self.space(&mut probe);
        if !self.value(&mut probe, type_at) {
            self.error("tentative_assignment", "value", &probe);
            return false;
        }
        self.sink.assignment(false);
        self.space(&mut probe);
        *source = probe;
        true
    }

    /// `atomic_value | array_value`
    fn value(&mut self, source: &mut K::Source, type_at: &K::Source) -> bool {
        self.atomic_value(source, type_at) || self.array_value(source, type_at)
    }

    /// `'[' atomic_value *(',' atomic_value) ']'`
    fn array_value(&mut self, source: &mut K::Source, type_at: &K::Source) -> bool {
        let mut probe = *source;
        if probe.peek() != Some('[') {
            return false;
        }
        probe.advance();
        self.space(&mut probe);
        loop {
            if !self.atomic_value(&mut probe, type_at) {
                return false;
            }
            if probe.peek() != Some(',') {
                break;
            }
            probe.advance();
            self.space(&mut probe);
        }
        if probe.peek() != Some(']') {
            self.error("array_value", "closing ]", &probe);
            return false;
        }
        probe.advance();
        self.space(&mut probe);
        *source = probe;
        true
    }

    /// `pegexp | matched_literal | path_name | object_literal`
    ///
    /// A pattern literal is decided by its leading `/` alone; after that,
    /// matching against a declared syntax would come first, but no sink
    /// supplies one, so values fall back to quoted strings and bare
    /// numerics, then pathnames, then inline object literals.
    fn atomic_value(&mut self, source: &mut K::Source, type_at: &K::Source) -> bool {
        if source.peek() == Some('/') {
            return self.pegexp_literal(source);
        }
        let _syntax = self.sink.lookup_syntax(type_at);
        let mut probe = *source;
        if self.matched_literal(&mut probe)
            || self.reference_literal(&mut probe)
            || self.object_literal(&mut probe)
        {
            *source = probe;
            return true;
        }
        false
    }

    /// A pathname used as a value.
    fn reference_literal(&mut self, source: &mut K::Source) -> bool {
        if !self.path_name(source) {
            return false;
        }
        self.sink.reference_literal();
        true
    }

    /// `supertype ?block ?assignment`, an anonymous object used as a value.
    fn object_literal(&mut self, source: &mut K::Source) -> bool {
        let type_at = *source;
        if !self.supertype(source) {
            return false;
        }
        self.block(source);
        self.assignment(source, &type_at);
        self.sink.object_literal();
        true
    }

    /// Bootstrap value matching: a quoted string or a bare numeric run.
    fn matched_literal(&mut self, source: &mut K::Source) -> bool {
        match source.peek() {
            Some('\'') => self.string_literal(source),
            Some(ch) if ch.is_ascii_digit() || ch == '-' || ch == '+' => {
                self.numeric_literal(source)
            }
            _ => false,
        }
    }

    /// `'\'' *(escaped | !'\'' .) '\''`
    ///
    /// A backslash escapes the following character. The reported span is
    /// the raw contents, quotes excluded, escapes still in place.
    fn string_literal(&mut self, source: &mut K::Source) -> bool {
        let mut probe = *source;
        if probe.peek() != Some('\'') {
            return false;
        }
        probe.advance();
        let start = probe;
        loop {
            match probe.peek() {
                None | Some('\'') => break,
                Some('\\') => {
                    probe.advance();
                    if probe.peek().is_some() {
                        probe.advance();
                    }
                }
                Some(_) => probe.advance(),
            }
        }
        self.sink.string_literal(&start, &probe);
        probe.advance();
        *source = probe;
        true
    }

    /// `+[-+.0-9]`, the sign and decimal point uninterpreted.
    fn numeric_literal(&mut self, source: &mut K::Source) -> bool {
        let mut probe = *source;
        while matches!(
            probe.peek(),
            Some(ch) if ch.is_ascii_digit() || ch == '-' || ch == '+' || ch == '.'
        ) {
            probe.advance();
        }
        if probe.offset() == source.offset() {
            return false;
        }
        self.sink.numeric_literal(source, &probe);
        *source = probe;
        true
    }

    /// `*(+[ \t\r\n] | '//' *(!'\n' .) '\n')`
    ///
    /// Whitespace and line comments. Cannot fail; consumes what it can.
    pub(crate) fn space(&mut self, source: &mut K::Source) -> bool {
        let mut probe = *source;
        while let Some(ch) = probe.peek() {
            match ch {
                ' ' | '\t' | '\r' | '\n' => {
                    probe.advance();
                    *source = probe;
                }
                '/' => {
                    probe.advance();
                    if probe.peek() != Some('/') {
                        // A lone slash starts a pattern, not a comment
                        return true;
                    }
                    probe.advance();
                    while let Some(c) = probe.peek() {
                        probe.advance();
                        if c == '\n' {
                            break;
                        }
                    }
                    *source = probe;
                }
                _ => break,
            }
        }
        true
    }

    /// `[_alpha] *[_alnum]` (Unicode letters)
    fn symbol(&mut self, source: &mut K::Source) -> bool {
        let mut probe = *source;
        match probe.peek() {
            Some(ch) if ch == '_' || ch.is_alphabetic() => probe.advance(),
            _ => return false,
        }
        while matches!(probe.peek(), Some(ch) if ch == '_' || ch.is_alphanumeric()) {
            probe.advance();
        }
        *source = probe;
        true
    }

    /// `[1-9] *[0-9]`
    fn integer(&mut self, source: &mut K::Source) -> bool {
        let mut probe = *source;
        match probe.peek() {
            Some(ch) if ('1'..='9').contains(&ch) => probe.advance(),
            _ => return false,
        }
        while matches!(probe.peek(), Some(ch) if ch.is_ascii_digit()) {
            probe.advance();
        }
        *source = probe;
        true
    }
}
