//! The event protocol between the grammar engine and its consumer.
//!
//! The engine reports structure as it matches, rather than building a tree.
//! Within one definition the consumer sees, in order: `definition_starts`,
//! the object pathname events (`ascend`/`name`/`descend`/`pathname`) closed
//! by `object_name`, then the body events (supertype, reference or alias,
//! block, array marker, assignment and its value literal), and finally
//! `definition_ends`. Pathname events for a supertype, reference target or
//! alias target arrive before the event that says which role the path plays,
//! so consumers accumulate the current path and assign it on the role event.
//!
//! Events carry no text except literal spans, given as a pair of cursors;
//! a consumer that wants the text slices it out immediately.

use std::marker::PhantomData;

use crate::error::Diagnostic;
use crate::source::{Cursor, Source};

/// A consumer of grammar events.
///
/// Every event has a default empty body, so a sink implements only what it
/// cares about. `lookup_syntax` defaults to `None`, which makes value
/// matching fall back to quoted strings and bare numerics.
pub trait Sink {
    type Source: Source;

    /// A required sub-production failed at `at`; the innermost rule aborts.
    fn error(&mut self, _context: &str, _expected: &str, _at: &Self::Source) {}

    fn definition_starts(&mut self) {}
    fn definition_ends(&mut self) {}

    /// One leading `.` of a pathname.
    fn ascend(&mut self) {}
    /// One word of a pathname segment; adjacent words merge into one segment.
    fn name(&mut self, _start: &Self::Source, _end: &Self::Source) {}
    /// A `.` between pathname segments.
    fn descend(&mut self) {}
    /// A pathname attempt finished; `ok` is false when nothing matched.
    fn pathname(&mut self, _ok: bool) {}
    /// The accumulated path names the object being defined.
    fn object_name(&mut self) {}

    /// The accumulated path (possibly empty) is the supertype.
    fn supertype(&mut self) {}
    /// The accumulated path is a reference target; `is_multi` for `=>`.
    fn reference_type(&mut self, _is_multi: bool) {}
    /// A reference body finished; `ok` is false when it failed to close.
    fn reference_done(&mut self, _ok: bool) {}
    /// The accumulated path is an alias target.
    fn alias(&mut self) {}

    fn block_start(&mut self) {}
    fn block_end(&mut self) {}

    /// The definition carries an `[]` array marker.
    fn is_array(&mut self) {}
    /// A value was assigned; `is_final` for `=`, tentative for `~=`.
    fn assignment(&mut self, _is_final: bool) {}

    fn string_literal(&mut self, _start: &Self::Source, _end: &Self::Source) {}
    fn numeric_literal(&mut self, _start: &Self::Source, _end: &Self::Source) {}
    fn matched_literal(&mut self, _start: &Self::Source, _end: &Self::Source) {}
    fn pegexp_literal(&mut self, _start: &Self::Source, _end: &Self::Source) {}
    /// An inline object literal was used as a value.
    fn object_literal(&mut self) {}
    /// The accumulated path was used as a value.
    fn reference_literal(&mut self) {}

    /// The pattern to match a value against, looked up from the type
    /// context at `type_at`. No shipped sink supplies one.
    fn lookup_syntax(&mut self, _type_at: &Self::Source) -> Option<Self::Source> {
        None
    }
}

/// A recording sink: one line per event, in arrival order.
///
/// Used by the `--events` mode of the command-line tool and by tests that
/// check what the grammar engine reports for a given input.
#[derive(Debug, Default)]
pub struct EventSink<'t> {
    pub events: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
    marker: PhantomData<&'t str>,
}

impl<'t> EventSink<'t> {
    pub fn new() -> Self {
        EventSink::default()
    }

    fn push(&mut self, line: String) {
        self.events.push(line);
    }
}

impl<'t> Sink for EventSink<'t> {
    type Source = Cursor<'t>;

    fn error(&mut self, context: &str, expected: &str, at: &Cursor<'t>) {
        let d = Diagnostic::syntax(context, expected, at);
        self.push(format!("error {}", d));
        self.diagnostics.push(d);
    }

    fn definition_starts(&mut self) {
        self.push("definition starts".to_string());
    }

    fn definition_ends(&mut self) {
        self.push("definition ends".to_string());
    }

    fn ascend(&mut self) {
        self.push("ascend".to_string());
    }

    fn name(&mut self, start: &Cursor<'t>, end: &Cursor<'t>) {
        self.push(format!("name '{}'", start.slice_to(end)));
    }

    fn descend(&mut self) {
        self.push("descend".to_string());
    }

    fn pathname(&mut self, ok: bool) {
        self.push(format!("pathname {}", if ok { "ok" } else { "none" }));
    }

    fn object_name(&mut self) {
        self.push("object name".to_string());
    }

    fn supertype(&mut self) {
        self.push("supertype".to_string());
    }

    fn reference_type(&mut self, is_multi: bool) {
        self.push(format!("reference {}", if is_multi { "=>" } else { "->" }));
    }

    fn reference_done(&mut self, ok: bool) {
        self.push(format!("reference {}", if ok { "done" } else { "failed" }));
    }

    fn alias(&mut self) {
        self.push("alias".to_string());
    }

    fn block_start(&mut self) {
        self.push("block start".to_string());
    }

    fn block_end(&mut self) {
        self.push("block end".to_string());
    }

    fn is_array(&mut self) {
        self.push("is array".to_string());
    }

    fn assignment(&mut self, is_final: bool) {
        self.push(format!("assignment {}", if is_final { "=" } else { "~=" }));
    }

    fn string_literal(&mut self, start: &Cursor<'t>, end: &Cursor<'t>) {
        self.push(format!("string '{}'", start.slice_to(end)));
    }

    fn numeric_literal(&mut self, start: &Cursor<'t>, end: &Cursor<'t>) {
        self.push(format!("number {}", start.slice_to(end)));
    }

    fn matched_literal(&mut self, start: &Cursor<'t>, end: &Cursor<'t>) {
        self.push(format!("matched {}", start.slice_to(end)));
    }

    fn pegexp_literal(&mut self, start: &Cursor<'t>, end: &Cursor<'t>) {
        self.push(format!("pegexp /{}/", start.slice_to(end)));
    }

    fn object_literal(&mut self) {
        self.push("object literal".to_string());
    }

    fn reference_literal(&mut self) {
        self.push("reference literal".to_string());
    }
}
