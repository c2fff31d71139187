//! The resolving sink: consumes grammar events and builds the object graph.
//!
//! Resolution is eager. As soon as a definition's events show that it is an
//! object (a supertype, block, array marker or assignment arrives), the
//! frame on top of the stack is resolved against the store: its pathname is
//! walked down from the enclosing object, the supertype is looked up, and
//! the object is found or created. Later events for the same definition
//! then act on the resolved handle. A definition that fails to resolve
//! reports one diagnostic and is skipped, along with anything nested in it.

use std::marker::PhantomData;

use log::{debug, trace};

use crate::error::Diagnostic;
use crate::sink::Sink;
use crate::source::{Cursor, Source};
use crate::store::{Handle, Store};
use crate::value::Value;

/// A pathname under construction.
///
/// `ascent` counts leading dots. Adjacent bare words merge into one
/// multi-word segment until a dot arrives; `sep` holds that state between
/// `name` events.
#[derive(Debug, Clone, Default)]
struct PathName {
    ascent: usize,
    names: Vec<String>,
    sep: Sep,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Sep {
    /// The next word opens the first segment.
    #[default]
    Start,
    /// The next word continues the current segment.
    Word,
    /// A dot arrived; the next word opens a new segment.
    Dot,
}

impl PathName {
    fn is_empty(&self) -> bool {
        self.ascent == 0 && self.names.is_empty()
    }

    fn clear(&mut self) {
        *self = PathName::default();
    }

    /// Hand this path to its destination, leaving an empty one behind.
    /// Each parsed path has exactly one consumer.
    fn consume(&mut self) -> PathName {
        std::mem::take(self)
    }

    fn push_word(&mut self, word: &str) {
        match self.sep {
            Sep::Word => match self.names.last_mut() {
                Some(last) => {
                    last.push(' ');
                    last.push_str(word);
                }
                None => self.names.push(word.to_string()),
            },
            Sep::Start | Sep::Dot => self.names.push(word.to_string()),
        }
        self.sep = Sep::Word;
    }

    fn display(&self) -> String {
        let mut out = ".".repeat(self.ascent);
        if self.names.is_empty() {
            out.push_str("<none>");
        } else {
            out.push_str(&self.names.join("."));
        }
        out
    }
}

/// Parse state for one definition being built, one frame per nesting level.
#[derive(Debug, Default)]
struct Frame {
    object_path: PathName,
    supertype_path: PathName,
    has_supertype: bool,
    /// Set once the frame's object has been resolved (or its resolution
    /// abandoned); resolution runs at most once per frame.
    started: bool,
    value: Option<Value>,
    handle: Option<Handle>,
}

/// A [`Sink`] that resolves definitions into a [`Store`] as they arrive.
pub struct StoreSink<'t> {
    store: Store,
    current_path: PathName,
    stack: Vec<Frame>,
    /// The most recently closed outermost definition; the implicit parent
    /// of the next outermost one.
    last_closed: Option<Handle>,
    pub diagnostics: Vec<Diagnostic>,
    marker: PhantomData<&'t str>,
}

impl<'t> StoreSink<'t> {
    pub fn new() -> Self {
        StoreSink {
            store: Store::new(),
            current_path: PathName::default(),
            stack: Vec::new(),
            last_closed: None,
            diagnostics: Vec::new(),
            marker: PhantomData,
        }
    }

    /// Give up the store and the collected diagnostics.
    pub fn finish(self) -> (Store, Vec<Diagnostic>) {
        (self.store, self.diagnostics)
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    fn frame(&mut self) -> &mut Frame {
        // Events only arrive between definition_starts and definition_ends,
        // but tolerate a stray one rather than panic
        if self.stack.is_empty() {
            self.stack.push(Frame::default());
        }
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }

    /// The enclosing object of the definition on top of the stack.
    fn context(&self) -> Option<Handle> {
        if self.stack.len() <= 1 {
            self.last_closed
        } else {
            self.stack[self.stack.len() - 2].handle
        }
    }

    fn report(&mut self, d: Diagnostic) {
        debug!("{}", d);
        self.diagnostics.push(d);
    }

    /// Resolve the top frame's object if it has not been resolved yet.
    fn start_object(&mut self) {
        self.resolve_frame(None);
    }

    /// Search an object and its whole supertype chain for a named child,
    /// following exactly one alias hop on the result.
    fn lookup_child(&self, from: Handle, name: &str) -> Option<Handle> {
        let mut node = Some(from);
        while let Some(n) = node {
            if let Some(child) = self.store.lookup(n, name) {
                return Some(self.store.alias_for(child).unwrap_or(child));
            }
            node = self.store.supertype(n);
        }
        None
    }

    /// Look a whole path up from a starting object. While the first segment
    /// is not found the search ascends the parent chain, unless the path
    /// itself ascended explicitly. Every failure reports a diagnostic,
    /// including an explicit ascent that walks past the root.
    fn lookup_path(&mut self, from: Option<Handle>, path: &PathName) -> Option<Handle> {
        let no_implicit_ascent = path.ascent > 0;
        let mut from = from;
        for _ in 0..path.ascent {
            from = from.and_then(|p| self.store.parent(p));
        }
        let Some(mut current) = from else {
            self.report(Diagnostic::UnresolvedName(path.display()));
            return None;
        };
        for (i, segment) in path.names.iter().enumerate() {
            loop {
                if let Some(child) = self.lookup_child(current, segment) {
                    current = child;
                    break;
                }
                if i == 0 && !no_implicit_ascent {
                    if let Some(p) = self.store.parent(current) {
                        current = p;
                        continue;
                    }
                }
                self.report(Diagnostic::UnresolvedName(segment.clone()));
                return None;
            }
        }
        Some(current)
    }

    /// Resolve the top frame against the store: find the parent, descend
    /// the object path, resolve the supertype, and find or create the
    /// object. `forced_supertype` overrides the frame's supertype path
    /// (used for reference definitions, which are always `Reference`s).
    ///
    /// On any diagnostic the frame is left without a handle and later
    /// events for this definition are ignored.
    fn resolve_frame(&mut self, forced_supertype: Option<Handle>) {
        if self.frame().started {
            return;
        }
        self.frame().started = true;

        let path = self.frame().object_path.clone();
        let super_path = self.frame().supertype_path.clone();
        let has_supertype = self.frame().has_supertype;
        let is_outermost = self.stack.len() <= 1;

        trace!(
            "resolving '{}'{}",
            path.display(),
            if has_supertype {
                format!(" : '{}'", super_path.display())
            } else {
                String::new()
            }
        );

        let mut parent;
        let mut may_ascend = true;
        let mut descent = 0;

        // An outermost definition naming TOP re-opens the root; the very
        // first outermost definition must do so.
        if is_outermost && path.ascent == 0 && path.names.first().map(String::as_str) == Some("TOP")
        {
            if path.names.len() == 1 {
                if has_supertype
                    && (super_path.ascent != 0
                        || super_path.names.len() != 1
                        || super_path.names[0] != "Object")
                {
                    self.report(Diagnostic::TopMustBeObject);
                    return;
                }
                debug!("re-opening TOP");
                self.frame().handle = Some(self.store.top());
                return;
            }
            // TOP.A.B descends from the root
            parent = self.store.top();
            may_ascend = false;
            descent = 1;
        } else if is_outermost && self.last_closed.is_none() {
            self.report(Diagnostic::MalformedTop);
            return;
        } else {
            let implied = self.context();
            let Some(p) = implied else {
                self.report(Diagnostic::MissingParent);
                return;
            };
            parent = p;
        }

        // The scope that names are resolved against, before any explicit
        // ascent is applied
        let context = parent;

        if path.ascent > 0 {
            may_ascend = false;
            let depth = self.stack.len().saturating_sub(path.ascent + 1);
            match self.stack[depth].handle {
                Some(h) => {
                    trace!("ascended to {}", self.store.pathname(h));
                    parent = h;
                }
                None => {
                    self.report(Diagnostic::MissingParent);
                    return;
                }
            }
        }

        // Every segment but the last is a parent to descend into. When a
        // segment is not found and no explicit ascent was used, rise one
        // level and retry that segment, once.
        while descent + 1 < path.names.len() {
            let segment = &path.names[descent];
            match self.lookup_child(parent, segment) {
                Some(child) => {
                    trace!("descending into {}", self.store.pathname(child));
                    parent = child;
                    descent += 1;
                }
                None => {
                    let risen = if may_ascend {
                        may_ascend = false;
                        self.store.parent(parent)
                    } else {
                        None
                    };
                    match risen {
                        Some(p) => parent = p,
                        None => {
                            self.report(Diagnostic::UnresolvedParent(segment.clone()));
                            return;
                        }
                    }
                }
            }
        }

        // The last segment names the object itself; no segment at all
        // means an anonymous object
        let own_name = path.names.get(descent).cloned().unwrap_or_default();
        let existing = if own_name.is_empty() {
            None
        } else {
            self.lookup_child(parent, &own_name)
        };
        if let Some(e) = existing {
            trace!("found existing {}", self.store.pathname(e));
        }

        let supertype = if let Some(forced) = forced_supertype {
            Some(forced)
        } else if has_supertype {
            let resolved = if super_path.is_empty() {
                Some(self.store.object_root())
            } else {
                self.lookup_path(Some(context), &super_path)
            };
            let Some(s) = resolved else {
                self.report(Diagnostic::UnresolvedSupertype(super_path.display()));
                return;
            };
            Some(s)
        } else if existing.is_none() && may_ascend && !own_name.is_empty() {
            // Eponymous typing: with no supertype given, a same-named
            // object in the ancestry becomes the supertype
            let mut scope = self.store.parent(parent);
            let mut found = None;
            while let Some(s) = scope {
                if let Some(f) = self.lookup_child(s, &own_name) {
                    trace!("eponymous supertype {}", self.store.pathname(f));
                    found = Some(f);
                    break;
                }
                scope = self.store.parent(s);
            }
            found
        } else {
            None
        };

        if let (Some(e), Some(s)) = (existing, supertype) {
            if self.store.supertype(e) != Some(s) {
                self.report(Diagnostic::SupertypeConflict(self.store.pathname(e)));
                return;
            }
        }

        let handle = match existing {
            Some(e) => e,
            None => {
                let s = supertype.unwrap_or_else(|| self.store.object_root());
                let h = self.store.create(parent, &own_name, s, Some(context));
                debug!(
                    "created {} : {}",
                    self.store.pathname(h),
                    self.store.pathname(s)
                );
                h
            }
        };
        self.frame().handle = Some(handle);
    }
}

impl<'t> Default for StoreSink<'t> {
    fn default() -> Self {
        StoreSink::new()
    }
}

impl<'t> Sink for StoreSink<'t> {
    type Source = Cursor<'t>;

    fn error(&mut self, context: &str, expected: &str, at: &Cursor<'t>) {
        let d = Diagnostic::syntax(context, expected, at);
        debug!("{}", d);
        self.diagnostics.push(d);
    }

    fn definition_starts(&mut self) {
        self.stack.push(Frame::default());
    }

    fn definition_ends(&mut self) {
        // A bodiless definition resolves here, having had nothing to
        // trigger it earlier
        self.start_object();
        if let Some(frame) = self.stack.pop() {
            if self.stack.is_empty() {
                self.last_closed = frame.handle;
            }
        }
        self.current_path.clear();
    }

    fn ascend(&mut self) {
        self.current_path.ascent += 1;
    }

    fn name(&mut self, start: &Cursor<'t>, end: &Cursor<'t>) {
        let word = start.slice_to(end).to_string();
        self.current_path.push_word(&word);
    }

    fn descend(&mut self) {
        self.current_path.sep = Sep::Dot;
    }

    fn pathname(&mut self, ok: bool) {
        if !ok {
            self.current_path.clear();
        }
    }

    fn object_name(&mut self) {
        let path = self.current_path.consume();
        self.frame().object_path = path;
    }

    fn supertype(&mut self) {
        let path = self.current_path.consume();
        let frame = self.frame();
        frame.supertype_path = path;
        frame.has_supertype = true;
        self.start_object();
    }

    fn reference_type(&mut self, is_multi: bool) {
        let target = self.current_path.consume();
        debug!(
            "reference {} '{}'",
            if is_multi { "=>" } else { "->" },
            target.display()
        );

        // An eponymous reference is named after the last target segment
        if self.frame().object_path.is_empty() {
            if let Some(last) = target.names.last() {
                let last = last.clone();
                self.frame().object_path.push_word(&last);
            }
        }

        let reference = self.store.lookup(self.store.top(), "Reference");
        self.resolve_frame(reference);
        // The target is the reference's value unless an assignment follows
        if let Some(h) = self.frame().handle {
            self.store
                .set_value(h, Value::Reference(target.display()), false);
        }
    }

    fn alias(&mut self) {
        let target_path = self.current_path.consume();
        self.start_object();
        let context = self.context();
        let target = self.lookup_path(context, &target_path);
        if let (Some(h), Some(t)) = (self.frame().handle, target) {
            debug!(
                "alias {} ! {}",
                self.store.pathname(h),
                self.store.pathname(t)
            );
            self.store.set_alias(h, t);
        }
    }

    fn block_start(&mut self) {
        self.start_object();
    }

    fn is_array(&mut self) {
        self.start_object();
        if let Some(h) = self.frame().handle {
            self.store.set_array(h);
        }
    }

    fn assignment(&mut self, is_final: bool) {
        self.start_object();
        let handle = self.frame().handle;
        let value = self.frame().value.take();
        if let (Some(h), Some(v)) = (handle, value) {
            debug!(
                "assign {} {} {}",
                self.store.pathname(h),
                if is_final { "=" } else { "~=" },
                v
            );
            self.store.set_value(h, v, is_final);
        }
    }

    fn string_literal(&mut self, start: &Cursor<'t>, end: &Cursor<'t>) {
        self.frame().value = Some(Value::String(start.slice_to(end).to_string()));
    }

    fn numeric_literal(&mut self, start: &Cursor<'t>, end: &Cursor<'t>) {
        self.frame().value = Some(Value::Number(start.slice_to(end).to_string()));
    }

    fn matched_literal(&mut self, start: &Cursor<'t>, end: &Cursor<'t>) {
        self.frame().value = Some(Value::Matched(start.slice_to(end).to_string()));
    }

    fn pegexp_literal(&mut self, start: &Cursor<'t>, end: &Cursor<'t>) {
        self.frame().value = Some(Value::Pegexp(start.slice_to(end).to_string()));
    }

    fn object_literal(&mut self) {
        self.frame().value = Some(Value::Object);
    }

    fn reference_literal(&mut self) {
        let path = self.current_path.consume();
        self.frame().value = Some(Value::Reference(path.display()));
    }
}
