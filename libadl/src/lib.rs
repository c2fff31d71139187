//! A parser and resolver for ADL, the Aspect Definition Language.
//!
//! ADL describes hierarchies of objects that inherit from one another.
//! A document is a sequence of definitions; each definition names an object
//! by pathname, may give it a supertype, a block of nested definitions, an
//! array marker and an assigned value, or may declare it a reference or an
//! alias to another object.
//!
//! The implementation is a pipeline of three pieces:
//!
//! 1. A [`Cursor`] over the input text. Copying a cursor snapshots a
//!    position, which is the parser's only backtracking mechanism.
//! 2. The grammar engine, [`Parser`], which matches the language in a
//!    single pass and reports what it finds as an ordered stream of events
//!    to a [`Sink`]. The engine builds no tree and keeps no state.
//! 3. A sink. [`StoreSink`] resolves the events eagerly into an object
//!    graph, a [`Store`], creating objects as their definitions close over
//!    them; [`EventSink`] just records the event stream for inspection.
//!
//! ```
//! let parse = libadl::parse("TOP { Colour : Object { Red = 'red'; } }");
//! assert!(parse.is_clean());
//! let top = parse.store.top();
//! let colour = parse.store.lookup(top, "Colour").unwrap();
//! assert!(parse.store.lookup(colour, "Red").is_some());
//! ```
//!
//! Parsing never fails outright: input that stops matching simply stops
//! being consumed, and problems are collected as [`Diagnostic`] values on
//! the returned [`Parse`].

mod error;
mod parser;
mod pegexp;
mod resolver;
mod sink;
mod source;
mod store;
mod value;

pub use error::Diagnostic;
pub use parser::Parser;
pub use resolver::StoreSink;
pub use sink::{EventSink, Sink};
pub use source::{Cursor, Source};
pub use store::{Handle, Store};
pub use value::Value;

/// The outcome of parsing one ADL document.
#[derive(Debug)]
pub struct Parse {
    /// The object graph, containing whatever resolved before any failure.
    pub store: Store,
    /// How much of the input the grammar consumed.
    pub bytes_consumed: usize,
    pub input_len: usize,
    /// Syntax and resolution diagnostics, in the order they were found.
    pub diagnostics: Vec<Diagnostic>,
}

impl Parse {
    /// Whether the grammar consumed the whole input.
    pub fn is_complete(&self) -> bool {
        self.bytes_consumed == self.input_len
    }

    /// Complete, with no diagnostics of either kind.
    pub fn is_clean(&self) -> bool {
        self.is_complete() && self.diagnostics.is_empty()
    }

    pub fn syntax_errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_syntax())
    }

    pub fn resolution_errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| !d.is_syntax())
    }
}

/// Parse an ADL document, resolving its definitions into an object store.
pub fn parse(input: &str) -> Parse {
    let mut sink = StoreSink::new();
    let mut source = Cursor::new(input);
    Parser::new(&mut sink).parse(&mut source);
    let bytes_consumed = source.offset();
    let (store, diagnostics) = sink.finish();
    Parse {
        store,
        bytes_consumed,
        input_len: input.len(),
        diagnostics,
    }
}

/// Parse an ADL document with a recording sink, returning the event trace
/// and any syntax diagnostics. Nothing is resolved.
pub fn trace_events(input: &str) -> (Vec<String>, Vec<Diagnostic>) {
    let mut sink = EventSink::new();
    let mut source = Cursor::new(input);
    Parser::new(&mut sink).parse(&mut source);
    (sink.events, sink.diagnostics)
}
