//! Interfaces for the sinks an RDF parser reports to.

use crate::model::Triple;
use std::error::Error;
use std::fmt;

/// An error raised by an [`RdfHandler`] implementation.
///
/// It wraps an arbitrary error of the embedding application and aborts the
/// parse when returned from a handler event.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct HandlerError(Box<dyn Error + Send + Sync + 'static>);

impl HandlerError {
    pub fn new(error: impl Into<Box<dyn Error + Send + Sync + 'static>>) -> Self {
        Self(error.into())
    }

    pub fn msg(message: impl fmt::Display) -> Self {
        Self(message.to_string().into())
    }
}

/// A sink for the events produced while parsing an RDF document.
///
/// The parser calls [`start_rdf`](RdfHandler::start_rdf) once on entry,
/// [`end_rdf`](RdfHandler::end_rdf) once on normal completion, and the other
/// events in the textual order of the constructs that triggered them.
/// Any event may return an error, which aborts the parse and propagates out
/// of it.
pub trait RdfHandler {
    fn start_rdf(&mut self) -> Result<(), HandlerError> {
        Ok(())
    }

    fn end_rdf(&mut self) -> Result<(), HandlerError> {
        Ok(())
    }

    /// Called for each `@prefix`/`PREFIX` directive, after the namespace has been installed.
    fn handle_namespace(&mut self, _prefix: &str, _iri: &str) -> Result<(), HandlerError> {
        Ok(())
    }

    /// Called for each `#` comment with the text following the `#`.
    fn handle_comment(&mut self, _text: &str) -> Result<(), HandlerError> {
        Ok(())
    }

    /// Called for each statement, in the order their terminating `.` is consumed.
    fn handle_statement(&mut self, statement: Triple) -> Result<(), HandlerError>;
}

/// An [`RdfHandler`] that records everything it receives.
///
/// ```
/// use terrapin_api::handler::{RdfHandler, StatementCollector};
///
/// let mut collector = StatementCollector::default();
/// collector.handle_comment("hello").unwrap();
/// assert_eq!(collector.comments, ["hello"]);
/// ```
#[derive(Debug, Default)]
pub struct StatementCollector {
    pub statements: Vec<Triple>,
    pub namespaces: Vec<(String, String)>,
    pub comments: Vec<String>,
}

impl RdfHandler for StatementCollector {
    fn handle_namespace(&mut self, prefix: &str, iri: &str) -> Result<(), HandlerError> {
        self.namespaces.push((prefix.to_owned(), iri.to_owned()));
        Ok(())
    }

    fn handle_comment(&mut self, text: &str) -> Result<(), HandlerError> {
        self.comments.push(text.to_owned());
        Ok(())
    }

    fn handle_statement(&mut self, statement: Triple) -> Result<(), HandlerError> {
        self.statements.push(statement);
        Ok(())
    }
}

/// A sink for the diagnostics a parser emits while reading a document.
///
/// `line` is 1-based; `column` is always `-1` for parsers that do not track
/// columns.
pub trait ParseErrorListener {
    /// An informational diagnostic; parsing continues unchanged.
    fn warning(&mut self, message: &str, line: u64, column: i64);

    /// A violation that the active configuration escalates; the parse fails after this call.
    fn error(&mut self, message: &str, line: u64, column: i64);

    /// An unconditionally fatal violation; the parse fails after this call.
    fn fatal_error(&mut self, message: &str, line: u64, column: i64);
}

/// A [`ParseErrorListener`] that records the received diagnostics with their line numbers.
#[derive(Debug, Default)]
pub struct ParseErrorCollector {
    pub warnings: Vec<(String, u64)>,
    pub errors: Vec<(String, u64)>,
    pub fatal_errors: Vec<(String, u64)>,
}

impl ParseErrorListener for ParseErrorCollector {
    fn warning(&mut self, message: &str, line: u64, _column: i64) {
        self.warnings.push((message.to_owned(), line));
    }

    fn error(&mut self, message: &str, line: u64, _column: i64) {
        self.errors.push((message.to_owned(), line));
    }

    fn fatal_error(&mut self, message: &str, line: u64, _column: i64) {
        self.fatal_errors.push((message.to_owned(), line));
    }
}
