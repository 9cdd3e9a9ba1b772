use std::io;
use terrapin_api::factory::TermError;
use terrapin_api::handler::HandlerError;
use terrapin_api::settings::ParserSetting;

/// Error that might be returned during parsing.
///
/// It might wrap an IO error, a handler error, or be a parsing error.
/// Diagnostics carry the 1-based number of the physical line the cursor was
/// on; the column is not tracked.
#[derive(Debug, thiserror::Error)]
#[error("{kind} on line {line}")]
pub struct TurtleError {
    pub(crate) kind: TurtleErrorKind,
    pub(crate) line: u64,
}

impl TurtleError {
    pub(crate) fn new(kind: TurtleErrorKind, line: u64) -> Self {
        Self { kind, line }
    }

    pub fn kind(&self) -> &TurtleErrorKind {
        &self.kind
    }

    /// The 1-based physical line the error was reported on.
    pub fn line(&self) -> u64 {
        self.line
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TurtleErrorKind {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Handler(HandlerError),
    #[error("unexpected end of file")]
    PrematureEof,
    #[error("invalid UTF-8 encoding")]
    InvalidUtf8,
    #[error("expected {expected}, found '{found}'")]
    UnexpectedCharacter { expected: String, found: char },
    #[error("unterminated IRI reference")]
    UnterminatedIri,
    #[error("invalid IRI <{iri}>: {message}")]
    InvalidIri { iri: String, message: String },
    #[error("unknown namespace prefix '{0}:'")]
    UnknownPrefix(String),
    #[error("unknown directive \"{0}\"")]
    UnknownDirective(String),
    #[error("statement should have ended with a '.'")]
    MissingStatementTerminator,
    #[error("{0}")]
    Syntax(String),
    /// A recoverable diagnostic escalated to fatal by the setting it is
    /// bound to.
    #[error("{message} [{setting}]")]
    Validation {
        message: String,
        setting: ParserSetting,
    },
    #[error(transparent)]
    Value(TermError),
}

impl From<io::Error> for TurtleError {
    fn from(error: io::Error) -> Self {
        Self {
            kind: TurtleErrorKind::Io(error),
            line: 0,
        }
    }
}

/// The well-formedness checks whose severity is configurable.
///
/// Each check is bound to exactly one setting here; call sites report against
/// a check and never decide severity themselves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Check {
    UriSyntax,
    LanguageTag,
    DatatypeValue,
    RelativeUri,
    BnodeLabel,
}

pub(crate) fn check_setting(check: Check) -> ParserSetting {
    match check {
        Check::UriSyntax => ParserSetting::VerifyUriSyntax,
        Check::LanguageTag => ParserSetting::VerifyLanguageTags,
        Check::DatatypeValue => ParserSetting::VerifyDatatypeValues,
        Check::RelativeUri => ParserSetting::VerifyRelativeUris,
        Check::BnodeLabel => ParserSetting::PreserveBnodeIds,
    }
}
