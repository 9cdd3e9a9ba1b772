use std::cell::RefCell;
use std::io::Cursor;
use std::rc::Rc;
use terrapin_api::handler::{
    HandlerError, ParseErrorCollector, ParseErrorListener, RdfHandler, StatementCollector,
};
use terrapin_api::model::{Literal, Term, Triple};
use terrapin_api::settings::{ParserConfig, ParserSetting};
use terrapin_turtle::{TurtleError, TurtleErrorKind, TurtleParser};

/// Hands the recorded diagnostics back to the test after the parser consumed
/// the listener.
#[derive(Clone, Default)]
struct SharedListener(Rc<RefCell<ParseErrorCollector>>);

impl ParseErrorListener for SharedListener {
    fn warning(&mut self, message: &str, line: u64, column: i64) {
        self.0.borrow_mut().warning(message, line, column);
    }

    fn error(&mut self, message: &str, line: u64, column: i64) {
        self.0.borrow_mut().error(message, line, column);
    }

    fn fatal_error(&mut self, message: &str, line: u64, column: i64) {
        self.0.borrow_mut().fatal_error(message, line, column);
    }
}

fn parse_with_listener(
    data: &str,
    base: &str,
    config: ParserConfig,
) -> (
    Result<StatementCollector, TurtleError>,
    Rc<RefCell<ParseErrorCollector>>,
) {
    let listener = SharedListener::default();
    let diagnostics = listener.0.clone();
    let result = (|| {
        let mut collector = StatementCollector::default();
        TurtleParser::new(Cursor::new(data.to_owned()), base)?
            .with_config(config)
            .with_error_listener(listener)
            .parse(&mut collector)?;
        Ok(collector)
    })();
    (result, diagnostics)
}

#[test]
fn space_in_iri_is_fatal_by_default() {
    let (result, diagnostics) = parse_with_listener(
        "<http://e/a b> <http://e/p> <http://e/o> .",
        "http://e/",
        ParserConfig::default(),
    );
    let error = result.unwrap_err();
    assert!(matches!(error.kind(), TurtleErrorKind::Validation { setting, .. }
        if *setting == ParserSetting::VerifyUriSyntax));
    assert_eq!(diagnostics.borrow().errors.len(), 1);
}

#[test]
fn space_in_iri_skips_the_statement_when_tolerated() {
    let config = ParserConfig::default().with(ParserSetting::VerifyUriSyntax, false);
    let (result, diagnostics) = parse_with_listener(
        "<http://e/a b> <http://e/p> <http://e/o> .",
        "http://e/",
        config,
    );
    let collector = result.unwrap();
    assert!(collector.statements.is_empty());
    let diagnostics = diagnostics.borrow();
    assert!(!diagnostics.warnings.is_empty());
    assert!(diagnostics.warnings[0].0.contains("unencoded space"));
    assert!(diagnostics.errors.is_empty());
}

#[test]
fn bad_string_escapes_keep_the_raw_form_by_default() {
    let (result, diagnostics) = parse_with_listener(
        r#"<http://e/s> <http://e/p> "a\qb" ."#,
        "",
        ParserConfig::default(),
    );
    let collector = result.unwrap();
    assert_eq!(
        collector.statements[0].object,
        Term::Literal(Literal::Simple {
            value: "a\\qb".to_owned(),
        })
    );
    assert_eq!(diagnostics.borrow().warnings.len(), 1);
}

#[test]
fn bad_string_escapes_are_fatal_when_datatype_verification_is_on() {
    let config = ParserConfig::default().with(ParserSetting::VerifyDatatypeValues, true);
    let (result, _) = parse_with_listener(r#"<http://e/s> <http://e/p> "a\qb" ."#, "", config);
    let error = result.unwrap_err();
    assert!(matches!(error.kind(), TurtleErrorKind::Validation { setting, .. }
        if *setting == ParserSetting::VerifyDatatypeValues));
}

#[test]
fn bad_language_tags_are_fatal_by_default() {
    let (result, _) = parse_with_listener(
        "<http://e/s> <http://e/p> \"x\"@123x .",
        "",
        ParserConfig::default(),
    );
    let error = result.unwrap_err();
    assert!(matches!(error.kind(), TurtleErrorKind::Validation { setting, .. }
        if *setting == ParserSetting::VerifyLanguageTags));
}

#[test]
fn language_tags_are_not_checked_when_verification_is_off() {
    let config = ParserConfig::default().with(ParserSetting::VerifyLanguageTags, false);
    let (result, diagnostics) =
        parse_with_listener("<http://e/s> <http://e/p> \"x\"@123x .", "", config);
    let collector = result.unwrap();
    assert_eq!(
        collector.statements[0].object,
        Term::Literal(Literal::LanguageTaggedString {
            value: "x".to_owned(),
            language: "123x".to_owned(),
        })
    );
    assert!(diagnostics.borrow().warnings.is_empty());
}

#[test]
fn relative_iris_without_a_base_are_fatal_by_default() {
    let (result, _) = parse_with_listener("<s> <p> <o> .", "", ParserConfig::default());
    let error = result.unwrap_err();
    assert!(matches!(error.kind(), TurtleErrorKind::Validation { setting, .. }
        if *setting == ParserSetting::VerifyRelativeUris));
}

#[test]
fn relative_iris_without_a_base_are_skipped_when_tolerated() {
    let config = ParserConfig::default().with(ParserSetting::VerifyRelativeUris, false);
    let (result, diagnostics) = parse_with_listener("<s> <p> <o> .", "", config);
    let collector = result.unwrap();
    assert!(collector.statements.is_empty());
    assert_eq!(diagnostics.borrow().warnings.len(), 3);
}

#[test]
fn unknown_prefixes_are_fatal() {
    let (result, _) = parse_with_listener(
        "ex:a <http://e/p> <http://e/o> .",
        "",
        ParserConfig::default(),
    );
    let error = result.unwrap_err();
    assert!(
        matches!(error.kind(), TurtleErrorKind::UnknownPrefix(prefix) if prefix == "ex"),
        "unexpected error: {error}"
    );
}

#[test]
fn fatal_diagnostics_reach_the_listener() {
    let (result, diagnostics) = parse_with_listener(
        "<http://e/s> <http://e/p> @ .",
        "",
        ParserConfig::default(),
    );
    assert!(result.is_err());
    assert_eq!(diagnostics.borrow().fatal_errors.len(), 1);
}

struct FailingHandler;

impl RdfHandler for FailingHandler {
    fn handle_statement(&mut self, _statement: Triple) -> Result<(), HandlerError> {
        Err(HandlerError::msg("sink full"))
    }
}

#[test]
fn handler_errors_abort_the_parse() {
    let mut parser = TurtleParser::new(
        Cursor::new("<http://e/s> <http://e/p> <http://e/o>, <http://e/o2> ."),
        "",
    )
    .unwrap();
    let error = parser.parse(&mut FailingHandler).unwrap_err();
    assert!(matches!(error.kind(), TurtleErrorKind::Handler(_)));
}
