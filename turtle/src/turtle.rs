//! Implementation of the Turtle and Turtle-star recursive-descent grammar.

use crate::error::{check_setting, Check, TurtleError, TurtleErrorKind};
use crate::line_buffer::LineBuffer;
use crate::shared::*;
use oxilangtag::LanguageTag;
use oxiri::Iri;
use std::collections::HashMap;
use std::io::BufRead;
use terrapin_api::factory::{SimpleValueFactory, TermError, ValueFactory};
use terrapin_api::handler::{HandlerError, ParseErrorListener, RdfHandler};
use terrapin_api::model::{BlankNode, Literal, NamedNode, Subject, Term, Triple};
use terrapin_api::settings::{ParserConfig, ParserSetting};

const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
const RDF_NIL: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#nil";
const RDF_FIRST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#first";
const RDF_REST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#rest";
const XSD_BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
const XSD_DECIMAL: &str = "http://www.w3.org/2001/XMLSchema#decimal";
const XSD_DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";
const XSD_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";

/// A [Turtle](https://www.w3.org/TR/turtle/) streaming parser.
///
/// It reads a document from a `BufRead` implementation and pushes namespace,
/// comment and statement events to an [`RdfHandler`] in the order their
/// terminating syntax is consumed. RDF values are built through a
/// [`ValueFactory`] and recoverable diagnostics are classified against a
/// [`ParserConfig`].
///
/// A parser instance reads a single document and is not reentrant: a parse
/// invocation exclusively owns its state. Callers sharing an instance across
/// threads must serialize externally.
///
/// Count the number of people in a small address book:
/// ```
/// use terrapin_api::handler::StatementCollector;
/// use terrapin_turtle::TurtleParser;
///
/// let file = b"@prefix schema: <http://schema.org/> .
/// <http://example.com/foo> a schema:Person ;
///     schema:name  \"Foo\" .
/// <http://example.com/bar> a schema:Person ;
///     schema:name  \"Bar\" .";
///
/// let rdf_type = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
/// let schema_person = "http://schema.org/Person";
/// let mut collector = StatementCollector::default();
/// TurtleParser::new(file.as_ref(), "")?.parse(&mut collector)?;
/// let count = collector
///     .statements
///     .iter()
///     .filter(|t| t.predicate.iri == rdf_type)
///     .filter(|t| t.object == terrapin_api::model::NamedNode { iri: schema_person.to_owned() }.into())
///     .count();
/// assert_eq!(2, count);
/// # Result::<_, terrapin_turtle::TurtleError>::Ok(())
/// ```
pub struct TurtleParser<R: BufRead, F: ValueFactory = SimpleValueFactory> {
    read: LineBuffer<R>,
    factory: F,
    config: ParserConfig,
    listener: Option<Box<dyn ParseErrorListener>>,
    base_iri: Option<Iri<String>>,
    namespaces: HashMap<String, String>,
    bnode_labels: HashMap<String, BlankNode>,
    subject: Option<Subject>,
    predicate: Option<NamedNode>,
    object: Option<Term>,
}

impl<R: BufRead> TurtleParser<R> {
    /// Builds the parser from a `BufRead` implementation and a base IRI for
    /// relative IRI resolution.
    ///
    /// The base IRI might be empty to state there is no base IRI.
    pub fn new(reader: R, base_iri: &str) -> Result<Self, TurtleError> {
        let read = LineBuffer::new(reader);
        let base_iri = if base_iri.is_empty() {
            None
        } else {
            Some(Iri::parse(base_iri.to_owned()).map_err(|error| {
                read.parse_error(TurtleErrorKind::InvalidIri {
                    iri: base_iri.to_owned(),
                    message: error.to_string(),
                })
            })?)
        };
        Ok(Self {
            read,
            factory: SimpleValueFactory::default(),
            config: ParserConfig::default(),
            listener: None,
            base_iri,
            namespaces: HashMap::new(),
            bnode_labels: HashMap::new(),
            subject: None,
            predicate: None,
            object: None,
        })
    }
}

impl<R: BufRead, F: ValueFactory> TurtleParser<R, F> {
    pub fn with_config(mut self, config: ParserConfig) -> Self {
        self.config = config;
        self
    }

    /// Binds `prefix` before parsing starts, as if the document opened with
    /// the corresponding `@prefix` directive.
    pub fn with_prefix(
        mut self,
        prefix: impl Into<String>,
        iri: impl Into<String>,
    ) -> Result<Self, TurtleError> {
        let iri = iri.into();
        let iri = Iri::parse(iri.clone()).map_err(|error| {
            self.read.parse_error(TurtleErrorKind::InvalidIri {
                iri,
                message: error.to_string(),
            })
        })?;
        self.namespaces.insert(prefix.into(), iri.into_inner());
        Ok(self)
    }

    /// Installs the sink the parser reports warnings and errors to.
    pub fn with_error_listener(mut self, listener: impl ParseErrorListener + 'static) -> Self {
        self.listener = Some(Box::new(listener));
        self
    }

    /// Replaces the factory RDF values are built through.
    pub fn with_factory<F2: ValueFactory>(self, factory: F2) -> TurtleParser<R, F2> {
        TurtleParser {
            read: self.read,
            factory,
            config: self.config,
            listener: self.listener,
            base_iri: self.base_iri,
            namespaces: self.namespaces,
            bnode_labels: self.bnode_labels,
            subject: self.subject,
            predicate: self.predicate,
            object: self.object,
        }
    }

    /// Parses the complete document, pushing its events to `handler`.
    ///
    /// `start_rdf` is emitted on entry and `end_rdf` only on normal
    /// completion. The per-document state is released on every exit path,
    /// and after any fatal error no further statements are emitted.
    pub fn parse<H: RdfHandler>(&mut self, handler: &mut H) -> Result<(), TurtleError> {
        self.release();
        handler.start_rdf().map_err(|e| self.handler_error(e))?;
        let result = self.parse_document(handler);
        self.release();
        if let Err(error) = result {
            if !matches!(error.kind(), TurtleErrorKind::Validation { .. }) {
                let message = error.kind().to_string();
                let line = error.line();
                if let Some(listener) = &mut self.listener {
                    listener.fatal_error(&message, line, -1);
                }
            }
            return Err(error);
        }
        handler.end_rdf().map_err(|e| self.handler_error(e))
    }

    fn parse_document<H: RdfHandler>(&mut self, handler: &mut H) -> Result<(), TurtleError> {
        if self.read.advance_line()? {
            while self.skip_multiline_wsc(handler, false)? {
                self.parse_statement(handler)?;
            }
        }
        Ok(())
    }

    fn release(&mut self) {
        self.subject = None;
        self.predicate = None;
        self.object = None;
        self.bnode_labels.clear();
    }

    // [2] 	statement 	::= 	directive | triples '.'
    fn parse_statement<H: RdfHandler>(&mut self, handler: &mut H) -> Result<(), TurtleError> {
        if !self.try_process_directive(handler)? {
            self.parse_triples(handler)?;
            self.skip_multiline_wsc(handler, true)?;
            self.verify_statement_ends_with_dot(handler)?;
        }
        Ok(())
    }

    // [3] 	directive 	::= 	prefixID | base | sparqlPrefix | sparqlBase
    fn try_process_directive<H: RdfHandler>(
        &mut self,
        handler: &mut H,
    ) -> Result<bool, TurtleError> {
        if self.read.required_current()? == '@' {
            self.parse_case_sensitive_directive(handler)?;
            return Ok(true);
        }
        for keyword in ["prefix", "base"] {
            if self.line_matches_keyword(keyword) {
                if !self.config.get(ParserSetting::CaseInsensitiveDirectives) {
                    return Err(self.fatal(TurtleErrorKind::Syntax(format!(
                        "SPARQL-style '{keyword}' directives require the {} setting",
                        ParserSetting::CaseInsensitiveDirectives
                    ))));
                }
                self.read.advance_index(keyword.len());
                if keyword == "prefix" {
                    self.parse_prefix_id(handler, false)?;
                } else {
                    self.parse_base(handler, false)?;
                }
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn parse_case_sensitive_directive<H: RdfHandler>(
        &mut self,
        handler: &mut H,
    ) -> Result<(), TurtleError> {
        if self.line_starts_with("@prefix", false) {
            self.read.advance_index("@prefix".len());
            self.parse_prefix_id(handler, true)
        } else if self.line_starts_with("@base", false) {
            self.read.advance_index("@base".len());
            self.parse_base(handler, true)
        } else if self.line_starts_with("@prefix", true) {
            self.require_case_insensitive_directives("@prefix")?;
            self.read.advance_index("@prefix".len());
            self.parse_prefix_id(handler, true)
        } else if self.line_starts_with("@base", true) {
            self.require_case_insensitive_directives("@base")?;
            self.read.advance_index("@base".len());
            self.parse_base(handler, true)
        } else {
            let rest = self.read.remainder_from(self.read.index());
            let directive = rest.split_whitespace().next().unwrap_or("").to_owned();
            Err(self.fatal(TurtleErrorKind::UnknownDirective(directive)))
        }
    }

    fn require_case_insensitive_directives(&self, directive: &str) -> Result<(), TurtleError> {
        if self.config.get(ParserSetting::CaseInsensitiveDirectives) {
            Ok(())
        } else {
            Err(self.fatal(TurtleErrorKind::Syntax(format!(
                "case-insensitive '{directive}' directives require the {} setting",
                ParserSetting::CaseInsensitiveDirectives
            ))))
        }
    }

    /// Does the current line continue with `keyword` (ASCII case-insensitive)
    /// followed by whitespace or the end of the line?
    fn line_matches_keyword(&self, keyword: &str) -> bool {
        let mut i = self.read.index();
        for k in keyword.chars() {
            match self.read.char_at(i) {
                Some(c) if c.eq_ignore_ascii_case(&k) => i += 1,
                _ => return false,
            }
        }
        match self.read.char_at(i) {
            None => true,
            Some(c) => is_whitespace(c),
        }
    }

    fn line_starts_with(&self, prefix: &str, ignore_case: bool) -> bool {
        let mut i = self.read.index();
        for k in prefix.chars() {
            match self.read.char_at(i) {
                Some(c) if c == k || (ignore_case && c.eq_ignore_ascii_case(&k)) => i += 1,
                _ => return false,
            }
        }
        true
    }

    // [4] 	prefixID 	::= 	'@prefix' PNAME_NS IRIREF '.'
    // [6s] 	sparqlPrefix 	::= 	"PREFIX" PNAME_NS IRIREF
    fn parse_prefix_id<H: RdfHandler>(
        &mut self,
        handler: &mut H,
        is_sensitive: bool,
    ) -> Result<(), TurtleError> {
        self.skip_multiline_wsc(handler, true)?;
        let start = self.read.index();
        let end = self.read.read_up_to_char_or_wsc(':')?;
        if let Some(c) = self.read.current() {
            if is_whitespace(c) {
                let _ = self.read.skip_inline_wsc();
            }
        }
        if self.read.current() == Some(':') {
            self.read.advance_index(1);
        }
        let prefix = self.read.slice(start, end);
        let _ = self.read.skip_inline_wsc();
        let namespace = match self.parse_iriref(handler)? {
            Some(namespace) => namespace,
            None => {
                return Err(self.fatal(TurtleErrorKind::Syntax(format!(
                    "invalid namespace IRI for prefix '{prefix}:'"
                ))))
            }
        };
        self.namespaces.insert(prefix.clone(), namespace.iri.clone());
        handler
            .handle_namespace(&prefix, &namespace.iri)
            .map_err(|e| self.handler_error(e))?;
        if is_sensitive {
            self.verify_statement_ends_with_dot(handler)?;
        }
        Ok(())
    }

    // [5] 	base 	::= 	'@base' IRIREF '.'
    // [5s] 	sparqlBase 	::= 	"BASE" IRIREF
    fn parse_base<H: RdfHandler>(
        &mut self,
        handler: &mut H,
        is_sensitive: bool,
    ) -> Result<(), TurtleError> {
        let base = match self.parse_iriref(handler)? {
            Some(base) => base,
            None => {
                return Err(self.fatal(TurtleErrorKind::Syntax("invalid base IRI".to_owned())))
            }
        };
        self.base_iri = Some(Iri::parse(base.iri.clone()).map_err(|error| {
            self.fatal(TurtleErrorKind::InvalidIri {
                iri: base.iri.clone(),
                message: error.to_string(),
            })
        })?);
        if is_sensitive {
            self.verify_statement_ends_with_dot(handler)?;
        }
        Ok(())
    }

    // [6] 	triples 	::= 	subject predicateObjectList | blankNodePropertyList predicateObjectList?
    fn parse_triples<H: RdfHandler>(&mut self, handler: &mut H) -> Result<(), TurtleError> {
        if self.read.required_current()? == '[' {
            let node = self.parse_blank_node_property_list(handler)?;
            self.subject = Some(node.into());
            self.skip_multiline_wsc(handler, true)?;
            if self.read.required_current()? != '.' {
                self.parse_predicate_object_list(handler)?;
            }
        } else {
            self.parse_subject(handler)?;
            self.skip_multiline_wsc(handler, true)?;
            self.parse_predicate_object_list(handler)?;
        }
        self.subject = None;
        self.predicate = None;
        self.object = None;
        Ok(())
    }

    // [7] 	predicateObjectList 	::= 	verb objectList (';' (verb objectList)?)*
    fn parse_predicate_object_list<H: RdfHandler>(
        &mut self,
        handler: &mut H,
    ) -> Result<(), TurtleError> {
        self.parse_predicate(handler)?;
        self.skip_multiline_wsc(handler, true)?;
        self.parse_object_list(handler)?;
        while self.read.required_current()? == ';' {
            self.skip_to_next_index(handler)?;
            self.skip_multiline_wsc(handler, true)?;
            match self.read.required_current()? {
                '.' | ']' | '}' => break,
                // an empty predicate-object pair, consume the next ';'
                ';' => continue,
                _ => {
                    self.parse_predicate(handler)?;
                    self.skip_multiline_wsc(handler, true)?;
                    self.parse_object_list(handler)?;
                }
            }
        }
        Ok(())
    }

    // [8] 	objectList 	::= 	object (',' object)*
    fn parse_object_list<H: RdfHandler>(&mut self, handler: &mut H) -> Result<(), TurtleError> {
        self.parse_object(handler)?;
        self.skip_multiline_wsc(handler, true)?;
        while self.read.required_current()? == ',' {
            self.read.advance_index(1);
            self.skip_multiline_wsc(handler, true)?;
            self.parse_object(handler)?;
            self.skip_multiline_wsc(handler, true)?;
        }
        Ok(())
    }

    // [10] 	subject 	::= 	iri | BlankNode | collection
    fn parse_subject<H: RdfHandler>(&mut self, handler: &mut H) -> Result<(), TurtleError> {
        match self.read.required_current()? {
            '(' => {
                let collection = self.parse_collection(handler)?;
                self.subject = Some(collection);
            }
            '[' => {
                let node = self.parse_blank_node_property_list(handler)?;
                self.subject = Some(node.into());
            }
            _ => match self.parse_value(handler)? {
                Some(Term::NamedNode(node)) => self.subject = Some(Subject::NamedNode(node)),
                Some(Term::BlankNode(node)) => self.subject = Some(Subject::BlankNode(node)),
                Some(Term::Triple(triple)) => self.subject = Some(Subject::Triple(triple)),
                Some(other) => {
                    return Err(self.fatal(TurtleErrorKind::Syntax(format!(
                        "illegal subject value: {other}"
                    ))))
                }
                None => {}
            },
        }
        Ok(())
    }

    // [9] 	verb 	::= 	predicate | 'a'
    fn parse_predicate<H: RdfHandler>(&mut self, handler: &mut H) -> Result<(), TurtleError> {
        let c = self.read.required_current()?;
        if c == 'a' {
            // the shortcut only holds when followed by whitespace, otherwise
            // this is a prefixed name starting with 'a'
            let next = self.read.char_at(self.read.index() + 1);
            if next.map_or(true, is_whitespace) {
                self.skip_to_next_index(handler)?;
                let node = self.create_iri(RDF_TYPE)?;
                self.predicate = Some(node);
                return Ok(());
            }
        }
        if c == '<' {
            self.predicate = self.parse_iriref(handler)?;
        } else if c == ':' || is_prefix_start_char(c) {
            match self.parse_prefixed_name_or_boolean(handler)? {
                Term::NamedNode(node) => self.predicate = Some(node),
                other => {
                    return Err(self.fatal(TurtleErrorKind::Syntax(format!(
                        "expected an IRI as predicate, found {other}"
                    ))))
                }
            }
        } else {
            return Err(self.fatal(TurtleErrorKind::Syntax(format!(
                "expected an RDF predicate here, found '{c}'"
            ))));
        }
        Ok(())
    }

    // [12] 	object 	::= 	iri | BlankNode | collection | blankNodePropertyList | literal
    fn parse_object<H: RdfHandler>(&mut self, handler: &mut H) -> Result<(), TurtleError> {
        match self.read.required_current()? {
            '(' => {
                let collection = self.parse_collection(handler)?;
                self.object = Some(collection.into());
            }
            '[' => {
                let node = self.parse_blank_node_property_list(handler)?;
                self.object = Some(node.into());
            }
            _ => {
                self.object = self.parse_value(handler)?;
                let (subject, predicate, object) = (
                    self.subject.clone(),
                    self.predicate.clone(),
                    self.object.clone(),
                );
                self.report_statement(handler, subject, predicate, object)?;
            }
        }
        Ok(())
    }

    // [15] 	collection 	::= 	'(' object* ')'
    fn parse_collection<H: RdfHandler>(&mut self, handler: &mut H) -> Result<Subject, TurtleError> {
        self.verify_character_or_fail(self.read.current(), "(")?;
        self.skip_to_next_index(handler)?;
        self.skip_multiline_wsc(handler, true)?;
        if self.read.required_current()? == ')' {
            // the empty list
            self.skip_to_next_index(handler)?;
            let nil = self.create_iri(RDF_NIL)?;
            if self.subject.is_some() {
                let (subject, predicate) = (self.subject.clone(), self.predicate.clone());
                self.report_statement(handler, subject, predicate, Some(nil.clone().into()))?;
            }
            return Ok(Subject::NamedNode(nil));
        }
        let list_root = self.factory.create_blank_node();
        if self.subject.is_some() {
            let (subject, predicate) = (self.subject.clone(), self.predicate.clone());
            self.report_statement(handler, subject, predicate, Some(list_root.clone().into()))?;
        }
        // remember the enclosing subject and predicate; the generated node
        // becomes the subject and rdf:first the predicate
        let old_subject = self.subject.take();
        let old_predicate = self.predicate.take();
        self.subject = Some(list_root.clone().into());
        self.predicate = Some(self.create_iri(RDF_FIRST)?);
        self.parse_object(handler)?;
        self.skip_multiline_wsc(handler, true)?;
        let mut node = list_root.clone();
        while self.read.required_current()? != ')' {
            // chain another list node to the previous one
            let next = self.factory.create_blank_node();
            let rest = self.create_iri(RDF_REST)?;
            self.report_statement(
                handler,
                Some(node.clone().into()),
                Some(rest),
                Some(next.clone().into()),
            )?;
            self.subject = Some(next.clone().into());
            node = next;
            self.parse_object(handler)?;
            self.skip_multiline_wsc(handler, true)?;
        }
        self.skip_to_next_index(handler)?;
        self.skip_multiline_wsc(handler, true)?;
        // close the list
        let rest = self.create_iri(RDF_REST)?;
        let nil = self.create_iri(RDF_NIL)?;
        self.report_statement(handler, Some(node.into()), Some(rest), Some(nil.into()))?;
        self.subject = old_subject;
        self.predicate = old_predicate;
        Ok(Subject::BlankNode(list_root))
    }

    // [14] 	blankNodePropertyList 	::= 	'[' predicateObjectList ']'
    fn parse_blank_node_property_list<H: RdfHandler>(
        &mut self,
        handler: &mut H,
    ) -> Result<BlankNode, TurtleError> {
        self.read.read_code_point()?;
        self.skip_multiline_wsc(handler, true)?;
        let node = self.factory.create_blank_node();
        if self.subject.is_some() {
            let (subject, predicate) = (self.subject.clone(), self.predicate.clone());
            self.report_statement(handler, subject, predicate, Some(node.clone().into()))?;
        }
        if self.read.required_current()? != ']' {
            let old_subject = self.subject.take();
            let old_predicate = self.predicate.take();
            self.subject = Some(node.clone().into());
            self.skip_multiline_wsc(handler, true)?;
            self.parse_predicate_object_list(handler)?;
            self.skip_multiline_wsc(handler, true)?;
            self.verify_character_or_fail(self.read.current(), "]")?;
            self.skip_to_next_index(handler)?;
            self.subject = old_subject;
            self.predicate = old_predicate;
        } else {
            self.read.read_code_point()?;
        }
        Ok(node)
    }

    // [13] 	literal 	::= 	RDFLiteral | NumericLiteral | BooleanLiteral
    // [135s] 	iri 	::= 	IRIREF | PrefixedName
    fn parse_value<H: RdfHandler>(&mut self, handler: &mut H) -> Result<Option<Term>, TurtleError> {
        if self.config.get(ParserSetting::AcceptTurtlestar) && self.peek_is_triple_term() {
            let triple = self.parse_triple_term(handler)?;
            return Ok(Some(Term::Triple(Box::new(triple))));
        }
        let c = self.read.required_current()?;
        if c == '<' {
            Ok(self.parse_iriref(handler)?.map(Term::NamedNode))
        } else if c == ':' || is_prefix_start_char(c) {
            Ok(Some(self.parse_prefixed_name_or_boolean(handler)?))
        } else if c == '_' {
            Ok(Some(Term::BlankNode(self.parse_blank_node_label(handler)?)))
        } else if c == '"' || c == '\'' {
            Ok(self.parse_rdf_literal(handler)?.map(Term::Literal))
        } else if c.is_ascii_digit() || c == '.' || c == '+' || c == '-' {
            Ok(Some(Term::Literal(self.parse_number()?)))
        } else {
            Err(self.fatal(TurtleErrorKind::Syntax(format!(
                "expected an RDF value here, found '{c}'"
            ))))
        }
    }

    // [128s] 	RDFLiteral 	::= 	String (LANGTAG | '^^' iri)?
    fn parse_rdf_literal<H: RdfHandler>(
        &mut self,
        handler: &mut H,
    ) -> Result<Option<Literal>, TurtleError> {
        let label = self.parse_quoted_string()?;
        self.read.read_code_point()?;
        self.skip_multiline_wsc(handler, true)?;
        match self.read.required_current()? {
            '@' => {
                // [144s] 	LANGTAG 	::= 	'@' [a-zA-Z]+ ('-' [a-zA-Z0-9]+)*
                let mut language = String::new();
                let mut c = self.read.read_code_point()?;
                loop {
                    if is_whitespace(c) || matches!(c, '.' | ';' | ',' | ')' | ']' | '>') {
                        break;
                    }
                    language.push(c);
                    c = self.read.read_code_point()?;
                }
                if self.config.get(ParserSetting::VerifyLanguageTags) {
                    if let Err(error) = LanguageTag::parse(language.as_str()) {
                        self.report_error(
                            format!("illegal language tag '{language}': {error}"),
                            Check::LanguageTag,
                        )?;
                    }
                }
                self.skip_multiline_wsc(handler, true)?;
                let literal = self
                    .factory
                    .create_literal(label, Some(language), None)
                    .map_err(|e| self.value_error(e))?;
                Ok(Some(literal))
            }
            '^' => {
                let c = self.read.read_code_point()?;
                self.verify_character_or_fail(Some(c), "^")?;
                self.skip_to_next_index(handler)?;
                self.skip_multiline_wsc(handler, true)?;
                match self.parse_value(handler)? {
                    Some(Term::NamedNode(datatype)) => {
                        let literal = self
                            .factory
                            .create_literal(label, None, Some(datatype))
                            .map_err(|e| self.value_error(e))?;
                        Ok(Some(literal))
                    }
                    Some(other) => Err(self.fatal(TurtleErrorKind::Syntax(format!(
                        "illegal datatype value: {other}"
                    )))),
                    None => {
                        self.report_error(
                            format!("invalid datatype IRI for literal \"{label}\""),
                            Check::UriSyntax,
                        )?;
                        Ok(None)
                    }
                }
            }
            _ => {
                let literal = self
                    .factory
                    .create_literal(label, None, None)
                    .map_err(|e| self.value_error(e))?;
                Ok(Some(literal))
            }
        }
    }

    // [17] 	String 	::= 	STRING_LITERAL_QUOTE | STRING_LITERAL_SINGLE_QUOTE
    //  	 	 	| STRING_LITERAL_LONG_SINGLE_QUOTE | STRING_LITERAL_LONG_QUOTE
    fn parse_quoted_string(&mut self) -> Result<String, TurtleError> {
        let c1 = self.read.required_current()?;
        self.verify_character_or_fail(Some(c1), "\"'")?;
        let index = self.read.index();
        let c2 = self.read.char_at(index + 1);
        let c3 = self.read.char_at(index + 2);
        let raw = if c2 == Some(c1) && c3 == Some(c1) {
            self.read.advance_index(2);
            self.parse_long_string()?
        } else {
            self.parse_string()?
        };
        match decode_string(&raw) {
            Ok(decoded) => Ok(decoded.into_owned()),
            Err(error) => {
                self.report_error(error.to_string(), Check::DatatypeValue)?;
                Ok(raw)
            }
        }
    }

    /// The string terminator was located while the logical line was
    /// assembled, so the lexical form reduces to a slice.
    fn parse_string(&mut self) -> Result<String, TurtleError> {
        let start = self.read.index() + 1;
        let end = match self.read.pop_quote_end() {
            Some(end) => end,
            None => return Err(self.read.eof_error()),
        };
        self.read.set_index(end);
        Ok(self.read.slice(start, end))
    }

    fn parse_long_string(&mut self) -> Result<String, TurtleError> {
        let start = self.read.index() + 1;
        let end = match self.read.pop_quote_end() {
            Some(end) => end,
            None => return Err(self.read.eof_error()),
        };
        self.read.set_index(end);
        Ok(self.read.slice(start, end - 2))
    }

    // [16] 	NumericLiteral 	::= 	INTEGER | DECIMAL | DOUBLE
    fn parse_number(&mut self) -> Result<Literal, TurtleError> {
        let mut value = String::new();
        let mut datatype = XSD_INTEGER;
        let mut c = self.read.required_current()?;
        if c == '+' || c == '-' {
            value.push(c);
            c = self.read.read_code_point()?;
        }
        while c.is_ascii_digit() {
            value.push(c);
            c = self.read.read_code_point()?;
        }
        if c == '.' || c == 'e' || c == 'E' {
            if c == '.' {
                let next = self.read.char_at(self.read.index() + 1);
                if next.map_or(true, is_whitespace) {
                    // a '.' ending the statement, not part of a decimal;
                    // leave the cursor on it
                } else {
                    value.push(c);
                    c = self.read.read_code_point()?;
                    while c.is_ascii_digit() {
                        value.push(c);
                        c = self.read.read_code_point()?;
                    }
                    if value.len() == 1 {
                        return Err(self.fatal(TurtleErrorKind::Syntax(
                            "object for statement missing".to_owned(),
                        )));
                    }
                    datatype = XSD_DECIMAL;
                }
            } else if value.is_empty() {
                return Err(self.fatal(TurtleErrorKind::Syntax(
                    "object for statement missing".to_owned(),
                )));
            }
            if c == 'e' || c == 'E' {
                // [154s] 	EXPONENT 	::= 	[eE] [+-]? [0-9]+
                datatype = XSD_DOUBLE;
                value.push(c);
                c = self.read.read_code_point()?;
                if c == '+' || c == '-' {
                    value.push(c);
                    c = self.read.read_code_point()?;
                }
                if !c.is_ascii_digit() {
                    self.report_error("exponent value missing".to_owned(), Check::DatatypeValue)?;
                }
                value.push(c);
                c = self.read.read_code_point()?;
                while c.is_ascii_digit() {
                    value.push(c);
                    c = self.read.read_code_point()?;
                }
            }
        }
        // the cursor sits on the first character after the number
        let datatype = self.create_iri(datatype)?;
        self.factory
            .create_literal(value, None, Some(datatype))
            .map_err(|e| self.value_error(e))
    }

    // [18] 	IRIREF 	::= 	'<' ([^#x00-#x20<>"{}|^`\] | UCHAR)* '>'
    fn parse_iriref<H: RdfHandler>(
        &mut self,
        handler: &mut H,
    ) -> Result<Option<NamedNode>, TurtleError> {
        self.skip_multiline_wsc(handler, true)?;
        self.verify_character_or_fail(self.read.current(), "<")?;
        self.read.advance_index(1);
        let mut text = String::new();
        let mut closed = false;
        let mut i = self.read.index();
        while let Some(c) = self.read.char_at(i) {
            if c == '>' {
                self.read.set_index(i);
                self.skip_to_next_index(handler)?;
                let _ = self.read.skip_inline_wsc();
                closed = true;
                break;
            }
            if c == ' ' {
                self.report_error("IRI includes an unencoded space".to_owned(), Check::UriSyntax)?;
            }
            if c == '\\' {
                i += 1;
                let escaped = match self.read.char_at(i) {
                    Some(escaped) => escaped,
                    None => return Err(self.read.eof_error()),
                };
                if escaped != 'u' && escaped != 'U' {
                    self.report_error(
                        format!("IRI includes string escapes: '\\{escaped}'"),
                        Check::UriSyntax,
                    )?;
                }
                text.push('\\');
                text.push(escaped);
            } else {
                text.push(c);
            }
            i += 1;
        }
        if !closed {
            return Err(self.fatal(TurtleErrorKind::UnterminatedIri));
        }
        // This also decodes '\n'-style escapes, which strict Turtle forbids
        // in IRIs; the escape was already reported against the URI syntax
        // check above.
        let text = match decode_string(&text) {
            Ok(decoded) => decoded.into_owned(),
            Err(error) => {
                self.report_error(error.to_string(), Check::DatatypeValue)?;
                text
            }
        };
        self.resolve_iri(text)
    }

    /// Resolves `iri` against the active base, reporting an unresolvable
    /// IRI against the bound check. A tolerated failure yields `None` and
    /// the enclosing statement is skipped.
    fn resolve_iri(&mut self, iri: String) -> Result<Option<NamedNode>, TurtleError> {
        let resolved = match &self.base_iri {
            Some(base) => base.resolve(&iri),
            None => Iri::parse(iri.clone()),
        };
        match resolved {
            Ok(resolved) => {
                let node = self
                    .factory
                    .create_iri(resolved.into_inner())
                    .map_err(|e| self.value_error(e))?;
                Ok(Some(node))
            }
            Err(error) => {
                if self.base_iri.is_none() {
                    self.report_error(
                        format!("unable to resolve IRI <{iri}> without a base IRI: {error}"),
                        Check::RelativeUri,
                    )?;
                } else {
                    self.report_error(format!("invalid IRI <{iri}>: {error}"), Check::UriSyntax)?;
                }
                Ok(None)
            }
        }
    }

    // [136s] 	PrefixedName 	::= 	PNAME_LN | PNAME_NS
    // [133s] 	BooleanLiteral 	::= 	'true' | 'false'
    fn parse_prefixed_name_or_boolean<H: RdfHandler>(
        &mut self,
        handler: &mut H,
    ) -> Result<Term, TurtleError> {
        let c = self.read.required_current()?;
        if c != ':' && !is_prefix_start_char(c) {
            self.report_error(
                format!("expected a ':' or a letter, found '{c}'"),
                Check::RelativeUri,
            )?;
        }
        let namespace;
        if c == ':' {
            namespace = self.get_namespace("")?;
        } else {
            let start = self.read.index();
            let mut end = start;
            while self.read.char_at(end).map_or(false, is_prefix_char) {
                end += 1;
            }
            self.read.set_index(end);
            let prefix = self.read.slice(start, end);
            self.skip_multiline_wsc(handler, true)?;
            let c = self.read.required_current()?;
            if c != ':' && (prefix == "true" || prefix == "false") {
                // the word was a boolean literal after all
                let datatype = self.create_iri(XSD_BOOLEAN)?;
                let literal = self
                    .factory
                    .create_literal(prefix, None, Some(datatype))
                    .map_err(|e| self.value_error(e))?;
                return Ok(Term::Literal(literal));
            }
            self.verify_character_or_fail(Some(c), ":")?;
            namespace = self.get_namespace(&prefix)?;
        }
        // the cursor is on the ':'; read the optional local name
        // [168s] 	PN_LOCAL 	::= 	(PN_CHARS_U | ':' | [0-9] | PLX) ((PN_CHARS | '.' | ':' | PLX)* (PN_CHARS | ':' | PLX))?
        let mut local = String::new();
        let mut c = self.read.read_code_point()?;
        if is_name_start_char(c) {
            if c == '\\' {
                local.push(self.read_local_escaped_char()?);
            } else {
                local.push(c);
            }
            c = self.read.read_code_point()?;
            let mut prev = c;
            while is_name_char(c) {
                if c == '.' && self.read.index() + 1 == self.read.line_len() {
                    break;
                }
                if c == '\\' {
                    local.push(self.read_local_escaped_char()?);
                } else {
                    local.push(c);
                }
                prev = c;
                c = self.read.read_code_point()?;
            }
            if prev == '.' {
                // a local name never ends in '.': back the terminator off
                local.pop();
                self.read.set_index(self.read.index() - 1);
            }
        }
        // [170s] 	PERCENT 	::= 	'%' HEX HEX
        let chars: Vec<char> = local.chars().collect();
        for (i, ch) in chars.iter().enumerate() {
            if *ch == '%'
                && (i + 2 >= chars.len()
                    || !chars[i + 1].is_ascii_hexdigit()
                    || !chars[i + 2].is_ascii_hexdigit())
            {
                return Err(self.fatal(TurtleErrorKind::Syntax(format!(
                    "found incomplete percent-encoded sequence: {local}"
                ))));
            }
        }
        // the namespace is already resolved
        let node = self.create_iri(&format!("{namespace}{local}"))?;
        Ok(Term::NamedNode(node))
    }

    // [172s] 	PN_LOCAL_ESC 	::= 	'\' ('_' | '~' | '.' | ...)
    fn read_local_escaped_char(&mut self) -> Result<char, TurtleError> {
        let c = self.read.read_code_point()?;
        if is_local_escaped_char(c) {
            Ok(c)
        } else {
            Err(self.fatal(TurtleErrorKind::Syntax(format!(
                "found '{c}', expected one of: {LOCAL_ESCAPED_CHARS}"
            ))))
        }
    }

    // [141s] 	BLANK_NODE_LABEL 	::= 	'_:' (PN_CHARS_U | [0-9]) ((PN_CHARS | '.')* PN_CHARS)?
    fn parse_blank_node_label<H: RdfHandler>(
        &mut self,
        handler: &mut H,
    ) -> Result<BlankNode, TurtleError> {
        self.verify_character_or_fail(self.read.current(), "_")?;
        let c = self.read.read_code_point()?;
        self.verify_character_or_fail(Some(c), ":")?;
        let c = self.read.read_code_point()?;
        if !is_bnode_label_start_char(c) {
            self.report_error(format!("expected a letter, found '{c}'"), Check::BnodeLabel)?;
        }
        let mut name = String::new();
        name.push(c);
        self.read.advance_index(1);
        loop {
            match self.read.current() {
                Some(c) if is_bnode_label_char(c) => {
                    if c == '.' {
                        // a label never ends in '.': only keep the dot when
                        // another label character follows on this line
                        match self.read.char_at(self.read.index() + 1) {
                            None => break,
                            Some(next) if is_whitespace(next) || next == '<' || next == '_' => {
                                break
                            }
                            _ => {}
                        }
                    }
                    name.push(c);
                    self.read.advance_index(1);
                }
                _ => break,
            }
        }
        self.skip_multiline_wsc(handler, true)?;
        self.create_node_from_label(name)
    }

    /// Maps a label through the blank-node dispenser so repeated occurrences
    /// of one label denote the same node.
    fn create_node_from_label(&mut self, label: String) -> Result<BlankNode, TurtleError> {
        if let Some(node) = self.bnode_labels.get(&label) {
            return Ok(node.clone());
        }
        let node = if self.config.get(ParserSetting::PreserveBnodeIds) {
            self.factory
                .create_blank_node_from_label(label.clone())
                .map_err(|e| self.value_error(e))?
        } else {
            self.factory.create_blank_node()
        };
        self.bnode_labels.insert(label, node.clone());
        Ok(node)
    }

    fn peek_is_triple_term(&self) -> bool {
        self.read.current() == Some('<') && self.read.char_at(self.read.index() + 1) == Some('<')
    }

    // [27t] 	quotedTriple 	::= 	'<<' qtSubject verb qtObject '>>'
    fn parse_triple_term<H: RdfHandler>(&mut self, handler: &mut H) -> Result<Triple, TurtleError> {
        self.verify_character_or_fail(self.read.current(), "<")?;
        let c = self.read.read_code_point()?;
        self.verify_character_or_fail(Some(c), "<")?;
        self.skip_to_next_index(handler)?;
        self.skip_multiline_wsc(handler, true)?;
        let subject = match self.parse_value(handler)? {
            Some(Term::NamedNode(node)) => Subject::NamedNode(node),
            Some(Term::BlankNode(node)) => Subject::BlankNode(node),
            Some(Term::Triple(triple)) => Subject::Triple(triple),
            Some(other) => {
                return Err(self.fatal(TurtleErrorKind::Syntax(format!(
                    "illegal subject value in triple term: {other}"
                ))))
            }
            None => {
                return Err(self.fatal(TurtleErrorKind::Syntax(
                    "missing subject in triple term".to_owned(),
                )))
            }
        };
        self.skip_multiline_wsc(handler, true)?;
        let predicate = match self.parse_value(handler)? {
            Some(Term::NamedNode(node)) => node,
            Some(other) => {
                return Err(self.fatal(TurtleErrorKind::Syntax(format!(
                    "illegal predicate value in triple term: {other}"
                ))))
            }
            None => {
                return Err(self.fatal(TurtleErrorKind::Syntax(
                    "missing predicate in triple term".to_owned(),
                )))
            }
        };
        self.skip_multiline_wsc(handler, true)?;
        let object = match self.parse_value(handler)? {
            Some(term) => term,
            None => {
                return Err(self.fatal(TurtleErrorKind::Syntax(
                    "missing object in triple term".to_owned(),
                )))
            }
        };
        self.skip_multiline_wsc(handler, true)?;
        self.verify_character_or_fail(self.read.current(), ">")?;
        let c = self.read.read_code_point()?;
        self.verify_character_or_fail(Some(c), ">")?;
        self.skip_to_next_index(handler)?;
        self.skip_multiline_wsc(handler, true)?;
        self.factory
            .create_triple(subject, predicate, object)
            .map_err(|e| self.value_error(e))
    }

    /// Emits the statement when all three slots are set; a statement with a
    /// missing slot was already reported and is skipped.
    fn report_statement<H: RdfHandler>(
        &mut self,
        handler: &mut H,
        subject: Option<Subject>,
        predicate: Option<NamedNode>,
        object: Option<Term>,
    ) -> Result<(), TurtleError> {
        if let (Some(subject), Some(predicate), Some(object)) = (subject, predicate, object) {
            let statement = self
                .factory
                .create_statement(subject, predicate, object)
                .map_err(|e| self.value_error(e))?;
            handler
                .handle_statement(statement)
                .map_err(|e| self.handler_error(e))?;
        }
        Ok(())
    }

    /// Skips whitespace and `#` comments, reporting comments to the handler,
    /// across line boundaries. Leaves the cursor on the next token character
    /// and returns whether one exists; end of input is fatal when `strict`.
    fn skip_multiline_wsc<H: RdfHandler>(
        &mut self,
        handler: &mut H,
        strict: bool,
    ) -> Result<bool, TurtleError> {
        loop {
            if !self.read.has_line() {
                return if strict {
                    Err(self.read.eof_error())
                } else {
                    Ok(false)
                };
            }
            let mut i = self.read.index();
            loop {
                match self.read.char_at(i) {
                    Some(c) if is_whitespace(c) => i += 1,
                    Some('#') => {
                        self.read.set_index(i);
                        self.process_comment(handler)?;
                        break;
                    }
                    Some(_) => {
                        self.read.set_index(i);
                        return Ok(true);
                    }
                    None => break,
                }
            }
            if !self.read.advance_line()? {
                return if strict {
                    Err(self.read.eof_error())
                } else {
                    Ok(false)
                };
            }
        }
    }

    /// Advances the cursor one position, or onto the next line when the
    /// current one is exhausted.
    fn skip_to_next_index<H: RdfHandler>(&mut self, handler: &mut H) -> Result<(), TurtleError> {
        if self.read.index() + 1 < self.read.line_len() {
            self.read.advance_index(1);
            Ok(())
        } else {
            if !self.read.advance_line()? {
                return Err(self.read.eof_error());
            }
            self.skip_multiline_wsc(handler, true)?;
            Ok(())
        }
    }

    fn verify_statement_ends_with_dot<H: RdfHandler>(
        &mut self,
        handler: &mut H,
    ) -> Result<(), TurtleError> {
        loop {
            let mut i = self.read.index();
            loop {
                match self.read.char_at(i) {
                    Some(c) if is_whitespace(c) => i += 1,
                    Some('.') => {
                        if i + 1 < self.read.line_len() {
                            self.read.set_index(i + 1);
                        } else if self.read.advance_line()? {
                            self.skip_multiline_wsc(handler, false)?;
                        }
                        return Ok(());
                    }
                    Some(_) => {
                        return Err(self.fatal(TurtleErrorKind::MissingStatementTerminator))
                    }
                    None => break,
                }
            }
            if !self.read.advance_line()? {
                return Err(self.read.eof_error());
            }
        }
    }

    fn verify_character_or_fail(
        &self,
        code_point: Option<char>,
        expected: &str,
    ) -> Result<(), TurtleError> {
        let c = match code_point {
            Some(c) => c,
            None => return Err(self.read.eof_error()),
        };
        if expected.contains(c) {
            return Ok(());
        }
        let mut message = String::new();
        for (i, e) in expected.chars().enumerate() {
            if i > 0 {
                message.push_str(" or ");
            }
            message.push('\'');
            message.push(e);
            message.push('\'');
        }
        Err(self.fatal(TurtleErrorKind::UnexpectedCharacter {
            expected: message,
            found: c,
        }))
    }

    /// Reports the remainder of the line after the `#` as a comment.
    fn process_comment<H: RdfHandler>(&mut self, handler: &mut H) -> Result<(), TurtleError> {
        let text = self.read.remainder_from(self.read.index() + 1);
        handler
            .handle_comment(&text)
            .map_err(|e| self.handler_error(e))
    }

    fn get_namespace(&self, prefix: &str) -> Result<String, TurtleError> {
        match self.namespaces.get(prefix) {
            Some(namespace) => Ok(namespace.clone()),
            None => Err(self.fatal(TurtleErrorKind::UnknownPrefix(prefix.to_owned()))),
        }
    }

    fn create_iri(&mut self, iri: &str) -> Result<NamedNode, TurtleError> {
        self.factory
            .create_iri(iri.to_owned())
            .map_err(|e| self.value_error(e))
    }

    /// Classifies a recoverable diagnostic against the setting its check is
    /// bound to: enabled means fatal, disabled means a warning.
    fn report_error(&mut self, message: String, check: Check) -> Result<(), TurtleError> {
        let setting = check_setting(check);
        let line = self.read.line_number();
        if self.config.get(setting) {
            if let Some(listener) = &mut self.listener {
                listener.error(&message, line, -1);
            }
            Err(TurtleError::new(
                TurtleErrorKind::Validation { message, setting },
                line,
            ))
        } else {
            if let Some(listener) = &mut self.listener {
                listener.warning(&message, line, -1);
            }
            Ok(())
        }
    }

    fn fatal(&self, kind: TurtleErrorKind) -> TurtleError {
        TurtleError::new(kind, self.read.line_number())
    }

    fn handler_error(&self, error: HandlerError) -> TurtleError {
        self.fatal(TurtleErrorKind::Handler(error))
    }

    fn value_error(&self, error: TermError) -> TurtleError {
        self.fatal(TurtleErrorKind::Value(error))
    }
}
