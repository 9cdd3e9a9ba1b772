//! The factory contract a parser constructs RDF values through.

use crate::model::{BlankNode, Literal, NamedNode, Subject, Term, Triple};

/// An error raised by a [`ValueFactory`] constructor.
///
/// The parser reports it as a fatal diagnostic with the current source line
/// attached.
#[derive(Debug, thiserror::Error)]
pub enum TermError {
    #[error("not a valid IRI: {0}")]
    InvalidIri(String),
    #[error("not a valid language tag: {0}")]
    InvalidLanguageTag(String),
    #[error("not a valid blank node label: {0}")]
    InvalidBlankNodeLabel(String),
}

/// Constructs the RDF values a parser emits.
///
/// Implementations may intern values, enforce additional well-formedness
/// rules, or control blank node identity; any constructor may fail, which the
/// parser turns into a fatal parse error.
pub trait ValueFactory {
    fn create_iri(&mut self, iri: String) -> Result<NamedNode, TermError>;

    /// Builds a literal from its lexical form and an optional language tag or
    /// datatype. At most one of `language` and `datatype` is set; neither
    /// yields a simple literal.
    fn create_literal(
        &mut self,
        value: String,
        language: Option<String>,
        datatype: Option<NamedNode>,
    ) -> Result<Literal, TermError>;

    /// Dispenses a fresh blank node with an identifier not used before by
    /// this factory.
    fn create_blank_node(&mut self) -> BlankNode;

    fn create_blank_node_from_label(&mut self, label: String) -> Result<BlankNode, TermError>;

    /// Builds an RDF-star triple used as a term.
    fn create_triple(
        &mut self,
        subject: Subject,
        predicate: NamedNode,
        object: Term,
    ) -> Result<Triple, TermError>;

    /// Builds a top-level statement.
    fn create_statement(
        &mut self,
        subject: Subject,
        predicate: NamedNode,
        object: Term,
    ) -> Result<Triple, TermError>;
}

/// The default [`ValueFactory`]: no interning, structural checks only,
/// sequential `genid…` blank node identifiers.
///
/// ```
/// use terrapin_api::factory::{SimpleValueFactory, ValueFactory};
///
/// let mut factory = SimpleValueFactory::default();
/// let first = factory.create_blank_node();
/// let second = factory.create_blank_node();
/// assert_ne!(first, second);
/// assert!(factory.create_iri("no-colon".to_owned()).is_err());
/// ```
#[derive(Debug, Default)]
pub struct SimpleValueFactory {
    bnode_id_generator: BlankNodeIdGenerator,
}

impl ValueFactory for SimpleValueFactory {
    fn create_iri(&mut self, iri: String) -> Result<NamedNode, TermError> {
        // Minimal structural check: an IRI must carry a scheme separator.
        if iri.contains(':') {
            Ok(NamedNode { iri })
        } else {
            Err(TermError::InvalidIri(iri))
        }
    }

    fn create_literal(
        &mut self,
        value: String,
        language: Option<String>,
        datatype: Option<NamedNode>,
    ) -> Result<Literal, TermError> {
        Ok(match (language, datatype) {
            (Some(language), _) => {
                if language.is_empty() {
                    return Err(TermError::InvalidLanguageTag(language));
                }
                Literal::LanguageTaggedString { value, language }
            }
            (None, Some(datatype)) => Literal::Typed { value, datatype },
            (None, None) => Literal::Simple { value },
        })
    }

    fn create_blank_node(&mut self) -> BlankNode {
        BlankNode {
            id: self.bnode_id_generator.generate(),
        }
    }

    fn create_blank_node_from_label(&mut self, label: String) -> Result<BlankNode, TermError> {
        if label.is_empty() {
            Err(TermError::InvalidBlankNodeLabel(label))
        } else {
            Ok(BlankNode { id: label })
        }
    }

    fn create_triple(
        &mut self,
        subject: Subject,
        predicate: NamedNode,
        object: Term,
    ) -> Result<Triple, TermError> {
        Ok(Triple {
            subject,
            predicate,
            object,
        })
    }

    fn create_statement(
        &mut self,
        subject: Subject,
        predicate: NamedNode,
        object: Term,
    ) -> Result<Triple, TermError> {
        Ok(Triple {
            subject,
            predicate,
            object,
        })
    }
}

#[derive(Debug, Default)]
struct BlankNodeIdGenerator {
    counter: u64,
}

impl BlankNodeIdGenerator {
    fn generate(&mut self) -> String {
        self.counter += 1;
        format!("genid{}", self.counter)
    }
}
