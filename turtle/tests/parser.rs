use std::io::Cursor;
use terrapin_api::handler::StatementCollector;
use terrapin_api::model::{BlankNode, Literal, NamedNode, Subject, Term, Triple};
use terrapin_api::settings::{ParserConfig, ParserSetting};
use terrapin_turtle::{TurtleError, TurtleErrorKind, TurtleParser};

const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
const RDF_NIL: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#nil";
const RDF_FIRST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#first";
const RDF_REST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#rest";
const XSD_BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
const XSD_DECIMAL: &str = "http://www.w3.org/2001/XMLSchema#decimal";
const XSD_DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";
const XSD_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";

fn parse(data: &str, base: &str) -> Result<StatementCollector, TurtleError> {
    parse_with_config(data, base, ParserConfig::default())
}

fn parse_with_config(
    data: &str,
    base: &str,
    config: ParserConfig,
) -> Result<StatementCollector, TurtleError> {
    let mut collector = StatementCollector::default();
    TurtleParser::new(Cursor::new(data.to_owned()), base)?
        .with_config(config)
        .parse(&mut collector)?;
    Ok(collector)
}

fn iri(value: &str) -> NamedNode {
    NamedNode {
        iri: value.to_owned(),
    }
}

fn typed(value: &str, datatype: &str) -> Term {
    Term::Literal(Literal::Typed {
        value: value.to_owned(),
        datatype: iri(datatype),
    })
}

fn bnode(object: &Term) -> BlankNode {
    match object {
        Term::BlankNode(node) => node.clone(),
        other => panic!("expected a blank node, found {other}"),
    }
}

#[test]
fn parses_triple_with_prebound_default_namespace() -> Result<(), TurtleError> {
    let mut collector = StatementCollector::default();
    TurtleParser::new(Cursor::new(":a :b :c ."), "")?
        .with_prefix("", "http://x/")?
        .parse(&mut collector)?;
    assert_eq!(
        collector.statements,
        [Triple {
            subject: iri("http://x/a").into(),
            predicate: iri("http://x/b"),
            object: iri("http://x/c").into(),
        }]
    );
    Ok(())
}

#[test]
fn parses_prefix_directive_and_prefixed_names() -> Result<(), TurtleError> {
    let collector = parse("@prefix ex: <http://e/> .\nex:s ex:p ex:o .", "")?;
    assert_eq!(
        collector.namespaces,
        [("ex".to_owned(), "http://e/".to_owned())]
    );
    assert_eq!(
        collector.statements,
        [Triple {
            subject: iri("http://e/s").into(),
            predicate: iri("http://e/p"),
            object: iri("http://e/o").into(),
        }]
    );
    Ok(())
}

#[test]
fn numeric_literals_escalate_from_integer_to_double() -> Result<(), TurtleError> {
    let collector = parse("@prefix ex: <http://e/> . ex:s ex:p 42, 3.14, 1e2 .", "")?;
    let objects: Vec<_> = collector
        .statements
        .iter()
        .map(|t| t.object.clone())
        .collect();
    assert_eq!(
        objects,
        [
            typed("42", XSD_INTEGER),
            typed("3.14", XSD_DECIMAL),
            typed("1e2", XSD_DOUBLE),
        ]
    );
    assert!(collector
        .statements
        .iter()
        .all(|t| t.subject == iri("http://e/s").into()));
    Ok(())
}

#[test]
fn collections_expand_to_first_rest_chains() -> Result<(), TurtleError> {
    let collector = parse("<s> <p> ( 1 2 3 ) .", "http://e/")?;
    let st = &collector.statements;
    assert_eq!(st.len(), 7);

    assert_eq!(st[0].subject, iri("http://e/s").into());
    assert_eq!(st[0].predicate, iri("http://e/p"));
    let head = bnode(&st[0].object);
    let second = bnode(&st[2].object);
    let third = bnode(&st[4].object);

    assert_eq!(st[1].subject, Subject::BlankNode(head.clone()));
    assert_eq!(st[1].predicate, iri(RDF_FIRST));
    assert_eq!(st[1].object, typed("1", XSD_INTEGER));

    assert_eq!(st[2].subject, Subject::BlankNode(head));
    assert_eq!(st[2].predicate, iri(RDF_REST));

    assert_eq!(st[3].subject, Subject::BlankNode(second.clone()));
    assert_eq!(st[3].predicate, iri(RDF_FIRST));
    assert_eq!(st[3].object, typed("2", XSD_INTEGER));

    assert_eq!(st[4].subject, Subject::BlankNode(second));
    assert_eq!(st[4].predicate, iri(RDF_REST));

    assert_eq!(st[5].subject, Subject::BlankNode(third.clone()));
    assert_eq!(st[5].predicate, iri(RDF_FIRST));
    assert_eq!(st[5].object, typed("3", XSD_INTEGER));

    assert_eq!(st[6].subject, Subject::BlankNode(third));
    assert_eq!(st[6].predicate, iri(RDF_REST));
    assert_eq!(st[6].object, iri(RDF_NIL).into());
    Ok(())
}

#[test]
fn empty_collection_is_rdf_nil() -> Result<(), TurtleError> {
    let collector = parse("<s> <p> ( ) .", "http://e/")?;
    assert_eq!(
        collector.statements,
        [Triple {
            subject: iri("http://e/s").into(),
            predicate: iri("http://e/p"),
            object: iri(RDF_NIL).into(),
        }]
    );
    Ok(())
}

#[test]
fn property_list_shares_its_anonymous_subject() -> Result<(), TurtleError> {
    let collector = parse("<s> <p> [ <q> <r> ; <q2> <r2> ] .", "http://e/")?;
    let st = &collector.statements;
    assert_eq!(st.len(), 3);
    let node = bnode(&st[0].object);
    assert_eq!(st[0].subject, iri("http://e/s").into());
    assert_eq!(st[1].subject, Subject::BlankNode(node.clone()));
    assert_eq!(st[1].predicate, iri("http://e/q"));
    assert_eq!(st[1].object, iri("http://e/r").into());
    assert_eq!(st[2].subject, Subject::BlankNode(node));
    assert_eq!(st[2].predicate, iri("http://e/q2"));
    assert_eq!(st[2].object, iri("http://e/r2").into());
    Ok(())
}

#[test]
fn sparql_prefix_requires_the_case_insensitive_setting() -> Result<(), TurtleError> {
    let data = "PREFIX ex: <http://e/>\nex:s ex:p true .";

    let error = parse(data, "").unwrap_err();
    assert!(error.to_string().contains("CASE_INSENSITIVE_DIRECTIVES"));

    let config = ParserConfig::default().with(ParserSetting::CaseInsensitiveDirectives, true);
    let collector = parse_with_config(data, "", config)?;
    assert_eq!(
        collector.namespaces,
        [("ex".to_owned(), "http://e/".to_owned())]
    );
    assert_eq!(collector.statements.len(), 1);
    assert_eq!(collector.statements[0].object, typed("true", XSD_BOOLEAN));
    Ok(())
}

#[test]
fn miscased_at_prefix_requires_the_case_insensitive_setting() -> Result<(), TurtleError> {
    let data = "@PREFIX ex: <http://e/> .\nex:s ex:p ex:o .";
    assert!(parse(data, "").is_err());

    let config = ParserConfig::default().with(ParserSetting::CaseInsensitiveDirectives, true);
    assert_eq!(parse_with_config(data, "", config)?.statements.len(), 1);
    Ok(())
}

#[test]
fn triple_terms_may_be_subjects() -> Result<(), TurtleError> {
    let collector = parse(
        "@prefix : <http://x/> .\n<< :s :p :o >> :mentions :doc .",
        "",
    )?;
    assert_eq!(
        collector.statements,
        [Triple {
            subject: Subject::Triple(Box::new(Triple {
                subject: iri("http://x/s").into(),
                predicate: iri("http://x/p"),
                object: iri("http://x/o").into(),
            })),
            predicate: iri("http://x/mentions"),
            object: iri("http://x/doc").into(),
        }]
    );
    Ok(())
}

#[test]
fn triple_terms_are_rejected_when_disabled() {
    let config = ParserConfig::default().with(ParserSetting::AcceptTurtlestar, false);
    assert!(parse_with_config(
        "@prefix : <http://x/> .\n<< :s :p :o >> :mentions :doc .",
        "",
        config,
    )
    .is_err());
}

#[test]
fn type_shortcut_requires_trailing_whitespace() -> Result<(), TurtleError> {
    let collector = parse(
        "@prefix ab: <http://e/> .\n<http://e/s> a ab:T .\n<http://e/s> ab:p <http://e/o> .",
        "",
    )?;
    assert_eq!(collector.statements[0].predicate, iri(RDF_TYPE));
    assert_eq!(collector.statements[1].predicate, iri("http://e/p"));
    Ok(())
}

#[test]
fn long_strings_keep_quotes_and_newlines() -> Result<(), TurtleError> {
    let collector = parse("<s> <p> \"\"\"a\"b\"\"c\nd\"\"\" .", "http://e/")?;
    assert_eq!(
        collector.statements,
        [Triple {
            subject: iri("http://e/s").into(),
            predicate: iri("http://e/p"),
            object: Term::Literal(Literal::Simple {
                value: "a\"b\"\"c\nd".to_owned(),
            }),
        }]
    );
    Ok(())
}

#[test]
fn empty_string_literals_parse() -> Result<(), TurtleError> {
    let collector = parse("<http://e/s> <http://e/p> \"\" .", "")?;
    assert_eq!(
        collector.statements[0].object,
        Term::Literal(Literal::Simple {
            value: String::new(),
        })
    );
    Ok(())
}

#[test]
fn string_escapes_decode() -> Result<(), TurtleError> {
    let collector = parse(
        "<http://e/s> <http://e/p> \"a\\tb\\u0041\\\\\" .",
        "",
    )?;
    assert_eq!(
        collector.statements[0].object,
        Term::Literal(Literal::Simple {
            value: "a\tbA\\".to_owned(),
        })
    );
    Ok(())
}

#[test]
fn unicode_escapes_decode_inside_iris() -> Result<(), TurtleError> {
    let collector = parse("<http://e/\\u00E9x> <http://e/p> <http://e/o> .", "")?;
    assert_eq!(
        collector.statements[0].subject,
        iri("http://e/\u{E9}x").into()
    );
    Ok(())
}

#[test]
fn language_tags_attach_to_literals() -> Result<(), TurtleError> {
    let collector = parse("<http://e/s> <http://e/p> \"hello\"@en-US .", "")?;
    assert_eq!(
        collector.statements[0].object,
        Term::Literal(Literal::LanguageTaggedString {
            value: "hello".to_owned(),
            language: "en-US".to_owned(),
        })
    );
    Ok(())
}

#[test]
fn local_names_keep_percent_triplets_and_inner_dots() -> Result<(), TurtleError> {
    let collector = parse(
        "@prefix ex: <http://e/> .\nex:s ex:p ex:val%20ue .\nex:s2 ex:p2 ex:dot.name .\nex:s3 ex:p3 ex:end.",
        "",
    )?;
    let objects: Vec<_> = collector
        .statements
        .iter()
        .map(|t| t.object.clone())
        .collect();
    assert_eq!(
        objects,
        [
            iri("http://e/val%20ue").into(),
            iri("http://e/dot.name").into(),
            iri("http://e/end").into(),
        ]
    );
    Ok(())
}

#[test]
fn incomplete_percent_triplets_are_fatal() {
    assert!(parse("@prefix ex: <http://e/> . ex:s ex:p ex:a%2x .", "").is_err());
}

#[test]
fn dot_after_integer_terminates_the_statement() -> Result<(), TurtleError> {
    let collector = parse("<s> <p> 1. <s2> <p2> 1.0 .", "http://e/")?;
    let objects: Vec<_> = collector
        .statements
        .iter()
        .map(|t| t.object.clone())
        .collect();
    assert_eq!(objects, [typed("1", XSD_INTEGER), typed("1.0", XSD_DECIMAL)]);
    Ok(())
}

#[test]
fn empty_iriref_rebinds_the_default_namespace_to_the_base() -> Result<(), TurtleError> {
    let collector = parse("@prefix : <> .\n:a :b :c .", "http://x/doc")?;
    assert_eq!(
        collector.namespaces,
        [(String::new(), "http://x/doc".to_owned())]
    );
    assert_eq!(
        collector.statements,
        [Triple {
            subject: iri("http://x/doca").into(),
            predicate: iri("http://x/docb"),
            object: iri("http://x/docc").into(),
        }]
    );
    Ok(())
}

#[test]
fn base_directive_resolves_relative_iris() -> Result<(), TurtleError> {
    let collector = parse("@base <http://b/> .\n<s> <p> <o> .", "")?;
    assert_eq!(
        collector.statements,
        [Triple {
            subject: iri("http://b/s").into(),
            predicate: iri("http://b/p"),
            object: iri("http://b/o").into(),
        }]
    );
    Ok(())
}

#[test]
fn directives_and_comments_emit_no_statements() -> Result<(), TurtleError> {
    let collector = parse("# note\n@prefix ex: <http://e/> .\n", "")?;
    assert!(collector.statements.is_empty());
    assert_eq!(collector.comments, [" note"]);
    assert_eq!(
        collector.namespaces,
        [("ex".to_owned(), "http://e/".to_owned())]
    );
    Ok(())
}

#[test]
fn comments_may_interrupt_triples() -> Result<(), TurtleError> {
    let collector = parse("<http://e/s> <http://e/p> # c\n<http://e/o> .", "")?;
    assert_eq!(collector.statements.len(), 1);
    assert_eq!(collector.comments, [" c"]);
    Ok(())
}

#[test]
fn repeated_blank_node_labels_denote_one_node() -> Result<(), TurtleError> {
    let collector = parse("_:x <http://e/p> _:x .", "")?;
    let st = &collector.statements[0];
    match (&st.subject, &st.object) {
        (Subject::BlankNode(subject), Term::BlankNode(object)) => assert_eq!(subject, object),
        other => panic!("expected blank nodes, found {other:?}"),
    }
    Ok(())
}

#[test]
fn blank_node_labels_survive_when_preserved() -> Result<(), TurtleError> {
    let config = ParserConfig::default().with(ParserSetting::PreserveBnodeIds, true);
    let collector = parse_with_config("_:x <http://e/p> _:x .", "", config)?;
    assert_eq!(
        collector.statements[0].subject,
        Subject::BlankNode(BlankNode { id: "x".to_owned() })
    );
    Ok(())
}

#[test]
fn repeated_semicolons_are_tolerated() -> Result<(), TurtleError> {
    let collector = parse(
        "<http://e/s> <http://e/p> <http://e/o> ;; <http://e/q> <http://e/r> ; .",
        "",
    )?;
    assert_eq!(collector.statements.len(), 2);
    assert_eq!(collector.statements[1].predicate, iri("http://e/q"));
    Ok(())
}

#[test]
fn object_lists_tolerate_spaces_around_commas() -> Result<(), TurtleError> {
    let collector = parse(
        "<http://e/s> <http://e/p> <http://e/a> , <http://e/b> .",
        "",
    )?;
    assert_eq!(collector.statements.len(), 2);
    Ok(())
}

#[test]
fn prefixes_looking_like_directive_keywords_still_parse() -> Result<(), TurtleError> {
    let collector = parse(
        "@prefix base: <http://e/> .\nbase:thing <http://e/p> <http://e/o> .",
        "",
    )?;
    assert_eq!(
        collector.statements[0].subject,
        iri("http://e/thing").into()
    );
    Ok(())
}

#[test]
fn diagnostics_carry_physical_line_numbers_across_crlf() {
    let error = parse("<http://e/s> <http://e/p>\r\nBAD .", "").unwrap_err();
    assert_eq!(error.line(), 2);
}

#[test]
fn eof_inside_a_collection_is_fatal() {
    let error = parse("<http://e/s> <http://e/p> (1 2", "").unwrap_err();
    assert!(matches!(error.kind(), TurtleErrorKind::PrematureEof));
}
