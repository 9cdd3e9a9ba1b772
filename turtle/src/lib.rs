//! Implementation of a streaming [Turtle](https://www.w3.org/TR/turtle/) and [Turtle-star](https://w3c.github.io/rdf-star/cg-spec/#turtle-star) parser.
//!
//! The parser works in streaming from a `BufRead` implementation and pushes
//! namespace, comment and statement events to an
//! [`RdfHandler`](terrapin_api::handler::RdfHandler) as their terminating
//! syntax is consumed. It is not protected against memory overflows: a
//! literal string of 16GB in the parsed content will allocate 16GB of memory.
//!
//! How to read a Turtle document and count the number of `rdf:type` triples:
//! ```
//! use terrapin_api::handler::StatementCollector;
//! use terrapin_turtle::TurtleParser;
//!
//! let file = b"@prefix schema: <http://schema.org/> .
//! <http://example.com/foo> a schema:Person ;
//!     schema:name \"Foo\" .
//! <http://example.com/bar> a schema:Person ;
//!     schema:name \"Bar\" .";
//!
//! let rdf_type = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
//! let mut collector = StatementCollector::default();
//! TurtleParser::new(file.as_ref(), "")?.parse(&mut collector)?;
//! let count = collector
//!     .statements
//!     .iter()
//!     .filter(|t| t.predicate.iri == rdf_type)
//!     .count();
//! assert_eq!(2, count);
//! # Result::<_, terrapin_turtle::TurtleError>::Ok(())
//! ```
#![deny(
    future_incompatible,
    nonstandard_style,
    rust_2018_idioms,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unused_qualifications
)]

mod error;
mod line_buffer;
mod shared;
mod turtle;

pub use error::TurtleError;
pub use error::TurtleErrorKind;
pub use turtle::TurtleParser;
