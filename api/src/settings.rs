//! The binary settings a parser queries while reading a document.

use std::fmt;

/// A binary parser setting.
///
/// The `VERIFY_*` settings bind the severity of recoverable diagnostics:
/// enabled means the diagnostic is fatal, disabled means it is reported as a
/// warning and parsing continues.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParserSetting {
    /// Accept miscased `@prefix`/`@base` and SPARQL-style `PREFIX`/`BASE`
    /// directives (the latter without a terminating `.`).
    CaseInsensitiveDirectives,
    /// Accept RDF-star `<< … >>` triple terms.
    AcceptTurtlestar,
    /// Escalate IRI well-formedness diagnostics to errors.
    VerifyUriSyntax,
    /// Escalate language-tag character violations.
    VerifyLanguageTags,
    /// Escalate bad escape sequences and lexical values.
    VerifyDatatypeValues,
    /// Escalate relative IRIs that cannot be resolved.
    VerifyRelativeUris,
    /// Keep blank node labels from the document instead of generating fresh
    /// identifiers, and escalate ill-formed labels.
    PreserveBnodeIds,
}

impl fmt::Display for ParserSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ParserSetting::CaseInsensitiveDirectives => "CASE_INSENSITIVE_DIRECTIVES",
            ParserSetting::AcceptTurtlestar => "ACCEPT_TURTLESTAR",
            ParserSetting::VerifyUriSyntax => "VERIFY_URI_SYNTAX",
            ParserSetting::VerifyLanguageTags => "VERIFY_LANGUAGE_TAGS",
            ParserSetting::VerifyDatatypeValues => "VERIFY_DATATYPE_VALUES",
            ParserSetting::VerifyRelativeUris => "VERIFY_RELATIVE_URIS",
            ParserSetting::PreserveBnodeIds => "PRESERVE_BNODE_IDS",
        })
    }
}

/// The setting registry a parser is configured with.
///
/// ```
/// use terrapin_api::settings::{ParserConfig, ParserSetting};
///
/// let config = ParserConfig::default().with(ParserSetting::CaseInsensitiveDirectives, true);
/// assert!(config.get(ParserSetting::CaseInsensitiveDirectives));
/// assert!(!config.get(ParserSetting::VerifyDatatypeValues));
/// ```
#[derive(Clone, Copy, Debug)]
pub struct ParserConfig {
    case_insensitive_directives: bool,
    accept_turtlestar: bool,
    verify_uri_syntax: bool,
    verify_language_tags: bool,
    verify_datatype_values: bool,
    verify_relative_uris: bool,
    preserve_bnode_ids: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            case_insensitive_directives: false,
            accept_turtlestar: true,
            verify_uri_syntax: true,
            verify_language_tags: true,
            verify_datatype_values: false,
            verify_relative_uris: true,
            preserve_bnode_ids: false,
        }
    }
}

impl ParserConfig {
    pub fn get(&self, setting: ParserSetting) -> bool {
        match setting {
            ParserSetting::CaseInsensitiveDirectives => self.case_insensitive_directives,
            ParserSetting::AcceptTurtlestar => self.accept_turtlestar,
            ParserSetting::VerifyUriSyntax => self.verify_uri_syntax,
            ParserSetting::VerifyLanguageTags => self.verify_language_tags,
            ParserSetting::VerifyDatatypeValues => self.verify_datatype_values,
            ParserSetting::VerifyRelativeUris => self.verify_relative_uris,
            ParserSetting::PreserveBnodeIds => self.preserve_bnode_ids,
        }
    }

    pub fn set(&mut self, setting: ParserSetting, enabled: bool) {
        match setting {
            ParserSetting::CaseInsensitiveDirectives => {
                self.case_insensitive_directives = enabled;
            }
            ParserSetting::AcceptTurtlestar => self.accept_turtlestar = enabled,
            ParserSetting::VerifyUriSyntax => self.verify_uri_syntax = enabled,
            ParserSetting::VerifyLanguageTags => self.verify_language_tags = enabled,
            ParserSetting::VerifyDatatypeValues => self.verify_datatype_values = enabled,
            ParserSetting::VerifyRelativeUris => self.verify_relative_uris = enabled,
            ParserSetting::PreserveBnodeIds => self.preserve_bnode_ids = enabled,
        }
    }

    #[must_use]
    pub fn with(mut self, setting: ParserSetting, enabled: bool) -> Self {
        self.set(setting, enabled);
        self
    }
}
