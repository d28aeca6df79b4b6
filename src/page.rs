//! Defines the [`Page`] and [`Frontmatter`] types. A page's front-matter is
//! classified exactly once, at parse time, into a closed shape; the validator
//! in [`crate::validate`] then matches on that shape instead of probing
//! optional keys repeatedly.

use serde_yaml::{Mapping, Value};
use std::path::PathBuf;

/// A single source document, parsed but not yet rendered. The host generator
/// constructs pages through [`crate::parser::Parser`], hands them to the
/// validator, and renders whatever comes back.
#[derive(Clone, Debug)]
pub struct Page {
    /// The page's identifier: its source path relative to the pages
    /// directory, less the extension.
    pub id: String,

    /// The source file the page was parsed from.
    pub source_path: PathBuf,

    /// The classified front-matter. See [`Frontmatter`].
    pub frontmatter: Frontmatter,

    /// The raw front-matter mapping. The renderer consumes this directly, so
    /// layout overrides are written back into it as well as onto the page.
    pub raw: Mapping,

    /// The unrendered markdown body.
    pub body: String,

    /// The canonical relative URL path, set by the validator for ADR and RFC
    /// pages and left untouched otherwise.
    pub slug: Option<String>,

    /// The display-template identifier, set to `doc` for ADR pages.
    pub layout: Option<String>,
}

/// The classification of a page's front-matter. A page is at most one of
/// ADR or RFC; when both identifier fields are present, ADR wins.
#[derive(Clone, Debug)]
pub enum Frontmatter {
    /// Neither an `adr` nor an `rfc` identifier field is present.
    Untyped,

    /// The front-matter carries an `adr` identifier.
    Adr(AdrMetadata),

    /// The front-matter carries an `rfc` identifier (and no `adr`).
    Rfc(RfcMetadata),
}

/// The metadata fields the validator cares about on an ADR page. All fields
/// other than the identifier may be absent; presence checks happen in the
/// validator so that the error can name the ADR.
#[derive(Clone, Debug)]
pub struct AdrMetadata {
    pub id: String,
    pub status: Option<String>,
    pub doc_type: Option<String>,
    pub license: Option<String>,
}

#[derive(Clone, Debug)]
pub struct RfcMetadata {
    pub id: String,
}

impl Frontmatter {
    /// Classifies a raw front-matter mapping. Identifier fields may be YAML
    /// strings or numbers; numbers are rendered to their decimal form so that
    /// `adr: 2` and `adr: "2"` produce the same slug.
    pub fn classify(raw: &Mapping) -> Frontmatter {
        if let Some(id) = scalar_string(raw, "adr") {
            Frontmatter::Adr(AdrMetadata {
                id,
                status: scalar_string(raw, "status"),
                doc_type: scalar_string(raw, "type"),
                license: scalar_string(raw, "spdx-license"),
            })
        } else if let Some(id) = scalar_string(raw, "rfc") {
            Frontmatter::Rfc(RfcMetadata { id })
        } else {
            Frontmatter::Untyped
        }
    }
}

fn scalar_string(raw: &Mapping, key: &str) -> Option<String> {
    match raw.get(&Value::String(key.to_owned()))? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn mapping(yaml: &str) -> Mapping {
        let value: Value = serde_yaml::from_str(yaml).unwrap();
        match value {
            Value::Mapping(m) => m,
            other => panic!("fixture front-matter must be a mapping: {:?}", other),
        }
    }

    #[test]
    fn test_classify_adr() {
        match Frontmatter::classify(&mapping("adr: 2\nstatus: ACCEPTED")) {
            Frontmatter::Adr(adr) => {
                assert_eq!(adr.id, "2");
                assert_eq!(adr.status.as_deref(), Some("ACCEPTED"));
                assert_eq!(adr.doc_type, None);
                assert_eq!(adr.license, None);
            }
            other => panic!("expected ADR classification: {:?}", other),
        }
    }

    #[test]
    fn test_classify_adr_string_id() {
        match Frontmatter::classify(&mapping("adr: \"17\"")) {
            Frontmatter::Adr(adr) => assert_eq!(adr.id, "17"),
            other => panic!("expected ADR classification: {:?}", other),
        }
    }

    #[test]
    fn test_classify_rfc() {
        match Frontmatter::classify(&mapping("rfc: 7")) {
            Frontmatter::Rfc(rfc) => assert_eq!(rfc.id, "7"),
            other => panic!("expected RFC classification: {:?}", other),
        }
    }

    #[test]
    fn test_classify_adr_wins_over_rfc() {
        match Frontmatter::classify(&mapping("adr: 2\nrfc: 7")) {
            Frontmatter::Adr(adr) => assert_eq!(adr.id, "2"),
            other => panic!("expected ADR classification: {:?}", other),
        }
    }

    #[test]
    fn test_classify_untyped() {
        match Frontmatter::classify(&mapping("title: About")) {
            Frontmatter::Untyped => {}
            other => panic!("expected untyped classification: {:?}", other),
        }
    }
}
