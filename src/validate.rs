//! Defines the [`Validator`] type, which enforces the metadata contract for
//! ADR and RFC pages and derives their canonical URL slugs. Every failure is
//! fatal to the enclosing build; there is no per-page recovery.

use crate::page::{AdrMetadata, Frontmatter, Page, RfcMetadata};
use serde::Deserialize;
use serde_yaml::Value;
use std::fmt;

/// The accepted lifecycle statuses for an ADR, in the order they appear in
/// error messages.
pub const VALID_STATUSES: [&str; 4] =
    ["PROPOSED", "ACCEPTED", "DEPRECATED", "SUPERSEDED"];

/// The status set used before the lifecycle was reworked. Sites that haven't
/// migrated their documents can configure the validator with this set
/// instead.
pub const LEGACY_STATUSES: [&str; 7] = [
    "Draft",
    "Review",
    "LastCall",
    "Final",
    "Stagnant",
    "Withdrawn",
    "Living",
];

/// The accepted `type` classifications for an ADR, in error-message order.
pub const VALID_TYPES: [&str; 3] = ["RFC", "Standards Track", "Meta"];

/// The only license ADR documents may declare.
pub const REQUIRED_LICENSE: &str = "CC0-1.0";

const DOC_LAYOUT: &str = "doc";

/// How pages with RFC front-matter are treated. RFCs were superseded by ADRs
/// (see ADR-1), but some sites still publish the old documents read-only, so
/// both behaviors remain selectable.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum RfcPolicy {
    /// Reject RFC pages outright with a deprecation error.
    Deprecated,

    /// Assign RFC pages a slug and perform no further validation.
    Unchecked,
}

impl Default for RfcPolicy {
    fn default() -> Self {
        RfcPolicy::Unchecked
    }
}

/// Bundled configuration for a [`Validator`]. The valid sets are ordered
/// lists rather than hash sets so that the error text listing them is stable.
#[derive(Clone, Debug)]
pub struct ValidatorConfig {
    pub valid_statuses: Vec<String>,
    pub valid_types: Vec<String>,
    pub required_license: String,
    pub rfc_policy: RfcPolicy,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        ValidatorConfig {
            valid_statuses: VALID_STATUSES.iter().map(|s| s.to_string()).collect(),
            valid_types: VALID_TYPES.iter().map(|s| s.to_string()).collect(),
            required_license: REQUIRED_LICENSE.to_owned(),
            rfc_policy: RfcPolicy::default(),
        }
    }
}

/// Classifies pages and enforces the metadata rules described in the crate
/// docs. Mutates pages in place; holds no per-page state.
pub struct Validator {
    config: ValidatorConfig,
}

impl Validator {
    pub fn new(config: ValidatorConfig) -> Validator {
        Validator { config }
    }

    /// The pre-processing hook. Derives the page's slug and layout from its
    /// classified front-matter and validates ADR metadata. Untyped pages pass
    /// through unmodified.
    pub fn pre_process_page(&self, page: &mut Page) -> Result<()> {
        match page.frontmatter.clone() {
            Frontmatter::Adr(adr) => self.pre_process_adr(page, &adr),
            Frontmatter::Rfc(rfc) => self.pre_process_rfc(page, &rfc),
            Frontmatter::Untyped => Ok(()),
        }
    }

    fn pre_process_adr(&self, page: &mut Page, adr: &AdrMetadata) -> Result<()> {
        page.slug = Some(format!("/adr/ADR-{}", adr.id));

        // The layout override goes onto the page and back into the raw
        // front-matter, since the renderer reads both.
        page.layout = Some(DOC_LAYOUT.to_owned());
        page.raw.insert(
            Value::String("layout".to_owned()),
            Value::String(DOC_LAYOUT.to_owned()),
        );

        if let Some(license) = &adr.license {
            if license != &self.config.required_license {
                return Err(Error::LicenseViolation {
                    id: adr.id.clone(),
                    license: license.clone(),
                });
            }
        }

        // `type` before `status`: if both are bad, the error names `type`.
        check_field(adr, "type", adr.doc_type.as_deref(), &self.config.valid_types)?;
        check_field(adr, "status", adr.status.as_deref(), &self.config.valid_statuses)?;
        Ok(())
    }

    fn pre_process_rfc(&self, page: &mut Page, rfc: &RfcMetadata) -> Result<()> {
        match self.config.rfc_policy {
            RfcPolicy::Deprecated => {
                log::error!("rejecting deprecated RFC page: {:?}", page);
                Err(Error::DeprecatedFeature)
            }
            RfcPolicy::Unchecked => {
                page.slug = Some(format!("/rfc/RFC-{}", rfc.id));
                Ok(())
            }
        }
    }
}

fn check_field(
    adr: &AdrMetadata,
    field: &'static str,
    value: Option<&str>,
    valid: &[String],
) -> Result<()> {
    match value {
        None => Err(Error::MissingField {
            id: adr.id.clone(),
            field,
        }),
        Some(value) if !valid.iter().any(|v| v == value) => {
            Err(Error::InvalidEnum {
                id: adr.id.clone(),
                field,
                value: value.to_owned(),
                valid: valid.join(","),
            })
        }
        Some(_) => Ok(()),
    }
}

/// The result of a fallible validation operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents a metadata-contract violation. Every variant is fatal to the
/// build that raised it.
#[derive(Debug)]
pub enum Error {
    /// Returned when an RFC page is encountered under
    /// [`RfcPolicy::Deprecated`].
    DeprecatedFeature,

    /// Returned when an ADR declares a license other than
    /// [`REQUIRED_LICENSE`].
    LicenseViolation { id: String, license: String },

    /// Returned when a required field is absent from an ADR's front-matter.
    MissingField { id: String, field: &'static str },

    /// Returned when a field is present but not a member of its valid set.
    /// `valid` is the comma-joined set, in configured order.
    InvalidEnum {
        id: String,
        field: &'static str,
        value: String,
        valid: String,
    },
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as the message the build process halts with.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::DeprecatedFeature => {
                write!(f, "RFCs are deprecated, please upgrade. More info in ADR-1")
            }
            Error::LicenseViolation { id, license } => {
                write!(f, "ADR-{} has invalid license: {}", id, license)
            }
            Error::MissingField { id, field } => {
                write!(f, "ADR-{} has no `{}`", id, field)
            }
            Error::InvalidEnum {
                id,
                field,
                value,
                valid,
            } => write!(
                f,
                "ADR-{} has invalid `{}: {}`, valid values are: {}",
                id, field, value, valid
            ),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::path::PathBuf;

    fn page(yaml: &str) -> Page {
        let value: Value = serde_yaml::from_str(yaml).unwrap();
        let raw = match value {
            Value::Mapping(m) => m,
            other => panic!("fixture front-matter must be a mapping: {:?}", other),
        };
        Page {
            id: "fixture".to_owned(),
            source_path: PathBuf::from("fixture.md"),
            frontmatter: Frontmatter::classify(&raw),
            raw,
            body: String::new(),
            slug: None,
            layout: None,
        }
    }

    fn validator() -> Validator {
        Validator::new(ValidatorConfig::default())
    }

    #[test]
    fn test_adr_slug_and_layout() -> Result<()> {
        let mut page = page("adr: 2\ntype: Meta\nstatus: ACCEPTED");
        validator().pre_process_page(&mut page)?;
        assert_eq!(page.slug.as_deref(), Some("/adr/ADR-2"));
        assert_eq!(page.layout.as_deref(), Some("doc"));
        assert_eq!(
            page.raw.get(&Value::String("layout".to_owned())),
            Some(&Value::String("doc".to_owned())),
        );
        Ok(())
    }

    #[test]
    fn test_adr_accepts_required_license() -> Result<()> {
        let mut page = page(
            "adr: 2\ntype: Meta\nstatus: ACCEPTED\nspdx-license: CC0-1.0",
        );
        validator().pre_process_page(&mut page)?;
        Ok(())
    }

    #[test]
    fn test_adr_license_violation() {
        let mut page =
            page("adr: 2\ntype: Meta\nstatus: ACCEPTED\nspdx-license: MIT");
        match validator().pre_process_page(&mut page) {
            Err(Error::LicenseViolation { id, license }) => {
                assert_eq!(id, "2");
                assert_eq!(license, "MIT");
            }
            other => panic!("expected a license violation: {:?}", other),
        }
    }

    #[test]
    fn test_adr_missing_type_checked_before_status() {
        // `status` is also invalid; the error must still name `type`.
        let mut page = page("adr: 3\nstatus: BOGUS");
        match validator().pre_process_page(&mut page) {
            Err(Error::MissingField { id, field }) => {
                assert_eq!(id, "3");
                assert_eq!(field, "type");
            }
            other => panic!("expected a missing `type`: {:?}", other),
        }
    }

    #[test]
    fn test_adr_missing_status() {
        let mut page = page("adr: 3\ntype: Meta");
        match validator().pre_process_page(&mut page) {
            Err(Error::MissingField { id, field }) => {
                assert_eq!(id, "3");
                assert_eq!(field, "status");
            }
            other => panic!("expected a missing `status`: {:?}", other),
        }
    }

    #[test]
    fn test_adr_invalid_status_lists_valid_set() {
        let mut page = page("adr: 4\ntype: Meta\nstatus: INVALID_STATUS");
        match validator().pre_process_page(&mut page) {
            Err(Error::InvalidEnum {
                id,
                field,
                value,
                valid,
            }) => {
                assert_eq!(id, "4");
                assert_eq!(field, "status");
                assert_eq!(value, "INVALID_STATUS");
                assert_eq!(valid, "PROPOSED,ACCEPTED,DEPRECATED,SUPERSEDED");
            }
            other => panic!("expected an invalid `status`: {:?}", other),
        }
    }

    #[test]
    fn test_adr_invalid_type_lists_valid_set() {
        let mut page = page("adr: 4\ntype: Informational\nstatus: ACCEPTED");
        match validator().pre_process_page(&mut page) {
            Err(Error::InvalidEnum { field, valid, .. }) => {
                assert_eq!(field, "type");
                assert_eq!(valid, "RFC,Standards Track,Meta");
            }
            other => panic!("expected an invalid `type`: {:?}", other),
        }
    }

    #[test]
    fn test_adr_invalid_type_checked_before_invalid_status() {
        let mut page = page("adr: 9\ntype: Bogus\nstatus: Bogus");
        match validator().pre_process_page(&mut page) {
            Err(Error::InvalidEnum { field, .. }) => assert_eq!(field, "type"),
            other => panic!("expected an invalid `type`: {:?}", other),
        }
    }

    #[test]
    fn test_legacy_status_set() -> Result<()> {
        let validator = Validator::new(ValidatorConfig {
            valid_statuses: LEGACY_STATUSES.iter().map(|s| s.to_string()).collect(),
            ..ValidatorConfig::default()
        });

        let mut page = page("adr: 5\ntype: Meta\nstatus: LastCall");
        validator.pre_process_page(&mut page)?;

        let mut page = self::page("adr: 5\ntype: Meta\nstatus: ACCEPTED");
        match validator.pre_process_page(&mut page) {
            Err(Error::InvalidEnum { valid, .. }) => assert_eq!(
                valid,
                "Draft,Review,LastCall,Final,Stagnant,Withdrawn,Living"
            ),
            other => panic!("expected an invalid `status`: {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn test_rfc_deprecated_policy() {
        let validator = Validator::new(ValidatorConfig {
            rfc_policy: RfcPolicy::Deprecated,
            ..ValidatorConfig::default()
        });
        let mut page = page("rfc: 7");
        match validator.pre_process_page(&mut page) {
            Err(err @ Error::DeprecatedFeature) => {
                assert!(err.to_string().contains("ADR-1"));
            }
            other => panic!("expected a deprecation error: {:?}", other),
        }
    }

    #[test]
    fn test_rfc_unchecked_policy() -> Result<()> {
        // Even a bogus status passes; RFC pages get no field validation.
        let mut page = page("rfc: 7\nstatus: BOGUS");
        validator().pre_process_page(&mut page)?;
        assert_eq!(page.slug.as_deref(), Some("/rfc/RFC-7"));
        assert_eq!(page.layout, None);
        Ok(())
    }

    #[test]
    fn test_untyped_page_passes_through() -> Result<()> {
        let mut page = page("title: About");
        validator().pre_process_page(&mut page)?;
        assert_eq!(page.slug, None);
        assert_eq!(page.layout, None);
        assert_eq!(page.raw.get(&Value::String("layout".to_owned())), None);
        Ok(())
    }
}
