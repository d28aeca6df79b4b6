//! Exports the [`pre_process_site`] function, which stitches together the
//! high-level pre-processing steps: parsing pages from the source tree
//! ([`crate::parser`]) and classifying/validating each one
//! ([`crate::validate`]). The first invalid page aborts the whole run; there
//! is no per-page isolation.

use crate::config::Config;
use crate::page::Page;
use crate::parser::{Error as ParseError, Parser};
use crate::validate::{Error as ValidateError, Validator, ValidatorConfig};
use std::fmt;

/// Parses and validates every page under the configured source directory and
/// returns the mutated pages, ready for the host generator to render. Pages
/// come back sorted by id.
pub fn pre_process_site(config: &Config) -> Result<Vec<Page>> {
    let parser = Parser::new(&config.pages_source_directory);
    let mut pages = parser.parse_pages()?;

    let validator = Validator::new(ValidatorConfig {
        rfc_policy: config.rfc_policy,
        ..ValidatorConfig::default()
    });
    for page in pages.iter_mut() {
        log::debug!("pre-processing page `{}`", page.id);
        validator.pre_process_page(page)?;
    }

    Ok(pages)
}

/// The result of a fallible site pre-processing operation.
pub type Result<T> = std::result::Result<T, Error>;

/// The error type for pre-processing a site. Errors can occur while parsing
/// page sources or while validating their metadata; either kind is fatal to
/// the build.
#[derive(Debug)]
pub enum Error {
    /// Returned for errors during parsing.
    Parse(ParseError),

    /// Returned for metadata-contract violations.
    Validate(ValidateError),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Parse(err) => err.fmt(f),
            Error::Validate(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Parse(err) => Some(err),
            Error::Validate(err) => Some(err),
        }
    }
}

impl From<ParseError> for Error {
    /// Converts [`ParseError`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: ParseError) -> Error {
        Error::Parse(err)
    }
}

impl From<ValidateError> for Error {
    /// Converts [`ValidateError`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: ValidateError) -> Error {
        Error::Validate(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::env::Environment;
    use std::path::Path;

    fn fixture_config() -> Config {
        let env = Environment {
            is_draft: None,
            pages_branch: Some("main".to_owned()),
            pages_url: None,
        };
        Config::from_project_file(Path::new("./testdata/adrsite.yaml"), &env)
            .expect("loading the testdata project file")
    }

    #[test]
    fn test_pre_process_site() -> Result<()> {
        let pages = pre_process_site(&fixture_config())?;
        let ids: Vec<&str> = pages.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["about", "adr-2", "rfc-7"]);

        assert_eq!(pages[0].slug, None);
        assert_eq!(pages[1].slug.as_deref(), Some("/adr/ADR-2"));
        assert_eq!(pages[1].layout.as_deref(), Some("doc"));
        assert_eq!(pages[2].slug.as_deref(), Some("/rfc/RFC-7"));
        Ok(())
    }

    #[test]
    fn test_pre_process_site_deprecated_rfc_policy() {
        use crate::validate::RfcPolicy;

        let mut config = fixture_config();
        config.rfc_policy = RfcPolicy::Deprecated;
        match pre_process_site(&config) {
            Err(Error::Validate(ValidateError::DeprecatedFeature)) => {}
            other => panic!("expected a deprecation error: {:?}", other),
        }
    }
}
