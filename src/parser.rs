//! Defines the [`Parser`] and [`Error`] types, plus the logic for parsing
//! [`Page`] objects from the file system into memory. Front-matter is fenced
//! YAML; classification into ADR/RFC/untyped happens here, once, via
//! [`Frontmatter::classify`].

use crate::page::{Frontmatter, Page};
use serde_yaml::Value;
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Parses [`Page`] objects from source files.
pub struct Parser<'a> {
    /// The directory containing page source files. Page ids are paths
    /// relative to this directory, less the `.md` extension.
    source_directory: &'a Path,
}

impl<'a> Parser<'a> {
    pub fn new(source_directory: &'a Path) -> Parser<'a> {
        Parser { source_directory }
    }

    /// Walks the source directory for page files (extension = `.md`) and
    /// returns a list of [`Page`] objects sorted by id. Each page file must
    /// be structured as follows:
    ///
    /// 1. Initial front-matter fence (`---`)
    /// 2. YAML front-matter mapping
    /// 3. Terminal front-matter fence (`---`)
    /// 4. Page body
    ///
    /// For example:
    ///
    /// ```md
    /// ---
    /// adr: 2
    /// type: Meta
    /// status: ACCEPTED
    /// ---
    /// # Use a monorepo
    /// ```
    pub fn parse_pages(&self) -> Result<Vec<Page>> {
        const MARKDOWN_EXTENSION: &str = "md";

        let mut pages = Vec::new();
        for result in WalkDir::new(self.source_directory) {
            let entry = result?;
            if entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .map_or(false, |ext| ext == MARKDOWN_EXTENSION)
            {
                pages.push(self.parse_page(entry.path())?);
            }
        }

        pages.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(pages)
    }

    fn parse_page(&self, path: &Path) -> Result<Page> {
        match self._parse_page(path) {
            Ok(p) => Ok(p),
            Err(e) => Err(Error::Annotated(
                format!("parsing page `{:?}`", path),
                Box::new(e),
            )),
        }
    }

    fn _parse_page(&self, path: &Path) -> Result<Page> {
        use std::io::Read;
        let mut contents = String::new();
        File::open(path)?.read_to_string(&mut contents)?;

        let relative = path.strip_prefix(self.source_directory).unwrap_or(path);
        let id = relative
            .with_extension("")
            .to_str()
            .ok_or_else(|| Error::InvalidFileName(path.to_owned()))?
            .to_owned();

        self.parse_source(id, path, &contents)
    }

    /// Parses a single [`Page`] from its `id` and source text. Exposed
    /// separately from the file-reading path so the parse rules can be
    /// exercised without fixture files.
    pub fn parse_source(&self, id: String, path: &Path, input: &str) -> Result<Page> {
        const FENCE: &str = "---";

        if !input.starts_with(FENCE) {
            log::error!("page `{}` has no front-matter block: {:?}", id, path);
            return Err(Error::MissingMetadata(id));
        }
        let (yaml_start, yaml_stop, body_start) =
            match input[FENCE.len()..].find(FENCE) {
                None => return Err(Error::FrontmatterMissingEndFence),
                Some(offset) => (
                    FENCE.len(),                        // yaml_start
                    FENCE.len() + offset,               // yaml_stop
                    FENCE.len() + offset + FENCE.len(), // body_start
                ),
            };

        let value: Value = serde_yaml::from_str(&input[yaml_start..yaml_stop])?;
        let raw = match value {
            Value::Mapping(m) => m,
            other => {
                log::error!(
                    "page `{}` front-matter is not a mapping: {:?}",
                    id,
                    other
                );
                return Err(Error::MissingMetadata(id));
            }
        };

        Ok(Page {
            frontmatter: Frontmatter::classify(&raw),
            raw,
            id,
            source_path: path.to_owned(),
            body: input[body_start..].to_owned(),
            slug: None,
            layout: None,
        })
    }
}

/// Represents the result of a [`Page`]-parse operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error parsing a [`Page`] object.
#[derive(Debug)]
pub enum Error {
    /// Returned when a page source has no front-matter mapping at all:
    /// either no opening fence, or a fenced block that isn't a YAML mapping.
    /// The offending page is logged before this is raised.
    MissingMetadata(String),

    /// Returned when the starting fence was found but the ending one was
    /// missing.
    FrontmatterMissingEndFence,

    /// Returned when there was an error parsing the front-matter as YAML.
    DeserializeYaml(serde_yaml::Error),

    /// Returned when a source file name isn't valid UTF-8.
    InvalidFileName(PathBuf),

    /// Returned for WalkDir I/O errors.
    WalkDir(walkdir::Error),

    /// Returned for other I/O errors.
    Io(std::io::Error),

    /// An error with an annotation naming the source file.
    Annotated(String, Box<Error>),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::MissingMetadata(id) => {
                write!(f, "page `{}` has no front-matter metadata", id)
            }
            Error::FrontmatterMissingEndFence => {
                write!(f, "Missing closing `---`")
            }
            Error::DeserializeYaml(err) => err.fmt(f),
            Error::InvalidFileName(path) => {
                write!(f, "invalid file name: {:?}", path)
            }
            Error::WalkDir(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
            Error::Annotated(annotation, err) => {
                write!(f, "{}: {}", &annotation, err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::MissingMetadata(_) => None,
            Error::FrontmatterMissingEndFence => None,
            Error::DeserializeYaml(err) => Some(err),
            Error::InvalidFileName(_) => None,
            Error::WalkDir(err) => Some(err),
            Error::Io(err) => Some(err),
            Error::Annotated(_, err) => Some(err),
        }
    }
}

impl From<serde_yaml::Error> for Error {
    /// Converts a [`serde_yaml::Error`] into an [`Error`]. It allows us to
    /// use the `?` operator for [`serde_yaml`] deserialization functions.
    fn from(err: serde_yaml::Error) -> Error {
        Error::DeserializeYaml(err)
    }
}

impl From<walkdir::Error> for Error {
    /// Converts a [`walkdir::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator when walking the source directory.
    fn from(err: walkdir::Error) -> Error {
        Error::WalkDir(err)
    }
}

impl From<std::io::Error> for Error {
    /// Converts a [`std::io::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator for fallible I/O functions.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}
