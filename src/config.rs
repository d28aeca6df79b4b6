//! Defines the [`Config`] type: the build configuration assembled once at
//! startup from the project file (`adrsite.yaml`) and an [`Environment`]
//! snapshot, then passed by reference to whatever needs it. There is no
//! ambient global configuration state.

use crate::env::Environment;
use crate::validate::RfcPolicy;
use serde::Deserialize;
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};
use url::Url;

const PROJECT_FILE: &str = "adrsite.yaml";

/// The deserialized shape of `adrsite.yaml`. Directory fields are relative
/// to the project root (the directory containing the project file).
#[derive(Deserialize)]
struct Project {
    base_url: Url,

    #[serde(default)]
    pages_directory: Option<PathBuf>,

    #[serde(default)]
    static_directory: Option<PathBuf>,

    #[serde(default)]
    rfc_policy: RfcPolicy,
}

/// The fully derived build configuration.
pub struct Config {
    /// True for preview and local builds. Derived from the environment; see
    /// [`Environment::draft`].
    pub draft: bool,

    /// The base URL pages are published under. The project file's value,
    /// unless the environment provides a preview URL for a draft build.
    pub base_url: Url,

    /// The directory containing page source files.
    pub pages_source_directory: PathBuf,

    /// The directory containing static assets, handed to the host generator
    /// as-is. Defaults to `public/` next to the project file.
    pub static_directory: PathBuf,

    /// How pages with RFC front-matter are treated.
    pub rfc_policy: RfcPolicy,
}

impl Config {
    /// Looks for `adrsite.yaml` in `dir` or any of its parent directories
    /// and builds a [`Config`] from the first one found.
    pub fn from_directory(dir: &Path, env: &Environment) -> Result<Config> {
        let path = dir.join(PROJECT_FILE);
        if path.exists() {
            Config::from_project_file(&path, env)
        } else {
            match dir.parent() {
                Some(parent) => Config::from_directory(parent, env),
                None => Err(Error::ProjectFileNotFound),
            }
        }
    }

    pub fn from_project_file(path: &Path, env: &Environment) -> Result<Config> {
        let file = File::open(path).map_err(|err| Error::Open {
            path: path.to_owned(),
            err,
        })?;
        let project: Project = serde_yaml::from_reader(file)?;
        let project_root = path
            .parent()
            .ok_or_else(|| Error::NoParentDirectory(path.to_owned()))?;

        let base_url = match env.base_url_override() {
            Some(url) => Url::parse(url)?,
            None => project.base_url,
        };

        Ok(Config {
            draft: env.draft(),
            base_url,
            pages_source_directory: project_root.join(
                project
                    .pages_directory
                    .unwrap_or_else(|| PathBuf::from("pages")),
            ),
            static_directory: project_root.join(
                project
                    .static_directory
                    .unwrap_or_else(|| PathBuf::from("public")),
            ),
            rfc_policy: project.rfc_policy,
        })
    }
}

/// The result of a fallible configuration-loading operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error assembling the build configuration.
#[derive(Debug)]
pub enum Error {
    /// Returned when no `adrsite.yaml` exists in the starting directory or
    /// any of its parents.
    ProjectFileNotFound,

    /// Returned when the provided project file path has no parent directory
    /// to resolve relative paths against.
    NoParentDirectory(PathBuf),

    /// Returned for I/O problems opening the project file.
    Open { path: PathBuf, err: std::io::Error },

    /// Returned when there was an error parsing the project file as YAML.
    DeserializeYaml(serde_yaml::Error),

    /// Returned when the environment's preview URL isn't a valid URL.
    UrlParse(url::ParseError),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::ProjectFileNotFound => write!(
                f,
                "Could not find `{}` in any parent directory",
                PROJECT_FILE
            ),
            Error::NoParentDirectory(path) => write!(
                f,
                "Can't get parent directory for provided project file path '{}'",
                path.display()
            ),
            Error::Open { path, err } => {
                write!(f, "Opening project file `{}`: {}", path.display(), err)
            }
            Error::DeserializeYaml(err) => err.fmt(f),
            Error::UrlParse(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::ProjectFileNotFound => None,
            Error::NoParentDirectory(_) => None,
            Error::Open { path: _, err } => Some(err),
            Error::DeserializeYaml(err) => Some(err),
            Error::UrlParse(err) => Some(err),
        }
    }
}

impl From<serde_yaml::Error> for Error {
    /// Converts a [`serde_yaml::Error`] into an [`Error`]. It allows us to
    /// use the `?` operator when deserializing the project file.
    fn from(err: serde_yaml::Error) -> Error {
        Error::DeserializeYaml(err)
    }
}

impl From<url::ParseError> for Error {
    /// Converts a [`url::ParseError`] into an [`Error`]. It allows us to use
    /// the `?` operator when parsing the preview URL.
    fn from(err: url::ParseError) -> Error {
        Error::UrlParse(err)
    }
}
