//! Defines the [`Environment`] type, a snapshot of the deployment-related
//! process environment variables. The snapshot is captured once at startup
//! and passed to [`crate::config::Config`]; nothing else in the crate reads
//! `std::env` directly, which keeps the derivation rules testable.

/// A snapshot of the environment variables that drive build-mode detection.
/// `CF_PAGES_BRANCH` and `CF_PAGES_URL` are injected by the deployment
/// platform; `IS_DRAFT` is a manual override for local builds.
#[derive(Clone, Debug)]
pub struct Environment {
    pub is_draft: Option<String>,
    pub pages_branch: Option<String>,
    pub pages_url: Option<String>,
}

impl Environment {
    /// Captures the snapshot from the real process environment.
    pub fn capture() -> Environment {
        Environment {
            is_draft: std::env::var("IS_DRAFT").ok(),
            pages_branch: std::env::var("CF_PAGES_BRANCH").ok(),
            pages_url: std::env::var("CF_PAGES_URL").ok(),
        }
    }

    /// A build is a draft unless it is produced from the `main` deployment
    /// branch without an explicit draft override. An absent branch variable
    /// means a local build, which is always a draft.
    pub fn draft(&self) -> bool {
        let forced = match &self.is_draft {
            Some(value) => !value.is_empty(),
            None => false,
        };
        forced || self.pages_branch.as_deref() != Some("main")
    }

    /// The deployment preview URL, if it should replace the configured base
    /// URL. Production builds keep their configured base URL even when the
    /// platform provides one.
    pub fn base_url_override(&self) -> Option<&str> {
        if self.draft() {
            self.pages_url.as_deref()
        } else {
            None
        }
    }
}
