//! The library code for the `adrsite` documentation-site pre-processor. The
//! architecture can be broken down into three distinct steps:
//!
//! 1. Deriving the build configuration from the process environment and the
//!    project file ([`crate::env`], [`crate::config`])
//! 2. Parsing pages and their front-matter from source files on disk
//!    ([`crate::parser`])
//! 3. Classifying and validating each page's metadata, deriving its canonical
//!    URL slug along the way ([`crate::validate`])
//!
//! Of the three, the third step carries the interesting rules. Pages are
//! classified as ADR (architecture decision record), RFC, or untyped based on
//! which identifier field their front-matter carries. ADR pages get a
//! `/adr/ADR-{id}` slug, a `doc` layout override, and strict checks on their
//! `spdx-license`, `type`, and `status` fields. RFC pages are either rejected
//! as deprecated or accepted unchecked, depending on policy. Untyped pages
//! pass through untouched.
//!
//! Rendering the validated pages is out of scope; that's the host site
//! generator's job. [`crate::build::pre_process_site`] stitches the steps
//! together and hands the validated pages back.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod build;
pub mod config;
pub mod env;
pub mod page;
pub mod parser;
pub mod validate;
