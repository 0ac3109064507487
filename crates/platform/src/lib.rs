#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Platform catalog and project layout for nwkit.
//!
//! This crate answers two questions for the provisioning pipeline:
//! - which remote artifact, archive format and destination belong to a platform
//! - where each platform's cache file, scratch directory and resources live
//!
//! It also carries the async filesystem helpers the pipeline stages share.

pub mod catalog;
pub mod fs;
pub mod layout;

pub use catalog::{PlatformCatalog, PlatformSpec};
pub use layout::ProjectLayout;
