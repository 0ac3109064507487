#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Network operations for nwkit
//!
//! Retrieves platform archives from the remote artifact store into the local
//! cache. A fetch is a single attempt: no retries, no resume.

mod client;
mod fetch;
mod validation;

pub use client::{NetClient, NetConfig};
pub use fetch::{ArtifactFetcher, FetchOutcome};
pub use validation::{content_type_essence, validate_url};
