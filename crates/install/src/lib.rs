#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Runtime provisioning for nwkit
//!
//! Drives each selected platform through fetch, extract and assemble. Every
//! platform runs in its own task; a failure in one never stops the others,
//! and [`ProvisioningOrchestrator::provision`] returns only after all of them
//! have settled.

mod assemble;
mod extract;
mod orchestrator;
mod pipeline;

pub use assemble::{AssembleOutcome, AssetAssembler};
pub use extract::{ArchiveExtractor, ExtractOutcome, ExtractStrategy, ZipStrategy};
pub use orchestrator::{CleanupPolicy, ProvisioningOrchestrator};
pub use pipeline::PlatformPipeline;
