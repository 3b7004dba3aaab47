//! # Mapsync Protocol
//!
//! Wire types and JSON codecs for the Mapsync incident sync protocol.
//!
//! This crate provides:
//! - Domain records (`Category`, `Location`, `Incident`)
//! - Task descriptions (`SyncTask`, `TaskKind`, `Resource`)
//! - Pull payload decoding (`decode_pull_payload`)
//! - Incident submission formatting and response decoding
//!
//! This is a pure protocol crate with no I/O operations.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod payload;
mod record;
mod submit;
mod task;

pub use error::{ProtocolError, ProtocolResult};
pub use payload::{decode_pull_payload, PullRecords};
pub use record::{Category, Incident, Location};
pub use submit::{
    decode_submit_response, format_submit_body, SubmitStatus, SUBMIT_TEMPLATE,
};
pub use task::{Resource, SyncTask, TaskKind};
