//! # Mapsync Sync Engine
//!
//! Single-worker synchronization engine for a remote mapping-incident
//! service speaking HTTP+JSON.
//!
//! This crate provides:
//! - Bounded FIFO task queue (capacity 10)
//! - Worker loop draining the queue one task at a time
//! - Pull execution (single and fan-out) with payload ingestion
//! - Push execution posting pending incidents one by one
//! - HTTP client abstraction with a reqwest implementation
//! - Coordinator abstraction over local storage callbacks
//!
//! ## Architecture
//!
//! The engine is strictly sequential: one dedicated worker thread
//! processes tasks in FIFO order, at most one task in flight, and stops
//! once the queue is drained. The coordinator owns all persistence; the
//! engine only constructs records transiently and hands them over.
//!
//! ## Key invariants
//!
//! - Tasks start execution in enqueue order
//! - A task's kind selects exactly one of the pull/push branches
//! - Every decoded record is forwarded exactly once per successful parse
//! - Exactly one of posted/failed fires per submitted incident
//! - No per-call failure ever stops the drain loop

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod coordinator;
mod error;
mod http;
mod queue;
mod worker;

pub use config::SyncConfig;
pub use coordinator::{MemoryCoordinator, SyncCoordinator};
pub use error::{SyncError, SyncResult};
pub use http::{HttpClient, MockHttpClient, MockRequest, ReqwestClient};
pub use queue::{TaskQueue, QUEUE_CAPACITY};
pub use worker::{SyncStats, SyncWorker};
