//! Persistence for the classroom simulator
//!
//! State lives in four JSON documents (users, businesses, transactions,
//! market). A mutation that spans several documents is written as one
//! commit: the rendered documents are first recorded in a checksummed
//! journal, then swapped in one by one, so a crash mid-way is repaired on
//! the next open instead of leaving the documents disagreeing.
//!
//! # Modules
//! - `dataset`: in-memory documents and change sets
//! - `store`: the `Store` trait and its error type
//! - `journal`: commit journal with CRC32C checksums
//! - `json_store`: file-backed store
//! - `memory_store`: in-memory store for tests
//! - `seed`: first-boot default users and market
//! - `backup`: timestamped copies taken before a reset

pub mod dataset;
pub mod store;
pub mod journal;
pub mod json_store;
pub mod memory_store;
pub mod seed;
pub mod backup;

pub use dataset::{ChangeSet, Dataset, Document};
pub use json_store::JsonFileStore;
pub use memory_store::MemoryStore;
pub use store::{BackupInfo, Store, StoreError};
