//! Persistence collaborator contracts and implementations.
//!
//! # Responsibility
//! - Define the named-blob storage contract the tracker persists through.
//! - Keep SQLite details out of tracker and service code.
//!
//! # Invariants
//! - Repositories store blob text verbatim; decoding belongs to callers.

pub mod blob_repo;
