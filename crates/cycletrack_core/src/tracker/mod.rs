//! Period tracking engine.
//!
//! # Responsibility
//! - Hold the in-memory period sequence (`store`).
//! - Turn date picks into store instructions (`selection`).
//! - Derive cycle statistics from stored periods (`prediction`).
//!
//! # Invariants
//! - Nothing in this module performs I/O; persistence is driven by callers.
//! - Derived values are recomputed from the store on every call.

pub mod prediction;
pub mod selection;
pub mod store;
