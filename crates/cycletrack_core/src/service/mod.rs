//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate selection, store mutation and persistence.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod tracker_service;
