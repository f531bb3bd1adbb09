//! Flutter-facing bridge over `cycletrack_core`.

pub mod api;
