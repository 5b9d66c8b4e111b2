//! Phase 5: flattens a [`Program`](crate::analyzer::Program) into the IR
//! consumed by generators (spec §4.6).
//!
//! The IR is "source-amnesiac": no [`crate::position::Range`] survives past
//! this point. Spreads are fully expanded, procs/streams are hoisted out of
//! their `rpc` blocks into flat, independently-addressable records, and
//! every list is sorted into a deterministic order so two builds of the
//! same Program produce byte-identical JSON.

mod builder;
mod types;

pub use builder::{build, json_schema};
pub use types::*;
