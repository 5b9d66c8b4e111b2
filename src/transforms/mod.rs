//! Phase 6b: pure AST-to-AST transforms used by the playground and LSP
//! (spec §4.8). All three are total functions over already-parsed ASTs —
//! none of them touch the VFS or re-parse anything.

mod expand;
mod extract;
mod merge;

pub use expand::expand;
pub use extract::{extract, Target};
pub use merge::merge;
