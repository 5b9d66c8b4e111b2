//! Crate-level error type for internal/programmer-facing invariant
//! violations (spec §7 "Fatal"; SPEC_FULL §A.1).
//!
//! User-input problems (a bad schema, a missing include, an undeclared
//! type) are never represented here — they surface as
//! [`crate::diagnostics::Diagnostic`] values returned alongside a
//! best-effort result. `VdlError` exists for the much smaller set of
//! things that should never happen given valid inputs to the API itself.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VdlError {
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),
    #[error(transparent)]
    Vfs(#[from] crate::vfs::VfsError),
}
