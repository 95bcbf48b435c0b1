//! Adapter implementations that handle I/O
//!
//! - `mbox/` - Streaming mbox splitting
//! - `git/` - The target repository (`PatchTarget` over git)

pub mod git;
pub mod mbox;
