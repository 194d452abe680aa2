//! Filesystem-facing core: path classification, input/output mapping
//! resolution, and atomic output writes.

pub mod helpers;
pub mod mapping;
pub mod stat;
