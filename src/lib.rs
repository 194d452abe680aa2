//! Backport modern JavaScript for older runtimes.
//!
//! The pipeline has three parts: a blacklist of transformation rules the
//! target runtime no longer needs (version table or empirical probing), a
//! mapping resolver that turns an input spec and an output path into
//! (input, output) file pairs, and a transpile stage that pipes each pair
//! through an external transformer.

pub mod blacklist;
pub mod cli;
pub mod fs_op;
pub mod transform;
pub mod transpile;

pub use crate::blacklist::{BlacklistCache, FeatureTable};
pub use crate::fs_op::mapping::{resolve, FileMapping, ResolveError};
pub use crate::fs_op::stat::PathKind;
pub use crate::transform::{CommandTransform, Transform, TransformError};
pub use crate::transpile::{transpile, TranspileError};
