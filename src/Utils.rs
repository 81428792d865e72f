//! # Utils Module
//!
//! Small shared helpers: label sanitizing for downstream model tools and
//! filesystem path handling.

/// species label sanitizing
pub mod labels;
/// path regularization and collision-free output paths
pub mod paths;
