//! CLI command implementations.

pub mod create;
pub mod links;
pub mod scan;
pub mod transform;
