//! CLI command implementations

pub mod check;
pub(crate) mod common;
pub mod migrate;
pub mod new;
pub mod status;
