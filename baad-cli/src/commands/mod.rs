//! CLI command implementations.

pub mod common;
pub mod download;
pub mod extract;
pub mod search;
