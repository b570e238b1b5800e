//! Schema module - configuration and problem-list types for the search.

mod config;
mod problem;

pub use config::*;
pub use problem::*;
