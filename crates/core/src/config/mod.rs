//! Configuration loading and schema definitions
//!
//! Settings live in a TOML file shared by every PromptVault tool.

mod loader;
mod schema;

pub use loader::Config;
pub use schema::*;
