//! Core utilities for PromptVault tools
//!
//! This crate provides the pieces shared by every PromptVault front end:
//!
//! - **Error handling**: Errors with codes, context, and recovery suggestions
//! - **Configuration**: TOML-based configuration with validation
//! - **Library import**: Reading and validating exported prompt libraries
//! - **Validation**: Field-level checks that report every problem at once
//!
//! # Example
//!
//! ```rust,no_run
//! use promptvault_core::{config::Config, library::Library};
//! use promptvault_search::rank;
//!
//! let config = Config::load(None)?;
//! let library = Library::load("prompts.json")?;
//!
//! let results = rank(library.records(), "review", &config.schema.search.to_options());
//! println!("{} matches", results.len());
//! # Ok::<(), promptvault_core::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod library;
pub mod validation;

pub use error::{Error, ErrorCode, Result, ResultExt};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{Config, ConfigSchema};
    pub use crate::error::{exit_codes, Error, ErrorCode, Result, ResultExt};
    pub use crate::library::{Library, LibrarySettings};
    pub use crate::validation::{ValidationResult, Validator};
}
