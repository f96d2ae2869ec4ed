//! CLI utilities for PromptVault tools
//!
//! Provides shared CLI functionality:
//! - Status messages
//! - Terminal rendering of search results and suggestions

#![warn(missing_docs)]

pub mod output;
