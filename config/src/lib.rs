//! Groups configurations used by the order tooling
//!
//! Options are read from the command line and, optionally, a TOML config file
//! whose entries are prepended to the command line so that explicit flags take
//! precedence

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]

mod cli;
mod parsing;
mod validation;

pub use cli::{ToolArgs, ToolConfig};
pub use parsing::{config_file::with_config_file_args, parse_config_from_args};
