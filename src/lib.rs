//! Core library for the patzm-scripts command line application.
//!
//! The library exposes the helpers behind each subcommand of the binary as
//! well as the unit tests. Responsibilities stay narrow: the remote gist store
//! lives under [`patzm::scripts::gist`], credential and file configuration in
//! [`patzm::scripts::config`], the line-set merge and sync orchestration under
//! [`patzm::scripts::dictionary`], and the standalone file utilities in
//! [`patzm::scripts::rename`] and [`patzm::scripts::tree`].

pub mod patzm;

pub use patzm::scripts::{
    Result, ToolError, config, dictionary, error, firefox, gist, logging, rename, tree,
};
