pub mod config;
pub mod dictionary;
pub mod error;
pub mod firefox;
pub mod gist;
pub mod logging;
pub mod rename;
pub mod tree;

pub use error::{Result, ToolError};
