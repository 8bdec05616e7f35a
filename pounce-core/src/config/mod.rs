//! Configuration types
//!
//! Board-agnostic configuration for the gimbal, read from `gimbal.toml`.

pub mod hardware;
pub mod parse;
pub mod types;

pub use hardware::*;
pub use parse::{load_config, parse_config, ParseError};
pub use types::*;
