//! Whitelist input.
//!
//! - `entry.rs`  - entries and the validated, duplicate-free whitelist
//! - `loader.rs` - JSON whitelist files

pub mod entry;
pub mod loader;

pub use entry::{Whitelist, WhitelistEntry};
pub use loader::{load_whitelist, parse_whitelist};
