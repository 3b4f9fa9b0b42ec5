//! Common helpers shared across the vault crates.

pub mod time;
