//! Library half of `kizunactl`: the file-backed record store and the command
//! implementations, kept out of `main.rs` so they can be tested directly.

pub mod catalog;
pub mod commands;

pub use catalog::JsonCatalog;
