//! Mediaflow Core Library
//!
//! Shared configuration, constants, and per-run resource naming for the
//! mediaflow workflow driver.

pub mod config;
pub mod constants;
pub mod names;

pub use config::Config;
pub use names::RunNames;
