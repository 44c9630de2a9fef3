//! # System Interaction Layer
//!
//! The boundary between the engine and the shells it drives.
//!
//! ## Modules
//!
//! - **`dialect`**: the shell languages a unit can be written in, and how the
//!   active shell runs a unit written in another one (compatibility modes).
//! - **`profiles_config`**: loads the optional `profiles.toml` table mapping
//!   profile names to file extensions.
//! - **`runner`**: the [`crate::core::executor::UnitRunner`] implementations:
//!   a subprocess runner and an emitter producing `eval`-able source lines.

pub mod dialect;
pub mod profiles_config;
pub mod runner;
