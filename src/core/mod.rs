// src/core/mod.rs

//! # Engine
//!
//! Everything between reading the init file and running a unit, with no
//! knowledge of how a shell is actually started.
//!
//! ## Modules
//!
//! - **`declaration`** and **`registry`**: the units an init file declares.
//! - **`resolver`**: maps a unit to a file along the profile chain.
//! - **`scheduler`** and **`executor`**: deferred actions and how one runs.
//! - **`loader`**: immediate, nested loading from inside a unit.
//! - **`orchestrator`**: initialization and whole phases.
//! - **`session`** and **`settings`**: per-run state and its configuration.
//! - **`clock`** and **`paths`**: timing and path helpers.

pub mod clock;
pub mod declaration;
pub mod executor;
pub mod loader;
pub mod orchestrator;
pub mod paths;
pub mod registry;
pub mod resolver;
pub mod scheduler;
pub mod session;
pub mod settings;

#[cfg(test)]
pub(crate) mod test_support;
