// src/cli/handlers/mod.rs

//! One module per command of the dispatcher table.

pub mod commons;
pub mod list;
pub mod load;
pub mod resolve;
pub mod run;
pub mod startup;
