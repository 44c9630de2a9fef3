//! # shellphase
//!
//! Loads interactive-shell configuration units in four lifecycle phases
//! (`env`, `login`, `interactive`, `logout`) across several shell profiles.
//!
//! The engine lives in [`core`]: a [`core::registry::Registry`] of declared
//! units, a fallback-chain [`core::resolver::Resolver`], a deferred
//! [`core::scheduler::Scheduler`] drained through [`core::executor`], the
//! synchronous [`core::loader`] and the [`core::orchestrator`] that drives a
//! phase end to end. [`system`] holds the shell-facing pieces (dialects and
//! unit runners) and [`cli`] the command-line surface.

include!(concat!(env!("OUT_DIR"), "/translations.rs"));

pub mod cli;
pub mod constants;
pub mod core;
pub mod models;
pub mod system;
