//! Operations module for inspecting and cleaning up MDM enrollments
//!
//! This module provides the operations the commands are built on:
//! - [`discovery`]: find enrollment identifiers in the scheduler namespace
//! - [`probe`]: read-only inspection of tasks, registry and certificates
//! - [`remove`]: best-effort deletion per resource domain
//! - [`cleanup`]: the orchestrator that runs a full cleanup
//!
//! All of them work against a [`CleanupContext`], which carries the injected
//! resource domains together with the logger, error reporter and clock.

pub mod cleanup;
pub mod context;
pub mod discovery;
pub mod probe;
pub mod remove;

pub use cleanup::CleanupOperation;
pub use context::CleanupContext;
