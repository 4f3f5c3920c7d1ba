//! Cleanup operation submodules

pub mod orchestrator;
mod steps;

pub use orchestrator::CleanupOperation;
