//! Command implementations for the mdm-cleanup CLI
//!
//! Commands are thin wrappers: they open a [`context::Session`], call into
//! `operations`, and render the result.

pub mod certs;
pub mod cleanup;
pub mod completions;
pub mod context;
pub mod discover;
pub mod inspect;
pub mod version;
