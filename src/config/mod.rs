//! Configuration for mdm-cleanup
//!
//! Well-known namespaces, paths and names, and the [`Settings`] that let a run
//! point at a different store, issuer or timeout.

pub mod settings;

pub use settings::{CLIENT_COMPONENT_KEYS, Settings, SettingsOverrides};
