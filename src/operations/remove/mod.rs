//! Removers, one per resource domain
//!
//! A remover deletes each item independently and reports one outcome per
//! item. It only returns an error when it cannot reach its domain at all.

pub mod certificates;
pub mod registry;
pub mod tasks;

pub use certificates::remove_certificates;
pub use registry::remove_registry;
pub use tasks::remove_tasks;
