//! Read-only inspection of each resource domain
//!
//! Probes report presence and absence; they never mutate the machine. Tasks
//! and registry are scoped by enrollment identifier, certificates by issuer.

pub mod certificates;
pub mod registry;
pub mod tasks;

pub use certificates::{CertificateProbe, probe_certificates};
pub use registry::{RegistryFinding, probe_registry};
pub use tasks::{TaskProbeReport, probe_tasks};
