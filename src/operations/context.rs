//! Shared context for cleanup operations
//!
//! Every probe, remover and the orchestrator work against a [`CleanupContext`]:
//! the injected resource domains plus the collaborators they report through.

use crate::clock::Clock;
use crate::config::Settings;
use crate::machine::Machine;
use crate::ui::{ErrorReporter, Logger};

/// Resource domains, settings and collaborators for one run
#[derive(Clone, Copy)]
pub struct CleanupContext<'a> {
    pub machine: Machine<'a>,
    pub settings: &'a Settings,
    pub logger: &'a dyn Logger,
    pub reporter: &'a dyn ErrorReporter,
    pub clock: &'a dyn Clock,
}

impl<'a> CleanupContext<'a> {
    pub fn new(
        machine: Machine<'a>,
        settings: &'a Settings,
        logger: &'a dyn Logger,
        reporter: &'a dyn ErrorReporter,
        clock: &'a dyn Clock,
    ) -> Self {
        Self {
            machine,
            settings,
            logger,
            reporter,
            clock,
        }
    }
}
