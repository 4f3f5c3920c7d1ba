//! Cleanup orchestrator
//!
//! Drives a run through its stages:
//!
//! ```text
//! Init -> DiscoverIdentifiers -> GlobalCertCleanup -> PerIdentifierLoop -> Summarize -> Done
//! ```
//!
//! Init and discovery failures skip straight to `Summarize`, as does a
//! discovery that finds nothing. Every path ends in `Summarize`, so a
//! [`RunSummary`] is produced for every run.

use crate::domain::{EnrollmentId, PendingRecord, RunSummary};
use crate::operations::CleanupContext;
use crate::operations::discovery::{Discovery, discover};
use crate::ui::ProgressReporter;

use super::steps::{certificate_cleanup, identifier_cleanup};

/// Where a run currently is
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    Init,
    DiscoverIdentifiers,
    GlobalCertCleanup(Vec<EnrollmentId>),
    PerIdentifierLoop(Vec<EnrollmentId>),
    Summarize,
    Done,
}

/// One full cleanup run
pub struct CleanupOperation<'a> {
    ctx: CleanupContext<'a>,
    summary: RunSummary,
}

impl<'a> CleanupOperation<'a> {
    pub fn new(ctx: CleanupContext<'a>) -> Self {
        Self {
            ctx,
            summary: RunSummary::new(),
        }
    }

    /// Run every stage to completion and return the summary.
    pub fn execute(self, progress: &mut dyn ProgressReporter) -> RunSummary {
        let logger = self.ctx.logger;
        self.run(progress, |stage| {
            logger.notice(&format!("Stage: {}", stage.name()));
        })
    }

    fn run(
        mut self,
        progress: &mut dyn ProgressReporter,
        mut on_stage: impl FnMut(&Stage),
    ) -> RunSummary {
        let mut stage = Stage::Init;
        while stage != Stage::Done {
            on_stage(&stage);
            stage = self.step(stage, progress);
        }
        self.summary
    }

    fn step(&mut self, stage: Stage, progress: &mut dyn ProgressReporter) -> Stage {
        match stage {
            Stage::Init => self.init(),
            Stage::DiscoverIdentifiers => self.discover_identifiers(),
            Stage::GlobalCertCleanup(identifiers) => {
                certificate_cleanup(&self.ctx, &mut self.summary);
                Stage::PerIdentifierLoop(identifiers)
            }
            Stage::PerIdentifierLoop(identifiers) => {
                self.per_identifier(&identifiers, progress);
                Stage::Summarize
            }
            Stage::Summarize => {
                self.summarize();
                Stage::Done
            }
            Stage::Done => Stage::Done,
        }
    }

    fn init(&mut self) -> Stage {
        match self.ctx.machine.scheduler.connect() {
            Ok(()) => Stage::DiscoverIdentifiers,
            Err(e) => {
                self.ctx.reporter.report("Connecting to the task scheduler", &e);
                self.ctx
                    .logger
                    .error(&format!("Cannot connect to the task scheduler: {e}"));
                self.summary
                    .error(format!("Cannot connect to the task scheduler: {e}"));
                Stage::Summarize
            }
        }
    }

    fn discover_identifiers(&mut self) -> Stage {
        let root = self.ctx.settings.task_root.as_str();
        match discover(&self.ctx, root) {
            Ok(Discovery::Found(identifiers)) if !identifiers.is_empty() => {
                Stage::GlobalCertCleanup(identifiers)
            }
            Ok(_) => {
                self.summary
                    .warn(format!("No enrollments found under {root}; nothing to clean"));
                Stage::Summarize
            }
            Err(e) => {
                self.ctx.reporter.report("Discovering enrollments", &e);
                self.ctx
                    .logger
                    .error(&format!("Cannot enumerate {root}: {e}"));
                self.summary.error(format!("Cannot enumerate {root}: {e}"));
                Stage::Summarize
            }
        }
    }

    fn per_identifier(&mut self, identifiers: &[EnrollmentId], progress: &mut dyn ProgressReporter) {
        let total = identifiers.len();
        progress.start(total as u64);

        for (index, identifier) in identifiers.iter().enumerate() {
            progress.update_identifier(identifier.as_str(), index + 1, total);
            self.ctx
                .logger
                .notice(&format!("Cleaning up enrollment {identifier} ({}/{total})", index + 1));

            let mut pending = PendingRecord::start(identifier.clone());
            let record = match identifier_cleanup(&self.ctx, &mut pending) {
                Ok(()) => {
                    self.ctx
                        .logger
                        .success(&format!("Enrollment {identifier} cleaned up"));
                    pending.succeed()
                }
                Err(e) => {
                    self.ctx
                        .reporter
                        .report(&format!("Cleaning up enrollment {identifier}"), &e);
                    let message = if e.is_connectivity() {
                        format!("Cleanup of {identifier} aborted, resource unreachable: {e}")
                    } else {
                        format!("Cleanup of {identifier} aborted: {e}")
                    };
                    self.ctx.logger.error(&message);
                    pending.fail(e.to_string())
                }
            };
            self.summary.push(record);
            progress.inc();
        }

        progress.finish();
    }

    fn summarize(&self) {
        let counts = self.summary.counts();
        let line = format!(
            "Cleanup finished: {} succeeded, {} warning(s), {} failed",
            counts.succeeded, counts.warned, counts.failed
        );
        if self.summary.is_clean() {
            self.ctx.logger.success(&line);
        } else {
            self.ctx.logger.error(&line);
        }
    }
}

impl Stage {
    fn name(&self) -> &'static str {
        match self {
            Stage::Init => "init",
            Stage::DiscoverIdentifiers => "discover",
            Stage::GlobalCertCleanup(_) => "certificates",
            Stage::PerIdentifierLoop(_) => "identifiers",
            Stage::Summarize => "summarize",
            Stage::Done => "done",
        }
    }
}
