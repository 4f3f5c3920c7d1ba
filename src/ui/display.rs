//! Display functions for probes and run summaries
//!
//! Everything here prints to stdout. Machine-readable output goes through
//! serde_json in the commands instead.

use console::Style;

use crate::domain::{CleanupRecord, RecordStatus, RunSummary};
use crate::operations::discovery::Discovery;
use crate::operations::probe::{CertificateProbe, RegistryFinding, TaskProbeReport};

macro_rules! display_field {
    ($indent:expr, $label:expr, $value:expr) => {
        println!(
            "{}{} {}",
            $indent,
            Style::new().bold().apply_to($label),
            $value
        );
    };
}

fn present(exists: bool) -> console::StyledObject<&'static str> {
    if exists {
        Style::new().yellow().apply_to("present")
    } else {
        Style::new().dim().apply_to("absent")
    }
}

/// Display the identifiers discovery found
pub fn display_discovery(discovery: &Discovery, root: &str) {
    match discovery {
        Discovery::NamespaceAbsent => {
            println!("{} does not exist on this machine", root);
        }
        Discovery::Found(ids) if ids.is_empty() => {
            println!("No enrollments found under {}", root);
        }
        Discovery::Found(ids) => {
            println!(
                "{}",
                Style::new()
                    .bold()
                    .apply_to(format!("Enrollments under {root}:"))
            );
            for id in ids {
                println!("  {}", Style::new().bold().yellow().apply_to(id));
            }
        }
    }
}

/// Display scheduled tasks and task storage folders for one identifier
pub fn display_task_probe(report: &TaskProbeReport) {
    println!("    {}", Style::new().bold().apply_to("Scheduled tasks:"));
    if report.tasks.is_empty() {
        println!("      {}", Style::new().dim().apply_to("(none)"));
    }
    for task in &report.tasks {
        println!("      {}", task.full_name());
    }
    for folder in [&report.critical_folder, &report.noncritical_folder] {
        display_field!(
            "    ",
            "Task folder:",
            format!("{} ({})", folder.path.display(), present(folder.exists))
        );
    }
}

/// Display the registry properties found for one identifier
pub fn display_registry_finding(finding: &RegistryFinding) {
    display_field!(
        "    ",
        "Registry:",
        format!("{} ({})", finding.key_path, present(finding.present))
    );
    for property in &finding.properties {
        println!(
            "      {}\\{} = {}",
            Style::new().cyan().apply_to(&property.subkey),
            property.name,
            property.value
        );
    }
}

/// Display the certificate probe for a store
pub fn display_certificate_probe(probe: &CertificateProbe, store: &str, issuer: &str) {
    println!(
        "{}",
        Style::new()
            .bold()
            .apply_to(format!("Certificates in {store} issued by '{issuer}':"))
    );
    match probe {
        CertificateProbe::Found { certificates } => {
            for cert in certificates {
                println!(
                    "  {} {}",
                    Style::new().bold().yellow().apply_to(&cert.subject),
                    Style::new().dim().apply_to(&cert.thumbprint)
                );
            }
        }
        CertificateProbe::TimedOut { waited, polls } => {
            println!(
                "  {} {}",
                Style::new().dim().apply_to("(none)"),
                Style::new()
                    .dim()
                    .apply_to(format!("after {}s, {polls} check(s)", waited.as_secs()))
            );
        }
    }
}

fn status_cell(record: &CleanupRecord) -> String {
    let label = match record.status {
        RecordStatus::Success if record.item_failures > 0 => "PARTIAL",
        RecordStatus::Success => "OK",
        RecordStatus::Failed => "FAILED",
    };
    // pad before styling so ANSI codes do not break alignment
    let padded = format!("{label:<8}");
    let style = match (record.status, record.item_failures) {
        (RecordStatus::Failed, _) => Style::new().red().bold(),
        (RecordStatus::Success, 0) => Style::new().green(),
        (RecordStatus::Success, _) => Style::new().yellow(),
    };
    style.apply_to(padded).to_string()
}

/// Display the counts line and the per-identifier status table
pub fn display_summary(summary: &RunSummary) {
    let counts = summary.counts();
    println!();
    println!("{}", Style::new().bold().apply_to("Summary"));
    println!(
        "  {} succeeded, {} warning(s), {} failed",
        Style::new().green().apply_to(counts.succeeded),
        Style::new().yellow().apply_to(counts.warned),
        Style::new().red().apply_to(counts.failed)
    );

    if !summary.records.is_empty() {
        println!();
        println!(
            "  {:<38} {:<8} {:>8} {:>8}",
            Style::new().bold().apply_to("IDENTIFIER"),
            Style::new().bold().apply_to("STATUS"),
            Style::new().bold().apply_to("WARNINGS"),
            Style::new().bold().apply_to("ERRORS")
        );
        for record in &summary.records {
            println!(
                "  {:<38} {} {:>8} {:>8}",
                record.identifier.as_str(),
                status_cell(record),
                record.warnings.len(),
                record.item_failures
            );
            if let Some(ref failure) = record.failure {
                println!("    {}", Style::new().red().apply_to(failure));
            }
        }
    }

    for note in &summary.notes {
        println!("  {} {}", Style::new().dim().apply_to("-"), note.message);
    }
}
