//! Live Windows machine driven through PowerShell
//!
//! Each call spawns one non-interactive `powershell.exe` and reads back
//! `ConvertTo-Json` output. The scheduler namespace goes through the
//! `Schedule.Service` COM object and the ScheduledTasks module, the registry
//! through the `HKLM:` provider and certificates through the `Cert:` provider.

use std::process::Command;

use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::{
    Certificate, CertificateStore, RegistryStore, RegistryValue, ScheduledTask, TaskScheduler,
    normalize_store,
};
use crate::error::{
    MdmError, Result, certificate_delete_failed, certificate_store_unavailable,
    folder_delete_failed, registry_access_failed, registry_delete_failed,
    scheduler_operation_failed, scheduler_unavailable, task_unregister_failed,
};

const CONNECT: &str = "$service = New-Object -ComObject Schedule.Service; $service.Connect();";

/// Quote a value as a PowerShell single-quoted literal
fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// `HKLM\SOFTWARE\...` to a provider path usable with `-LiteralPath`
fn registry_provider_path(path: &str) -> String {
    format!("Registry::{}", path.trim_end_matches('\\'))
}

fn certificate_provider_path(store: &str) -> String {
    format!("Cert:\\{}", normalize_store(store))
}

fn parse_json<T: DeserializeOwned>(output: &str) -> std::result::Result<T, String> {
    serde_json::from_str(output.trim()).map_err(|e| format!("unexpected output: {e}"))
}

#[derive(Deserialize)]
struct FolderListing {
    exists: bool,
    #[serde(default)]
    folders: Vec<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct TaskRow {
    task_name: String,
    task_path: String,
}

/// Runs scripts through `powershell.exe`
#[derive(Debug, Clone)]
pub struct PowerShellMachine {
    program: String,
}

impl Default for PowerShellMachine {
    fn default() -> Self {
        Self {
            program: "powershell.exe".to_string(),
        }
    }
}

impl PowerShellMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different PowerShell executable, e.g. `pwsh`
    #[cfg(test)]
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Run `script`; stdout on success, stderr (or the exit status) as the reason on failure
    fn run(&self, script: &str) -> std::result::Result<String, String> {
        let wrapped = format!("$ErrorActionPreference = 'Stop'; {script}");
        let output = Command::new(&self.program)
            .args(["-NoProfile", "-NonInteractive", "-Command", &wrapped])
            .output()
            .map_err(|e| format!("failed to start {}: {e}", self.program))?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            Err(if stderr.is_empty() {
                format!("exited with {}", output.status)
            } else {
                stderr
            })
        }
    }

    fn query<T: DeserializeOwned>(&self, script: &str) -> std::result::Result<T, String> {
        parse_json(&self.run(script)?)
    }
}

impl TaskScheduler for PowerShellMachine {
    fn connect(&self) -> Result<()> {
        self.run(CONNECT).map(|_| ()).map_err(scheduler_unavailable)
    }

    fn list_identifier_folders(&self, root: &str) -> Result<Option<Vec<String>>> {
        self.run(CONNECT).map_err(scheduler_unavailable)?;
        let script = format!(
            "{CONNECT} \
             try {{ $folder = $service.GetFolder({root}) }} \
             catch {{ ConvertTo-Json -Compress -InputObject @{{ exists = $false }}; return }}; \
             $names = @($folder.GetFolders(0) | ForEach-Object {{ $_.Name }}); \
             ConvertTo-Json -Compress -InputObject @{{ exists = $true; folders = $names }}",
            root = quote(root)
        );
        let listing: FolderListing = self
            .query(&script)
            .map_err(|reason| scheduler_operation_failed("list folders", reason))?;
        Ok(listing.exists.then_some(listing.folders))
    }

    fn delete_folder(&self, path: &str) -> Result<()> {
        let script = format!(
            "{CONNECT} $service.GetFolder('\\').DeleteFolder({}, 0)",
            quote(path)
        );
        self.run(&script)
            .map(|_| ())
            .map_err(|reason| folder_delete_failed(path, reason))
    }

    fn list_tasks(&self) -> Result<Vec<ScheduledTask>> {
        let rows: Vec<TaskRow> = self
            .query(
                "ConvertTo-Json -Compress -InputObject @(Get-ScheduledTask | \
                 Select-Object TaskName, TaskPath)",
            )
            .map_err(|reason| scheduler_operation_failed("list tasks", reason))?;
        Ok(rows
            .into_iter()
            .map(|row| ScheduledTask::new(row.task_path, row.task_name))
            .collect())
    }

    fn unregister_task(&self, task: &ScheduledTask) -> Result<()> {
        let script = format!(
            "Unregister-ScheduledTask -TaskName {} -TaskPath {} -Confirm:$false",
            quote(&task.name),
            quote(&task.path)
        );
        self.run(&script)
            .map(|_| ())
            .map_err(|reason| task_unregister_failed(task.full_name(), reason))
    }
}

impl RegistryStore for PowerShellMachine {
    fn key_exists(&self, path: &str) -> Result<bool> {
        let script = format!(
            "ConvertTo-Json -Compress -InputObject (Test-Path -LiteralPath {})",
            quote(&registry_provider_path(path))
        );
        self.query(&script)
            .map_err(|reason| registry_access_failed(path, reason))
    }

    fn subkeys(&self, path: &str) -> Result<Vec<String>> {
        let script = format!(
            "ConvertTo-Json -Compress -InputObject @(Get-ChildItem -LiteralPath {} | \
             ForEach-Object {{ $_.PSChildName }})",
            quote(&registry_provider_path(path))
        );
        self.query(&script)
            .map_err(|reason| registry_access_failed(path, reason))
    }

    fn values(&self, path: &str) -> Result<Vec<RegistryValue>> {
        let script = format!(
            "$key = Get-Item -LiteralPath {}; \
             ConvertTo-Json -Compress -InputObject @($key.GetValueNames() | ForEach-Object {{ \
             [pscustomobject]@{{ name = $_; data = [string]$key.GetValue($_) }} }})",
            quote(&registry_provider_path(path))
        );
        self.query(&script)
            .map_err(|reason| registry_access_failed(path, reason))
    }

    fn delete_tree(&self, path: &str) -> Result<()> {
        let script = format!(
            "Remove-Item -LiteralPath {} -Recurse -Force",
            quote(&registry_provider_path(path))
        );
        self.run(&script)
            .map(|_| ())
            .map_err(|reason| registry_delete_failed(path, reason))
    }
}

impl CertificateStore for PowerShellMachine {
    fn certificates(&self, store: &str) -> Result<Vec<Certificate>> {
        let script = format!(
            "ConvertTo-Json -Compress -InputObject @(Get-ChildItem -LiteralPath {} | \
             ForEach-Object {{ [pscustomobject]@{{ thumbprint = $_.Thumbprint; \
             subject = $_.Subject; issuer = $_.Issuer }} }})",
            quote(&certificate_provider_path(store))
        );
        self.query(&script)
            .map_err(|reason| certificate_store_unavailable(store, reason))
    }

    fn delete(&self, store: &str, certificate: &Certificate) -> Result<()> {
        let item = format!(
            "{}\\{}",
            certificate_provider_path(store),
            certificate.thumbprint
        );
        let script = format!("Remove-Item -LiteralPath {} -Force", quote(&item));
        self.run(&script).map(|_| ()).map_err(|reason| {
            certificate_delete_failed(&certificate.subject, &certificate.thumbprint, reason)
        })
    }
}

/// The live backend needs a Windows host
pub fn ensure_supported_host() -> Result<()> {
    if cfg!(windows) {
        Ok(())
    } else {
        Err(MdmError::BackendUnavailable)
    }
}
