//! Task storage folders on the local file system

use std::path::Path;

use super::TaskFolderStore;
use crate::error::{Result, task_folder_remove_failed};

/// Task storage backed by `std::fs`
#[derive(Debug, Default, Clone, Copy)]
pub struct FsTaskFolders;

impl TaskFolderStore for FsTaskFolders {
    fn exists(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn remove(&self, path: &Path) -> Result<()> {
        std::fs::remove_dir_all(path)
            .map_err(|e| task_folder_remove_failed(path.display().to_string(), e.to_string()))
    }
}
