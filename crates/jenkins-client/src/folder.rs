// ABOUTME: Folder path formatting and the folder-existence capability.
// ABOUTME: Converts "a/b" folder names into the "job/a/job/b" form Jenkins routes on.

use crate::error::Result;
use async_trait::async_trait;

/// Checks that a Jenkins folder exists.
#[async_trait]
pub trait FolderProbe: Send + Sync {
    /// Returns `Ok(())` when `folder` (in Jenkins path form) exists.
    ///
    /// The empty folder is the root and always exists.
    async fn folder_exists(&self, folder: &str) -> Result<()>;
}

/// Split a folder name into its plain segments.
///
/// Accepts both the operator form (`a/b`) and the Jenkins path form
/// (`job/a/job/b`). Empty segments are dropped.
pub fn extract_folders(name: &str) -> Vec<String> {
    let segments: Vec<&str> = name.split('/').filter(|s| !s.is_empty()).collect();

    let already_formatted = !segments.is_empty()
        && segments.len() % 2 == 0
        && segments.iter().step_by(2).all(|s| *s == "job");

    if already_formatted {
        segments
            .iter()
            .skip(1)
            .step_by(2)
            .map(|s| s.to_string())
            .collect()
    } else {
        segments.iter().map(|s| s.to_string()).collect()
    }
}

/// Format a folder name as the Jenkins path of that folder.
///
/// `""` stays `""`, `"a/b"` becomes `"job/a/job/b"`. Formatting is
/// idempotent.
pub fn format_folder_name(name: &str) -> String {
    extract_folders(name)
        .iter()
        .map(|folder| format!("job/{folder}"))
        .collect::<Vec<_>>()
        .join("/")
}
