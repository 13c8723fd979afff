//! Path validation utilities for preventing path traversal.
//!
//! Workspace IDs and source names end up as directory names under the
//! destination root, so each must be exactly one normal path component.

use std::path::{Component, Path};

use anyhow::{anyhow, bail, Result};

/// Validates that `value` can be used as a single directory name.
///
/// # Arguments
///
/// * `label` - What the value is, used in error messages
/// * `value` - The candidate directory name
///
/// # Security
///
/// This function rejects:
/// - Empty names, `.` and `..`
/// - Path separators of either platform
/// - Null bytes and other control characters
pub fn validate_path_component(label: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        bail!("{} must not be empty", label);
    }

    if value.contains('\0') {
        bail!("{} contains null bytes", label);
    }

    if value.chars().any(|c| c == '/' || c == '\\' || c.is_control()) {
        bail!("{} {:?} contains path separators or control characters", label, value);
    }

    let mut components = Path::new(value).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(anyhow!("{} {:?} is not a plain directory name", label, value)),
    }
}

/// Validates that a path is safe to use as a destination root.
///
/// This ensures that collected logs are never written under system
/// directories.
pub fn validate_output_path(path: &Path) -> Result<()> {
    let path_str = path.to_string_lossy().to_lowercase();

    let dangerous_paths = ["/etc", "/sys", "/proc", "/dev", "/boot", "/usr"];

    for dangerous in dangerous_paths {
        if path_str == dangerous || path_str.starts_with(&format!("{}/", dangerous)) {
            return Err(anyhow!(
                "Cannot write to system directory: {}",
                path.display()
            ));
        }
    }

    if let Some(parent) = path.parent() {
        if parent.exists() && parent.metadata()?.permissions().readonly() {
            return Err(anyhow!(
                "Parent directory is read-only: {}",
                parent.display()
            ));
        }
    }

    Ok(())
}
