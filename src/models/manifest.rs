// Writing a generated manifest to disk

use super::{FileKind, Manifest};
use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};

/// Checks that a manifest path stays inside the output directory
pub fn validate_relative_path(path: &str) -> Result<()> {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("Empty path"));
    }
    if trimmed.starts_with('/') || trimmed.starts_with('\\') {
        return Err(anyhow!("Absolute path not allowed: {}", path));
    }
    if trimmed.starts_with('~') {
        return Err(anyhow!("Home-relative path not allowed: {}", path));
    }
    if trimmed.len() >= 2 && trimmed.chars().nth(1) == Some(':') {
        return Err(anyhow!("Drive-qualified path not allowed: {}", path));
    }
    if trimmed.split(['/', '\\']).any(|segment| segment == "..") {
        return Err(anyhow!("Parent directory segment not allowed: {}", path));
    }
    Ok(())
}

/// Writes every descriptor of `manifest` under `root`.
///
/// Folders are created, files are written with their parent directories.
/// All paths are checked before anything touches the disk. Returns the
/// written file paths in manifest order.
pub fn write_manifest(manifest: &Manifest, root: &Path) -> Result<Vec<PathBuf>> {
    for descriptor in manifest {
        validate_relative_path(&descriptor.path)?;
    }

    std::fs::create_dir_all(root)
        .with_context(|| format!("Failed to create output directory {}", root.display()))?;

    let mut written = Vec::new();
    for descriptor in manifest {
        let target = root.join(descriptor.path.trim());
        match descriptor.kind {
            FileKind::Folder => {
                std::fs::create_dir_all(&target)
                    .with_context(|| format!("Failed to create folder {}", target.display()))?;
            }
            FileKind::File => {
                if let Some(parent) = target.parent() {
                    std::fs::create_dir_all(parent).with_context(|| {
                        format!("Failed to create folder {}", parent.display())
                    })?;
                }
                std::fs::write(&target, &descriptor.content)
                    .with_context(|| format!("Failed to write {}", target.display()))?;
                written.push(target);
            }
        }
    }

    log::info!(
        "[manifest] Wrote {} files under {}",
        written.len(),
        root.display()
    );
    Ok(written)
}
