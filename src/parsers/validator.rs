// Manifest validation - turns extracted candidates into typed descriptors

use super::RecoveryError;
use crate::models::{FileDescriptor, FileKind, Manifest, RawDescriptor};
use std::collections::HashSet;

/// Validates a batch of candidates into a manifest.
///
/// All-or-nothing: the first candidate without a usable path fails the
/// whole batch. Kinds other than exactly `folder` become files, missing
/// content becomes empty and folders never carry content.
pub fn validate(candidates: Vec<RawDescriptor>) -> Result<Manifest, RecoveryError> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut descriptors = Vec::with_capacity(candidates.len());

    for (index, candidate) in candidates.into_iter().enumerate() {
        let path = match candidate.path {
            Some(path) if !path.is_empty() => path,
            Some(_) => {
                return Err(RecoveryError::InvalidDescriptor {
                    index,
                    reason: "path is empty".to_string(),
                })
            }
            None => {
                return Err(RecoveryError::InvalidDescriptor {
                    index,
                    reason: "path is missing or not a string".to_string(),
                })
            }
        };

        let kind = FileKind::from_type_tag(candidate.kind.as_deref());
        let content = match kind {
            FileKind::Folder => String::new(),
            FileKind::File => candidate.content.unwrap_or_default(),
        };

        if !seen.insert(path.clone()) {
            log::warn!("[validator] Duplicate path in manifest: {}", path);
        }

        descriptors.push(FileDescriptor {
            path,
            kind,
            content,
        });
    }

    Ok(Manifest::new(descriptors))
}
