// Manifest ordering - folders first, then by path

use crate::models::{FileDescriptor, Manifest};

/// Sorts descriptors in place. Stable, so equal entries keep their order.
pub fn sort_descriptors(descriptors: &mut [FileDescriptor]) {
    descriptors.sort_by(|a, b| a.kind.cmp(&b.kind).then_with(|| a.path.cmp(&b.path)));
}

pub fn order_manifest(mut manifest: Manifest) -> Manifest {
    sort_descriptors(manifest.descriptors_mut());
    manifest
}
