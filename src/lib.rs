// Clippy allows for reasonable defaults
#![allow(clippy::new_without_default)] // Default not always appropriate for stateful types
#![allow(clippy::derivable_impls)] // Explicit Default impls can be clearer
#![allow(clippy::field_reassign_with_default)] // Builder pattern is clearer
#![allow(clippy::needless_borrow)] // Explicit borrows can clarify ownership
#![allow(clippy::redundant_closure)] // |x| f(x) can be clearer than f
#![allow(clippy::len_without_is_empty)] // Collection wrappers expose what callers need

// Module declarations
pub mod agents;
pub mod config;
pub mod fallback;
pub mod generator;
pub mod models;
pub mod parsers;
pub mod templates;

pub use generator::{CodeGenerator, GenerationError, GenerationReport, ManifestSource};
pub use models::{FileDescriptor, FileKind, Manifest};
