// Data models for generated projects and the recovery pipeline

pub mod manifest;
pub mod state_machine;

pub use manifest::write_manifest;
pub use state_machine::{GenerationStage, StageTracker, StateTransitionError};

use serde::{Deserialize, Serialize};

/// Whether a descriptor names a directory or a regular file.
///
/// `Folder` sorts before `File`, which is the manifest order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Folder,
    File,
}

impl FileKind {
    /// Only the exact string `folder` denotes a folder
    pub fn from_type_tag(tag: Option<&str>) -> Self {
        match tag {
            Some("folder") => FileKind::Folder,
            _ => FileKind::File,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::Folder => "folder",
            FileKind::File => "file",
        }
    }
}

impl std::fmt::Display for FileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single entry of a generated project
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileDescriptor {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: FileKind,
    #[serde(default)]
    pub content: String,
}

impl FileDescriptor {
    pub fn file(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: FileKind::File,
            content: content.into(),
        }
    }

    pub fn folder(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: FileKind::Folder,
            content: String::new(),
        }
    }

    pub fn is_folder(&self) -> bool {
        self.kind == FileKind::Folder
    }
}

/// Loosely typed descriptor produced by an extractor, before validation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawDescriptor {
    pub path: Option<String>,
    pub kind: Option<String>,
    pub content: Option<String>,
}

impl RawDescriptor {
    pub fn new(path: impl Into<String>, kind: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            kind: Some(kind.into()),
            content: Some(content.into()),
        }
    }

    /// Reads a descriptor out of a parsed JSON value.
    ///
    /// Fields with the wrong JSON type are treated as absent so the validator
    /// decides what happens to them. Non-object values yield an empty descriptor.
    pub fn from_value(value: &serde_json::Value) -> Self {
        let Some(object) = value.as_object() else {
            return Self::default();
        };

        let text = |key: &str| object.get(key).and_then(|v| v.as_str()).map(str::to_string);

        Self {
            path: text("path"),
            kind: text("type"),
            content: text("content"),
        }
    }
}

/// Ordered list of file descriptors making up one generated project.
///
/// Serializes as a bare JSON array of `{path, type, content}` objects.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Manifest(Vec<FileDescriptor>);

impl Manifest {
    pub fn new(descriptors: Vec<FileDescriptor>) -> Self {
        Self(descriptors)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FileDescriptor> {
        self.0.iter()
    }

    pub fn descriptors(&self) -> &[FileDescriptor] {
        &self.0
    }

    pub fn descriptors_mut(&mut self) -> &mut Vec<FileDescriptor> {
        &mut self.0
    }

    pub fn into_descriptors(self) -> Vec<FileDescriptor> {
        self.0
    }

    pub fn paths(&self) -> Vec<&str> {
        self.0.iter().map(|d| d.path.as_str()).collect()
    }
}

impl From<Vec<FileDescriptor>> for Manifest {
    fn from(descriptors: Vec<FileDescriptor>) -> Self {
        Self(descriptors)
    }
}

impl IntoIterator for Manifest {
    type Item = FileDescriptor;
    type IntoIter = std::vec::IntoIter<FileDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Manifest {
    type Item = &'a FileDescriptor;
    type IntoIter = std::slice::Iter<'a, FileDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Result of one pass through the generation pipeline.
///
/// The failure tag decides which fallback project is synthesized:
/// `QuotaExceeded` gets the service-unavailable project, `Other` the generic one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    Success(Manifest),
    QuotaExceeded(String),
    Other(String),
}

impl GenerationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, GenerationOutcome::Success(_))
    }
}
