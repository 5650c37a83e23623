//! Best-effort batch serialization with a per-artifact commit report.

use std::fmt;
use std::path::PathBuf;

use tracing::{error, info};

/// One artifact to write: a target path and its full new content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Artifact {
    /// Destination path.
    pub path: PathBuf,
    /// Complete file content.
    pub content: String,
}

impl Artifact {
    /// Create an artifact.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// Outcome of a batch write: exactly which artifacts were and were not
/// committed.
///
/// The batch is best-effort, not all-or-nothing: artifacts are written in
/// order, and the first failure stops the batch. Everything before the
/// failure is on disk; everything after it was skipped.
#[derive(Debug, Default)]
pub struct SerializationReport {
    /// Artifacts written successfully, in write order.
    pub committed: Vec<PathBuf>,
    /// The artifact whose write failed, with the underlying error.
    pub failed: Option<(PathBuf, std::io::Error)>,
    /// Artifacts not attempted because of an earlier failure.
    pub skipped: Vec<PathBuf>,
}

impl SerializationReport {
    /// True if every artifact was committed.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed.is_none()
    }
}

impl fmt::Display for SerializationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.failed {
            None => write!(f, "{} artifact(s) committed", self.committed.len()),
            Some((path, err)) => {
                write!(
                    f,
                    "failed to write {}: {err} ({} committed, {} skipped)",
                    path.display(),
                    self.committed.len(),
                    self.skipped.len()
                )
            }
        }
    }
}

/// Write all artifacts in order, stopping at the first failure.
///
/// Call only after every in-memory mutation has succeeded; the report says
/// which artifacts made it to disk.
#[must_use]
pub fn write_all(artifacts: Vec<Artifact>) -> SerializationReport {
    let mut report = SerializationReport::default();
    let mut artifacts = artifacts.into_iter();

    for artifact in artifacts.by_ref() {
        match std::fs::write(&artifact.path, &artifact.content) {
            Ok(()) => {
                info!(path = %artifact.path.display(), "wrote artifact");
                report.committed.push(artifact.path);
            }
            Err(err) => {
                error!(path = %artifact.path.display(), %err, "artifact write failed");
                report.failed = Some((artifact.path, err));
                break;
            }
        }
    }
    report.skipped = artifacts.map(|artifact| artifact.path).collect();
    report
}
