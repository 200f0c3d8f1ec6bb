//! The "BioCypher Adapter Creation Framework" guide: a long-form markdown
//! document shipped next to the binary, plus the descriptor clients see.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;

pub const FILE_NAME: &str = "adapter_framework.md";

/// Served when no candidate directory holds the document.
pub const PLACEHOLDER: &str =
    "# BioCypher Adapter Creation Framework\n\nResource file not found. Please check the installation.";

#[derive(Debug, thiserror::Error)]
pub enum FrameworkError {
    #[error("{} not found in any of {searched:?}", FILE_NAME)]
    NotFound { searched: Vec<PathBuf> },
    #[error("failed to read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotations {
    pub audience: &'static [&'static str],
    pub priority: f32,
    pub last_modified: &'static str,
}

/// How the framework guide is advertised to clients.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameworkResource {
    pub uri: &'static str,
    pub name: &'static str,
    pub title: &'static str,
    pub mime_type: &'static str,
    pub description: &'static str,
    pub annotations: Annotations,
}

impl FrameworkResource {
    pub const fn descriptor() -> Self {
        Self {
            uri: "https://biocypher.org/resources/adapter-creation-framework",
            name: "adapter-creation-framework",
            title: "BioCypher Adapter Creation Framework",
            mime_type: "text/markdown",
            description: "Generalized framework for creating BioCypher adapters from any data \
                source, with adaptive analysis and implementation strategies",
            annotations: Annotations {
                audience: &["user", "assistant"],
                priority: 0.9,
                last_modified: "2025-01-12T15:00:58Z",
            },
        }
    }
}

/// The loaded guide and where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameworkDocument {
    pub content: String,
    /// `None` when the placeholder is served.
    pub source: Option<PathBuf>,
}

impl FrameworkDocument {
    /// Load the guide from the first directory in `dirs` that contains it,
    /// falling back to [`PLACEHOLDER`].
    pub fn load<P: AsRef<Path>>(dirs: &[P]) -> Self {
        match read_first(dirs) {
            Ok((path, content)) => {
                tracing::info!(path = %path.display(), "loaded adapter framework");
                Self {
                    content,
                    source: Some(path),
                }
            }
            Err(e) => {
                tracing::warn!("{}; serving placeholder", e);
                Self::placeholder()
            }
        }
    }

    pub fn placeholder() -> Self {
        Self {
            content: PLACEHOLDER.to_string(),
            source: None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.source.is_none()
    }
}

/// Read the guide verbatim from the first directory that has it.
pub fn read_first<P: AsRef<Path>>(dirs: &[P]) -> Result<(PathBuf, String), FrameworkError> {
    for dir in dirs {
        let path = dir.as_ref().join(FILE_NAME);
        match fs::read_to_string(&path) {
            Ok(content) => return Ok((path, content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
            Err(source) => return Err(FrameworkError::Read { path, source }),
        }
    }
    Err(FrameworkError::NotFound {
        searched: dirs.iter().map(|d| d.as_ref().to_path_buf()).collect(),
    })
}

/// Directory holding the guide in this source tree.
pub fn bundled_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("resources")
}
