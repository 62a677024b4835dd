//! Infrastructure implementation of the `HandoffStore` port.
//!
//! Writes `<project>/build/out/containers-names.txt`: one container name per
//! line, the app container first. Other tooling reads the first line to find
//! the app container.

use std::path::{Path, PathBuf};

use crate::application::ports::HandoffStore;

/// Handoff file location relative to the project root.
pub const HANDOFF_RELATIVE_PATH: &str = "build/out/containers-names.txt";

/// Handoff file writer.
pub struct HandoffFile {
    path: PathBuf,
}

impl HandoffFile {
    /// Handoff file under the given project root.
    #[must_use]
    pub fn for_project_root(root: &Path) -> Self {
        Self::with_path(root.join(HANDOFF_RELATIVE_PATH))
    }

    /// Handoff file at an explicit path (used in tests).
    #[must_use]
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HandoffStore for HandoffFile {
    fn write_container_names(&self, names: &[String]) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut content = names.join("\n");
        content.push('\n');

        // Atomic write via temp file then rename.
        let temp_path = self.path.with_extension("txt.tmp");
        std::fs::write(&temp_path, content)?;
        std::fs::rename(&temp_path, &self.path)
    }
}
