//! Infrastructure implementation of the `ProjectFiles` port.

use std::path::Path;

use crate::application::ports::ProjectFiles;

/// Production filesystem probe.
pub struct LocalFs;

impl ProjectFiles for LocalFs {
    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }
}
