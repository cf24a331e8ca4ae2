//! Ephemeral workspaces.
//!
//! A [`Workspace`] is a uniquely named temporary directory owned by one
//! check evaluation. It is removed when released or dropped, whichever
//! happens first, so every exit path of an evaluation cleans it up.

use crate::error::{CheckError, Result};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary directory scoped to a single evaluation.
#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Create a workspace named `<prefix><random>` under `parent`, or under
    /// the system temporary directory when `parent` is `None`.
    pub fn create(prefix: &str, parent: Option<&Path>) -> Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(prefix);

        let dir = match parent {
            Some(parent) => builder.tempdir_in(parent),
            None => builder.tempdir(),
        }
        .map_err(|e| CheckError::io("Problem creating a workspace", e))?;

        tracing::debug!("Created workspace {}", dir.path().display());
        Ok(Self { dir })
    }

    /// Path of the workspace directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Path of `name` inside the workspace.
    pub fn file(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Write `contents` to `name` inside the workspace and return its path.
    pub fn write(&self, name: &str, contents: &str) -> Result<PathBuf> {
        let path = self.file(name);
        std::fs::write(&path, contents)
            .map_err(|e| CheckError::io(format!("Problem writing {}", path.display()), e))?;
        Ok(path)
    }

    /// Remove the workspace.
    ///
    /// A removal failure is logged and otherwise ignored; it never replaces
    /// the outcome of the evaluation that owned the workspace.
    pub fn release(self) {
        let path = self.dir.path().to_path_buf();
        match self.dir.close() {
            Ok(()) => tracing::debug!("Removed workspace {}", path.display()),
            Err(e) => tracing::warn!("Failed to remove workspace {}: {}", path.display(), e),
        }
    }
}

/// Run `body` inside a fresh workspace and release it afterwards.
///
/// The workspace is released whether `body` succeeds or fails, and the
/// body's result is returned unchanged.
pub fn with_workspace<T>(
    prefix: &str,
    parent: Option<&Path>,
    body: impl FnOnce(&Workspace) -> Result<T>,
) -> Result<T> {
    let workspace = Workspace::create(prefix, parent)?;
    let outcome = body(&workspace);
    workspace.release();
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn create_uses_prefix_and_parent() {
        let root = TempDir::new().unwrap();
        let ws = Workspace::create("scratch_", Some(root.path())).unwrap();

        assert!(ws.path().starts_with(root.path()));
        let name = ws.path().file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("scratch_"));
    }

    #[test]
    fn write_places_file_inside() {
        let ws = Workspace::create("scratch_", None).unwrap();
        let path = ws.write("src.c", "int main(void) { return 0; }\n").unwrap();

        assert_eq!(path, ws.file("src.c"));
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "int main(void) { return 0; }\n"
        );
    }

    #[test]
    fn release_removes_directory() {
        let ws = Workspace::create("scratch_", None).unwrap();
        let path = ws.path().to_path_buf();
        ws.write("a.txt", "a").unwrap();

        ws.release();
        assert!(!path.exists());
    }

    #[test]
    fn with_workspace_releases_on_error() {
        let root = TempDir::new().unwrap();
        let mut seen = None;

        let result: Result<()> = with_workspace("scratch_", Some(root.path()), |ws| {
            seen = Some(ws.path().to_path_buf());
            Err(CheckError::UnknownLimit {
                item: "bogus".into(),
            })
        });

        assert!(matches!(result, Err(CheckError::UnknownLimit { .. })));
        assert!(!seen.unwrap().exists());
        assert_eq!(fs::read_dir(root.path()).unwrap().count(), 0);
    }

    #[test]
    fn with_workspace_returns_body_value() {
        let value = with_workspace("scratch_", None, |_| Ok(42)).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn create_in_missing_parent_fails() {
        let root = TempDir::new().unwrap();
        let missing = root.path().join("does-not-exist");
        let err = Workspace::create("scratch_", Some(&missing)).unwrap_err();
        assert!(matches!(err, CheckError::Io { .. }));
    }
}
