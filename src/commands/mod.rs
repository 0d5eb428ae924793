pub mod create;
pub mod delete;
pub mod pull;
pub mod templates;

use anyhow::{bail, Result};
use std::path::{Component, Path, PathBuf};

/// Resolve a project directory name to `<cwd>/<name>`.
///
/// Only plain relative names are accepted. A name that resolves to the current
/// directory or one of its parents (e.g. through a symlink) is refused, since
/// both commands may remove the destination.
pub(crate) fn project_dir(cwd: &Path, name: &str) -> Result<PathBuf> {
    if name.trim().is_empty() {
        bail!("No project directory given.");
    }

    let relative = Path::new(name);
    let mut named = false;
    for component in relative.components() {
        match component {
            Component::Normal(_) => named = true,
            Component::CurDir => {}
            _ => bail!(
                "Project directory '{}' must be a relative path inside the current directory.",
                name
            ),
        }
    }
    let dest = cwd.join(relative);
    if !named {
        bail!("Refusing to use '{}': it is the current directory.", dest.display());
    }

    let resolved = dest.canonicalize().unwrap_or_else(|_| dest.clone());
    let here = cwd.canonicalize().unwrap_or_else(|_| cwd.to_path_buf());
    if here.starts_with(&resolved) {
        bail!("Refusing to use '{}': it contains the current directory.", dest.display());
    }
    Ok(dest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_plain_names_stay_under_cwd() {
        let cwd = TempDir::new().unwrap();
        assert_eq!(project_dir(cwd.path(), "my-app").unwrap(), cwd.path().join("my-app"));
        assert_eq!(
            project_dir(cwd.path(), "apps/web").unwrap(),
            cwd.path().join("apps/web")
        );
        assert_eq!(project_dir(cwd.path(), "./my-app").unwrap(), cwd.path().join("my-app"));
    }

    #[test]
    fn test_absolute_and_parent_names_are_rejected() {
        let cwd = TempDir::new().unwrap();
        let elsewhere = TempDir::new().unwrap();

        for name in [
            elsewhere.path().display().to_string(),
            "../sibling".to_string(),
            "apps/../../sibling".to_string(),
        ] {
            let msg = project_dir(cwd.path(), &name).unwrap_err().to_string();
            assert!(msg.contains("relative path"), "{}: {}", name, msg);
        }
    }

    #[test]
    fn test_current_directory_is_rejected() {
        let cwd = TempDir::new().unwrap();
        for name in [".", "./", "", "  "] {
            assert!(project_dir(cwd.path(), name).is_err(), "{:?} should be refused", name);
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_to_ancestor_is_rejected() {
        let cwd = TempDir::new().unwrap();
        std::os::unix::fs::symlink(cwd.path(), cwd.path().join("loop")).unwrap();

        let msg = project_dir(cwd.path(), "loop").unwrap_err().to_string();
        assert!(msg.contains("contains the current directory"), "Got: {}", msg);
    }
}
