//! Output directory reset.
//!
//! The output directory belongs to a single generation run: it is created
//! or emptied before any page is written. An existing directory is only
//! wiped when deletion is forced, and a path that is not a directory is
//! never deleted. A symlink to a directory counts as an existing output
//! directory, but a forced wipe refuses to delete through it.
//!
//! A forced wipe first renames the old directory into a scratch directory
//! next to it, recreates the output directory, then deletes the scratch
//! copy. The rename is a single filesystem operation, so an interrupted run
//! never leaves a half-deleted output directory behind. When the rename is
//! not possible (e.g. across mount points) the directory is deleted in
//! place, which is not atomic.

use std::fs;
use std::io;
use std::path::Path;

use crate::BuildError;

/// Prefix of the scratch directory holding a directory being deleted.
const TRASH_PREFIX: &str = ".stencil-trash-";

/// Result of [`reset_output_directory`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResetOutcome {
    /// The directory did not exist and was created.
    Created,
    /// The directory existed and was emptied.
    Recreated,
    /// The directory exists and was left untouched because deletion was
    /// not forced.
    Exists,
}

impl ResetOutcome {
    /// Returns `true` if the directory is now empty and ready for output.
    #[must_use]
    pub fn is_reset(self) -> bool {
        !matches!(self, Self::Exists)
    }
}

/// Create or empty the output directory at `path`.
///
/// # Errors
///
/// Returns [`BuildError::DestinationConflict`] if `path` exists and is not a
/// directory, or is a symlink and deletion is forced. Returns
/// [`BuildError::Io`] if `path` is empty or a filesystem operation fails.
pub fn reset_output_directory(path: &Path, force_deletion: bool) -> Result<ResetOutcome, BuildError> {
    if path.as_os_str().is_empty() {
        return Err(io::Error::new(io::ErrorKind::NotFound, "output directory path is empty").into());
    }

    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            fs::create_dir_all(path)?;
            return Ok(ResetOutcome::Created);
        }
        Err(e) => return Err(e.into()),
    };

    if !force_deletion {
        return match fs::metadata(path) {
            Ok(target) if target.is_dir() => Ok(ResetOutcome::Exists),
            _ => Err(BuildError::DestinationConflict(path.to_path_buf())),
        };
    }
    if !metadata.is_dir() {
        return Err(BuildError::DestinationConflict(path.to_path_buf()));
    }
    if path.file_name().is_none() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("refusing to delete {}", path.display()),
        )
        .into());
    }

    wipe_directory(path)?;
    Ok(ResetOutcome::Recreated)
}

/// Replace the directory at `path` with an empty one.
fn wipe_directory(path: &Path) -> io::Result<()> {
    let trash = tempfile::Builder::new()
        .prefix(TRASH_PREFIX)
        .tempdir_in(parent_dir(path));

    if let Ok(trash) = trash
        && fs::rename(path, trash.path().join("old")).is_ok()
    {
        fs::create_dir(path)?;
        return trash.close();
    }

    fs::remove_dir_all(path)?;
    fs::create_dir(path)
}

/// Directory containing `path`, `.` for bare relative names.
pub(crate) fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("a/b/output");

        let outcome = reset_output_directory(&out, false).unwrap();

        assert_eq!(outcome, ResetOutcome::Created);
        assert!(out.is_dir());
    }

    #[test]
    fn test_existing_directory_without_force_is_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("output");
        fs::create_dir(&out).unwrap();
        fs::write(out.join("keep.html"), "keep").unwrap();

        let outcome = reset_output_directory(&out, false).unwrap();

        assert_eq!(outcome, ResetOutcome::Exists);
        assert!(!outcome.is_reset());
        assert_eq!(fs::read_to_string(out.join("keep.html")).unwrap(), "keep");
    }

    #[test]
    fn test_existing_directory_with_force_is_emptied() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("output");
        fs::create_dir_all(out.join("nested/deeper")).unwrap();
        fs::write(out.join("old.html"), "old").unwrap();
        fs::write(out.join("nested/deeper/file"), "x").unwrap();

        let outcome = reset_output_directory(&out, true).unwrap();

        assert_eq!(outcome, ResetOutcome::Recreated);
        assert!(outcome.is_reset());
        assert!(out.is_dir());
        assert!(entries(&out).is_empty());
        // No scratch directory left behind
        assert_eq!(entries(dir.path()), vec!["output".to_owned()]);
    }

    #[test]
    fn test_file_is_destination_conflict() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("output");
        fs::write(&out, "not a directory").unwrap();

        let err = reset_output_directory(&out, true).unwrap_err();

        assert!(
            matches!(err, BuildError::DestinationConflict(ref p) if *p == out),
            "Expected DestinationConflict, got {err:?}"
        );
        assert_eq!(fs::read_to_string(&out).unwrap(), "not a directory");
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_is_destination_conflict() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("target");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep"), "").unwrap();
        let link = dir.path().join("output");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        let err = reset_output_directory(&link, true).unwrap_err();

        assert!(matches!(err, BuildError::DestinationConflict(_)));
        assert!(target.join("keep").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_without_force_exists() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("target");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep"), "").unwrap();
        let link = dir.path().join("output");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        let outcome = reset_output_directory(&link, false).unwrap();

        assert_eq!(outcome, ResetOutcome::Exists);
        assert!(target.join("keep").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_without_force_is_destination_conflict() {
        let dir = tempfile::tempdir().unwrap();
        let link = dir.path().join("output");
        std::os::unix::fs::symlink(dir.path().join("missing"), &link).unwrap();

        let err = reset_output_directory(&link, false).unwrap_err();

        assert!(matches!(err, BuildError::DestinationConflict(ref p) if *p == link));
    }

    #[test]
    fn test_file_without_force_is_destination_conflict() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("output");
        fs::write(&out, "not a directory").unwrap();

        let err = reset_output_directory(&out, false).unwrap_err();

        assert!(matches!(err, BuildError::DestinationConflict(_)));
    }

    #[test]
    fn test_empty_path_is_not_found() {
        let err = reset_output_directory(Path::new(""), false).unwrap_err();
        assert!(
            matches!(err, BuildError::Io(ref e) if e.kind() == io::ErrorKind::NotFound),
            "Expected NotFound, got {err:?}"
        );
    }

    #[test]
    fn test_parent_dir() {
        assert_eq!(parent_dir(Path::new("output")), Path::new("."));
        assert_eq!(parent_dir(Path::new("site/output")), Path::new("site"));
        assert_eq!(parent_dir(Path::new("/tmp/output")), Path::new("/tmp"));
    }
}
