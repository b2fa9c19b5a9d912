//! Resource-directory sandboxing for Drafter's file tools.
//!
//! Every file the document tools touch lives directly under one resource
//! root. Two independent checks gate every operation:
//!
//! 1. The filename must match `^[\w\-.]+$` — no path separators, no
//!    traversal components.
//! 2. The resolved path must remain inside the resolved root, even when
//!    symlinks or platform path quirks are involved.
//!
//! Both checks run before any filesystem read or write of the target.

use drafter_core::error::SandboxError;
use regex_lite::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

fn filename_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[\w\-.]+$").expect("filename pattern is valid"))
}

/// Check a filename against the allowed pattern.
///
/// Letters, digits, underscore, dash, and dot only. `.` and `..` are
/// rejected outright even though they match the pattern.
pub fn is_valid_filename(filename: &str) -> bool {
    if filename == "." || filename == ".." {
        return false;
    }
    filename_pattern().is_match(filename)
}

/// Create the resource root if absent and return its canonical path.
pub fn ensure_root(root: &Path) -> Result<PathBuf, SandboxError> {
    std::fs::create_dir_all(root).map_err(|e| SandboxError::Io {
        path: root.display().to_string(),
        reason: e.to_string(),
    })?;
    root.canonicalize().map_err(|e| SandboxError::Io {
        path: root.display().to_string(),
        reason: e.to_string(),
    })
}

/// Resolve `filename` inside `root`, enforcing both sandbox checks.
///
/// Returns the absolute target path on success. The target itself may or
/// may not exist; existence is the caller's concern. When the target
/// exists it is canonicalized so a symlink pointing outside the root is
/// caught as an escape.
pub fn resolve_in_root(root: &Path, filename: &str) -> Result<PathBuf, SandboxError> {
    if !is_valid_filename(filename) {
        return Err(SandboxError::InvalidFilename(filename.to_string()));
    }

    let canonical_root = root.canonicalize().map_err(|e| SandboxError::Io {
        path: root.display().to_string(),
        reason: e.to_string(),
    })?;

    let candidate = canonical_root.join(filename);

    // Canonicalize the candidate when the name is present at all — checked
    // with symlink_metadata, which does not follow links, so a dangling
    // symlink is still caught. A fresh file under an already-canonical root
    // needs no further resolution.
    let resolved = match std::fs::symlink_metadata(&candidate) {
        Err(_) => candidate,
        Ok(meta) => match candidate.canonicalize() {
            Ok(resolved) => resolved,
            // A dangling symlink cannot be canonicalized; it has no target
            // that can be vetted, so a write through it is unvettable too.
            Err(_) if meta.file_type().is_symlink() => {
                tracing::warn!(filename, "Blocked dangling symlink");
                return Err(SandboxError::PathEscape(filename.to_string()));
            }
            Err(e) => {
                return Err(SandboxError::Io {
                    path: candidate.display().to_string(),
                    reason: e.to_string(),
                })
            }
        },
    };

    if !resolved.starts_with(&canonical_root) {
        tracing::warn!(filename, path = %resolved.display(), "Blocked path escape attempt");
        return Err(SandboxError::PathEscape(filename.to_string()));
    }

    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_filenames_accepted() {
        for name in ["draft.txt", "notes", "a_b-c.2.md", "UPPER.TXT", "1.2.3"] {
            assert!(is_valid_filename(name), "expected '{name}' to be valid");
        }
    }

    #[test]
    fn separators_and_traversal_rejected() {
        for name in [
            "../etc/passwd",
            "a/b.txt",
            "a\\b.txt",
            "/etc/passwd",
            "..",
            ".",
            "",
            "with space.txt",
        ] {
            assert!(!is_valid_filename(name), "expected '{name}' to be invalid");
        }
    }

    #[test]
    fn leading_dotdot_in_name_without_separator_is_allowed_by_pattern() {
        // "..secret" matches the pattern and cannot traverse; containment
        // still holds because there is no separator.
        assert!(is_valid_filename("..secret"));
    }

    #[test]
    fn resolve_keeps_files_inside_root() {
        let dir = tempfile::tempdir().unwrap();
        let resolved = resolve_in_root(dir.path(), "draft.txt").unwrap();
        assert!(resolved.starts_with(dir.path().canonicalize().unwrap()));
        assert!(resolved.ends_with("draft.txt"));
    }

    #[test]
    fn resolve_rejects_invalid_filename_before_touching_fs() {
        // A root that does not exist: the filename check must fire first.
        let missing_root = Path::new("/definitely/not/a/real/root");
        let err = resolve_in_root(missing_root, "../escape").unwrap_err();
        assert!(matches!(err, SandboxError::InvalidFilename(_)));
    }

    #[test]
    fn resolve_rejects_absolute_path_input() {
        let dir = tempfile::tempdir().unwrap();
        let err = resolve_in_root(dir.path(), "/etc/passwd").unwrap_err();
        assert!(matches!(err, SandboxError::InvalidFilename(_)));
    }

    #[cfg(unix)]
    #[test]
    fn resolve_rejects_symlink_escaping_root() {
        let outside = tempfile::tempdir().unwrap();
        let target = outside.path().join("secret.txt");
        std::fs::write(&target, "outside").unwrap();

        let dir = tempfile::tempdir().unwrap();
        std::os::unix::fs::symlink(&target, dir.path().join("sneaky.txt")).unwrap();

        let err = resolve_in_root(dir.path(), "sneaky.txt").unwrap_err();
        assert!(matches!(err, SandboxError::PathEscape(_)));
    }

    #[cfg(unix)]
    #[test]
    fn resolve_rejects_dangling_symlink() {
        // The link target does not exist, so exists() on the candidate is
        // false; the entry itself must still be detected and rejected,
        // otherwise a later write would go through the link.
        let outside = tempfile::tempdir().unwrap();
        let target = outside.path().join("victim.txt");
        assert!(!target.exists());

        let dir = tempfile::tempdir().unwrap();
        std::os::unix::fs::symlink(&target, dir.path().join("sneaky.txt")).unwrap();

        let err = resolve_in_root(dir.path(), "sneaky.txt").unwrap_err();
        assert!(matches!(err, SandboxError::PathEscape(_)));
    }

    #[test]
    fn ensure_root_creates_and_canonicalizes() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("resources");
        assert!(!root.exists());

        let canonical = ensure_root(&root).unwrap();
        assert!(root.is_dir());
        assert!(canonical.is_absolute());

        // Idempotent
        let again = ensure_root(&root).unwrap();
        assert_eq!(canonical, again);
    }
}
