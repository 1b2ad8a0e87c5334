//! Filesystem access for the walker
//!
//! The walker core never touches the filesystem directly. It talks to a
//! [`DirectoryEnumerator`], which lists the immediate children of a node and
//! tags each one as a directory (expandable) or a file (matchable). The
//! production implementation wraps `std::fs::read_dir`; tests substitute
//! synthetic in-memory trees.
//!
//! Enumeration is best-effort over a live filesystem: a directory that
//! cannot be opened (permission denied, removed mid-walk) yields zero
//! children rather than an error. No retries - the source data is not
//! assumed stable enough for a retry to mean anything.

use std::fs;
use std::io;
use std::path::Path;
use tracing::debug;

/// Kind of a directory child, as reported by the enumerator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A plain directory - will be expanded
    Directory,
    /// Anything else (regular file, symlink, device, ...) - will be matched
    File,
}

/// One child of a directory
#[derive(Debug, Clone)]
pub struct ChildEntry {
    /// Local name within the parent directory
    pub name: String,

    /// Directory or file
    pub kind: EntryKind,
}

impl ChildEntry {
    /// Create a child entry
    pub fn new(name: impl Into<String>, kind: EntryKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Lists the immediate children of a directory
///
/// Each call yields a fresh, finite listing over current filesystem state.
/// Implementations must yield nothing for an unreadable node rather than
/// signal a hard error.
pub trait DirectoryEnumerator: Send + Sync {
    /// List the children of `path`, tagged by kind
    fn children_of(&self, path: &str) -> Vec<ChildEntry>;
}

/// Enumerator backed by `std::fs::read_dir`
///
/// Symlinks are reported as files even when they point at directories, so
/// they are never expanded. This keeps the traversal on a tree (no cycles
/// through symlink loops) and matches the classification the OS readdir
/// type tag gives.
pub struct OsEnumerator;

impl DirectoryEnumerator for OsEnumerator {
    fn children_of(&self, path: &str) -> Vec<ChildEntry> {
        let read_dir = match fs::read_dir(path) {
            Ok(rd) => rd,
            Err(e) => {
                debug!(path = %path, error = %e, "Directory unreadable, skipping");
                return Vec::new();
            }
        };

        let mut children = Vec::new();
        for entry in read_dir {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    debug!(path = %path, error = %e, "Unreadable entry, skipping");
                    continue;
                }
            };

            let kind = match entry.file_type() {
                Ok(ft) if ft.is_dir() => EntryKind::Directory,
                Ok(_) => EntryKind::File,
                Err(e) => {
                    // Entry vanished between readdir and stat - skip it
                    debug!(path = %path, error = %e, "Entry type unavailable, skipping");
                    continue;
                }
            };

            children.push(ChildEntry::new(
                entry.file_name().to_string_lossy().into_owned(),
                kind,
            ));
        }

        children
    }
}

/// Join a parent identifier and a child's local name into the child's
/// identifier
///
/// A single trailing path separator on either part is normalized away, so
/// joining never produces a doubled separator.
pub fn join_child(parent: &str, name: &str) -> String {
    let name = name.strip_suffix('/').unwrap_or(name);
    let parent = if parent != "/" {
        parent.strip_suffix('/').unwrap_or(parent)
    } else {
        parent
    };

    if parent == "/" {
        format!("/{}", name)
    } else {
        format!("{}/{}", parent, name)
    }
}

/// Resolve a user-supplied root path into an absolute identifier string
///
/// Relative paths are resolved against the current working directory.
pub fn absolutize(path: &Path) -> io::Result<String> {
    let abs = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };

    let mut s = abs.to_string_lossy().into_owned();
    while s.len() > 1 && s.ends_with('/') {
        s.pop();
    }
    Ok(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::tempdir;

    #[test]
    fn test_join_child() {
        assert_eq!(join_child("/data", "sub"), "/data/sub");
        assert_eq!(join_child("/data/", "sub"), "/data/sub");
        assert_eq!(join_child("/data", "sub/"), "/data/sub");
        assert_eq!(join_child("/", "etc"), "/etc");
    }

    #[test]
    fn test_os_enumerator_lists_children() {
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join("subdir")).unwrap();
        File::create(dir.path().join("file.txt")).unwrap();

        let children = OsEnumerator.children_of(&dir.path().to_string_lossy());
        assert_eq!(children.len(), 2);

        let sub = children.iter().find(|c| c.name == "subdir").unwrap();
        assert_eq!(sub.kind, EntryKind::Directory);

        let file = children.iter().find(|c| c.name == "file.txt").unwrap();
        assert_eq!(file.kind, EntryKind::File);
    }

    #[test]
    fn test_os_enumerator_missing_dir_is_empty() {
        let children = OsEnumerator.children_of("/definitely/not/a/real/path");
        assert!(children.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_dir_is_a_file() {
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join("real")).unwrap();
        std::os::unix::fs::symlink(dir.path().join("real"), dir.path().join("link")).unwrap();

        let children = OsEnumerator.children_of(&dir.path().to_string_lossy());
        let link = children.iter().find(|c| c.name == "link").unwrap();
        assert_eq!(link.kind, EntryKind::File);
    }

    #[test]
    fn test_absolutize_strips_trailing_slash() {
        let dir = tempdir().unwrap();
        let with_slash = format!("{}/", dir.path().to_string_lossy());
        let abs = absolutize(Path::new(&with_slash)).unwrap();
        assert!(!abs.ends_with('/'));
    }
}
