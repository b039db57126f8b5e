//! Path Confinement
//!
//! Every path an LLM hands us is resolved against a single workspace root and
//! rejected if it lands outside of it. The root is canonicalized once when the
//! guard is built; candidates are then resolved lexically, with `.` and `..`
//! segments folded without touching the filesystem, so `a/../../b` is judged
//! by where it actually points rather than by how it is spelled.
//!
//! Symlinks inside the workspace are not followed during the check.

use std::fmt;
use std::ops::Deref;
use std::path::{Component, Path, PathBuf};

use crate::error::{CoreError, CoreResult};

/// A path that has been resolved and verified to live under the workspace root.
///
/// Carries no information about whether the target exists.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConfinedPath {
    path: PathBuf,
}

impl ConfinedPath {
    /// The resolved absolute path.
    pub fn as_path(&self) -> &Path {
        &self.path
    }

    pub fn into_path_buf(self) -> PathBuf {
        self.path
    }
}

impl Deref for ConfinedPath {
    type Target = Path;

    fn deref(&self) -> &Path {
        &self.path
    }
}

impl AsRef<Path> for ConfinedPath {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}

impl fmt::Display for ConfinedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

/// Confines candidate paths to a workspace root.
///
/// The root is made absolute and canonicalized once at construction; `confine`
/// itself performs no I/O and can be shared freely across tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathGuard {
    root: PathBuf,
    /// The root as configured, when it differs from the canonical form
    /// (for example a root reached through a symlink).
    alias: Option<PathBuf>,
}

impl PathGuard {
    /// Build a guard for `root`. A relative root is resolved against the
    /// current working directory. A root that does not exist yet keeps its
    /// normalized form.
    pub fn new(root: impl AsRef<Path>) -> CoreResult<Self> {
        let root = root.as_ref();
        if root.as_os_str().is_empty() {
            return Err(CoreError::config("workspace root must not be empty"));
        }
        let absolute = if root.is_absolute() {
            root.to_path_buf()
        } else {
            std::env::current_dir()?.join(root)
        };
        let lexical = normalize(&absolute);

        let canonical = match std::fs::canonicalize(&lexical) {
            Ok(path) => path,
            Err(e) => {
                tracing::debug!("Workspace root {} not canonicalized: {}", lexical.display(), e);
                lexical.clone()
            }
        };
        let alias = (canonical != lexical).then_some(lexical);

        Ok(Self {
            root: canonical,
            alias,
        })
    }

    /// Guard rooted at the process working directory.
    pub fn current_dir() -> CoreResult<Self> {
        Self::new(std::env::current_dir()?)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve `candidate` and verify it stays under the root.
    ///
    /// Absolute candidates are normalized as-is; relative ones are joined onto
    /// the root first. The root itself is an accepted result.
    pub fn confine(&self, candidate: &str) -> CoreResult<ConfinedPath> {
        let candidate_path = Path::new(candidate);
        let joined = if candidate_path.is_absolute() {
            candidate_path.to_path_buf()
        } else {
            self.root.join(candidate_path)
        };
        let resolved = normalize(&joined);

        if resolved.starts_with(&self.root) {
            return Ok(ConfinedPath { path: resolved });
        }

        // Spelled through the configured root; rebase onto the canonical one.
        if let Some(alias) = &self.alias {
            if let Ok(rest) = resolved.strip_prefix(alias) {
                return Ok(ConfinedPath {
                    path: self.root.join(rest),
                });
            }
        }

        Err(CoreError::out_of_bounds(
            candidate,
            self.root.display().to_string(),
        ))
    }

    /// Path of `confined` relative to the root, for human-readable messages.
    pub fn relative<'a>(&self, confined: &'a ConfinedPath) -> &'a Path {
        confined
            .as_path()
            .strip_prefix(&self.root)
            .unwrap_or_else(|_| confined.as_path())
    }
}

/// Shorthand for a one-off confinement check.
pub fn confine(root: impl AsRef<Path>, candidate: &str) -> CoreResult<ConfinedPath> {
    PathGuard::new(root)?.confine(candidate)
}

/// Lexically fold `.` and `..` segments. `..` at the filesystem root stays at
/// the root, matching how operating systems treat `/..`.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                let at_root = out.parent().is_none();
                if !at_root {
                    out.pop();
                }
            }
            Component::Normal(segment) => out.push(segment),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guard() -> PathGuard {
        PathGuard::new("/workspace/project").unwrap()
    }

    #[test]
    fn test_relative_path_inside_root() {
        let confined = guard().confine("src/index.js").unwrap();
        assert_eq!(confined.as_path(), Path::new("/workspace/project/src/index.js"));
    }

    #[test]
    fn test_current_dir_is_root() {
        let confined = guard().confine(".").unwrap();
        assert_eq!(confined.as_path(), Path::new("/workspace/project"));
    }

    #[test]
    fn test_empty_candidate_is_root() {
        let confined = guard().confine("").unwrap();
        assert_eq!(confined.as_path(), Path::new("/workspace/project"));
    }

    #[test]
    fn test_parent_traversal_rejected() {
        let err = guard().confine("../outside.txt").unwrap_err();
        assert!(err.is_out_of_bounds());
    }

    #[test]
    fn test_deep_traversal_rejected() {
        assert!(guard().confine("../../../etc/passwd").is_err());
    }

    #[test]
    fn test_embedded_traversal_rejected() {
        assert!(guard().confine("src/../../outside.js").is_err());
    }

    #[test]
    fn test_embedded_traversal_that_stays_inside_is_accepted() {
        let confined = guard().confine("src/../lib/./mod.rs").unwrap();
        assert_eq!(confined.as_path(), Path::new("/workspace/project/lib/mod.rs"));
    }

    #[test]
    fn test_absolute_outside_rejected() {
        assert!(guard().confine("/etc/passwd").is_err());
    }

    #[test]
    fn test_absolute_inside_accepted() {
        let confined = guard().confine("/workspace/project/a/b.txt").unwrap();
        assert_eq!(confined.as_path(), Path::new("/workspace/project/a/b.txt"));
    }

    #[test]
    fn test_sibling_with_shared_prefix_rejected() {
        // "/workspace/project-evil" shares a string prefix but not a component prefix
        assert!(guard().confine("/workspace/project-evil/x").is_err());
    }

    #[test]
    fn test_dotdot_prefixed_file_name_is_not_traversal() {
        let confined = guard().confine("..hidden").unwrap();
        assert_eq!(confined.as_path(), Path::new("/workspace/project/..hidden"));
    }

    #[test]
    fn test_root_normalized_once() {
        let guard = PathGuard::new("/workspace/./project/sub/..").unwrap();
        assert_eq!(guard.root(), Path::new("/workspace/project"));
    }

    #[test]
    fn test_empty_root_rejected() {
        assert!(PathGuard::new("").is_err());
    }

    #[test]
    fn test_relative_root_made_absolute() {
        let guard = PathGuard::new("some/dir").unwrap();
        assert!(guard.root().is_absolute());
        assert!(guard.root().ends_with("some/dir"));
    }

    #[test]
    fn test_relative_display() {
        let g = guard();
        let confined = g.confine("a/b.txt").unwrap();
        assert_eq!(g.relative(&confined), Path::new("a/b.txt"));
    }

    #[test]
    fn test_free_function_confine() {
        assert!(confine("/workspace", "x.txt").is_ok());
        assert!(confine("/workspace", "../x.txt").is_err());
    }

    #[test]
    fn test_normalize_parent_at_filesystem_root() {
        assert_eq!(normalize(Path::new("/../..")), PathBuf::from("/"));
    }

    #[test]
    fn test_confined_results_always_under_root() {
        let g = guard();
        let candidates = [
            "a", "a/b/c", "../a", "./../a", "a/../../b", "/", "/workspace",
            "/workspace/project/../project/x", "x/./y/../../..", "....", "a/..",
        ];
        for candidate in candidates {
            if let Ok(confined) = g.confine(candidate) {
                assert!(
                    confined.as_path().starts_with(g.root()),
                    "{candidate} escaped to {confined}"
                );
            }
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_root_accepts_both_spellings() {
        let dir = tempfile::TempDir::new().unwrap();
        let real = dir.path().join("real");
        std::fs::create_dir(&real).unwrap();
        let link = dir.path().join("link");
        std::os::unix::fs::symlink(&real, &link).unwrap();

        let g = PathGuard::new(&link).unwrap();
        let canonical_real = std::fs::canonicalize(&real).unwrap();
        assert_eq!(g.root(), canonical_real.as_path());

        let via_real = g.confine(canonical_real.join("a.txt").to_str().unwrap()).unwrap();
        assert_eq!(via_real.as_path(), canonical_real.join("a.txt"));

        let via_link = g.confine(link.join("a.txt").to_str().unwrap()).unwrap();
        assert_eq!(via_link, via_real);

        assert_eq!(g.confine("a.txt").unwrap(), via_real);
        assert!(g.confine(link.join("../outside.txt").to_str().unwrap()).is_err());
        assert!(g.confine(dir.path().join("other.txt").to_str().unwrap()).is_err());
    }

    #[test]
    fn test_missing_root_keeps_lexical_form() {
        let g = PathGuard::new("/nexus-agent-missing-root/./ws").unwrap();
        assert_eq!(g.root(), Path::new("/nexus-agent-missing-root/ws"));
    }
}
