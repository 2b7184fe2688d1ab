//! Prior-version resolution from git
//!
//! Finds the repository containing a working-tree file and reads the file's
//! content as of a revision. Paths reached through symlinks are
//! canonicalized before being made relative to the repository root, so a
//! checkout mounted at `/var/...` but reported by git as `/private/var/...`
//! still resolves.
//!
//! When the repository root cannot be determined the literal path is handed
//! to git unchanged.

use std::env;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use git2::Repository;
use serde::{Deserialize, Serialize};

use crate::content::TypedContent;
use crate::error::{CheckError, Result};

/// Revision used when none is given
pub const DEFAULT_REVISION: &str = "HEAD";

/// The two repository operations the resolver needs
pub trait GitBackend: Send + Sync {
    /// Top-level directory of the repository containing `dir`, or `None`
    /// when `dir` is not inside a repository
    fn toplevel(&self, dir: &Path) -> Result<Option<PathBuf>>;

    /// Content of `path` at `revision`, or `None` when the revision does
    /// not contain it. `root` is the repository root when known, and `path`
    /// is relative to it with `/` separators; otherwise `path` is the file
    /// path as the user gave it.
    fn show(&self, root: Option<&Path>, revision: &str, path: &str) -> Result<Option<String>>;
}

/// Which [`GitBackend`] to use
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GitBackendKind {
    /// Spawn the `git` executable
    #[default]
    Cli,
    /// Read repositories in-process
    Libgit2,
}

/// Runs the `git` executable.
///
/// Every call waits for the child to exit with stdout and stderr fully
/// captured, so no pipe is ever left unread.
#[derive(Debug, Clone)]
pub struct GitCli {
    program: String,
}

impl GitCli {
    pub fn new(program: impl Into<String>) -> Self {
        Self { program: program.into() }
    }

    fn run(&self, dir: Option<&Path>, args: &[&str]) -> Result<Output> {
        let mut command = Command::new(&self.program);
        command.args(args).stdin(Stdio::null());
        if let Some(dir) = dir {
            command.current_dir(dir);
        }
        tracing::debug!(program = %self.program, ?args, ?dir, "running git");
        command.output().map_err(|source| CheckError::Git {
            program: self.program.clone(),
            source,
        })
    }
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new("git")
    }
}

impl GitBackend for GitCli {
    fn toplevel(&self, dir: &Path) -> Result<Option<PathBuf>> {
        let output = self.run(Some(dir), &["rev-parse", "--show-toplevel"])?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        let root = stdout.trim();
        if !output.status.success() || root.is_empty() {
            return Ok(None);
        }
        Ok(Some(PathBuf::from(root)))
    }

    fn show(&self, root: Option<&Path>, revision: &str, path: &str) -> Result<Option<String>> {
        let object = format!("{}:{}", revision, path);
        let output = self.run(root, &["show", &object])?;
        if !output.status.success() {
            tracing::debug!(
                %object,
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "git show failed"
            );
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(&output.stdout).into_owned()))
    }
}

/// Reads repositories through libgit2
#[derive(Debug, Clone, Copy, Default)]
pub struct LibGit2;

impl GitBackend for LibGit2 {
    fn toplevel(&self, dir: &Path) -> Result<Option<PathBuf>> {
        Ok(Repository::discover(dir)
            .ok()
            .and_then(|repo| repo.workdir().map(Path::to_path_buf)))
    }

    fn show(&self, root: Option<&Path>, revision: &str, path: &str) -> Result<Option<String>> {
        let repo = match root {
            Some(root) => Repository::open(root)?,
            None => match Repository::discover(".") {
                Ok(repo) => repo,
                Err(_) => return Ok(None),
            },
        };

        let object = format!("{}:{}", revision, path);
        let blob = repo
            .revparse_single(&object)
            .and_then(|object| object.peel_to_blob());
        match blob {
            Ok(blob) => Ok(Some(String::from_utf8_lossy(blob.content()).into_owned())),
            Err(e) => {
                tracing::debug!(%object, error = %e, "revision lookup failed");
                Ok(None)
            }
        }
    }
}

/// Where a working-tree file lives inside its repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevisionPath {
    /// Canonical repository root, `None` when it could not be resolved
    pub root: Option<PathBuf>,
    /// Path handed to git: root-relative and `/`-separated, or the path as
    /// given when no root contains the file
    pub path: String,
}

/// Resolves working-tree files to their content at a revision
pub struct VersionResolver {
    backend: Box<dyn GitBackend>,
}

impl VersionResolver {
    pub fn new(backend: impl GitBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
        }
    }

    pub fn with_kind(kind: GitBackendKind, program: &str) -> Self {
        match kind {
            GitBackendKind::Cli => Self::new(GitCli::new(program)),
            GitBackendKind::Libgit2 => Self::new(LibGit2),
        }
    }

    /// Locate `file` inside its repository
    pub fn revision_path(&self, file: &Path) -> Result<RevisionPath> {
        let absolute = if file.is_absolute() {
            file.to_path_buf()
        } else {
            env::current_dir()?.join(file)
        };
        let parent = absolute.parent().unwrap_or(&absolute);

        let root = self
            .backend
            .toplevel(parent)?
            .map(|root| root.canonicalize().unwrap_or(root));

        let real_file = absolute
            .canonicalize()
            .map_err(|source| CheckError::FileUnreadable {
                path: file.to_path_buf(),
                source,
            })?;

        let Some(root) = root else {
            tracing::warn!(
                path = %file.display(),
                "repository root not found, using the literal path"
            );
            return Ok(RevisionPath {
                root: None,
                path: file.to_string_lossy().into_owned(),
            });
        };

        match real_file.strip_prefix(&root) {
            Ok(relative) => Ok(RevisionPath {
                path: slash_path(relative),
                root: Some(root),
            }),
            Err(_) => {
                tracing::warn!(
                    path = %real_file.display(),
                    root = %root.display(),
                    "file is outside the repository root, using the literal path"
                );
                Ok(RevisionPath {
                    root: Some(root),
                    path: file.to_string_lossy().into_owned(),
                })
            }
        }
    }

    /// Content of `file` at `revision` (default `HEAD`).
    ///
    /// # Errors
    ///
    /// [`CheckError::RevisionContentUnavailable`] when the revision does not
    /// contain the file, which is expected for files added by the change
    /// under review.
    pub fn resolve(
        &self,
        file: &Path,
        revision: Option<&str>,
        content_type: &'static str,
    ) -> Result<TypedContent> {
        let revision = revision.unwrap_or(DEFAULT_REVISION);
        let location = self.revision_path(file)?;
        tracing::debug!(
            %revision,
            path = %location.path,
            root = ?location.root,
            "resolving previous version"
        );

        match self.backend.show(location.root.as_deref(), revision, &location.path)? {
            Some(content) => Ok(TypedContent::new(content, content_type)),
            None => Err(CheckError::RevisionContentUnavailable {
                revision: revision.to_string(),
                path: file.display().to_string(),
            }),
        }
    }
}

impl Default for VersionResolver {
    fn default() -> Self {
        Self::new(GitCli::default())
    }
}

/// Join the components of a root-relative path with `/`, whatever the host
/// separator
fn slash_path(path: &Path) -> String {
    path.components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
