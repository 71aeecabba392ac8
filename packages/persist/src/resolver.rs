//! Sandboxed path resolution.
//!
//! A name template is substituted against the request, joined with the
//! sandbox root and normalized. `..` segments that climb above the root are
//! rejected before anything touches the filesystem. Symlinks are then
//! resolved so a link inside the root cannot point a write or read outside
//! of it.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use bodystore_types::Request;

use crate::error::{IoOp, PersistError};
use crate::template::Templater;

/// Linux gives up on symlink chains at the same depth.
const MAX_SYMLINK_HOPS: usize = 40;

/// A file name resolved against a request and contained in the sandbox root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    /// The template after substitution.
    pub name: String,
    /// Absolute path inside the sandbox root.
    pub path: PathBuf,
}

impl ResolvedPath {
    /// True when the substituted name names no file, only the root itself.
    pub fn is_empty(&self) -> bool {
        lexical_relative(Path::new(&self.name)).is_some_and(|p| p.as_os_str().is_empty())
    }
}

pub struct PathResolver {
    root: PathBuf,
    templater: Arc<dyn Templater>,
}

impl PathResolver {
    /// `root` must already be canonical.
    pub(crate) fn new(root: PathBuf, templater: Arc<dyn Templater>) -> Self {
        Self { root, templater }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn templater(&self) -> &dyn Templater {
        self.templater.as_ref()
    }

    pub fn resolve(&self, template: &str, request: &Request) -> Result<ResolvedPath, PersistError> {
        let name = self.templater.substitute(request, template);
        let path = self.contain(&name)?;
        log::debug!("Resolved {:?} to {}", template, path.display());
        Ok(ResolvedPath { name, path })
    }

    /// Map an already substituted name to a path inside the root.
    pub fn contain(&self, name: &str) -> Result<PathBuf, PersistError> {
        let relative = lexical_relative(Path::new(name))
            .ok_or_else(|| self.violation(self.root.join(name)))?;
        let candidate = self.root.join(relative);

        let resolved = resolve_links(&candidate)
            .map_err(|source| PersistError::io(IoOp::Resolve, &candidate, source))?;

        if !resolved.starts_with(&self.root) {
            return Err(self.violation(resolved));
        }
        Ok(resolved)
    }

    fn violation(&self, path: PathBuf) -> PersistError {
        PersistError::SandboxViolation {
            path,
            root: self.root.clone(),
        }
    }
}

/// Normalize `name` as a path relative to the root. Leading separators are
/// ignored. Returns `None` when `..` would climb above the root.
fn lexical_relative(name: &Path) -> Option<PathBuf> {
    let mut relative = PathBuf::new();
    for component in name.components() {
        match component {
            Component::Prefix(_) | Component::RootDir | Component::CurDir => {}
            Component::ParentDir => {
                if !relative.pop() {
                    return None;
                }
            }
            Component::Normal(part) => relative.push(part),
        }
    }
    Some(relative)
}

/// Lexically normalize an absolute path, clamping `..` at the filesystem root.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Canonicalize the longest existing prefix of `path` and re-append the rest.
///
/// A symlink that does not canonicalize (dangling, or part of a chain) is
/// followed to its target so the final path reflects where a create would
/// actually land.
fn resolve_links(path: &Path) -> io::Result<PathBuf> {
    let mut current = path.to_path_buf();
    let mut rest: Vec<OsString> = Vec::new();
    let mut hops = 0;

    loop {
        match current.canonicalize() {
            Ok(mut resolved) => {
                for part in rest.iter().rev() {
                    resolved.push(part);
                }
                return Ok(resolved);
            }
            Err(err) => match fs::symlink_metadata(&current) {
                Ok(meta) if meta.file_type().is_symlink() => {
                    hops += 1;
                    if hops > MAX_SYMLINK_HOPS {
                        return Err(io::Error::other(format!(
                            "too many levels of symbolic links: {}",
                            path.display()
                        )));
                    }
                    let target = fs::read_link(&current)?;
                    let base = current.parent().map(Path::to_path_buf).unwrap_or_default();
                    current = normalize(&base.join(target));
                }
                Ok(_) => return Err(err),
                // No such entry: climb to the parent and try again.
                Err(_) => match (current.parent(), current.file_name()) {
                    (Some(parent), Some(file_name)) => {
                        rest.push(file_name.to_os_string());
                        current = parent.to_path_buf();
                    }
                    _ => return Err(err),
                },
            },
        }
    }
}
