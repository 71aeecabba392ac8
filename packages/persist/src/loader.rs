//! Loading persisted bodies, with the not-found fallback.

use std::fs;
use std::io;
use std::path::PathBuf;

use bodystore_types::{PersistSpec, Request};

use crate::error::{IoOp, PersistError};
use crate::store::FileBodyStore;

/// Body returned when a route configures no fallback body.
pub const DEFAULT_NOT_FOUND_BODY: &str = "Not Found";

/// Result of a load that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Loaded {
    /// The file existed. `body` is its rendered content.
    Found { path: PathBuf, body: String },
    /// The file was missing and the fallback was synthesized.
    NotFound {
        path: PathBuf,
        body: String,
        status_code: u16,
    },
}

impl Loaded {
    pub fn body(&self) -> &str {
        match self {
            Loaded::Found { body, .. } | Loaded::NotFound { body, .. } => body,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Loaded::Found { .. })
    }
}

impl FileBodyStore {
    /// Read the body `spec` names.
    ///
    /// Resolving either fails (sandbox or I/O) or yields a path; a stat on
    /// that path then decides between the fallback, a read, or an error.
    pub fn load(&self, spec: &PersistSpec, request: &Request) -> Result<Loaded, PersistError> {
        let path = self.resolver().resolve(&spec.name, request)?.path;

        match fs::metadata(&path) {
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::debug!("{} not found, using fallback", path.display());
                Ok(self.not_found(spec, request, path))
            }
            Err(source) => Err(PersistError::io(IoOp::Stat, path, source)),
            Ok(_) => {
                log::debug!("Reading {}...", path.display());
                let content = fs::read(&path)
                    .map_err(|source| PersistError::io(IoOp::Read, &path, source))?;
                // Stored bodies are raw bytes; invalid UTF-8 is replaced, not rejected.
                let content = String::from_utf8_lossy(&content);
                let body = self
                    .templater()
                    .render_body(request, &content, &spec.body_append);
                Ok(Loaded::Found { path, body })
            }
        }
    }

    fn not_found(&self, spec: &PersistSpec, request: &Request, path: PathBuf) -> Loaded {
        let fallback = &spec.not_found;

        let body = if fallback.body.is_empty() {
            DEFAULT_NOT_FOUND_BODY.to_string()
        } else {
            self.templater()
                .render_body(request, &fallback.body, &fallback.body_append)
        };
        let status_code = fallback
            .status_override()
            .unwrap_or(http::StatusCode::NOT_FOUND.as_u16());

        Loaded::NotFound {
            path,
            body,
            status_code,
        }
    }
}
