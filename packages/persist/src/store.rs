//! The store itself: bootstrap of the sandbox root and the engine-facing entry points.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use bodystore_types::{PersistSpec, Request, Response};

use crate::config::PersistConfig;
use crate::error::PersistError;
use crate::persister::create_dirs;
use crate::resolver::PathResolver;
use crate::sink;
use crate::template::Templater;

/// Response bodies stored as raw files under a sandbox root.
///
/// The store is `Send + Sync` and holds no locks; the engine can share one
/// instance across request threads. Concurrent writes to the same file are
/// last-writer-wins.
pub struct FileBodyStore {
    resolver: PathResolver,
    config: PersistConfig,
}

impl FileBodyStore {
    /// Create the sandbox root (and its parents) and build the store on top.
    ///
    /// Fails if the root cannot be created, is not a directory, or cannot be
    /// canonicalized. The store is unusable without its root, so callers
    /// should treat this as a startup failure.
    pub fn new(
        config: PersistConfig,
        templater: impl Templater + 'static,
    ) -> Result<FileBodyStore, PersistError> {
        Self::with_shared_templater(config, Arc::new(templater))
    }

    /// Build a store with default modes and delete policy.
    pub fn with_root(
        root: impl Into<PathBuf>,
        templater: impl Templater + 'static,
    ) -> Result<FileBodyStore, PersistError> {
        Self::new(PersistConfig::new(root), templater)
    }

    pub fn with_shared_templater(
        config: PersistConfig,
        templater: Arc<dyn Templater>,
    ) -> Result<FileBodyStore, PersistError> {
        let root = config.root.clone();
        let bootstrap_error = |source: io::Error| PersistError::Bootstrap {
            root: root.clone(),
            source,
        };

        create_dirs(&root, config.dir_mode).map_err(bootstrap_error)?;

        let attr = fs::metadata(&root).map_err(bootstrap_error)?;
        if !attr.is_dir() {
            return Err(bootstrap_error(io::Error::other(
                "Root path must be a directory.",
            )));
        }

        let canonical = root.canonicalize().map_err(bootstrap_error)?;
        log::debug!("Persisting bodies under {}", canonical.display());

        Ok(FileBodyStore {
            resolver: PathResolver::new(canonical, templater),
            config,
        })
    }

    /// Canonical sandbox root.
    pub fn root(&self) -> &Path {
        self.resolver.root()
    }

    pub fn config(&self) -> &PersistConfig {
        &self.config
    }

    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    pub(crate) fn templater(&self) -> &dyn Templater {
        self.resolver.templater()
    }

    /// Persist `response.body` as configured by `response.persisted`.
    ///
    /// On failure the response is rewritten into a 500 carrying the error
    /// text. On success, or when the route persists nothing, it is left as
    /// it was.
    pub fn persist_response(&self, request: &Request, response: &mut Response) {
        let result = self.persist(&response.persisted, request, response.body.as_bytes());
        sink::check(result, response);
    }

    /// Like [`persist_response`](Self::persist_response) with a spec that is
    /// not attached to the response.
    pub fn persist_with(&self, spec: &PersistSpec, request: &Request, response: &mut Response) {
        let result = self.persist(spec, request, response.body.as_bytes());
        sink::check(result, response);
    }

    /// Replace the response body with the one `response.persisted` names.
    pub fn load_body(&self, request: &Request, response: &mut Response) {
        let result = self.load(&response.persisted, request);
        if let Some(loaded) = sink::check(result, response) {
            sink::apply_loaded(loaded, response);
        }
    }
}
