//! Writing and deleting persisted bodies.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use bodystore_types::{PersistSpec, Request};

use crate::config::DeleteFailurePolicy;
use crate::error::{IoOp, PersistError};
use crate::store::FileBodyStore;

/// What a successful [`FileBodyStore::persist`] call did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Persisted {
    /// The route has no name, or its name substituted to nothing.
    Skipped,
    Written { path: PathBuf, bytes: usize },
    Deleted { path: PathBuf },
    /// Delete requested but there was no file.
    AlreadyAbsent { path: PathBuf },
    /// Removal failed and the configured policy ignores that. The file may
    /// still be there.
    DeleteIgnored { path: PathBuf },
}

impl FileBodyStore {
    /// Write `body` to the file `spec` names, or remove it when `spec.delete`
    /// is set.
    pub fn persist(
        &self,
        spec: &PersistSpec,
        request: &Request,
        body: &[u8],
    ) -> Result<Persisted, PersistError> {
        if !spec.is_enabled() {
            return Ok(Persisted::Skipped);
        }

        let resolved = self.resolver().resolve(&spec.name, request)?;
        if resolved.is_empty() {
            log::debug!("Name {:?} resolved to nothing, skipping", spec.name);
            return Ok(Persisted::Skipped);
        }

        if spec.delete {
            self.delete_file(resolved.path)
        } else {
            self.write_file(resolved.path, body)
        }
    }

    fn delete_file(&self, path: PathBuf) -> Result<Persisted, PersistError> {
        log::debug!("Deleting {}...", path.display());

        match fs::remove_file(&path) {
            Ok(()) => Ok(Persisted::Deleted { path }),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                Ok(Persisted::AlreadyAbsent { path })
            }
            Err(source) => match self.config().on_delete_failure {
                DeleteFailurePolicy::Report => Err(PersistError::DeleteFailure { path, source }),
                DeleteFailurePolicy::Ignore => {
                    log::warn!("Ignoring failed delete of {}: {}", path.display(), source);
                    Ok(Persisted::DeleteIgnored { path })
                }
            },
        }
    }

    fn write_file(&self, path: PathBuf, body: &[u8]) -> Result<Persisted, PersistError> {
        if let Some(dir) = path.parent() {
            create_dirs(dir, self.config().dir_mode)
                .map_err(|source| PersistError::io(IoOp::CreateDir, &path, source))?;
        }

        log::debug!("Writing {}...", path.display());
        write_truncating(&path, body, self.config().file_mode)
            .map_err(|source| PersistError::io(IoOp::Write, &path, source))?;

        Ok(Persisted::Written {
            path,
            bytes: body.len(),
        })
    }
}

/// `mkdir -p` with an explicit mode for every created directory.
pub(crate) fn create_dirs(dir: &Path, mode: u32) -> io::Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(mode);
    }
    #[cfg(not(unix))]
    let _ = mode;
    builder.create(dir)
}

fn write_truncating(path: &Path, body: &[u8], mode: u32) -> io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(mode);
    }
    #[cfg(not(unix))]
    let _ = mode;

    let mut f = options.open(path)?;
    f.write_all(body)?;
    f.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PersistConfig;
    use crate::template::mock::MockTemplater;
    use crate::template::Verbatim;

    struct TestStore {
        // Keeps the sandbox alive until the store is dropped.
        _dir: tempfile::TempDir,
        store: FileBodyStore,
    }

    impl TestStore {
        fn new() -> TestStore {
            Self::with_config(|config| config)
        }

        fn with_config(f: impl FnOnce(PersistConfig) -> PersistConfig) -> TestStore {
            let dir = tempfile::tempdir().unwrap();
            let config = f(PersistConfig::new(dir.path().join("bodies")));
            TestStore {
                _dir: dir,
                store: FileBodyStore::new(config, Verbatim).unwrap(),
            }
        }

        fn path(&self, name: &str) -> PathBuf {
            self.store.root().join(name)
        }
    }

    #[test]
    fn empty_name_is_skipped() {
        let t = TestStore::new();
        let outcome = t
            .store
            .persist(&PersistSpec::default(), &Request::get("/"), b"body")
            .unwrap();
        assert_eq!(outcome, Persisted::Skipped);
        assert_eq!(fs::read_dir(t.store.root()).unwrap().count(), 0);
    }

    #[test]
    fn name_substituting_to_nothing_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileBodyStore::new(
            PersistConfig::new(dir.path()),
            MockTemplater::new().with_var("missing", ""),
        )
        .unwrap();

        let outcome = store
            .persist(&PersistSpec::named("{{missing}}"), &Request::get("/"), b"x")
            .unwrap();
        assert_eq!(outcome, Persisted::Skipped);
    }

    #[test]
    fn writes_body_creating_parents() {
        let t = TestStore::new();
        let outcome = t
            .store
            .persist(&PersistSpec::named("a/b/c.json"), &Request::get("/"), b"{\"ok\":true}")
            .unwrap();

        let path = t.path("a/b/c.json");
        assert_eq!(outcome, Persisted::Written { path: path.clone(), bytes: 11 });
        assert_eq!(fs::read(&path).unwrap(), b"{\"ok\":true}");
    }

    #[test]
    fn overwrite_truncates() {
        let t = TestStore::new();
        let spec = PersistSpec::named("note.txt");
        t.store.persist(&spec, &Request::get("/"), b"a much longer body").unwrap();
        t.store.persist(&spec, &Request::get("/"), b"short").unwrap();

        assert_eq!(fs::read(t.path("note.txt")).unwrap(), b"short");
    }

    #[test]
    fn delete_removes_existing_file() {
        let t = TestStore::new();
        fs::write(t.path("gone.txt"), "bye").unwrap();

        let outcome = t
            .store
            .persist(&PersistSpec::deleting("gone.txt"), &Request::get("/"), b"")
            .unwrap();
        assert_eq!(outcome, Persisted::Deleted { path: t.path("gone.txt") });
        assert!(!t.path("gone.txt").exists());
    }

    #[test]
    fn delete_of_missing_file_is_not_an_error() {
        let t = TestStore::new();
        let outcome = t
            .store
            .persist(&PersistSpec::deleting("never.txt"), &Request::get("/"), b"")
            .unwrap();
        assert_eq!(outcome, Persisted::AlreadyAbsent { path: t.path("never.txt") });
    }

    #[test]
    fn delete_failure_is_reported_by_default() {
        let t = TestStore::new();
        fs::create_dir(t.path("dir")).unwrap();

        let err = t
            .store
            .persist(&PersistSpec::deleting("dir"), &Request::get("/"), b"")
            .unwrap_err();
        assert!(matches!(err, PersistError::DeleteFailure { .. }));
    }

    #[test]
    fn delete_failure_can_be_ignored() {
        let t = TestStore::with_config(|c| {
            c.with_delete_failure_policy(DeleteFailurePolicy::Ignore)
        });
        fs::create_dir(t.path("dir")).unwrap();

        let outcome = t
            .store
            .persist(&PersistSpec::deleting("dir"), &Request::get("/"), b"")
            .unwrap();
        assert_eq!(outcome, Persisted::DeleteIgnored { path: t.path("dir") });
        assert!(t.path("dir").is_dir());
    }

    #[test]
    fn blocked_parent_stops_before_write() {
        let t = TestStore::new();
        // A file where a directory is needed.
        fs::write(t.path("blocker"), "file").unwrap();

        let err = t
            .store
            .persist(&PersistSpec::named("blocker/child.txt"), &Request::get("/"), b"x")
            .unwrap_err();
        assert!(matches!(err, PersistError::Io { op: IoOp::CreateDir, .. }));
        assert_eq!(fs::read_to_string(t.path("blocker")).unwrap(), "file");
    }

    #[test]
    fn write_onto_directory_fails() {
        let t = TestStore::new();
        fs::create_dir(t.path("taken")).unwrap();

        let err = t
            .store
            .persist(&PersistSpec::named("taken"), &Request::get("/"), b"x")
            .unwrap_err();
        assert!(matches!(err, PersistError::Io { op: IoOp::Write, .. }));
        assert!(t.path("taken").is_dir());
    }

    #[test]
    fn traversal_never_writes() {
        let t = TestStore::new();
        let err = t
            .store
            .persist(&PersistSpec::named("../escaped.txt"), &Request::get("/"), b"x")
            .unwrap_err();
        assert!(err.is_sandbox_violation());
        assert!(!t._dir.path().join("escaped.txt").exists());
    }

    #[cfg(unix)]
    #[test]
    fn applies_distinct_modes() {
        use std::os::unix::fs::PermissionsExt;

        let t = TestStore::with_config(|c| c.with_dir_mode(0o750).with_file_mode(0o640));
        t.store
            .persist(&PersistSpec::named("sub/file.txt"), &Request::get("/"), b"x")
            .unwrap();

        let dir_mode = fs::metadata(t.path("sub")).unwrap().permissions().mode() & 0o777;
        let file_mode = fs::metadata(t.path("sub/file.txt")).unwrap().permissions().mode() & 0o777;
        // umask may only clear bits.
        assert_eq!(dir_mode & !0o750, 0);
        assert_eq!(file_mode & !0o640, 0);
        assert_eq!(dir_mode & 0o100, 0o100);
    }
}
