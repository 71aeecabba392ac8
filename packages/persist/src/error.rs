use std::fmt;
use std::io;
use std::path::PathBuf;

/// The filesystem step that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoOp {
    Resolve,
    CreateDir,
    Write,
    Stat,
    Read,
}

impl fmt::Display for IoOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            IoOp::Resolve => "unable to resolve",
            IoOp::CreateDir => "unable to create directory for",
            IoOp::Write => "unable to write",
            IoOp::Stat => "unable to stat",
            IoOp::Read => "unable to read",
        };
        f.write_str(verb)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum PersistError {
    #[error(
        "File path not under the persist path. FilePath: {}, PersistPath: {}",
        path.display(),
        root.display()
    )]
    SandboxViolation { path: PathBuf, root: PathBuf },

    #[error("{} {}: {}", op, path.display(), source)]
    Io {
        op: IoOp,
        path: PathBuf,
        source: io::Error,
    },

    #[error("unable to delete {}: {}", path.display(), source)]
    DeleteFailure { path: PathBuf, source: io::Error },

    #[error("unable to create persist root {}: {}", root.display(), source)]
    Bootstrap { root: PathBuf, source: io::Error },

    #[error("invalid persist configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("unable to read persist configuration {}: {}", path.display(), source)]
    ConfigIo { path: PathBuf, source: io::Error },
}

impl PersistError {
    pub(crate) fn io(op: IoOp, path: impl Into<PathBuf>, source: io::Error) -> Self {
        PersistError::Io {
            op,
            path: path.into(),
            source,
        }
    }

    /// Status code a response carries when this error reaches it.
    ///
    /// Every failure collapses to 500; the detail travels in the body.
    pub fn status_code(&self) -> u16 {
        http::StatusCode::INTERNAL_SERVER_ERROR.as_u16()
    }

    pub fn is_sandbox_violation(&self) -> bool {
        matches!(self, PersistError::SandboxViolation { .. })
    }
}
