//! bodystore: sandboxed, file-backed response bodies for a mock HTTP engine.
//!
//! Routes name their body files by template; the store keeps every resolved
//! path inside one root directory and turns filesystem failures into
//! response state instead of errors.

pub use bodystore_persist::{
    from_fn, sink, DeleteFailurePolicy, FileBodyStore, FnTemplater, IoOp, Loaded, PathResolver,
    PersistConfig, PersistError, Persisted, ResolvedPath, Templater, Verbatim,
};
pub use bodystore_types::{Method, NotFound, PersistSpec, Request, Response};
