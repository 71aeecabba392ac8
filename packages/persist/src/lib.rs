//! # bodystore-persist
//!
//! Sandboxed, file-backed response bodies for the mock engine.
//!
//! A route's [`PersistSpec`](bodystore_types::PersistSpec) names a file by
//! template. [`FileBodyStore`] resolves that template against the request,
//! keeps the result inside its sandbox root, and then writes, deletes, or
//! loads the raw body bytes.
//!
//! ## Two layers
//!
//! The core operations return values and never touch a response:
//!
//! - [`PathResolver::resolve`] via [`FileBodyStore::resolver`]
//! - [`FileBodyStore::persist`] → [`Persisted`]
//! - [`FileBodyStore::load`] → [`Loaded`]
//!
//! The engine-facing adapters ([`FileBodyStore::persist_response`],
//! [`FileBodyStore::load_body`]) run those and fold every outcome into the
//! response through the [`sink`] module. The engine never sees an error.
//!
//! ## Example
//!
//! ```rust
//! use bodystore_persist::{FileBodyStore, Verbatim};
//! use bodystore_types::{PersistSpec, Request, Response};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let store = FileBodyStore::with_root(dir.path().join("bodies"), Verbatim).unwrap();
//!
//! let request = Request::post("/notes");
//! let mut response = Response::new(201, "remember me").with_persisted(PersistSpec::named("note.txt"));
//! store.persist_response(&request, &mut response);
//!
//! let mut replay = Response::default().with_persisted(PersistSpec::named("note.txt"));
//! store.load_body(&Request::get("/notes"), &mut replay);
//! assert_eq!(replay.body, "remember me");
//! ```

pub mod config;
pub mod error;
pub mod loader;
pub mod persister;
pub mod resolver;
pub mod sink;
pub mod store;
pub mod template;

pub use config::{DeleteFailurePolicy, PersistConfig};
pub use error::{IoOp, PersistError};
pub use loader::{Loaded, DEFAULT_NOT_FOUND_BODY};
pub use persister::Persisted;
pub use resolver::{PathResolver, ResolvedPath};
pub use store::FileBodyStore;
pub use template::{from_fn, FnTemplater, Templater, Verbatim};
