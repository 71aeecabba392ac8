//! # bodystore-types
//!
//! Definitions shared between the mock evaluation engine and the body store.
//!
//! A route definition carries a [`PersistSpec`] describing where its response
//! body lives on disk. The engine builds a [`Request`] for every inbound call
//! and a [`Response`] that the body store may fill in or rewrite.
//!
//! Route definitions are usually written in JSON:
//!
//! ```rust
//! use bodystore_types::PersistSpec;
//!
//! let spec: PersistSpec = serde_json::from_str(r#"{
//!     "name": "users/{{request.query.id}}.json",
//!     "notFound": { "body": "no such user", "statusCode": 410 }
//! }"#).unwrap();
//!
//! assert_eq!(spec.not_found.status_code, 410);
//! assert!(!spec.delete);
//! ```

pub mod persist;
pub mod request;
pub mod response;

pub use persist::{NotFound, PersistSpec};
pub use request::{Method, Request};
pub use response::Response;
