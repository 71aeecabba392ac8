//! Maps store outcomes onto the response the engine sends.
//!
//! Every failure becomes a 500 whose body is the error text. That leaks
//! filesystem detail to the client, which is acceptable for a mock server.

use bodystore_types::Response;

use crate::error::PersistError;
use crate::loader::Loaded;

/// Log `err`, write it into `response`, and hand it back.
pub fn report_error(err: PersistError, response: &mut Response) -> PersistError {
    log::error!("{}", err);
    response.body = err.to_string();
    response.status_code = err.status_code();
    err
}

/// Report the error of `result`, if any, and return its value otherwise.
pub fn check<T>(result: Result<T, PersistError>, response: &mut Response) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            report_error(err, response);
            None
        }
    }
}

/// Write a loaded body into `response`. A found body keeps the route's
/// status code; the fallback brings its own.
pub fn apply_loaded(loaded: Loaded, response: &mut Response) {
    match loaded {
        Loaded::Found { body, .. } => response.body = body,
        Loaded::NotFound {
            body, status_code, ..
        } => {
            response.body = body;
            response.status_code = status_code;
        }
    }
}
