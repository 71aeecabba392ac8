//! Per-route persistence definitions.

use serde::{Deserialize, Serialize};

/// Describes whether, where, and how a route persists or loads its body.
///
/// `name` is a template. It is resolved against each request and the
/// resolved form is never written back here, so one spec can be shared by
/// every request hitting the route.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistSpec {
    /// File name template, relative to the sandbox root. Empty disables
    /// persistence for the route.
    pub name: String,

    /// Remove the file instead of writing the response body to it.
    pub delete: bool,

    /// Appended to a loaded body when it is rendered.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub body_append: String,

    /// Fallback used when the file is missing on load.
    pub not_found: NotFound,
}

impl PersistSpec {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn deleting(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            delete: true,
            ..Default::default()
        }
    }

    pub fn with_body_append(mut self, append: impl Into<String>) -> Self {
        self.body_append = append.into();
        self
    }

    pub fn with_not_found(mut self, not_found: NotFound) -> Self {
        self.not_found = not_found;
        self
    }

    pub fn is_enabled(&self) -> bool {
        !self.name.is_empty()
    }
}

/// Response data substituted when a persisted body cannot be located.
///
/// Zero values mean "not configured": an empty body keeps the default
/// `Not Found` text and a zero status code keeps 404.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct NotFound {
    pub body: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub body_append: String,

    pub status_code: u16,
}

impl NotFound {
    pub fn new(body: impl Into<String>, status_code: u16) -> Self {
        Self {
            body: body.into(),
            body_append: String::new(),
            status_code,
        }
    }

    pub fn with_body_append(mut self, append: impl Into<String>) -> Self {
        self.body_append = append.into();
        self
    }

    /// Configured status code, if any.
    pub fn status_override(&self) -> Option<u16> {
        (self.status_code != 0).then_some(self.status_code)
    }
}
