use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::persist::PersistSpec;

/// The response the mock engine is about to send.
///
/// `persisted` names the body file a route reads from or writes to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    #[serde(default = "default_status_code")]
    pub status_code: u16,

    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, String>,

    #[serde(default)]
    pub body: String,

    #[serde(default)]
    pub persisted: PersistSpec,
}

fn default_status_code() -> u16 {
    200
}

impl Default for Response {
    fn default() -> Self {
        Self {
            status_code: default_status_code(),
            headers: HashMap::new(),
            body: String::new(),
            persisted: PersistSpec::default(),
        }
    }
}

impl Response {
    pub fn new(status_code: u16, body: impl Into<String>) -> Self {
        Self {
            status_code,
            body: body.into(),
            ..Default::default()
        }
    }

    pub fn with_persisted(mut self, persisted: PersistSpec) -> Self {
        self.persisted = persisted;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}
