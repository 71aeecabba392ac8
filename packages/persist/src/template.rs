//! Templating seam.
//!
//! Variable substitution is owned by the mock engine. The store only needs
//! to turn a template plus a request into a string, for file names and for
//! the bodies it loads.

use bodystore_types::Request;

/// Resolves request-derived variables embedded in a string.
pub trait Templater: Send + Sync {
    /// Substitute request variables into `template`.
    fn substitute(&self, request: &Request, template: &str) -> String;

    /// Render a body followed by its append suffix.
    fn render_body(&self, request: &Request, body: &str, append: &str) -> String {
        let mut rendered = self.substitute(request, body);
        if !append.is_empty() {
            rendered.push_str(&self.substitute(request, append));
        }
        rendered
    }
}

/// Leaves every template untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct Verbatim;

impl Templater for Verbatim {
    fn substitute(&self, _request: &Request, template: &str) -> String {
        template.to_string()
    }
}

/// Adapts a closure into a [`Templater`].
pub struct FnTemplater<F>(F);

impl<F> Templater for FnTemplater<F>
where
    F: Fn(&Request, &str) -> String + Send + Sync,
{
    fn substitute(&self, request: &Request, template: &str) -> String {
        (self.0)(request, template)
    }
}

pub fn from_fn<F>(f: F) -> FnTemplater<F>
where
    F: Fn(&Request, &str) -> String + Send + Sync,
{
    FnTemplater(f)
}

/// Recording templater for tests.
#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    /// Replaces `{{name}}` with a fixed value and `{{query.<key>}}` with the
    /// request's query parameter. Every template it sees is recorded.
    #[derive(Clone, Default)]
    pub struct MockTemplater {
        vars: HashMap<String, String>,
        seen: Arc<Mutex<Vec<String>>>,
    }

    impl MockTemplater {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
            self.vars.insert(name.into(), value.into());
            self
        }

        pub fn seen(&self) -> Vec<String> {
            self.seen.lock().unwrap().clone()
        }
    }

    impl Templater for MockTemplater {
        fn substitute(&self, request: &Request, template: &str) -> String {
            self.seen.lock().unwrap().push(template.to_string());

            let mut out = template.to_string();
            for (name, value) in &self.vars {
                out = out.replace(&format!("{{{{{}}}}}", name), value);
            }
            for (key, value) in &request.query {
                out = out.replace(&format!("{{{{query.{}}}}}", key), value);
            }
            out
        }
    }
}
