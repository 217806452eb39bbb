//! Template rendering
//!
//! HTML pages are minijinja templates loaded from the templates directory.
//! Files ending in `.html` are autoescaped.

use minijinja::{path_loader, Environment};
use serde::Serialize;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
#[error("failed to render template '{name}': {source}")]
pub struct TemplateError {
    name: String,
    #[source]
    source: minijinja::Error,
}

/// Template environment shared by all requests
pub struct Templates {
    env: Environment<'static>,
}

impl Templates {
    /// Load templates lazily from `dir`
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            crate::logger::log_warning(&format!(
                "Templates directory '{}' not found; pages will fail to render",
                dir.display()
            ));
        }

        let mut env = Environment::new();
        env.set_loader(path_loader(dir.to_path_buf()));
        Self { env }
    }

    /// Render `name` with `context`
    pub fn render<S: Serialize>(&self, name: &str, context: S) -> Result<String, TemplateError> {
        self.env
            .get_template(name)
            .and_then(|template| template.render(context))
            .map_err(|source| TemplateError {
                name: name.to_string(),
                source,
            })
    }
}
