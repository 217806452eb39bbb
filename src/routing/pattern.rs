//! Path template compilation
//!
//! Turns a template such as `/students/:id/change` into an anchored regular
//! expression with one named capture group per parameter segment.

use regex::Regex;
use std::collections::HashMap;

/// Character class accepted inside a path parameter
const PARAM_CHARS: &str = "[A-Za-z0-9_.]+";

/// Errors raised while compiling the route table
#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    #[error("invalid parameter name ':{name}' in route '{template}'")]
    InvalidParam { template: String, name: String },
    #[error("route '{template}' does not compile: {source}")]
    Regex {
        template: String,
        #[source]
        source: regex::Error,
    },
}

/// Parameters captured from a matched path, keyed by parameter name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams(HashMap<String, String>);

impl PathParams {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// Compiled, anchored matcher for one path template
#[derive(Debug, Clone)]
pub struct Pattern {
    regex: Regex,
    param_names: Vec<String>,
}

impl Pattern {
    /// Compile a path template
    ///
    /// Every segment written as `:identifier` becomes a capture group; all
    /// other segments are escaped and matched literally. A template may
    /// carry any number of parameters as long as their names are unique.
    pub fn compile(template: &str) -> Result<Self, RouteError> {
        let mut param_names = Vec::new();
        let mut segments = Vec::new();

        for segment in template.split('/') {
            if let Some(name) = segment.strip_prefix(':') {
                if !is_identifier(name) {
                    return Err(RouteError::InvalidParam {
                        template: template.to_string(),
                        name: name.to_string(),
                    });
                }
                segments.push(format!("(?P<{name}>{PARAM_CHARS})"));
                param_names.push(name.to_string());
            } else {
                segments.push(regex::escape(segment));
            }
        }

        let source = format!("^{}$", segments.join("/"));
        let regex = Regex::new(&source).map_err(|source| RouteError::Regex {
            template: template.to_string(),
            source,
        })?;

        Ok(Self { regex, param_names })
    }

    /// Match a whole path, returning the captured parameters on success
    pub fn captures(&self, path: &str) -> Option<PathParams> {
        let caps = self.regex.captures(path)?;
        let params = self
            .param_names
            .iter()
            .filter_map(|name| {
                caps.name(name)
                    .map(|value| (name.clone(), value.as_str().to_string()))
            })
            .collect();
        Some(PathParams(params))
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}
