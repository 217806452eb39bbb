//! Ordered route table
//!
//! Routes are compiled once from their definitions and never change
//! afterwards, so the table can be shared between connections without
//! locking.

use super::pattern::{PathParams, Pattern, RouteError};
use hyper::Method;

/// Declarative route definition: path template, allowed methods, handler
#[derive(Debug, Clone)]
pub struct RouteDef<H> {
    pub path: &'static str,
    pub methods: Vec<Method>,
    pub handler: H,
}

impl<H> RouteDef<H> {
    pub fn new(path: &'static str, methods: &[Method], handler: H) -> Self {
        Self {
            path,
            methods: methods.to_vec(),
            handler,
        }
    }
}

/// A compiled route
#[derive(Debug, Clone)]
pub struct Route<H> {
    template: &'static str,
    methods: Vec<Method>,
    handler: H,
    pattern: Pattern,
}

impl<H> Route<H> {
    pub const fn template(&self) -> &'static str {
        self.template
    }

    pub const fn handler(&self) -> &H {
        &self.handler
    }

    pub fn allows(&self, method: &Method) -> bool {
        self.methods.contains(method)
    }

    /// Value for the `Allow` header of a 405 response
    pub fn allow_header(&self) -> String {
        self.methods
            .iter()
            .map(Method::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Outcome of classifying a request against the table
#[derive(Debug)]
pub enum Resolution<'a, H> {
    /// Path and method both match
    Matched {
        route: &'a Route<H>,
        params: PathParams,
    },
    /// The first path match does not accept the method
    MethodNotAllowed { route: &'a Route<H> },
    NotFound,
}

/// Routes in declaration order
#[derive(Debug, Clone)]
pub struct RouteTable<H> {
    routes: Vec<Route<H>>,
}

impl<H> RouteTable<H> {
    /// Compile every definition, keeping declaration order
    pub fn compile<I>(defs: I) -> Result<Self, RouteError>
    where
        I: IntoIterator<Item = RouteDef<H>>,
    {
        let routes = defs
            .into_iter()
            .map(|def| {
                Ok(Route {
                    pattern: Pattern::compile(def.path)?,
                    template: def.path,
                    methods: def.methods,
                    handler: def.handler,
                })
            })
            .collect::<Result<Vec<_>, RouteError>>()?;
        Ok(Self { routes })
    }

    /// Find the first route whose pattern matches `path`
    ///
    /// The scan stops at the first path match even when its methods do not
    /// include `method`; later routes are never consulted in that case.
    pub fn resolve<'a>(&'a self, method: &Method, path: &str) -> Resolution<'a, H> {
        for route in &self.routes {
            let Some(params) = route.pattern.captures(path) else {
                continue;
            };
            if route.allows(method) {
                return Resolution::Matched { route, params };
            }
            return Resolution::MethodNotAllowed { route };
        }
        Resolution::NotFound
    }

    pub fn iter(&self) -> impl Iterator<Item = &Route<H>> {
        self.routes.iter()
    }
}
