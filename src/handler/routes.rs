//! Application route table

use super::error::HandlerError;
use super::students;
use crate::config::AppState;
use crate::http;
use crate::routing::{PathParams, RouteDef, RouteError, RouteTable};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response};

/// Handler selected by a matched route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Home,
    Students,
    DeleteStudent,
    ChangeStudent,
    DownloadStudents,
    SearchStudents,
    ApiStudents,
}

/// Route definitions in match order
pub fn route_defs() -> Vec<RouteDef<Action>> {
    vec![
        RouteDef::new("/", &[Method::GET], Action::Home),
        RouteDef::new("/students", &[Method::GET, Method::POST], Action::Students),
        RouteDef::new("/students/delete", &[Method::POST], Action::DeleteStudent),
        RouteDef::new(
            "/students/:id/change",
            &[Method::GET, Method::POST],
            Action::ChangeStudent,
        ),
        RouteDef::new("/students/download", &[Method::GET], Action::DownloadStudents),
        RouteDef::new("/students/search", &[Method::GET], Action::SearchStudents),
        RouteDef::new("/api/students", &[Method::GET], Action::ApiStudents),
    ]
}

pub fn route_table() -> Result<RouteTable<Action>, RouteError> {
    RouteTable::compile(route_defs())
}

/// Run the handler for a matched route
pub async fn invoke<B>(
    action: Action,
    req: Request<B>,
    params: &PathParams,
    state: &AppState,
) -> Response<Full<Bytes>>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let query = req.uri().query().map(str::to_string);
    let query = query.as_deref();

    let result = match action {
        Action::Home => Ok(http::build_redirect_response("/students", None)),
        Action::Students if req.method() == Method::POST => students::create(req, state).await,
        Action::Students => students::index(query, state).await,
        Action::DeleteStudent => students::delete(req, state).await,
        Action::ChangeStudent => students::change(req, params, state).await,
        Action::DownloadStudents => students::download(state).await,
        Action::SearchStudents => students::search_page(query, state).await,
        Action::ApiStudents => students::api_search(query, state).await,
    };
    result.unwrap_or_else(HandlerError::into_response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::Resolution;

    #[test]
    fn test_table_compiles_in_order() {
        let table = route_table().unwrap();
        let templates: Vec<&str> = table.iter().map(|route| route.template()).collect();
        assert_eq!(
            templates,
            [
                "/",
                "/students",
                "/students/delete",
                "/students/:id/change",
                "/students/download",
                "/students/search",
                "/api/students",
            ]
        );
    }

    #[test]
    fn test_change_route_captures_id() {
        let table = route_table().unwrap();
        match table.resolve(&Method::GET, "/students/7/change") {
            Resolution::Matched { route, params } => {
                assert_eq!(*route.handler(), Action::ChangeStudent);
                assert_eq!(params.get("id"), Some("7"));
            }
            other => panic!("unexpected resolution: {other:?}"),
        }
    }

    #[test]
    fn test_delete_is_post_only() {
        let table = route_table().unwrap();
        match table.resolve(&Method::GET, "/students/delete") {
            Resolution::MethodNotAllowed { route } => assert_eq!(route.allow_header(), "POST"),
            other => panic!("unexpected resolution: {other:?}"),
        }
    }
}
