//! Student pages, CSV export and JSON search

use super::error::HandlerResult;
use super::validation::{FieldErrors, StudentForm, HOUSES};
use crate::config::AppState;
use crate::http::{self, parse_form, FormData};
use crate::logger;
use crate::routing::PathParams;
use crate::store::students::{self, Order, StudentSummary};
use hyper::body::{Body, Bytes};
use hyper::{Request, StatusCode};
use minijinja::context;

const LIST_PATH: &str = "/students";

/// `GET /students`: list, optionally ordered
pub async fn index(query: Option<&str>, state: &AppState) -> HandlerResult {
    let order = Order::from_query(FormData::from_query(query).get("order"));
    render_index(
        state,
        order,
        StatusCode::OK,
        &StudentForm::default(),
        &FieldErrors::new(),
    )
    .await
}

/// `POST /students`: create, or re-render the list with field errors
pub async fn create<B>(req: Request<B>, state: &AppState) -> HandlerResult
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let form = parse_form(req.into_body(), state.config.http.max_body_size).await?;
    let form = StudentForm::from_form(&form);

    match form.validate() {
        Ok(student) => {
            let id = students::insert(&state.store, &student).await?;
            logger::log_debug(&format!("Created student {id}"));
            Ok(http::build_redirect_response(LIST_PATH, None))
        }
        Err(errors) => {
            render_index(state, Order::Id, StatusCode::BAD_REQUEST, &form, &errors).await
        }
    }
}

async fn render_index(
    state: &AppState,
    order: Order,
    status: StatusCode,
    form: &StudentForm,
    errors: &FieldErrors,
) -> HandlerResult {
    let students = students::list(&state.store, order).await?;
    let html = state.templates.render(
        "students/index.html",
        context! {
            students => students,
            order => order.as_query(),
            form => form,
            errors => errors,
            houses => HOUSES,
        },
    )?;
    Ok(http::build_html_response(status, html))
}

/// `POST /students/delete`
pub async fn delete<B>(req: Request<B>, state: &AppState) -> HandlerResult
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let form = parse_form(req.into_body(), state.config.http.max_body_size).await?;
    let Some(id) = form.get("id").and_then(|id| id.trim().parse::<i64>().ok()) else {
        return Ok(http::build_status_response(StatusCode::BAD_REQUEST));
    };

    if !students::delete(&state.store, id).await? {
        logger::log_debug(&format!("Delete of unknown student {id} ignored"));
    }
    Ok(http::build_redirect_response(LIST_PATH, None))
}

/// `GET|POST /students/:id/change`
pub async fn change<B>(req: Request<B>, params: &PathParams, state: &AppState) -> HandlerResult
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let Some(id) = params.get("id").and_then(|id| id.parse::<i64>().ok()) else {
        return Ok(http::build_404_response());
    };
    let Some(student) = students::find(&state.store, id).await? else {
        return Ok(http::build_404_response());
    };

    if req.method() != hyper::Method::POST {
        let form = StudentForm {
            name: student.name,
            house: student.house,
        };
        return render_change(state, id, StatusCode::OK, &form, &FieldErrors::new());
    }

    let form = parse_form(req.into_body(), state.config.http.max_body_size).await?;
    let form = StudentForm::from_form(&form);
    match form.validate() {
        Ok(update) => {
            if !students::update(&state.store, id, &update).await? {
                // Deleted between the lookup and the update
                return Ok(http::build_404_response());
            }
            Ok(http::build_redirect_response(LIST_PATH, None))
        }
        Err(errors) => render_change(state, id, StatusCode::BAD_REQUEST, &form, &errors),
    }
}

fn render_change(
    state: &AppState,
    id: i64,
    status: StatusCode,
    form: &StudentForm,
    errors: &FieldErrors,
) -> HandlerResult {
    let html = state.templates.render(
        "students/change.html",
        context! {
            id => id,
            form => form,
            errors => errors,
            houses => HOUSES,
        },
    )?;
    Ok(http::build_html_response(status, html))
}

/// `GET /students/download`
pub async fn download(state: &AppState) -> HandlerResult {
    let rows = students::list(&state.store, Order::Id).await?;
    Ok(http::build_csv_response(students::to_csv(&rows), "students.csv"))
}

/// `GET /students/search`
pub async fn search_page(query: Option<&str>, state: &AppState) -> HandlerResult {
    let query = FormData::from_query(query);
    let term = query.get("search").unwrap_or_default().trim();
    let results = if term.is_empty() {
        Vec::new()
    } else {
        students::search(&state.store, term).await?
    };

    let html = state.templates.render(
        "students/search.html",
        context! {
            search => term,
            students => results,
        },
    )?;
    Ok(http::build_html_response(StatusCode::OK, html))
}

/// `GET /api/students`: `[{name, house}]` whose name contains `?search=`
pub async fn api_search(query: Option<&str>, state: &AppState) -> HandlerResult {
    let query = FormData::from_query(query);
    let term = query.get("search").unwrap_or_default().trim();
    let results: Vec<StudentSummary> = students::search(&state.store, term)
        .await?
        .into_iter()
        .map(StudentSummary::from)
        .collect();
    Ok(http::build_json_response(&results, None))
}
