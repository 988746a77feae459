//! HTTP surface of the catalog.
//!
//! Every route funnels into [`Dispatcher::dispatch`].  Extraction is done by hand (raw
//! path segments and raw body bytes) so that a bad id, a bad body, an unknown path or a
//! wrong method all produce the same generic 400 as any other rejected request.

use std::any::Any;
use std::sync::Arc;

use axum::Router;
use axum::body::Bytes;
use axum::extract::rejection::{BytesRejection, PathRejection};
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use crate::response::{invalid_request, server_error};
use crate::validate::FieldSet;
use crate::{CatalogError, CatalogRequest, DataStore, Dispatcher, Operation};

/// Parses an id path segment.  Only plain ASCII digits are accepted.
pub fn parse_id(segment: &str) -> Result<i64, CatalogError> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CatalogError::MalformedRequest(format!(
            "id {:?} is not a number",
            segment
        )));
    }
    segment
        .parse()
        .map_err(|_| CatalogError::MalformedRequest(format!("id {:?} is out of range", segment)))
}

fn parse_body(body: Result<Bytes, BytesRejection>) -> Result<FieldSet, CatalogError> {
    let body = body.map_err(|e| CatalogError::MalformedRequest(e.body_text()))?;
    FieldSet::from_form(&body).map_err(|e| CatalogError::MalformedRequest(e.to_string()))
}

fn parse_kind(params: Result<Path<String>, PathRejection>) -> Result<String, CatalogError> {
    params
        .map(|Path(kind)| kind)
        .map_err(|e| CatalogError::MalformedRequest(e.body_text()))
}

fn parse_kind_and_id(
    params: Result<Path<(String, String)>, PathRejection>,
) -> Result<(String, i64), CatalogError> {
    let Path((kind, id)) = params.map_err(|e| CatalogError::MalformedRequest(e.body_text()))?;
    Ok((kind, parse_id(&id)?))
}

async fn run(dispatcher: &Dispatcher, request: Result<CatalogRequest, CatalogError>) -> Response {
    match request {
        Ok(request) => match dispatcher.dispatch(request).await {
            Ok(outcome) => outcome.into_response(),
            Err(err) => err.into_response(),
        },
        Err(err) => {
            tracing::debug!("rejected request: {}", err);
            err.into_response()
        }
    }
}

////////////////////////////////////////////// Handlers //////////////////////////////////////////////

async fn create_audio(
    State(dispatcher): State<Dispatcher>,
    params: Result<Path<String>, PathRejection>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let request = parse_kind(params).and_then(|kind| {
        parse_body(body).map(|fields| CatalogRequest::new(Operation::Create, kind, fields))
    });
    run(&dispatcher, request).await
}

async fn update_audio(
    State(dispatcher): State<Dispatcher>,
    params: Result<Path<(String, String)>, PathRejection>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let request = parse_kind_and_id(params).and_then(|(kind, id)| {
        parse_body(body).map(|fields| CatalogRequest::new(Operation::Update(id), kind, fields))
    });
    run(&dispatcher, request).await
}

async fn read_all_audio(
    State(dispatcher): State<Dispatcher>,
    params: Result<Path<String>, PathRejection>,
) -> Response {
    let request = parse_kind(params)
        .map(|kind| CatalogRequest::new(Operation::ReadAll, kind, FieldSet::new()));
    run(&dispatcher, request).await
}

async fn read_audio(
    State(dispatcher): State<Dispatcher>,
    params: Result<Path<(String, String)>, PathRejection>,
) -> Response {
    let request = parse_kind_and_id(params)
        .map(|(kind, id)| CatalogRequest::new(Operation::ReadOne(id), kind, FieldSet::new()));
    run(&dispatcher, request).await
}

async fn delete_audio(
    State(dispatcher): State<Dispatcher>,
    params: Result<Path<(String, String)>, PathRejection>,
) -> Response {
    let request = parse_kind_and_id(params)
        .map(|(kind, id)| CatalogRequest::new(Operation::Delete(id), kind, FieldSet::new()));
    run(&dispatcher, request).await
}

async fn reject() -> Response {
    invalid_request()
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };
    tracing::error!("handler panicked: {}", detail);
    server_error()
}

/////////////////////////////////////////////// Router ///////////////////////////////////////////////

/// Wraps `router` with the catalog's fallback, request tracing and panic recovery.
fn with_catalog_layers(router: Router) -> Router {
    router
        .fallback(reject)
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(handle_panic))
}

/// Builds the catalog router over `store`.
///
/// # Routes
/// * `POST /create/:kind/`
/// * `POST /update/:kind/:id/`
/// * `GET  /read/:kind/`
/// * `GET  /read/:kind/:id/`
/// * `POST /delete/:kind/:id/`
pub fn create_catalog_router(store: Arc<dyn DataStore>) -> Router {
    let router = Router::new()
        .route("/create/:kind/", post(create_audio).fallback(reject))
        .route("/update/:kind/:id/", post(update_audio).fallback(reject))
        .route("/read/:kind/", get(read_all_audio).fallback(reject))
        .route("/read/:kind/:id/", get(read_audio).fallback(reject))
        .route("/delete/:kind/:id/", post(delete_audio).fallback(reject))
        .with_state(Dispatcher::new(store));
    with_catalog_layers(router)
}
