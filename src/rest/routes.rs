//! axum wiring of the REST methods for one controller.

use super::controller::RestController;
use super::error::RestError;
use super::methods::{
    count_method, create_method, delete_method, find_method, find_one_method, ids_method,
    patch_method, update_method,
};
use super::request_handler::RestRequest;
use crate::dtos::RestDto;
use axum::Router;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::response::Response;
use axum::routing::get;
use std::sync::Arc;

type Controller<D> = State<Arc<RestController<D>>>;

/// `GET /`, `GET /count`, `GET /ids`, `GET /{id}`, `POST /`, `PUT /{id}`, `PATCH /{id}`, `DELETE /{id}`
pub fn rest_routes<D: RestDto, S>(controller: Arc<RestController<D>>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(find::<D>).post(create::<D>))
        .route("/count", get(count::<D>))
        .route("/ids", get(ids::<D>))
        .route(
            "/{id}",
            get(find_one::<D>)
                .put(update::<D>)
                .patch(patch::<D>)
                .delete(delete::<D>),
        )
        .with_state(controller)
}

/// Only the `GET` routes of [`rest_routes`].
pub fn read_only_routes<D: RestDto, S>(controller: Arc<RestController<D>>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(find::<D>))
        .route("/count", get(count::<D>))
        .route("/ids", get(ids::<D>))
        .route("/{id}", get(find_one::<D>))
        .with_state(controller)
}

async fn find<D: RestDto>(
    State(controller): Controller<D>,
    request: RestRequest,
) -> Result<Response, RestError> {
    find_method(&controller, &request, None).await
}

async fn count<D: RestDto>(
    State(controller): Controller<D>,
    request: RestRequest,
) -> Result<Response, RestError> {
    count_method(&controller, &request, None).await
}

async fn ids<D: RestDto>(
    State(controller): Controller<D>,
    request: RestRequest,
) -> Result<Response, RestError> {
    ids_method(&controller, &request, None).await
}

async fn find_one<D: RestDto>(
    State(controller): Controller<D>,
    Path(id): Path<String>,
    request: RestRequest,
) -> Result<Response, RestError> {
    find_one_method(&controller, &request, &id, None).await
}

async fn create<D: RestDto>(
    State(controller): Controller<D>,
    request: RestRequest,
    body: Bytes,
) -> Result<Response, RestError> {
    create_method(&controller, &request, &body, None).await
}

async fn update<D: RestDto>(
    State(controller): Controller<D>,
    Path(id): Path<String>,
    request: RestRequest,
    body: Bytes,
) -> Result<Response, RestError> {
    update_method(&controller, &request, &id, &body, None).await
}

async fn patch<D: RestDto>(
    State(controller): Controller<D>,
    Path(id): Path<String>,
    request: RestRequest,
    body: Bytes,
) -> Result<Response, RestError> {
    patch_method(&controller, &request, &id, &body, None).await
}

async fn delete<D: RestDto>(
    State(controller): Controller<D>,
    Path(id): Path<String>,
    request: RestRequest,
) -> Result<Response, RestError> {
    delete_method(&controller, &request, &id, None).await
}
