use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use bookstore_http::error::AppError;
use serde::Deserialize;

use super::models::{Customer, CustomerPayload};
use super::service::CustomerService;

#[derive(Debug, Deserialize)]
struct CustomerQuery {
    #[serde(rename = "userId")]
    user_id: Option<String>,
}

pub fn router(service: CustomerService) -> Router {
    Router::new()
        .route("/", get(get_customer_by_user_id).post(create_customer))
        .route("/{id}", get(get_customer_by_id))
        .with_state(service)
}

async fn create_customer(
    State(service): State<CustomerService>,
    payload: Result<Json<CustomerPayload>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload.map_err(|e| AppError::bad_request(e.body_text()))?;
    let customer = service.create_customer(&payload).await?;
    let location = format!("/customers/{}", customer.id);

    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(customer)))
}

/// Non-numeric ids are rejected by the service like non-positive ones.
async fn get_customer_by_id(
    State(service): State<CustomerService>,
    Path(id): Path<String>,
) -> Result<Json<Customer>, AppError> {
    let customer = service.get_customer_by_id(id.parse().ok()).await?;
    Ok(Json(customer))
}

async fn get_customer_by_user_id(
    State(service): State<CustomerService>,
    query: Result<Query<CustomerQuery>, QueryRejection>,
) -> Result<Json<Customer>, AppError> {
    let Query(query) = query.map_err(|e| AppError::bad_request(e.body_text()))?;
    let customer = service
        .get_customer_by_user_id(query.user_id.as_deref())
        .await?;
    Ok(Json(customer))
}
