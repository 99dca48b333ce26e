use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Serialize;
use service::{Customer, UpdatedCustomer, UserId};

use crate::{body::CustomerBody, errors::ApiError, state::AppState};

#[derive(Debug, Serialize)]
pub struct CustomerResponse {
    pub customer: Customer,
}

#[derive(Debug, Serialize)]
pub struct CustomersResponse {
    pub customers: Vec<Customer>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// POST /add
pub async fn add_customer(
    State(state): State<AppState>,
    Extension(user): Extension<UserId>,
    body: CustomerBody,
) -> Result<Json<CustomerResponse>, ApiError> {
    let customer = state.customers.add(&user, body.customer).await?;
    Ok(Json(CustomerResponse { customer }))
}

/// GET /customers
pub async fn list_customers(
    State(state): State<AppState>,
    Extension(user): Extension<UserId>,
) -> Json<CustomersResponse> {
    let customers = state.customers.list(&user).await;
    Json(CustomersResponse { customers })
}

/// GET /customer/:id
pub async fn show_customer(
    State(state): State<AppState>,
    Extension(user): Extension<UserId>,
    Path(id): Path<String>,
) -> Result<Json<CustomerResponse>, ApiError> {
    let customer = state.customers.show(&user, &id).await?;
    Ok(Json(CustomerResponse { customer }))
}

/// PUT /update/:id
pub async fn update_customer(
    State(state): State<AppState>,
    Extension(user): Extension<UserId>,
    id: Option<Path<String>>,
    body: CustomerBody,
) -> Result<Json<UpdatedCustomer>, ApiError> {
    let id = id.map(|Path(id)| id);
    let updated = state
        .customers
        .update(&user, id.as_deref(), body.customer)
        .await?;
    Ok(Json(updated))
}

/// DELETE /delete/:id
pub async fn delete_customer(
    State(state): State<AppState>,
    Extension(user): Extension<UserId>,
    id: Option<Path<String>>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = id.map(|Path(id)| id);
    let deleted = state.customers.delete(&user, id.as_deref()).await?;
    Ok(Json(MessageResponse { message: format!("Customer {deleted} deleted.") }))
}
