//! Customers API endpoints.
//!
//! Also mounted under `/invoices/customers` for the checkout screen.

use api_types::{
    Data, Message,
    customer::{CustomerInput, CustomerView},
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;

use crate::{ServerError, server::ServerState};

pub(crate) fn map_customer(customer: engine::Customer) -> CustomerView {
    CustomerView {
        id: customer.id,
        name: customer.name,
        phone: customer.phone,
        email: customer.email,
        address: customer.address,
    }
}

fn to_input(payload: CustomerInput) -> engine::CustomerInput {
    engine::CustomerInput {
        name: payload.name,
        phone: payload.phone,
        email: payload.email,
        address: payload.address,
    }
}

pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<Data<Vec<CustomerView>>>, ServerError> {
    let customers = state
        .engine
        .list_customers()
        .await?
        .into_iter()
        .map(map_customer)
        .collect();

    Ok(Json(Data::new(customers)))
}

pub async fn get(
    State(state): State<ServerState>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, ServerError>,
) -> Result<Json<Data<CustomerView>>, ServerError> {
    let customer = state.engine.customer(id).await?;
    Ok(Json(Data::new(map_customer(customer))))
}

pub async fn create(
    State(state): State<ServerState>,
    WithRejection(Json(payload), _): WithRejection<Json<CustomerInput>, ServerError>,
) -> Result<(StatusCode, Json<Data<CustomerView>>), ServerError> {
    let customer = state.engine.create_customer(to_input(payload)).await?;
    Ok((StatusCode::CREATED, Json(Data::new(map_customer(customer)))))
}

pub async fn update(
    State(state): State<ServerState>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, ServerError>,
    WithRejection(Json(payload), _): WithRejection<Json<CustomerInput>, ServerError>,
) -> Result<Json<Data<CustomerView>>, ServerError> {
    let customer = state.engine.update_customer(id, to_input(payload)).await?;
    Ok(Json(Data::new(map_customer(customer))))
}

pub async fn delete(
    State(state): State<ServerState>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, ServerError>,
) -> Result<Json<Message>, ServerError> {
    state.engine.delete_customer(id).await?;
    Ok(Json(Message {
        message: "Customer deleted successfully".to_string(),
    }))
}
