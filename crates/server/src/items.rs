//! Items API endpoints.

use api_types::{
    Data, Message,
    category::CategoryView,
    item::{ItemInput, ItemView},
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use engine::MoneyCents;

use crate::{ServerError, server::ServerState};

fn map_item(item: engine::Item) -> ItemView {
    ItemView {
        id: item.id,
        name: item.name,
        category_id: item.category_id,
        base_price_minor: item.base_price.cents(),
        description: item.description,
        category: item.category.map(|category| CategoryView {
            id: category.id,
            name: category.name,
            description: category.description,
        }),
    }
}

fn to_input(payload: ItemInput) -> engine::ItemInput {
    engine::ItemInput {
        name: payload.name,
        category_id: payload.category_id,
        base_price: MoneyCents::new(payload.base_price_minor),
        description: payload.description,
    }
}

pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<Data<Vec<ItemView>>>, ServerError> {
    let items = state
        .engine
        .list_items()
        .await?
        .into_iter()
        .map(map_item)
        .collect();

    Ok(Json(Data::new(items)))
}

pub async fn get(
    State(state): State<ServerState>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, ServerError>,
) -> Result<Json<Data<ItemView>>, ServerError> {
    let item = state.engine.item(id).await?;
    Ok(Json(Data::new(map_item(item))))
}

pub async fn create(
    State(state): State<ServerState>,
    WithRejection(Json(payload), _): WithRejection<Json<ItemInput>, ServerError>,
) -> Result<(StatusCode, Json<Data<ItemView>>), ServerError> {
    let item = state.engine.create_item(to_input(payload)).await?;
    Ok((StatusCode::CREATED, Json(Data::new(map_item(item)))))
}

/// Replace an item. New prices only apply to invoices created afterwards.
pub async fn update(
    State(state): State<ServerState>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, ServerError>,
    WithRejection(Json(payload), _): WithRejection<Json<ItemInput>, ServerError>,
) -> Result<Json<Data<ItemView>>, ServerError> {
    let item = state.engine.update_item(id, to_input(payload)).await?;
    Ok(Json(Data::new(map_item(item))))
}

pub async fn delete(
    State(state): State<ServerState>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, ServerError>,
) -> Result<Json<Message>, ServerError> {
    state.engine.delete_item(id).await?;
    Ok(Json(Message {
        message: "Item deleted successfully".to_string(),
    }))
}
