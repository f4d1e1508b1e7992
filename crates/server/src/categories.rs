//! Categories API endpoints.

use api_types::{
    Data, Message,
    category::{CategoryInput, CategoryView},
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;

use crate::{ServerError, server::ServerState};

fn map_category(category: engine::Category) -> CategoryView {
    CategoryView {
        id: category.id,
        name: category.name,
        description: category.description,
    }
}

fn to_input(payload: CategoryInput) -> engine::CategoryInput {
    engine::CategoryInput {
        name: payload.name,
        description: payload.description,
    }
}

pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<Data<Vec<CategoryView>>>, ServerError> {
    let categories = state
        .engine
        .list_categories()
        .await?
        .into_iter()
        .map(map_category)
        .collect();

    Ok(Json(Data::new(categories)))
}

pub async fn get(
    State(state): State<ServerState>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, ServerError>,
) -> Result<Json<Data<CategoryView>>, ServerError> {
    let category = state.engine.category(id).await?;
    Ok(Json(Data::new(map_category(category))))
}

pub async fn create(
    State(state): State<ServerState>,
    WithRejection(Json(payload), _): WithRejection<Json<CategoryInput>, ServerError>,
) -> Result<(StatusCode, Json<Data<CategoryView>>), ServerError> {
    let category = state.engine.create_category(to_input(payload)).await?;
    Ok((StatusCode::CREATED, Json(Data::new(map_category(category)))))
}

pub async fn update(
    State(state): State<ServerState>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, ServerError>,
    WithRejection(Json(payload), _): WithRejection<Json<CategoryInput>, ServerError>,
) -> Result<Json<Data<CategoryView>>, ServerError> {
    let category = state.engine.update_category(id, to_input(payload)).await?;
    Ok(Json(Data::new(map_category(category))))
}

pub async fn delete(
    State(state): State<ServerState>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, ServerError>,
) -> Result<Json<Message>, ServerError> {
    state.engine.delete_category(id).await?;
    Ok(Json(Message {
        message: "Category deleted successfully".to_string(),
    }))
}
