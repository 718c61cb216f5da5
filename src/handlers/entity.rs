//! Entity CRUD handlers: list, create, read, update, delete. Generic over [`Resource`].

use crate::error::AppError;
use crate::handlers::resources::Resource;
use crate::response::{success_many, success_one, success_one_ok};
use crate::state::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    response::IntoResponse,
    Json,
};
use serde_json::Value;

fn parse_id(id_str: &str) -> Result<i32, AppError> {
    id_str
        .trim()
        .parse::<i32>()
        .map_err(|_| AppError::BadRequest("invalid id".into()))
}

fn parse_body<E: Resource>(body: Value) -> Result<E::Input, AppError> {
    if !body.is_object() {
        return Err(AppError::BadRequest("body must be a JSON object".into()));
    }
    serde_json::from_value(body).map_err(|e| AppError::BadRequest(format!("invalid body: {}", e)))
}

pub async fn list<E: Resource>(
    State(state): State<AppState>,
    query: Result<Query<E::Filter>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(filter) = query?;
    let rows = E::list(&state, filter).await?;
    Ok(success_many(rows))
}

pub async fn create<E: Resource>(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(body) = body?;
    let input = parse_body::<E>(body)?;
    let row = E::create(&state, input).await?;
    tracing::info!(entity = E::NAME, id = row.id(), "created");
    Ok(success_one(row))
}

pub async fn read<E: Resource>(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let row = E::get(&state, id)
        .await?
        .ok_or_else(|| AppError::missing(E::NAME, id))?;
    Ok(success_one_ok(row))
}

pub async fn update<E: Resource>(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let Json(body) = body?;
    let input = parse_body::<E>(body)?;
    let row = E::update(&state, id, input).await?;
    tracing::info!(entity = E::NAME, id, "updated");
    Ok(success_one_ok(row))
}

pub async fn delete<E: Resource>(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let deleted = E::delete(&state, id).await?;
    tracing::info!(entity = E::NAME, id, "deleted");
    Ok(success_one_ok(deleted))
}
