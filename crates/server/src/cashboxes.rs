//! Cashbox API endpoints
//!
//! Plain CRUD over cashboxes; every mutation is announced through the
//! engine's outbox.

use api_types::cashbox::{CashboxCreated, CashboxListQuery, CashboxNew, CashboxUpdate, CashboxView};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::{ServerError, server::ServerState, user};

fn map_cashbox(cashbox: engine::Cashbox) -> CashboxView {
    CashboxView {
        id: cashbox.id,
        label: cashbox.label,
        project_id: cashbox.project_id,
        is_auxiliary: cashbox.is_auxiliary,
    }
}

pub async fn list(
    Extension(_user): Extension<user::Model>,
    State(state): State<ServerState>,
    Query(query): Query<CashboxListQuery>,
) -> Result<Json<Vec<CashboxView>>, ServerError> {
    let filter = engine::CashboxFilter {
        project_id: query.project_id,
        is_auxiliary: query.is_auxiliary,
    };
    let cashboxes = state.engine.list_cashboxes(&filter).await?;

    Ok(Json(cashboxes.into_iter().map(map_cashbox).collect()))
}

pub async fn detail(
    Extension(_user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> Result<Json<CashboxView>, ServerError> {
    let cashbox = state.engine.cashbox(id).await?;

    Ok(Json(map_cashbox(cashbox)))
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<CashboxNew>,
) -> Result<(StatusCode, Json<CashboxCreated>), ServerError> {
    let id = state
        .engine
        .create_cashbox(
            engine::NewCashbox {
                label: payload.label,
                project_id: payload.project_id,
                is_auxiliary: payload.is_auxiliary,
            },
            &user.username,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(CashboxCreated { id })))
}

pub async fn update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<CashboxUpdate>,
) -> Result<Json<CashboxView>, ServerError> {
    let cashbox = state
        .engine
        .update_cashbox(
            id,
            engine::CashboxPatch {
                label: payload.label,
                project_id: payload.project_id,
                is_auxiliary: payload.is_auxiliary,
            },
            &user.username,
        )
        .await?;

    Ok(Json(map_cashbox(cashbox)))
}

pub async fn remove(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_cashbox(id, &user.username).await?;

    Ok(StatusCode::NO_CONTENT)
}
