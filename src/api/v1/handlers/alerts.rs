/*
 * Responsibility
 * - /alerts handlers (scope check → service/repo → DTO)
 * - POST needs alerts:write, GET needs alerts:read
 */
use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};

use crate::{
    api::v1::{
        dto::alerts::{AlertResponse, CreateAlertRequest, ListAlertsQuery},
        extractors::AuthCtxExtractor,
    },
    error::AppError,
    repos::AlertStore,
    services::process_alert_event,
    state::AppState,
};

pub const SCOPE_READ: &str = "alerts:read";
pub const SCOPE_WRITE: &str = "alerts:write";

pub async fn create_alert(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    payload: Result<Json<CreateAlertRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AlertResponse>), AppError> {
    ctx.require_scopes(&[SCOPE_WRITE])?;
    let Json(req) = payload?;

    let stored =
        process_alert_event(state.alerts.as_ref(), req.into(), state.persist_max_retries).await?;

    Ok((StatusCode::CREATED, Json(AlertResponse::from(stored))))
}

pub async fn list_alerts(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    query: Result<Query<ListAlertsQuery>, QueryRejection>,
) -> Result<Json<Vec<AlertResponse>>, AppError> {
    ctx.require_scopes(&[SCOPE_READ])?;
    let Query(query) = query?;

    let rows = state.alerts.list(query.limit()).await?;

    Ok(Json(rows.into_iter().map(AlertResponse::from).collect()))
}
