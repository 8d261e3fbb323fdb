use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ApiError, AppState, Session};
use crate::models::GroupCode;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Health check endpoint (no auth required)
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroupRequest {
    name: String,
    shared_password: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroupResponse {
    group_id: Uuid,
    code: GroupCode,
}

pub async fn create_family_group(
    State(state): State<AppState>,
    payload: Result<Json<CreateGroupRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateGroupResponse>), ApiError> {
    let Json(req) = payload.map_err(bad_body)?;

    let created = state.groups.create(&req.name, &req.shared_password).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateGroupResponse {
            group_id: created.id,
            code: created.code,
        }),
    ))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRequest {
    code: String,
    shared_password: String,
    /// Identity to admit; a fresh one is minted when absent.
    #[serde(default)]
    member_id: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinResponse {
    group_id: Uuid,
    group_name: String,
    code: GroupCode,
    member_id: String,
    token: String,
}

pub async fn join_family(
    State(state): State<AppState>,
    payload: Result<Json<JoinRequest>, JsonRejection>,
) -> Result<Json<JoinResponse>, ApiError> {
    let Json(req) = payload.map_err(bad_body)?;
    let member_id = req
        .member_id
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let membership = state
        .groups
        .join(&req.code, &req.shared_password, &member_id)
        .await?;
    let token = state
        .sessions
        .issue(membership.group.id, &membership.member_id);

    Ok(Json(JoinResponse {
        group_id: membership.group.id,
        group_name: membership.group.name,
        code: membership.group.code,
        member_id: membership.member_id,
        token,
    }))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    group_id: Uuid,
    group_name: String,
    code: GroupCode,
    member_id: String,
    members: Vec<String>,
}

/// Get the caller's group (auth required)
pub async fn me(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<Json<MeResponse>, ApiError> {
    let group = state.groups.group(session.group_id).await?;

    Ok(Json(MeResponse {
        group_id: group.id,
        group_name: group.name,
        code: group.code,
        member_id: session.member_id,
        members: group.members.into_iter().collect(),
    }))
}

fn bad_body(rejection: JsonRejection) -> ApiError {
    ApiError::new(
        StatusCode::BAD_REQUEST,
        "validation_error",
        rejection.body_text(),
    )
}
