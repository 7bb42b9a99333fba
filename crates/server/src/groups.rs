//! Group API endpoints

use api_types::{
    group::{GroupNew, GroupSummary, GroupView},
    person::PersonView,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::GroupDetail;

use crate::{ServerError, server::ServerState};

const UNNAMED_GROUP: &str = "Unnamed Group";

fn group_view(detail: GroupDetail) -> GroupView {
    GroupView {
        id: detail.group.id,
        name: detail.group.name,
        finalized: detail.group.finalized,
        people: detail
            .people
            .into_iter()
            .map(|person| PersonView {
                id: person.id,
                name: person.name,
            })
            .collect(),
    }
}

/// Handle requests for creating a new group
pub async fn group_new(
    State(state): State<ServerState>,
    Json(payload): Json<GroupNew>,
) -> Result<(StatusCode, Json<GroupView>), ServerError> {
    let name = payload
        .name
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| UNNAMED_GROUP.to_string());
    let group_id = state.engine.create_group(&name).await?;
    let detail = state.engine.group(group_id).await?;

    Ok((StatusCode::CREATED, Json(group_view(detail))))
}

/// Handle requests for listing groups
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<GroupSummary>>, ServerError> {
    let groups = state
        .engine
        .list_groups()
        .await?
        .into_iter()
        .map(|group| GroupSummary {
            id: group.id,
            name: group.name,
            finalized: group.finalized,
        })
        .collect();

    Ok(Json(groups))
}

/// Handle requests for a group with its people
pub async fn get(
    State(state): State<ServerState>,
    Path(group_id): Path<i64>,
) -> Result<Json<GroupView>, ServerError> {
    let detail = state.engine.group(group_id).await?;
    Ok(Json(group_view(detail)))
}
