//! Person API endpoints

use api_types::person::{PersonName, PersonView};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::EngineError;

use crate::{ServerError, server::ServerState};

pub async fn person_new(
    State(state): State<ServerState>,
    Path(group_id): Path<i64>,
    Json(payload): Json<PersonName>,
) -> Result<(StatusCode, Json<PersonView>), ServerError> {
    let person_id = state.engine.add_person(group_id, &payload.name).await?;
    let person = state
        .engine
        .people(group_id)
        .await?
        .into_iter()
        .find(|person| person.id == person_id)
        .ok_or_else(|| EngineError::KeyNotFound(format!("person {person_id}")))?;

    Ok((
        StatusCode::CREATED,
        Json(PersonView {
            id: person.id,
            name: person.name,
        }),
    ))
}

pub async fn rename(
    State(state): State<ServerState>,
    Path((group_id, person_id)): Path<(i64, i64)>,
    Json(payload): Json<PersonName>,
) -> Result<Json<PersonView>, ServerError> {
    let person = state
        .engine
        .rename_person(group_id, person_id, &payload.name)
        .await?;

    Ok(Json(PersonView {
        id: person.id,
        name: person.name,
    }))
}
