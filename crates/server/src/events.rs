//! Event API endpoints

use api_types::{
    Amount, ShareWeight,
    event::{EventNew, EventView, ParticipantInput, ParticipantView, ParticipantsAdd},
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{Event, MoneyCents, NewEvent, Share, Weight};

use crate::{ServerError, server::ServerState};

fn shares_from_input(participants: &[ParticipantInput]) -> Result<Vec<Share>, ServerError> {
    participants
        .iter()
        .map(|participant| -> Result<Share, ServerError> {
            let weight = participant.share.unwrap_or_default();
            Ok(Share::new(
                participant.person_id,
                Weight::from_micros(weight.micros())?,
            ))
        })
        .collect()
}

fn participant_view(share: &Share) -> ParticipantView {
    ParticipantView {
        person_id: share.person_id,
        share: ShareWeight(share.weight.micros()),
    }
}

fn event_view(event: Event) -> EventView {
    EventView {
        id: event.id,
        title: event.title,
        amount: Amount(event.amount.cents()),
        payer_id: event.payer_id,
        participants: event.shares.iter().map(participant_view).collect(),
    }
}

/// Handle requests for recording a new expense
pub async fn event_new(
    State(state): State<ServerState>,
    Path(group_id): Path<i64>,
    Json(payload): Json<EventNew>,
) -> Result<(StatusCode, Json<EventView>), ServerError> {
    let new_event = NewEvent {
        title: payload.title,
        amount: MoneyCents::new(payload.amount.cents()),
        payer_id: payload.payer_id,
        shares: shares_from_input(&payload.participants)?,
    };
    let event = state.engine.create_event(group_id, new_event).await?;

    Ok((StatusCode::CREATED, Json(event_view(event))))
}

/// Handle requests for listing the events of a group
pub async fn list(
    State(state): State<ServerState>,
    Path(group_id): Path<i64>,
) -> Result<Json<Vec<EventView>>, ServerError> {
    let events = state
        .engine
        .events(group_id)
        .await?
        .into_iter()
        .map(event_view)
        .collect();

    Ok(Json(events))
}

/// Handle requests for adding participants to an event
///
/// Returns only the participants that were actually added.
pub async fn participants_add(
    State(state): State<ServerState>,
    Path((group_id, event_id)): Path<(i64, i64)>,
    Json(payload): Json<ParticipantsAdd>,
) -> Result<Json<Vec<ParticipantView>>, ServerError> {
    if payload.participants.is_empty() {
        return Err(ServerError::Generic("participants required".to_string()));
    }

    let shares = shares_from_input(&payload.participants)?;
    let inserted = state
        .engine
        .add_participants(group_id, event_id, &shares)
        .await?;

    Ok(Json(inserted.iter().map(participant_view).collect()))
}
