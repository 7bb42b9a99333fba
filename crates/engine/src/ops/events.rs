use std::collections::HashSet;

use sea_orm::{ActiveValue, DatabaseTransaction, QueryFilter, TransactionTrait, prelude::*};

use crate::{EngineError, Event, NewEvent, ResultEngine, Share, event_participants, events};

use super::{Engine, with_tx};

const UNTITLED_EVENT: &str = "Untitled Event";

impl Engine {
    /// Record a new expense in an open group.
    ///
    /// Shares may be empty here and added later with
    /// [`Engine::add_participants`]; the settlement computation rejects events
    /// that still have no participant.
    pub async fn create_event(&self, group_id: i64, new_event: NewEvent) -> ResultEngine<Event> {
        if !new_event.amount.is_positive() {
            return Err(EngineError::InvalidAmount(
                "event amount must be > 0".to_string(),
            ));
        }
        let title = new_event
            .title
            .as_deref()
            .map(|title| title.split_whitespace().collect::<Vec<_>>().join(" "))
            .filter(|title| !title.is_empty())
            .unwrap_or_else(|| UNTITLED_EVENT.to_string());

        let _guard = self.locks.acquire(group_id).await;
        with_tx!(self, |db_tx| {
            self.require_open_group(&db_tx, group_id).await?;
            self.require_person(&db_tx, group_id, new_event.payer_id)
                .await?;

            let model = events::ActiveModel {
                id: ActiveValue::NotSet,
                group_id: ActiveValue::Set(group_id),
                title: ActiveValue::Set(title),
                amount_minor: ActiveValue::Set(new_event.amount.cents()),
                payer_id: ActiveValue::Set(new_event.payer_id),
            }
            .insert(&db_tx)
            .await?;

            let shares = self
                .insert_shares(&db_tx, group_id, model.id, &new_event.shares)
                .await?;

            Ok(Event {
                id: model.id,
                title: model.title,
                amount: new_event.amount,
                payer_id: model.payer_id,
                shares,
            })
        })
    }

    /// Add participants to an event of an open group.
    ///
    /// People already taking part in the event are skipped, so the call can
    /// be repeated safely. Returns the shares actually inserted.
    pub async fn add_participants(
        &self,
        group_id: i64,
        event_id: i64,
        shares: &[Share],
    ) -> ResultEngine<Vec<Share>> {
        let _guard = self.locks.acquire(group_id).await;
        with_tx!(self, |db_tx| {
            self.require_open_group(&db_tx, group_id).await?;
            events::Entity::find_by_id(event_id)
                .filter(events::Column::GroupId.eq(group_id))
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound(format!("event {event_id}")))?;

            self.insert_shares(&db_tx, group_id, event_id, shares).await
        })
    }

    /// Events of a group with their shares, ordered by id.
    pub async fn events(&self, group_id: i64) -> ResultEngine<Vec<Event>> {
        with_tx!(self, |db_tx| {
            self.require_group(&db_tx, group_id).await?;
            self.load_events(&db_tx, group_id).await
        })
    }

    async fn insert_shares(
        &self,
        db_tx: &DatabaseTransaction,
        group_id: i64,
        event_id: i64,
        shares: &[Share],
    ) -> ResultEngine<Vec<Share>> {
        let mut present: HashSet<i64> = event_participants::Entity::find()
            .filter(event_participants::Column::EventId.eq(event_id))
            .all(db_tx)
            .await?
            .into_iter()
            .map(|model| model.person_id)
            .collect();

        let mut inserted = Vec::new();
        for share in shares {
            if share.weight.is_negative() {
                return Err(EngineError::InvalidWeight(format!(
                    "weight of person {} must be >= 0",
                    share.person_id
                )));
            }
            self.require_person(db_tx, group_id, share.person_id).await?;
            if !present.insert(share.person_id) {
                continue;
            }

            event_participants::ActiveModel {
                id: ActiveValue::NotSet,
                event_id: ActiveValue::Set(event_id),
                person_id: ActiveValue::Set(share.person_id),
                weight_micros: ActiveValue::Set(share.weight.micros()),
            }
            .insert(db_tx)
            .await?;
            inserted.push(*share);
        }
        Ok(inserted)
    }
}
