//! Consistent reads of a group's people and events.

use sea_orm::{ConnectionTrait, QueryFilter, QueryOrder, prelude::*};

use crate::{Event, Person, ResultEngine, event_participants, events, groups, people};

use super::Engine;

/// Everything the settlement computation needs from the ledger.
pub(super) struct GroupSnapshot {
    pub(super) group: groups::Model,
    pub(super) people: Vec<Person>,
    pub(super) events: Vec<Event>,
}

impl Engine {
    /// Reads a group, its people and its events with their shares.
    ///
    /// Callers pass a DB transaction so every row comes from the same
    /// snapshot.
    pub(super) async fn load_snapshot<C>(&self, db: &C, group_id: i64) -> ResultEngine<GroupSnapshot>
    where
        C: ConnectionTrait,
    {
        let group = self.require_group(db, group_id).await?;
        let people = self.load_people(db, group_id).await?;
        let events = self.load_events(db, group_id).await?;
        Ok(GroupSnapshot {
            group,
            people,
            events,
        })
    }

    pub(super) async fn load_people<C>(&self, db: &C, group_id: i64) -> ResultEngine<Vec<Person>>
    where
        C: ConnectionTrait,
    {
        Ok(people::Entity::find()
            .filter(people::Column::GroupId.eq(group_id))
            .order_by_asc(people::Column::Id)
            .all(db)
            .await?
            .into_iter()
            .map(Person::from)
            .collect())
    }

    pub(super) async fn load_events<C>(&self, db: &C, group_id: i64) -> ResultEngine<Vec<Event>>
    where
        C: ConnectionTrait,
    {
        Ok(events::Entity::find()
            .filter(events::Column::GroupId.eq(group_id))
            .order_by_asc(events::Column::Id)
            .find_with_related(event_participants::Entity)
            .order_by_asc(event_participants::Column::PersonId)
            .all(db)
            .await?
            .into_iter()
            .map(Event::from)
            .collect())
    }
}
