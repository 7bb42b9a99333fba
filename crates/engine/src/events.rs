//! Events (recorded expenses).
//!
//! An [`Event`] is one expense: an amount paid by one person and split among
//! its participants proportionally to their [`Weight`].

use sea_orm::entity::prelude::*;
use serde::Serialize;

use crate::{MoneyCents, Weight, event_participants};

/// One participant of an event and its weight.
///
/// A person not taking part in an event simply has no share for it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Share {
    pub person_id: i64,
    pub weight: Weight,
}

impl Share {
    pub fn new(person_id: i64, weight: Weight) -> Self {
        Self { person_id, weight }
    }

    /// Share with the default weight of 1.
    pub fn equal(person_id: i64) -> Self {
        Self::new(person_id, Weight::ONE)
    }
}

/// A recorded expense.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub amount: MoneyCents,
    pub payer_id: i64,
    pub shares: Vec<Share>,
}

/// Input for [`Engine::create_event`](crate::Engine::create_event).
#[derive(Clone, Debug, Default)]
pub struct NewEvent {
    pub title: Option<String>,
    pub amount: MoneyCents,
    pub payer_id: i64,
    /// Participants may also be added later with
    /// [`Engine::add_participants`](crate::Engine::add_participants).
    pub shares: Vec<Share>,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "events")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub group_id: i64,
    pub title: String,
    pub amount_minor: i64,
    pub payer_id: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::groups::Entity",
        from = "Column::GroupId",
        to = "super::groups::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Groups,
    #[sea_orm(has_many = "super::event_participants::Entity")]
    Participants,
}

impl Related<super::groups::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Groups.def()
    }
}

impl Related<super::event_participants::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Participants.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<(Model, Vec<event_participants::Model>)> for Event {
    fn from((model, participants): (Model, Vec<event_participants::Model>)) -> Self {
        Self {
            id: model.id,
            title: model.title,
            amount: MoneyCents::new(model.amount_minor),
            payer_id: model.payer_id,
            shares: participants.into_iter().map(Share::from).collect(),
        }
    }
}
