//! The module contains the `Group` struct and its database entity.
//!
//! A group is a set of people sharing expenses. Its only engine-owned state
//! is the `finalized` flag, which is written together with the stored
//! settlement.

use sea_orm::entity::prelude::*;
use serde::Serialize;

/// A group of people sharing expenses.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Group {
    pub id: i64,
    pub name: String,
    /// `true` once a settlement has been finalized and not reopened.
    pub finalized: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "groups")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub finalized: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::people::Entity")]
    People,
    #[sea_orm(has_many = "super::events::Entity")]
    Events,
}

impl Related<super::people::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::People.def()
    }
}

impl Related<super::events::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Events.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Group {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            finalized: model.finalized,
        }
    }
}

/// A group with its members, as returned by
/// [`Engine::group`](crate::Engine::group).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GroupDetail {
    pub group: Group,
    /// Members ordered by ascending id.
    pub people: Vec<crate::Person>,
}
