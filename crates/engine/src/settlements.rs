//! Settlements.
//!
//! A [`SettlementPreview`] is the result of a live computation and is never
//! stored. A [`Settlement`] is what `finalize` persists: the transactions and
//! the balance snapshot they were computed from. A later finalize replaces it
//! as a whole; reopening the group deletes it.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use crate::{Balance, Event, Person, ResultEngine, Transaction, balances, minimizer};

/// Balances and transactions computed from the current events of a group.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SettlementPreview {
    pub balances: Vec<Balance>,
    pub transactions: Vec<Transaction>,
}

impl SettlementPreview {
    /// Runs the balance calculator and the debt minimizer on a snapshot.
    pub fn compute(people: &[Person], events: &[Event]) -> ResultEngine<Self> {
        let balances = balances::compute_balances(people, events)?;
        let transactions = minimizer::minimize(&balances)?;
        Ok(Self {
            balances,
            transactions,
        })
    }
}

/// A finalized settlement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Settlement {
    /// Identifies one finalize run.
    pub id: Uuid,
    pub group_id: i64,
    pub finalized_at: DateTime<Utc>,
    pub balances: Vec<Balance>,
    pub transactions: Vec<Transaction>,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "settlements")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub group_id: i64,
    pub settlement_id: Uuid,
    pub finalized_at: DateTimeUtc,
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
    #[sea_orm(has_many = "super::transactions::Entity")]
    Transactions,
    #[sea_orm(has_many = "super::balance_snapshots::Entity")]
    Balances,
}

impl Related<super::groups::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Groups.def()
    }
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl Related<super::balance_snapshots::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Balances.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
