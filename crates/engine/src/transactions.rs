//! Settlement transactions.
//!
//! A [`Transaction`] is one proposed transfer from a debtor to a creditor. The
//! stored rows keep the position in which the minimizer emitted them, which is
//! part of the observable result.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::Serialize;

use crate::MoneyCents;

/// One transfer: `from` pays `amount` to `to`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Transaction {
    pub from_id: i64,
    pub from_name: String,
    pub to_id: i64,
    pub to_name: String,
    pub amount: MoneyCents,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "settlement_transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub group_id: i64,
    #[sea_orm(primary_key, auto_increment = false)]
    pub position: i32,
    pub from_person_id: i64,
    pub from_name: String,
    pub to_person_id: i64,
    pub to_name: String,
    pub amount_minor: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::settlements::Entity",
        from = "Column::GroupId",
        to = "super::settlements::Column::GroupId",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Settlements,
}

impl Related<super::settlements::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Settlements.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    pub(crate) fn from_transaction(group_id: i64, position: i32, tx: &Transaction) -> Self {
        Self {
            group_id: ActiveValue::Set(group_id),
            position: ActiveValue::Set(position),
            from_person_id: ActiveValue::Set(tx.from_id),
            from_name: ActiveValue::Set(tx.from_name.clone()),
            to_person_id: ActiveValue::Set(tx.to_id),
            to_name: ActiveValue::Set(tx.to_name.clone()),
            amount_minor: ActiveValue::Set(tx.amount.cents()),
        }
    }
}

impl From<Model> for Transaction {
    fn from(model: Model) -> Self {
        Self {
            from_id: model.from_person_id,
            from_name: model.from_name,
            to_id: model.to_person_id,
            to_name: model.to_name,
            amount: MoneyCents::new(model.amount_minor),
        }
    }
}
