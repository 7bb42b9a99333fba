//! Balance snapshot stored with a finalized settlement.

use sea_orm::{ActiveValue, entity::prelude::*};

use crate::{Balance, MoneyCents};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "settlement_balances")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub group_id: i64,
    #[sea_orm(primary_key, auto_increment = false)]
    pub person_id: i64,
    pub name: String,
    pub paid_minor: i64,
    pub owed_minor: i64,
    pub net_minor: i64,
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
    pub(crate) fn from_balance(group_id: i64, balance: &Balance) -> Self {
        Self {
            group_id: ActiveValue::Set(group_id),
            person_id: ActiveValue::Set(balance.person_id),
            name: ActiveValue::Set(balance.name.clone()),
            paid_minor: ActiveValue::Set(balance.paid.cents()),
            owed_minor: ActiveValue::Set(balance.owed.cents()),
            net_minor: ActiveValue::Set(balance.net.cents()),
        }
    }
}

impl From<Model> for Balance {
    fn from(model: Model) -> Self {
        Self {
            person_id: model.person_id,
            name: model.name,
            paid: MoneyCents::new(model.paid_minor),
            owed: MoneyCents::new(model.owed_minor),
            net: MoneyCents::new(model.net_minor),
        }
    }
}
