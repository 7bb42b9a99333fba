use sea_orm::{ActiveValue, QueryOrder, TransactionTrait, prelude::*};

use crate::{Group, GroupDetail, ResultEngine, groups, util::normalize_display_name};

use super::{Engine, with_tx};

impl Engine {
    /// Create a new, open group and return its id.
    pub async fn create_group(&self, name: &str) -> ResultEngine<i64> {
        let name = normalize_display_name(name, "group")?;
        let model = groups::ActiveModel {
            id: ActiveValue::NotSet,
            name: ActiveValue::Set(name),
            finalized: ActiveValue::Set(false),
        }
        .insert(&self.database)
        .await?;
        Ok(model.id)
    }

    /// Return a group with its people and its finalized flag.
    pub async fn group(&self, group_id: i64) -> ResultEngine<GroupDetail> {
        with_tx!(self, |db_tx| {
            let group = self.require_group(&db_tx, group_id).await?;
            let people = self.load_people(&db_tx, group_id).await?;
            Ok(GroupDetail {
                group: Group::from(group),
                people,
            })
        })
    }

    /// List every group, ordered by id.
    pub async fn list_groups(&self) -> ResultEngine<Vec<Group>> {
        Ok(groups::Entity::find()
            .order_by_asc(groups::Column::Id)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Group::from)
            .collect())
    }
}
