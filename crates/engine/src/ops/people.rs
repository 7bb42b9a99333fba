use sea_orm::{ActiveValue, DatabaseTransaction, QueryFilter, TransactionTrait, prelude::*};

use crate::{
    EngineError, Person, ResultEngine, people,
    util::{normalize_display_name, normalize_name_key},
};

use super::{Engine, with_tx};

impl Engine {
    /// Add a person to an open group and return the new id.
    ///
    /// Names are unique inside a group, ignoring case and accents.
    pub async fn add_person(&self, group_id: i64, name: &str) -> ResultEngine<i64> {
        let name = normalize_display_name(name, "person")?;
        let name_norm = normalize_name_key(&name);

        let _guard = self.locks.acquire(group_id).await;
        with_tx!(self, |db_tx| {
            self.require_open_group(&db_tx, group_id).await?;
            self.ensure_name_available(&db_tx, group_id, &name_norm, None, &name)
                .await?;

            let model = people::ActiveModel {
                id: ActiveValue::NotSet,
                group_id: ActiveValue::Set(group_id),
                name: ActiveValue::Set(name),
                name_norm: ActiveValue::Set(name_norm),
            }
            .insert(&db_tx)
            .await?;
            Ok(model.id)
        })
    }

    /// Rename a member of an open group.
    pub async fn rename_person(
        &self,
        group_id: i64,
        person_id: i64,
        name: &str,
    ) -> ResultEngine<Person> {
        let name = normalize_display_name(name, "person")?;
        let name_norm = normalize_name_key(&name);

        let _guard = self.locks.acquire(group_id).await;
        with_tx!(self, |db_tx| {
            self.require_open_group(&db_tx, group_id).await?;
            let existing = self.require_person(&db_tx, group_id, person_id).await?;
            self.ensure_name_available(&db_tx, group_id, &name_norm, Some(person_id), &name)
                .await?;

            let mut active: people::ActiveModel = existing.into();
            active.name = ActiveValue::Set(name);
            active.name_norm = ActiveValue::Set(name_norm);
            let model = active.update(&db_tx).await?;
            Ok(Person::from(model))
        })
    }

    /// Members of a group, ordered by id.
    pub async fn people(&self, group_id: i64) -> ResultEngine<Vec<Person>> {
        with_tx!(self, |db_tx| {
            self.require_group(&db_tx, group_id).await?;
            self.load_people(&db_tx, group_id).await
        })
    }

    /// Load a person that belongs to `group_id`.
    pub(super) async fn require_person(
        &self,
        db: &DatabaseTransaction,
        group_id: i64,
        person_id: i64,
    ) -> ResultEngine<people::Model> {
        people::Entity::find_by_id(person_id)
            .filter(people::Column::GroupId.eq(group_id))
            .one(db)
            .await?
            .ok_or_else(|| {
                EngineError::UnknownPerson(format!(
                    "person {person_id} is not a member of group {group_id}"
                ))
            })
    }

    async fn ensure_name_available(
        &self,
        db: &DatabaseTransaction,
        group_id: i64,
        name_norm: &str,
        except: Option<i64>,
        display: &str,
    ) -> ResultEngine<()> {
        let mut query = people::Entity::find()
            .filter(people::Column::GroupId.eq(group_id))
            .filter(people::Column::NameNorm.eq(name_norm));
        if let Some(person_id) = except {
            query = query.filter(people::Column::Id.ne(person_id));
        }
        if query.one(db).await?.is_some() {
            return Err(EngineError::ExistingKey(display.to_string()));
        }
        Ok(())
    }
}
