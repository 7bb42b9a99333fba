use sea_orm::{ConnectionTrait, DatabaseConnection, prelude::*};

use crate::{EngineError, ResultEngine};

mod events;
mod groups;
mod locks;
mod people;
mod settlement;
mod snapshot;

use locks::GroupLocks;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// The settlement engine.
///
/// Owns the ledger connection and the per-group locks. Every operation takes
/// `&self`, so a single engine can be shared behind an `Arc`.
#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    locks: GroupLocks,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Load a group or fail with [`EngineError::GroupNotFound`].
    async fn require_group<C>(&self, db: &C, group_id: i64) -> ResultEngine<crate::groups::Model>
    where
        C: ConnectionTrait,
    {
        crate::groups::Entity::find_by_id(group_id)
            .one(db)
            .await?
            .ok_or(EngineError::GroupNotFound(group_id))
    }

    /// Load a group that still accepts new people and events.
    async fn require_open_group<C>(&self, db: &C, group_id: i64) -> ResultEngine<crate::groups::Model>
    where
        C: ConnectionTrait,
    {
        let group = self.require_group(db, group_id).await?;
        if group.finalized {
            return Err(EngineError::GroupFinalized(group_id));
        }
        Ok(group)
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
            locks: GroupLocks::default(),
        })
    }
}
