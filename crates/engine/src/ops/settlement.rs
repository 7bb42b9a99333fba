//! Preview, finalize and reopen.
//!
//! `preview` recomputes from the live events and never writes. `finalize`
//! recomputes the same way and stores the result, replacing any previous
//! settlement, all in one DB transaction under the group lock. `reopen`
//! drops the stored settlement and makes the group mutable again.

use chrono::Utc;
use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};
use uuid::Uuid;

use crate::{
    Balance, ResultEngine, Settlement, SettlementPreview, Transaction, balance_snapshots, groups,
    settlements, transactions,
};

use super::{Engine, with_tx};

impl Engine {
    /// Compute balances and transactions from the current events.
    ///
    /// Read-only and lock-free: it may run alongside a `finalize` and then
    /// observes the state either before or after it. Works on finalized
    /// groups too, always reflecting current data rather than the stored
    /// settlement.
    pub async fn preview(&self, group_id: i64) -> ResultEngine<SettlementPreview> {
        with_tx!(self, |db_tx| {
            let snapshot = self.load_snapshot(&db_tx, group_id).await?;
            SettlementPreview::compute(&snapshot.people, &snapshot.events)
        })
    }

    /// Compute the settlement and store it, marking the group finalized.
    ///
    /// Finalizing an already finalized group recomputes and overwrites the
    /// stored settlement. On error nothing is written.
    pub async fn finalize(&self, group_id: i64) -> ResultEngine<Settlement> {
        let _guard = self.locks.acquire(group_id).await;
        with_tx!(self, |db_tx| {
            let snapshot = self.load_snapshot(&db_tx, group_id).await?;
            let computed = SettlementPreview::compute(&snapshot.people, &snapshot.events)?;

            self.delete_stored_settlement(&db_tx, group_id).await?;

            let settlement = Settlement {
                id: Uuid::new_v4(),
                group_id,
                finalized_at: Utc::now(),
                balances: computed.balances,
                transactions: computed.transactions,
            };

            settlements::ActiveModel {
                group_id: ActiveValue::Set(group_id),
                settlement_id: ActiveValue::Set(settlement.id),
                finalized_at: ActiveValue::Set(settlement.finalized_at),
            }
            .insert(&db_tx)
            .await?;
            for (position, tx) in (0_i32..).zip(&settlement.transactions) {
                transactions::ActiveModel::from_transaction(group_id, position, tx)
                    .insert(&db_tx)
                    .await?;
            }
            for balance in &settlement.balances {
                balance_snapshots::ActiveModel::from_balance(group_id, balance)
                    .insert(&db_tx)
                    .await?;
            }

            if !snapshot.group.finalized {
                self.set_finalized(&db_tx, group_id, true).await?;
            }

            Ok(settlement)
        })
    }

    /// Clear the stored settlement and the finalized flag.
    ///
    /// Reopening an open group is a no-op.
    pub async fn reopen(&self, group_id: i64) -> ResultEngine<()> {
        let _guard = self.locks.acquire(group_id).await;
        with_tx!(self, |db_tx| {
            let group = self.require_group(&db_tx, group_id).await?;
            self.delete_stored_settlement(&db_tx, group_id).await?;
            if group.finalized {
                self.set_finalized(&db_tx, group_id, false).await?;
            }
            Ok(())
        })
    }

    /// The stored settlement of a group, if it is finalized.
    pub async fn settlement(&self, group_id: i64) -> ResultEngine<Option<Settlement>> {
        with_tx!(self, |db_tx| {
            self.require_group(&db_tx, group_id).await?;
            let Some(header) = settlements::Entity::find_by_id(group_id).one(&db_tx).await? else {
                return Ok(None);
            };

            let transactions = transactions::Entity::find()
                .filter(transactions::Column::GroupId.eq(group_id))
                .order_by_asc(transactions::Column::Position)
                .all(&db_tx)
                .await?
                .into_iter()
                .map(Transaction::from)
                .collect();
            let balances = balance_snapshots::Entity::find()
                .filter(balance_snapshots::Column::GroupId.eq(group_id))
                .order_by_asc(balance_snapshots::Column::PersonId)
                .all(&db_tx)
                .await?
                .into_iter()
                .map(Balance::from)
                .collect();

            Ok(Some(Settlement {
                id: header.settlement_id,
                group_id,
                finalized_at: header.finalized_at,
                balances,
                transactions,
            }))
        })
    }

    async fn delete_stored_settlement(
        &self,
        db_tx: &DatabaseTransaction,
        group_id: i64,
    ) -> ResultEngine<()> {
        transactions::Entity::delete_many()
            .filter(transactions::Column::GroupId.eq(group_id))
            .exec(db_tx)
            .await?;
        balance_snapshots::Entity::delete_many()
            .filter(balance_snapshots::Column::GroupId.eq(group_id))
            .exec(db_tx)
            .await?;
        settlements::Entity::delete_many()
            .filter(settlements::Column::GroupId.eq(group_id))
            .exec(db_tx)
            .await?;
        Ok(())
    }

    async fn set_finalized(
        &self,
        db_tx: &DatabaseTransaction,
        group_id: i64,
        finalized: bool,
    ) -> ResultEngine<()> {
        groups::ActiveModel {
            id: ActiveValue::Unchanged(group_id),
            finalized: ActiveValue::Set(finalized),
            ..Default::default()
        }
        .update(db_tx)
        .await?;
        Ok(())
    }
}
