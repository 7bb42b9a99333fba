//! Settlement API endpoints
//!
//! `settle-debug` only previews. `settle` finalizes the group and stores the
//! result, which `settlement` returns until the group is reopened.

use api_types::{
    Amount,
    settlement::{BalanceView, SettleDebug, SettlementView, TransactionView},
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{Balance, EngineError, Transaction};

use crate::{ServerError, server::ServerState};

fn balance_view(balance: Balance) -> BalanceView {
    BalanceView {
        person_id: balance.person_id,
        name: balance.name,
        paid: Amount(balance.paid.cents()),
        owed: Amount(balance.owed.cents()),
        balance: Amount(balance.net.cents()),
    }
}

fn transaction_view(tx: Transaction) -> TransactionView {
    TransactionView {
        from_id: tx.from_id,
        from_name: tx.from_name,
        to_id: tx.to_id,
        to_name: tx.to_name,
        amount: Amount(tx.amount.cents()),
    }
}

/// Handle requests for a preview of balances and transactions
pub async fn settle_debug(
    State(state): State<ServerState>,
    Path(group_id): Path<i64>,
) -> Result<Json<SettleDebug>, ServerError> {
    let preview = state.engine.preview(group_id).await?;

    Ok(Json(SettleDebug {
        people: preview.balances.into_iter().map(balance_view).collect(),
        transactions: preview
            .transactions
            .into_iter()
            .map(transaction_view)
            .collect(),
    }))
}

/// Handle requests for finalizing a group
pub async fn settle(
    State(state): State<ServerState>,
    Path(group_id): Path<i64>,
) -> Result<Json<Vec<TransactionView>>, ServerError> {
    let settlement = state.engine.finalize(group_id).await?;
    tracing::info!(
        group_id,
        settlement_id = %settlement.id,
        transactions = settlement.transactions.len(),
        "group finalized"
    );

    Ok(Json(
        settlement
            .transactions
            .into_iter()
            .map(transaction_view)
            .collect(),
    ))
}

/// Handle requests for the stored settlement of a finalized group
pub async fn get(
    State(state): State<ServerState>,
    Path(group_id): Path<i64>,
) -> Result<Json<SettlementView>, ServerError> {
    let settlement = state
        .engine
        .settlement(group_id)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound(format!("settlement of group {group_id}")))?;

    Ok(Json(SettlementView {
        id: settlement.id,
        group_id: settlement.group_id,
        finalized_at: settlement.finalized_at,
        people: settlement.balances.into_iter().map(balance_view).collect(),
        transactions: settlement
            .transactions
            .into_iter()
            .map(transaction_view)
            .collect(),
    }))
}

/// Handle requests for reopening a finalized group
pub async fn reopen(
    State(state): State<ServerState>,
    Path(group_id): Path<i64>,
) -> Result<StatusCode, ServerError> {
    state.engine.reopen(group_id).await?;
    tracing::info!(group_id, "group reopened");
    Ok(StatusCode::NO_CONTENT)
}
