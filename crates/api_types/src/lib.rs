use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use decimal::{Amount, ShareWeight};

mod decimal;

/// Error body returned by every failing endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

pub mod group {
    use super::*;
    use crate::person::PersonView;

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct GroupNew {
        /// Defaults to "Unnamed Group".
        pub name: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GroupSummary {
        pub id: i64,
        pub name: String,
        pub finalized: bool,
    }

    /// A group with its members.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct GroupView {
        pub id: i64,
        pub name: String,
        pub finalized: bool,
        pub people: Vec<PersonView>,
    }
}

pub mod person {
    use super::*;

    /// Request body for adding or renaming a person.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct PersonName {
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PersonView {
        pub id: i64,
        pub name: String,
    }
}

pub mod event {
    use super::*;

    /// One participant of an event. `share` defaults to 1.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ParticipantInput {
        pub person_id: i64,
        pub share: Option<ShareWeight>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct EventNew {
        /// Defaults to "Untitled Event".
        pub title: Option<String>,
        /// Must be > 0.
        pub amount: Amount,
        pub payer_id: i64,
        /// Participants can also be added later.
        #[serde(default)]
        pub participants: Vec<ParticipantInput>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ParticipantsAdd {
        pub participants: Vec<ParticipantInput>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ParticipantView {
        pub person_id: i64,
        pub share: ShareWeight,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct EventView {
        pub id: i64,
        pub title: String,
        pub amount: Amount,
        pub payer_id: i64,
        pub participants: Vec<ParticipantView>,
    }
}

pub mod settlement {
    use super::*;

    /// Per-person figures. `balance = paid - owed`: positive means the
    /// person is owed money.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BalanceView {
        pub person_id: i64,
        pub name: String,
        pub paid: Amount,
        pub owed: Amount,
        pub balance: Amount,
    }

    /// A transfer from a debtor to a creditor.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionView {
        pub from_id: i64,
        pub from_name: String,
        pub to_id: i64,
        pub to_name: String,
        pub amount: Amount,
    }

    /// Response of the debug preview.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct SettleDebug {
        pub people: Vec<BalanceView>,
        pub transactions: Vec<TransactionView>,
    }

    /// The stored settlement of a finalized group.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SettlementView {
        pub id: Uuid,
        pub group_id: i64,
        /// RFC3339 timestamp (UTC).
        pub finalized_at: DateTime<Utc>,
        pub people: Vec<BalanceView>,
        pub transactions: Vec<TransactionView>,
    }
}
