//! Settlement engine for shared group expenses.
//!
//! A group records events (who paid, how much, who took part and with which
//! weight). The engine reduces them to per-person balances and to the list of
//! transfers that settles every balance:
//!
//! - [`balances`] splits each event exactly to the cent and sums paid/owed;
//! - [`minimizer`] matches the largest creditor with the largest debtor until
//!   every balance is zero;
//! - [`Engine`] reads consistent snapshots from the ledger and exposes
//!   `preview`, `finalize` and `reopen`, plus the ledger operations used to
//!   record groups, people and events.

pub use balances::Balance;
pub use error::EngineError;
pub use events::{Event, NewEvent, Share};
pub use groups::{Group, GroupDetail};
pub use money::MoneyCents;
pub use ops::{Engine, EngineBuilder};
pub use people::Person;
pub use settlements::{Settlement, SettlementPreview};
pub use transactions::Transaction;
pub use weight::Weight;

pub mod balances;
pub mod minimizer;

mod balance_snapshots;
mod error;
mod event_participants;
mod events;
mod groups;
mod money;
mod ops;
mod people;
mod settlements;
mod transactions;
mod util;
mod weight;

type ResultEngine<T> = Result<T, EngineError>;
