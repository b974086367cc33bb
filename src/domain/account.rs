use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Cents;

/// Account numbers are assigned by the store (auto-increment primary key),
/// so a plain integer rather than a generated UUID.
pub type AccountId = i64;

/// A customer account as held by the bank.
/// The balance is mutated in place by deposits, withdrawals and transfers,
/// and must never drop below zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub name: String,
    /// 10 digits, leading digit 6-9. Unique across all accounts.
    pub phone: String,
    pub email: String,
    pub balance_cents: Cents,
    pub created_at: DateTime<Utc>,
}
