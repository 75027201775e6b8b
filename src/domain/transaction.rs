use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Category, CategoryId, Cents, Kind, UserId};

pub type TransactionId = Uuid;

/// A single income or expense entry in a user's ledger.
/// Transactions are immutable - the only allowed mutation is deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    /// Owning user; every query filters on this
    pub user_id: UserId,
    /// Selected category (the store does not cross-check its kind)
    pub category_id: CategoryId,
    pub kind: Kind,
    /// Amount in cents (always positive; kind carries the direction)
    pub amount_cents: Cents,
    /// When the transaction occurred in the real world
    pub occurred_at: DateTime<Utc>,
    /// When it was recorded in the system
    pub recorded_at: DateTime<Utc>,
    /// Optional free-text note
    pub note: Option<String>,
}

impl Transaction {
    pub fn new(
        user_id: UserId,
        category_id: CategoryId,
        kind: Kind,
        amount_cents: Cents,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        assert!(amount_cents > 0, "Transaction amount must be positive");
        Self {
            id: Uuid::new_v4(),
            user_id,
            category_id,
            kind,
            amount_cents,
            occurred_at,
            recorded_at: Utc::now(),
            note: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Amount with the kind's sign applied: positive for income,
    /// negative for expense.
    pub fn signed_amount(&self) -> Cents {
        self.kind.signum() * self.amount_cents
    }
}

/// A transaction joined with its category, as returned by listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionEntry {
    pub transaction: Transaction,
    pub category: Category,
}
