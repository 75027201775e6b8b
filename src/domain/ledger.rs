use std::collections::HashMap;

use super::{Cents, Kind, Transaction};

/// Compute a user's balance from a list of transactions.
/// Balance = sum of income amounts - sum of expense amounts
pub fn compute_balance(transactions: &[Transaction]) -> Cents {
    transactions
        .iter()
        .fold(0, |balance, tx| balance + tx.signed_amount())
}

/// Sum amounts of one kind, grouped by category id.
/// Categories with no transactions of that kind are absent from the map.
pub fn totals_by_category(
    transactions: &[Transaction],
    kind: Kind,
) -> HashMap<super::CategoryId, Cents> {
    let mut totals = HashMap::new();
    for tx in transactions.iter().filter(|tx| tx.kind == kind) {
        *totals.entry(tx.category_id).or_insert(0) += tx.amount_cents;
    }
    totals
}

/// True when recording an expense of `amount_cents` would drive the balance
/// negative. Advisory only: callers surface a warning the user may override.
pub fn would_overdraw(balance: Cents, kind: Kind, amount_cents: Cents) -> bool {
    kind == Kind::Expense && amount_cents > balance
}
