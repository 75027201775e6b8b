use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type CategoryId = Uuid;

/// Income/expense classification, shared by transactions and categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    /// Money entering the ledger (salary, gifts, ...)
    Income,
    /// Money leaving the ledger (food, transport, ...)
    Expense,
}

impl Kind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Income => "income",
            Kind::Expense => "expense",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "income" => Some(Kind::Income),
            "expense" => Some(Kind::Expense),
            _ => None,
        }
    }

    /// Sign applied to amounts of this kind when deriving a balance.
    pub fn signum(&self) -> i64 {
        match self {
            Kind::Income => 1,
            Kind::Expense => -1,
        }
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A selectable transaction category. Created once from the default seed
/// list and read-only afterwards; uniqueness is per (name, kind) and is
/// enforced by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub kind: Kind,
}

impl Category {
    pub fn new(name: impl Into<String>, kind: Kind) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind,
        }
    }
}

/// Fixed category list inserted into an empty store on first use.
pub const DEFAULT_CATEGORIES: &[(&str, Kind)] = &[
    ("Salary", Kind::Income),
    ("Investments", Kind::Income),
    ("Gifts", Kind::Income),
    ("Freelance", Kind::Income),
    ("Savings", Kind::Income),
    ("Other Income", Kind::Income),
    ("Food", Kind::Expense),
    ("Transport", Kind::Expense),
    ("Entertainment", Kind::Expense),
    ("Utilities", Kind::Expense),
    ("Shopping", Kind::Expense),
    ("Other Expense", Kind::Expense),
];

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_kind_roundtrip() {
        for kind in [Kind::Income, Kind::Expense] {
            let parsed = Kind::from_str(kind.as_str()).unwrap();
            assert_eq!(kind, parsed);
        }
        assert_eq!(Kind::from_str("INCOME"), Some(Kind::Income));
        assert_eq!(Kind::from_str("transfer"), None);
    }

    #[test]
    fn test_kind_signum() {
        assert_eq!(Kind::Income.signum(), 1);
        assert_eq!(Kind::Expense.signum(), -1);
    }

    #[test]
    fn test_default_categories_six_per_kind() {
        let income = DEFAULT_CATEGORIES
            .iter()
            .filter(|(_, k)| *k == Kind::Income)
            .count();
        let expense = DEFAULT_CATEGORIES
            .iter()
            .filter(|(_, k)| *k == Kind::Expense)
            .count();
        assert_eq!(income, 6);
        assert_eq!(expense, 6);
    }

    #[test]
    fn test_default_categories_unique_per_kind() {
        let unique: HashSet<_> = DEFAULT_CATEGORIES.iter().collect();
        assert_eq!(unique.len(), DEFAULT_CATEGORIES.len());
    }
}
