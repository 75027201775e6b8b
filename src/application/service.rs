use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::auth::{self, Session};
use crate::domain::{
    Category, CategoryId, Cents, DEFAULT_CATEGORIES, Kind, Transaction, TransactionEntry,
    TransactionId, User, UserProfile, parse_cents,
};
use crate::storage::Store;

use super::{AppError, CategorySummary, LedgerSummary};

/// Application service providing high-level operations for a user's ledger.
/// This is the primary interface for any client (CLI, API, mobile shell).
///
/// The service holds at most one session: login creates it, logout clears
/// it, and every ledger operation requires it.
pub struct LedgerService {
    store: Store,
    session: Option<Session>,
}

impl LedgerService {
    /// Create a new ledger service with the given store.
    pub fn new(store: Store) -> Self {
        Self {
            store,
            session: None,
        }
    }

    /// Initialize a new database at the given path.
    pub async fn init(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let store = Store::init(&db_url).await?;
        Ok(Self::new(store))
    }

    /// Connect to an existing database.
    pub async fn connect(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}", database_path);
        let store = Store::connect(&db_url).await?;
        Ok(Self::new(store))
    }

    // ========================
    // Accounts and sessions
    // ========================

    /// Register a new user. The password is stored only as a digest.
    pub async fn register(
        &self,
        profile: UserProfile,
        password: &str,
    ) -> Result<User, AppError> {
        if profile.email.trim().is_empty() || profile.username.trim().is_empty() {
            return Err(AppError::Validation(
                "Email and username are required".to_string(),
            ));
        }
        if password.is_empty() {
            return Err(AppError::Validation("Password is required".to_string()));
        }

        if self.store.get_user_by_email(&profile.email).await?.is_some() {
            return Err(AppError::UserAlreadyExists(profile.email));
        }

        let user = User::new(profile, auth::hash_password(password));
        self.store.save_user(&user).await?;
        info!(user = %user.username, "registered user");
        Ok(user)
    }

    /// Authenticate and open a session.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<&User, AppError> {
        let user = self
            .store
            .get_user_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !auth::verify_password(password, &user.password_hash) {
            warn!(email, "rejected login");
            return Err(AppError::InvalidCredentials);
        }

        let session = self.session.insert(Session::new(user));
        Ok(&session.user)
    }

    /// Close the current session, if any.
    pub fn logout(&mut self) {
        self.session = None;
    }

    /// The logged-in user, or AuthRequired.
    pub fn current_user(&self) -> Result<&User, AppError> {
        self.session
            .as_ref()
            .map(|s| &s.user)
            .ok_or(AppError::AuthRequired)
    }

    // ========================
    // Category catalog
    // ========================

    /// Insert the default category list if missing. Idempotent: the store's
    /// (name, kind) unique constraint makes re-runs and racing callers
    /// converge on a single set of rows.
    pub async fn ensure_categories_seeded(&self) -> Result<(), AppError> {
        let defaults: Vec<Category> = DEFAULT_CATEGORIES
            .iter()
            .map(|(name, kind)| Category::new(*name, *kind))
            .collect();

        let inserted = self.store.seed_categories(&defaults).await?;
        if inserted > 0 {
            info!(inserted, "seeded default categories");
        }
        Ok(())
    }

    /// List categories, optionally filtered by kind, ordered by name.
    pub async fn list_categories(&self, kind: Option<Kind>) -> Result<Vec<Category>, AppError> {
        Ok(self.store.list_categories(kind).await?)
    }

    /// Resolve a category by display name and kind.
    pub async fn get_category_by_name(
        &self,
        name: &str,
        kind: Kind,
    ) -> Result<Category, AppError> {
        self.store
            .get_category_by_name(name, kind)
            .await?
            .ok_or_else(|| AppError::CategoryNotFound(name.to_string()))
    }

    // ========================
    // Ledger operations
    // ========================

    /// List the current user's transactions, most recent first, each joined
    /// with its category.
    pub async fn list_transactions(&self) -> Result<Vec<TransactionEntry>, AppError> {
        let user = self.current_user()?;
        Ok(self.store.list_entries_for_user(user.id).await?)
    }

    /// The current user's balance, aggregated in SQL. Equals
    /// domain::compute_balance over the listed transactions.
    pub async fn balance(&self) -> Result<Cents, AppError> {
        let user = self.current_user()?;
        Ok(self.store.compute_balance(user.id).await?)
    }

    /// Record a new transaction for the current user.
    ///
    /// `amount` is the raw user input; non-numeric or non-positive values
    /// are Validation errors. An expense larger than the current balance is
    /// refused with OverdraftWarning unless `allow_overdraft` is set - the
    /// guard is advisory and the caller may retry with the flag after
    /// confirming with the user.
    pub async fn add_transaction(
        &self,
        kind: Kind,
        amount: &str,
        category_id: CategoryId,
        note: Option<String>,
        occurred_at: Option<DateTime<Utc>>,
        allow_overdraft: bool,
    ) -> Result<TransactionEntry, AppError> {
        let user = self.current_user()?;

        let amount_cents = parse_cents(amount)
            .map_err(|e| AppError::Validation(format!("Invalid amount {:?}: {}", amount, e)))?;
        if amount_cents <= 0 {
            return Err(AppError::Validation(
                "Amount must be positive".to_string(),
            ));
        }

        let category = self
            .store
            .get_category(category_id)
            .await?
            .ok_or_else(|| AppError::CategoryNotFound(category_id.to_string()))?;

        if kind == Kind::Expense && !allow_overdraft {
            let balance = self.store.compute_balance(user.id).await?;
            if crate::domain::would_overdraw(balance, kind, amount_cents) {
                return Err(AppError::OverdraftWarning {
                    balance,
                    requested: amount_cents,
                });
            }
        }

        let mut transaction = Transaction::new(
            user.id,
            category.id,
            kind,
            amount_cents,
            occurred_at.unwrap_or_else(Utc::now),
        );
        if let Some(note) = note {
            transaction = transaction.with_note(note);
        }

        self.store.save_transaction(&transaction).await?;
        info!(kind = %kind, amount_cents, category = %category.name, "recorded transaction");

        Ok(TransactionEntry {
            transaction,
            category,
        })
    }

    /// Delete one of the current user's transactions. Rows belonging to
    /// other users are invisible here: the ownership filter makes a foreign
    /// id indistinguishable from a missing one.
    pub async fn delete_transaction(&self, id: TransactionId) -> Result<(), AppError> {
        let user = self.current_user()?;

        let removed = self.store.delete_transaction(id, user.id).await?;
        if removed == 0 {
            return Err(AppError::TransactionNotFound(id.to_string()));
        }

        info!(transaction = %id, "deleted transaction");
        Ok(())
    }

    // ========================
    // Reporting
    // ========================

    /// Per-category breakdown of one kind, largest total first, with each
    /// category's share of the kind's total.
    pub async fn category_breakdown(
        &self,
        kind: Kind,
    ) -> Result<Vec<CategorySummary>, AppError> {
        let user = self.current_user()?;
        let aggregates = self.store.aggregate_by_category(user.id, kind).await?;

        let grand_total: Cents = aggregates.iter().map(|a| a.total).sum();

        Ok(aggregates
            .into_iter()
            .map(|a| CategorySummary {
                category: a.category,
                kind,
                total: a.total,
                count: a.count,
                percentage: if grand_total > 0 {
                    a.total as f64 / grand_total as f64 * 100.0
                } else {
                    0.0
                },
            })
            .collect())
    }

    /// Headline totals for the current user.
    pub async fn summary(&self) -> Result<LedgerSummary, AppError> {
        let user = self.current_user()?;
        let (total_income, total_expense) = self.store.kind_totals(user.id).await?;

        Ok(LedgerSummary {
            total_income,
            total_expense,
            net: total_income - total_expense,
        })
    }
}
