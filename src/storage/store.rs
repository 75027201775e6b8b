use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::domain::{
    Category, CategoryId, Cents, Kind, Transaction, TransactionEntry, TransactionId, User, UserId,
};

use super::{MIGRATION_001_INITIAL, MIGRATION_002_INDEXES};

/// Per-category aggregate used by the reporting layer.
#[derive(Debug, Clone)]
pub struct CategoryAggregate {
    pub category: String,
    pub count: i64,
    pub total: Cents,
}

/// Store for persisting and querying users, categories and transactions.
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Create a new store with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database at the given path.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;

        sqlx::query(MIGRATION_002_INDEXES)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 002")?;

        Ok(())
    }

    /// Initialize a new database (connect + migrate).
    pub async fn init(database_url: &str) -> Result<Self> {
        let store = Self::connect(database_url).await?;
        store.migrate().await?;
        Ok(store)
    }

    // ========================
    // User operations
    // ========================

    /// Save a new user to the database.
    pub async fn save_user(&self, user: &User) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, first_name, last_name, username, email, password_hash, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(user.id.to_string())
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .context("Failed to save user")?;
        Ok(())
    }

    /// Get a user by email.
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, first_name, last_name, username, email, password_hash, created_at
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch user by email")?;

        match row {
            Some(row) => Ok(Some(Self::row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    fn row_to_user(row: &sqlx::sqlite::SqliteRow) -> Result<User> {
        let id_str: String = row.get("id");
        let created_at_str: String = row.get("created_at");

        Ok(User {
            id: Uuid::parse_str(&id_str).context("Invalid user ID")?,
            first_name: row.get("first_name"),
            last_name: row.get("last_name"),
            username: row.get("username"),
            email: row.get("email"),
            password_hash: row.get("password_hash"),
            created_at: DateTime::parse_from_rfc3339(&created_at_str)
                .context("Invalid created_at timestamp")?
                .with_timezone(&Utc),
        })
    }

    // ========================
    // Category operations
    // ========================

    /// Insert categories, skipping any (name, kind) pair already present.
    /// Returns the number of rows actually inserted.
    pub async fn seed_categories(&self, categories: &[Category]) -> Result<u64> {
        let mut inserted = 0;
        for category in categories {
            let result = sqlx::query(
                r#"
                INSERT OR IGNORE INTO categories (id, name, kind)
                VALUES (?, ?, ?)
                "#,
            )
            .bind(category.id.to_string())
            .bind(&category.name)
            .bind(category.kind.as_str())
            .execute(&self.pool)
            .await
            .context("Failed to seed category")?;
            inserted += result.rows_affected();
        }
        Ok(inserted)
    }

    /// List categories, optionally filtered by kind, ordered by name.
    pub async fn list_categories(&self, kind: Option<Kind>) -> Result<Vec<Category>> {
        let rows = match kind {
            Some(kind) => {
                sqlx::query("SELECT id, name, kind FROM categories WHERE kind = ? ORDER BY name")
                    .bind(kind.as_str())
                    .fetch_all(&self.pool)
                    .await
            }
            None => {
                sqlx::query("SELECT id, name, kind FROM categories ORDER BY name")
                    .fetch_all(&self.pool)
                    .await
            }
        }
        .context("Failed to list categories")?;

        rows.iter().map(Self::row_to_category).collect()
    }

    /// Get a category by ID.
    pub async fn get_category(&self, id: CategoryId) -> Result<Option<Category>> {
        let row = sqlx::query("SELECT id, name, kind FROM categories WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch category")?;

        match row {
            Some(row) => Ok(Some(Self::row_to_category(&row)?)),
            None => Ok(None),
        }
    }

    /// Get a category by display name and kind.
    pub async fn get_category_by_name(&self, name: &str, kind: Kind) -> Result<Option<Category>> {
        let row = sqlx::query("SELECT id, name, kind FROM categories WHERE name = ? AND kind = ?")
            .bind(name)
            .bind(kind.as_str())
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch category by name")?;

        match row {
            Some(row) => Ok(Some(Self::row_to_category(&row)?)),
            None => Ok(None),
        }
    }

    fn row_to_category(row: &sqlx::sqlite::SqliteRow) -> Result<Category> {
        let id_str: String = row.get("id");
        let kind_str: String = row.get("kind");

        Ok(Category {
            id: Uuid::parse_str(&id_str).context("Invalid category ID")?,
            name: row.get("name"),
            kind: Kind::from_str(&kind_str)
                .ok_or_else(|| anyhow::anyhow!("Invalid category kind: {}", kind_str))?,
        })
    }

    // ========================
    // Transaction operations
    // ========================

    /// Save a new transaction to the database.
    pub async fn save_transaction(&self, transaction: &Transaction) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO transactions (id, user_id, category_id, kind, amount_cents, occurred_at, recorded_at, note)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(transaction.id.to_string())
        .bind(transaction.user_id.to_string())
        .bind(transaction.category_id.to_string())
        .bind(transaction.kind.as_str())
        .bind(transaction.amount_cents)
        .bind(transaction.occurred_at.to_rfc3339())
        .bind(transaction.recorded_at.to_rfc3339())
        .bind(&transaction.note)
        .execute(&self.pool)
        .await
        .context("Failed to save transaction")?;

        Ok(())
    }

    /// List a user's transactions joined with their category,
    /// most recent first.
    pub async fn list_entries_for_user(&self, user_id: UserId) -> Result<Vec<TransactionEntry>> {
        let rows = sqlx::query(
            r#"
            SELECT t.id, t.user_id, t.category_id, t.kind, t.amount_cents,
                   t.occurred_at, t.recorded_at, t.note,
                   c.name as category_name, c.kind as category_kind
            FROM transactions t
            JOIN categories c ON c.id = t.category_id
            WHERE t.user_id = ?
            ORDER BY t.occurred_at DESC, t.recorded_at DESC
            "#,
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await
        .context("Failed to list transactions")?;

        rows.iter().map(Self::row_to_entry).collect()
    }

    /// Delete a transaction owned by the given user.
    /// Returns the number of rows removed (0 when absent or not owned).
    pub async fn delete_transaction(
        &self,
        id: TransactionId,
        user_id: UserId,
    ) -> Result<u64> {
        let result = sqlx::query("DELETE FROM transactions WHERE id = ? AND user_id = ?")
            .bind(id.to_string())
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .context("Failed to delete transaction")?;

        Ok(result.rows_affected())
    }

    /// Compute a user's balance using SQL aggregation.
    /// This matches domain::compute_balance over the same rows.
    pub async fn compute_balance(&self, user_id: UserId) -> Result<Cents> {
        let row = sqlx::query(
            r#"
            SELECT
                COALESCE(SUM(CASE WHEN kind = 'income' THEN amount_cents ELSE -amount_cents END), 0) as balance
            FROM transactions
            WHERE user_id = ?
            "#,
        )
        .bind(user_id.to_string())
        .fetch_one(&self.pool)
        .await
        .context("Failed to compute balance")?;

        Ok(row.get("balance"))
    }

    /// Total income and total expense for a user.
    pub async fn kind_totals(&self, user_id: UserId) -> Result<(Cents, Cents)> {
        let row = sqlx::query(
            r#"
            SELECT
                COALESCE(SUM(CASE WHEN kind = 'income' THEN amount_cents ELSE 0 END), 0) as income,
                COALESCE(SUM(CASE WHEN kind = 'expense' THEN amount_cents ELSE 0 END), 0) as expense
            FROM transactions
            WHERE user_id = ?
            "#,
        )
        .bind(user_id.to_string())
        .fetch_one(&self.pool)
        .await
        .context("Failed to sum kind totals")?;

        Ok((row.get("income"), row.get("expense")))
    }

    /// Aggregate a user's transactions of one kind by category,
    /// largest total first.
    pub async fn aggregate_by_category(
        &self,
        user_id: UserId,
        kind: Kind,
    ) -> Result<Vec<CategoryAggregate>> {
        let rows = sqlx::query(
            r#"
            SELECT c.name as category, COUNT(*) as count, SUM(t.amount_cents) as total
            FROM transactions t
            JOIN categories c ON c.id = t.category_id
            WHERE t.user_id = ? AND t.kind = ?
            GROUP BY c.name
            ORDER BY total DESC
            "#,
        )
        .bind(user_id.to_string())
        .bind(kind.as_str())
        .fetch_all(&self.pool)
        .await
        .context("Failed to aggregate by category")?;

        Ok(rows
            .iter()
            .map(|row| CategoryAggregate {
                category: row.get("category"),
                count: row.get("count"),
                total: row.get("total"),
            })
            .collect())
    }

    fn row_to_entry(row: &sqlx::sqlite::SqliteRow) -> Result<TransactionEntry> {
        let category_id_str: String = row.get("category_id");
        let category_kind_str: String = row.get("category_kind");
        let category_id = Uuid::parse_str(&category_id_str).context("Invalid category ID")?;

        Ok(TransactionEntry {
            transaction: Self::row_to_transaction(row)?,
            category: Category {
                id: category_id,
                name: row.get("category_name"),
                kind: Kind::from_str(&category_kind_str)
                    .ok_or_else(|| anyhow::anyhow!("Invalid category kind: {}", category_kind_str))?,
            },
        })
    }

    fn row_to_transaction(row: &sqlx::sqlite::SqliteRow) -> Result<Transaction> {
        let id_str: String = row.get("id");
        let user_id_str: String = row.get("user_id");
        let category_id_str: String = row.get("category_id");
        let kind_str: String = row.get("kind");
        let occurred_at_str: String = row.get("occurred_at");
        let recorded_at_str: String = row.get("recorded_at");

        Ok(Transaction {
            id: Uuid::parse_str(&id_str).context("Invalid transaction ID")?,
            user_id: Uuid::parse_str(&user_id_str).context("Invalid user ID")?,
            category_id: Uuid::parse_str(&category_id_str).context("Invalid category ID")?,
            kind: Kind::from_str(&kind_str)
                .ok_or_else(|| anyhow::anyhow!("Invalid transaction kind: {}", kind_str))?,
            amount_cents: row.get("amount_cents"),
            occurred_at: DateTime::parse_from_rfc3339(&occurred_at_str)
                .context("Invalid occurred_at timestamp")?
                .with_timezone(&Utc),
            recorded_at: DateTime::parse_from_rfc3339(&recorded_at_str)
                .context("Invalid recorded_at timestamp")?
                .with_timezone(&Utc),
            note: row.get("note"),
        })
    }
}
