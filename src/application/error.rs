use thiserror::Error;

use crate::domain::Cents;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),

    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    #[error("A user with email {0} already exists")]
    UserAlreadyExists(String),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Not logged in")]
    AuthRequired,

    #[error(
        "Expense of {requested} cents exceeds current balance of {balance} cents; \
         pass the overdraft flag to record it anyway"
    )]
    OverdraftWarning { balance: Cents, requested: Cents },

    #[error("Store unavailable: {0}")]
    Store(#[from] anyhow::Error),
}
