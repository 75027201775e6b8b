use anyhow::{Context, Result, bail};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use uuid::Uuid;

use crate::application::{AppError, LedgerService};
use crate::domain::{Kind, UserProfile, format_cents};
use crate::io::export_transactions_csv;

/// Monedero - Personal Finance Tracker
#[derive(Parser)]
#[command(name = "monedero")]
#[command(about = "Track income and expenses against a seeded category catalog")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, default_value = "monedero.db")]
    pub database: String,

    #[command(subcommand)]
    pub command: Commands,
}

/// Credentials for commands that operate on a user's ledger.
#[derive(Args)]
pub struct AuthArgs {
    /// Account email
    #[arg(long)]
    pub email: String,

    /// Account password
    #[arg(long)]
    pub password: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database and seed the default categories
    Init,

    /// Register a new account
    Register {
        #[arg(long)]
        first_name: String,

        #[arg(long)]
        last_name: String,

        #[arg(long)]
        username: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,
    },

    /// List selectable categories
    Categories {
        /// Filter by kind ("income" or "expense")
        #[arg(long)]
        kind: Option<String>,
    },

    /// Record an income or expense transaction
    Add {
        /// Transaction kind ("income" or "expense")
        kind: String,

        /// Amount (e.g. "50.00" or "50")
        amount: String,

        /// Category name (must match the kind's catalog)
        #[arg(short, long)]
        category: String,

        /// Free-text note
        #[arg(short, long)]
        note: Option<String>,

        /// Date of the transaction (YYYY-MM-DD, defaults to now)
        #[arg(long)]
        date: Option<String>,

        /// Record the expense even if it exceeds the current balance
        #[arg(long)]
        allow_overdraft: bool,

        #[command(flatten)]
        auth: AuthArgs,
    },

    /// Delete a transaction by id
    Rm {
        /// Transaction ID
        id: String,

        #[command(flatten)]
        auth: AuthArgs,
    },

    /// List transactions, most recent first
    List {
        /// Print as JSON instead of a table
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        auth: AuthArgs,
    },

    /// Show the current balance
    Balance {
        #[command(flatten)]
        auth: AuthArgs,
    },

    /// Show per-category totals for one kind
    Stats {
        /// Kind to break down ("income" or "expense")
        kind: String,

        /// Print as JSON instead of a table
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        auth: AuthArgs,
    },

    /// Export transactions to CSV
    Export {
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<String>,

        #[command(flatten)]
        auth: AuthArgs,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let Cli { database, command } = self;

        match command {
            Commands::Init => {
                let service = LedgerService::init(&database).await?;
                service.ensure_categories_seeded().await?;
                println!("Initialized database at {}", database);
            }

            Commands::Register {
                first_name,
                last_name,
                username,
                email,
                password,
            } => {
                let service = LedgerService::connect(&database).await?;
                let profile = UserProfile {
                    first_name,
                    last_name,
                    username,
                    email,
                };
                let user = service.register(profile, &password).await?;
                println!("Registered {} <{}>", user.display_name(), user.email);
            }

            Commands::Categories { kind } => {
                let service = LedgerService::connect(&database).await?;
                let kind = kind.as_deref().map(parse_kind).transpose()?;
                for category in service.list_categories(kind).await? {
                    println!("{:<16} {}", category.name, category.kind);
                }
            }

            Commands::Add {
                kind,
                amount,
                category,
                note,
                date,
                allow_overdraft,
                auth,
            } => {
                let mut service = authed_service(&database, &auth).await?;
                let kind = parse_kind(&kind)?;
                let category = service.get_category_by_name(&category, kind).await?;
                let occurred_at = date.as_deref().map(parse_date).transpose()?;

                let result = service
                    .add_transaction(kind, &amount, category.id, note, occurred_at, allow_overdraft)
                    .await;

                match result {
                    Ok(entry) => {
                        println!(
                            "Recorded {} of {} ({})",
                            entry.transaction.kind,
                            format_cents(entry.transaction.amount_cents),
                            entry.category.name,
                        );
                        println!("Balance: {}", format_cents(service.balance().await?));
                    }
                    Err(AppError::OverdraftWarning { balance, requested }) => {
                        println!(
                            "Warning: expense of {} exceeds your balance of {}.",
                            format_cents(requested),
                            format_cents(balance),
                        );
                        println!("Re-run with --allow-overdraft to record it anyway.");
                    }
                    Err(e) => return Err(e.into()),
                }
                service.logout();
            }

            Commands::Rm { id, auth } => {
                let mut service = authed_service(&database, &auth).await?;
                let id = Uuid::parse_str(&id).context("Invalid transaction ID")?;
                service.delete_transaction(id).await?;
                println!("Deleted transaction {}", id);
                println!("Balance: {}", format_cents(service.balance().await?));
                service.logout();
            }

            Commands::List { json, auth } => {
                let mut service = authed_service(&database, &auth).await?;
                let entries = service.list_transactions().await?;

                if json {
                    println!("{}", serde_json::to_string_pretty(&entries)?);
                } else if entries.is_empty() {
                    println!("No transactions recorded yet.");
                } else {
                    for entry in &entries {
                        let tx = &entry.transaction;
                        let sign = if tx.kind == Kind::Income { "+" } else { "-" };
                        println!(
                            "{}  {}  {}{:>10}  {:<16} {}",
                            tx.id,
                            tx.occurred_at.format("%Y-%m-%d"),
                            sign,
                            format_cents(tx.amount_cents),
                            entry.category.name,
                            tx.note.as_deref().unwrap_or(""),
                        );
                    }
                    println!("Balance: {}", format_cents(service.balance().await?));
                }
                service.logout();
            }

            Commands::Balance { auth } => {
                let mut service = authed_service(&database, &auth).await?;
                println!("{}", format_cents(service.balance().await?));
                service.logout();
            }

            Commands::Stats { kind, json, auth } => {
                let mut service = authed_service(&database, &auth).await?;
                let kind = parse_kind(&kind)?;
                let breakdown = service.category_breakdown(kind).await?;
                let summary = service.summary().await?;

                if json {
                    println!("{}", serde_json::to_string_pretty(&breakdown)?);
                } else {
                    for entry in &breakdown {
                        println!(
                            "{:<16} {:>10}  {:>5.1}%  ({} transactions)",
                            entry.category,
                            format_cents(entry.total),
                            entry.percentage,
                            entry.count,
                        );
                    }
                    println!();
                    println!("Income:  {}", format_cents(summary.total_income));
                    println!("Expense: {}", format_cents(summary.total_expense));
                    println!("Net:     {}", format_cents(summary.net));
                }
                service.logout();
            }

            Commands::Export { output, auth } => {
                let mut service = authed_service(&database, &auth).await?;
                let entries = service.list_transactions().await?;

                match output {
                    Some(path) => {
                        let file = std::fs::File::create(&path)
                            .with_context(|| format!("Failed to create {}", path))?;
                        let count = export_transactions_csv(&entries, file)?;
                        println!("Exported {} transactions to {}", count, path);
                    }
                    None => {
                        export_transactions_csv(&entries, std::io::stdout())?;
                    }
                }
                service.logout();
            }
        }

        Ok(())
    }
}

/// Connect to the database and open a session for the given credentials.
async fn authed_service(database: &str, auth: &AuthArgs) -> Result<LedgerService> {
    let mut service = LedgerService::connect(database).await?;
    service.login(&auth.email, &auth.password).await?;
    Ok(service)
}

fn parse_kind(s: &str) -> Result<Kind> {
    match Kind::from_str(s) {
        Some(kind) => Ok(kind),
        None => bail!("Unknown kind {:?}: expected \"income\" or \"expense\"", s),
    }
}

fn parse_date(date_str: &str) -> Result<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .with_context(|| format!("Invalid date {:?}: expected YYYY-MM-DD", date_str))?;
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc())
        .context("Invalid date")
}
