// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use monedero::application::LedgerService;
use monedero::domain::{Category, Kind, UserProfile};
use tempfile::TempDir;

/// Helper to create a test service with a temporary, seeded database
pub async fn test_service() -> Result<(LedgerService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let service = LedgerService::init(db_path.to_str().unwrap()).await?;
    service.ensure_categories_seeded().await?;
    Ok((service, temp_dir))
}

/// Helper to parse a date string into DateTime<Utc>
pub fn parse_date(date_str: &str) -> DateTime<Utc> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        .and_utc()
}

pub fn profile(username: &str, email: &str) -> UserProfile {
    UserProfile {
        first_name: "Ana".into(),
        last_name: "Quispe".into(),
        username: username.into(),
        email: email.into(),
    }
}

/// Register a default account and log it in.
pub async fn login_test_user(service: &mut LedgerService) -> Result<()> {
    service
        .register(profile("anaq", "ana@example.com"), "secret123")
        .await?;
    service.login("ana@example.com", "secret123").await?;
    Ok(())
}

/// Resolve a seeded category by name and kind.
pub async fn category(service: &LedgerService, name: &str, kind: Kind) -> Result<Category> {
    Ok(service.get_category_by_name(name, kind).await?)
}
