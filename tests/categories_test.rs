mod common;

use anyhow::Result;
use monedero::domain::Kind;

use common::test_service;

#[tokio::test]
async fn test_seed_inserts_default_catalog() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let all = service.list_categories(None).await?;
    assert_eq!(all.len(), 12);

    let income = service.list_categories(Some(Kind::Income)).await?;
    let expense = service.list_categories(Some(Kind::Expense)).await?;
    assert_eq!(income.len(), 6);
    assert_eq!(expense.len(), 6);

    assert!(income.iter().any(|c| c.name == "Salary"));
    assert!(expense.iter().any(|c| c.name == "Food"));
    Ok(())
}

#[tokio::test]
async fn test_seed_is_idempotent() -> Result<()> {
    let (service, _temp) = test_service().await?;

    // test_service already seeded once; run it twice more
    service.ensure_categories_seeded().await?;
    service.ensure_categories_seeded().await?;

    let all = service.list_categories(None).await?;
    assert_eq!(all.len(), 12);
    Ok(())
}

#[tokio::test]
async fn test_categories_are_ordered_by_name() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let expense = service.list_categories(Some(Kind::Expense)).await?;
    let names: Vec<_> = expense.iter().map(|c| c.name.as_str()).collect();
    let mut sorted = names.clone();
    sorted.sort_unstable();

    assert_eq!(names, sorted);
    Ok(())
}

#[tokio::test]
async fn test_category_lookup_by_name_and_kind() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let food = service.get_category_by_name("Food", Kind::Expense).await?;
    assert_eq!(food.kind, Kind::Expense);

    // Same name under the wrong kind is not found
    let missing = service.get_category_by_name("Food", Kind::Income).await;
    assert!(missing.is_err());
    Ok(())
}
