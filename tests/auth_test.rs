mod common;

use anyhow::Result;
use monedero::application::AppError;
use monedero::domain::Kind;

use common::{profile, test_service};

#[tokio::test]
async fn test_register_and_login() -> Result<()> {
    let (mut service, _temp) = test_service().await?;

    let registered = service
        .register(profile("anaq", "ana@example.com"), "secret123")
        .await?;
    assert_eq!(registered.email, "ana@example.com");
    // Plaintext never stored
    assert_ne!(registered.password_hash, "secret123");

    let logged_in = service.login("ana@example.com", "secret123").await?;
    assert_eq!(logged_in.id, registered.id);
    assert_eq!(service.current_user()?.username, "anaq");
    Ok(())
}

#[tokio::test]
async fn test_login_with_wrong_password_fails() -> Result<()> {
    let (mut service, _temp) = test_service().await?;
    service
        .register(profile("anaq", "ana@example.com"), "secret123")
        .await?;

    let result = service.login("ana@example.com", "wrong").await;
    assert!(matches!(result, Err(AppError::InvalidCredentials)));
    assert!(matches!(
        service.current_user(),
        Err(AppError::AuthRequired)
    ));
    Ok(())
}

#[tokio::test]
async fn test_login_with_unknown_email_fails() -> Result<()> {
    let (mut service, _temp) = test_service().await?;

    let result = service.login("nobody@example.com", "whatever").await;
    assert!(matches!(result, Err(AppError::InvalidCredentials)));
    Ok(())
}

#[tokio::test]
async fn test_duplicate_email_is_rejected() -> Result<()> {
    let (service, _temp) = test_service().await?;
    service
        .register(profile("anaq", "ana@example.com"), "secret123")
        .await?;

    let result = service
        .register(profile("other", "ana@example.com"), "different")
        .await;
    assert!(matches!(result, Err(AppError::UserAlreadyExists(_))));
    Ok(())
}

#[tokio::test]
async fn test_register_requires_fields() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let result = service.register(profile("anaq", "  "), "secret123").await;
    assert!(matches!(result, Err(AppError::Validation(_))));

    let result = service.register(profile("anaq", "ana@example.com"), "").await;
    assert!(matches!(result, Err(AppError::Validation(_))));
    Ok(())
}

#[tokio::test]
async fn test_ledger_operations_require_login() -> Result<()> {
    let (service, _temp) = test_service().await?;

    assert!(matches!(
        service.list_transactions().await,
        Err(AppError::AuthRequired)
    ));
    assert!(matches!(
        service.balance().await,
        Err(AppError::AuthRequired)
    ));
    assert!(matches!(
        service.category_breakdown(Kind::Expense).await,
        Err(AppError::AuthRequired)
    ));
    Ok(())
}

#[tokio::test]
async fn test_logout_clears_session() -> Result<()> {
    let (mut service, _temp) = test_service().await?;
    service
        .register(profile("anaq", "ana@example.com"), "secret123")
        .await?;
    service.login("ana@example.com", "secret123").await?;
    assert!(service.current_user().is_ok());

    service.logout();

    assert!(matches!(
        service.current_user(),
        Err(AppError::AuthRequired)
    ));
    assert!(matches!(
        service.balance().await,
        Err(AppError::AuthRequired)
    ));
    Ok(())
}
