/// Social account handlers - mock connect, listing, toggle, disconnect
///
/// Connecting performs no OAuth handshake; an external account id is
/// synthesized from the platform name and the current time, exactly what a
/// future integration layer would replace.
use crate::db::StoreHandle;
use crate::error::{AppError, Result};
use crate::middleware::UserId;
use crate::models::{NewSocialAccount, Platform};
use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct ConnectAccountForm {
    pub platform: Option<String>,
    pub account_name: Option<String>,
}

/// Connect an account from `platform` and `account_name` form fields.
/// Answers 400 on missing fields or an unknown platform, 200 with the
/// created record on success.
pub async fn connect_account(
    store: web::Data<StoreHandle>,
    user_id: UserId,
    form: web::Form<ConnectAccountForm>,
) -> Result<HttpResponse> {
    let form = form.into_inner();

    let (platform, account_name) = match (
        form.platform.filter(|p| !p.trim().is_empty()),
        form.account_name.filter(|n| !n.trim().is_empty()),
    ) {
        (Some(platform), Some(account_name)) => (platform, account_name),
        _ => {
            return Err(AppError::Validation(
                "Platform and account name are required".to_string(),
            ))
        }
    };

    let platform: Platform = platform
        .parse()
        .map_err(|_| AppError::Validation("Invalid platform".to_string()))?;

    let account = store
        .connect_account(
            user_id.0,
            NewSocialAccount {
                platform,
                account_name,
                external_id: format!("mock-{}-{}", platform, Utc::now().timestamp_millis()),
            },
        )
        .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "account": account,
    })))
}

/// The caller's connected accounts, newest first.
pub async fn list_accounts(
    store: web::Data<StoreHandle>,
    user_id: UserId,
) -> Result<HttpResponse> {
    let accounts = store.list_accounts(user_id.0).await?;
    Ok(HttpResponse::Ok().json(accounts))
}

#[derive(Debug, Deserialize)]
pub struct SetActiveRequest {
    pub is_active: bool,
}

/// Toggle an account active/inactive.
pub async fn set_account_active(
    store: web::Data<StoreHandle>,
    user_id: UserId,
    account_id: web::Path<Uuid>,
    req: web::Json<SetActiveRequest>,
) -> Result<HttpResponse> {
    let updated = store
        .set_account_active(user_id.0, *account_id, req.is_active)
        .await?;

    if updated {
        Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true })))
    } else {
        Err(AppError::NotFound("Social account not found".to_string()))
    }
}

/// Disconnect an account. Idempotent.
pub async fn delete_account(
    store: web::Data<StoreHandle>,
    user_id: UserId,
    account_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    store.delete_account(user_id.0, *account_id).await?;
    Ok(HttpResponse::NoContent().finish())
}
