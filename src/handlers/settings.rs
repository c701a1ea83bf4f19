use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;

use crate::application;
use crate::auth::AuthenticatedUser;
use crate::db::DbPool;
use crate::errors::AppError;

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCheckoutSettingRequest {
    pub enabled: bool,
}

/// POST /checkout/settings
///
/// Admin-only toggle of the checkout feature flag. The role check happens
/// here, before any store access.
#[utoipa::path(
    post,
    path = "/checkout/settings",
    request_body = UpdateCheckoutSettingRequest,
    responses(
        (status = 200, description = "Flag updated"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Caller is not an admin"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "settings"
)]
pub async fn update_checkout_setting(
    pool: web::Data<DbPool>,
    user: AuthenticatedUser,
    body: web::Json<UpdateCheckoutSettingRequest>,
) -> Result<HttpResponse, AppError> {
    user.require_admin()?;
    let enabled = body.enabled;

    web::block(move || {
        let mut conn = pool.get()?;
        application::settings::set_checkout_enabled(&mut conn, enabled)
    })
    .await??;

    let message = if enabled {
        "Checkout enabled."
    } else {
        "Checkout disabled."
    };
    Ok(HttpResponse::Ok().json(json!({ "message": message })))
}
