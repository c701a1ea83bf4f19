use diesel::prelude::*;
use diesel::PgConnection;

use crate::errors::AppError;
use crate::models::setting::Setting;
use crate::schema::settings;

pub const CHECKOUT_ENABLED: &str = "checkout_enabled";

/// Checkout is enabled only if the row exists with the exact value `"true"`.
/// A missing row or any other value means disabled; no error either way.
pub fn is_checkout_enabled(conn: &mut PgConnection) -> Result<bool, AppError> {
    let value = settings::table
        .find(CHECKOUT_ENABLED)
        .select(settings::setting_value)
        .first::<String>(conn)
        .optional()?;
    Ok(value.as_deref() == Some("true"))
}

/// Idempotent upsert of the flag. Role enforcement happens at the HTTP layer.
pub fn set_checkout_enabled(conn: &mut PgConnection, enabled: bool) -> Result<(), AppError> {
    diesel::insert_into(settings::table)
        .values(&Setting {
            setting_key: CHECKOUT_ENABLED.to_string(),
            setting_value: enabled.to_string(),
        })
        .on_conflict(settings::setting_key)
        .do_update()
        .set(settings::setting_value.eq(enabled.to_string()))
        .execute(conn)?;
    Ok(())
}
