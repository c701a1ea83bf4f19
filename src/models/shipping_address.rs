use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::shipping_addresses;

/// A shipping address row. One row is written per checkout and never
/// mutated afterwards, so historical orders keep the address they shipped to.
#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = shipping_addresses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ShippingAddress {
    pub id: Uuid,
    pub user_id: Uuid,
    pub full_name: String,
    pub address_line1: String,
    pub address_line2: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = shipping_addresses)]
pub struct NewShippingAddress {
    pub id: Uuid,
    pub user_id: Uuid,
    pub full_name: String,
    pub address_line1: String,
    pub address_line2: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    pub phone: String,
}
