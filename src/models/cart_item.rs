use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::cart;

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = cart)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CartItem {
    pub id: Uuid,
    pub user_id: Uuid,
    pub book_id: String,
    pub title: String,
    pub authors: String,
    pub unit_price: BigDecimal,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = cart)]
pub struct NewCartItem {
    pub id: Uuid,
    pub user_id: Uuid,
    pub book_id: String,
    pub title: String,
    pub authors: String,
    pub unit_price: BigDecimal,
    pub quantity: i32,
}
