use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::schema::invoices;

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = invoices)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Invoice {
    pub order_id: Uuid,
    pub invoice_number: String,
    pub pdf_data: Vec<u8>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = invoices)]
pub struct NewInvoice {
    pub order_id: Uuid,
    pub invoice_number: String,
    pub pdf_data: Vec<u8>,
    pub created_at: DateTime<Utc>,
}
