//! The order ledger: turns a mutable cart into an immutable order inside one
//! database transaction.

use bigdecimal::{BigDecimal, Zero};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::PgConnection;
use uuid::Uuid;

use crate::errors::AppError;
use crate::invoice::{self, InvoiceData};
use crate::models::cart_item::CartItem;
use crate::models::invoice::NewInvoice;
use crate::models::order::{NewOrder, PaymentMethod};
use crate::models::order_item::NewOrderItem;
use crate::models::shipping_address::NewShippingAddress;
use crate::schema::{cart, invoices, order_items, orders, shipping_addresses};

/// Validated shipping input. Optional fields have already been defaulted to
/// the empty string by the HTTP layer.
#[derive(Debug, Clone)]
pub struct ShippingInput {
    pub full_name: String,
    pub address_line1: String,
    pub address_line2: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    pub phone: String,
}

#[derive(Debug, Clone)]
pub struct CheckoutReceipt {
    pub order_id: Uuid,
    pub invoice_number: String,
}

/// Σ(unit price × quantity) over the cart snapshot. This is the only place an
/// order total is ever computed; it is never re-derived from live state.
pub fn order_total(items: &[CartItem]) -> BigDecimal {
    items.iter().fold(BigDecimal::zero(), |sum, item| {
        sum + &item.unit_price * BigDecimal::from(item.quantity)
    })
}

/// `INV-<orderId>-<creationEpochMillis>`, derived from the one timestamp
/// captured per checkout.
pub fn invoice_number(order_id: Uuid, created_at: DateTime<Utc>) -> String {
    format!("INV-{}-{}", order_id, created_at.timestamp_millis())
}

/// Snapshot the user's cart into an order, its items, a shipping address and
/// an invoice, then clear the cart. All writes happen in one transaction:
/// a failure at any step leaves the store exactly as it was.
///
/// The cart rows are read `FOR UPDATE`, so a concurrent checkout for the same
/// user blocks until this transaction commits and then sees the cleared cart,
/// failing with `EmptyCart` instead of double-snapshotting the same lines.
pub fn place_order(
    conn: &mut PgConnection,
    user_id: Uuid,
    customer_email: &str,
    shipping: &ShippingInput,
    payment_method: PaymentMethod,
) -> Result<CheckoutReceipt, AppError> {
    conn.transaction::<_, AppError, _>(|conn| {
        let items: Vec<CartItem> = cart::table
            .filter(cart::user_id.eq(user_id))
            .order(cart::created_at.asc())
            .select(CartItem::as_select())
            .for_update()
            .load(conn)?;

        if items.is_empty() {
            return Err(AppError::EmptyCart);
        }

        // One canonical timestamp per checkout; the order row, the invoice
        // row and the invoice number all share it.
        let created_at = Utc::now();
        let order_id = Uuid::new_v4();
        let number = invoice_number(order_id, created_at);
        let total = order_total(&items);

        let new_address = NewShippingAddress {
            id: Uuid::new_v4(),
            user_id,
            full_name: shipping.full_name.clone(),
            address_line1: shipping.address_line1.clone(),
            address_line2: shipping.address_line2.clone(),
            city: shipping.city.clone(),
            state: shipping.state.clone(),
            postal_code: shipping.postal_code.clone(),
            country: shipping.country.clone(),
            phone: shipping.phone.clone(),
        };
        diesel::insert_into(shipping_addresses::table)
            .values(&new_address)
            .execute(conn)?;

        diesel::insert_into(orders::table)
            .values(&NewOrder {
                id: order_id,
                user_id,
                shipping_address_id: new_address.id,
                payment_method: payment_method.as_str().to_string(),
                total_amount: total.clone(),
                created_at,
            })
            .execute(conn)?;

        let new_items: Vec<NewOrderItem> = items
            .iter()
            .map(|item| NewOrderItem {
                id: Uuid::new_v4(),
                order_id,
                book_id: item.book_id.clone(),
                title: item.title.clone(),
                authors: item.authors.clone(),
                unit_price: item.unit_price.clone(),
                quantity: item.quantity,
            })
            .collect();
        diesel::insert_into(order_items::table)
            .values(&new_items)
            .execute(conn)?;

        // The invoice is written in the same transaction: an order committed
        // without its invoice is unrepresentable, and a rendering failure
        // rolls the whole checkout back.
        let pdf = invoice::render_pdf(&InvoiceData {
            order_id,
            invoice_number: &number,
            created_at,
            customer_email,
            address: &new_address,
            items: &items,
            total: &total,
        })?;
        diesel::insert_into(invoices::table)
            .values(&NewInvoice {
                order_id,
                invoice_number: number.clone(),
                pdf_data: pdf,
                created_at,
            })
            .execute(conn)?;

        diesel::delete(cart::table.filter(cart::user_id.eq(user_id))).execute(conn)?;

        Ok(CheckoutReceipt {
            order_id,
            invoice_number: number,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn cart_item(title: &str, price: &str, quantity: i32) -> CartItem {
        CartItem {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            book_id: "book-1".to_string(),
            title: title.to_string(),
            authors: "Author".to_string(),
            unit_price: BigDecimal::from_str(price).unwrap(),
            quantity,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn total_of_single_line_is_price_times_quantity() {
        let items = vec![cart_item("Book A", "12.50", 3)];
        assert_eq!(
            order_total(&items).with_scale(2).to_string(),
            "37.50"
        );
    }

    #[test]
    fn total_sums_across_lines() {
        let items = vec![cart_item("Book A", "1000", 2), cart_item("Book B", "500", 1)];
        assert_eq!(order_total(&items).with_scale(2).to_string(), "2500.00");
    }

    #[test]
    fn total_of_no_lines_is_zero() {
        assert_eq!(order_total(&[]).with_scale(2).to_string(), "0.00");
    }

    #[test]
    fn invoice_number_embeds_order_id_and_epoch_millis() {
        let order_id = Uuid::new_v4();
        let at = Utc::now();
        let number = invoice_number(order_id, at);

        let rest = number.strip_prefix("INV-").unwrap();
        let (id_part, millis_part) = rest.rsplit_once('-').unwrap();
        assert_eq!(id_part, order_id.to_string());
        assert_eq!(millis_part.parse::<i64>().unwrap(), at.timestamp_millis());
    }
}
