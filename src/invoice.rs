//! Invoice PDF assembly.
//!
//! The document is deliberately plain: a title, the invoice header fields,
//! one line per purchased item and the grand total. `body_lines` owns the
//! textual content so tests can assert on it without parsing PDF streams;
//! `render_pdf` lays those lines out and paginates when they overflow.

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use printpdf::{BuiltinFont, Mm, PdfDocument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::cart_item::CartItem;
use crate::models::shipping_address::NewShippingAddress;

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const TOP_MARGIN_MM: f32 = 30.0;
const BOTTOM_MARGIN_MM: f32 = 20.0;
const LEFT_MARGIN_MM: f32 = 20.0;
const LINE_STEP_MM: f32 = 7.0;

pub struct InvoiceData<'a> {
    pub order_id: Uuid,
    pub invoice_number: &'a str,
    pub created_at: DateTime<Utc>,
    pub customer_email: &'a str,
    pub address: &'a NewShippingAddress,
    pub items: &'a [CartItem],
    pub total: &'a BigDecimal,
}

/// The invoice body, one entry per printed line, in print order.
pub fn body_lines(data: &InvoiceData) -> Vec<String> {
    let mut lines = vec![
        format!("Invoice Number: {}", data.invoice_number),
        format!("Order ID: {}", data.order_id),
        format!("Date: {}", data.created_at.format("%Y-%m-%d")),
        format!("Customer: {}", data.customer_email),
        format!(
            "Shipping: {}, {}, {}",
            data.address.full_name, data.address.address_line1, data.address.city
        ),
        "Items:".to_string(),
    ];
    for item in data.items {
        lines.push(format!(
            "{} - Qty: {} - Price: ${}",
            item.title,
            item.quantity,
            item.unit_price.with_scale(2)
        ));
    }
    lines.push(format!("Total: ${}", data.total.with_scale(2)));
    lines
}

/// Render the invoice as PDF bytes. Fails with `Internal` if the document
/// cannot be assembled; the caller treats that as a checkout failure.
pub fn render_pdf(data: &InvoiceData) -> Result<Vec<u8>, AppError> {
    let (doc, first_page, first_layer) = PdfDocument::new(
        format!("Invoice {}", data.invoice_number),
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "invoice",
    );
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(pdf_error)?;
    let title_font = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(pdf_error)?;

    let mut layer = doc.get_page(first_page).get_layer(first_layer);
    let mut y = PAGE_HEIGHT_MM - TOP_MARGIN_MM;

    layer.use_text("Invoice", 20.0, Mm(90.0), Mm(y), &title_font);
    y -= 2.0 * LINE_STEP_MM;

    for line in body_lines(data) {
        if y < BOTTOM_MARGIN_MM {
            let (page, page_layer) =
                doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "invoice");
            layer = doc.get_page(page).get_layer(page_layer);
            y = PAGE_HEIGHT_MM - TOP_MARGIN_MM;
        }
        layer.use_text(line, 12.0, Mm(LEFT_MARGIN_MM), Mm(y), &font);
        y -= LINE_STEP_MM;
    }

    doc.save_to_bytes().map_err(pdf_error)
}

fn pdf_error<E: std::fmt::Display>(e: E) -> AppError {
    AppError::Internal(format!("invoice rendering failed: {}", e))
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

    fn sample_address() -> NewShippingAddress {
        NewShippingAddress {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            full_name: "Jane Reader".to_string(),
            address_line1: "1 Library Lane".to_string(),
            address_line2: String::new(),
            city: "Booktown".to_string(),
            state: "BT".to_string(),
            postal_code: "12345".to_string(),
            country: "Bookland".to_string(),
            phone: String::new(),
        }
    }

    #[test]
    fn body_lines_carry_order_id_items_and_total() {
        let items = vec![cart_item("Book A", "1000", 2), cart_item("Book B", "500", 1)];
        let total = BigDecimal::from_str("2500").unwrap();
        let order_id = Uuid::new_v4();
        let address = sample_address();
        let number = format!("INV-{}-1725000000000", order_id);

        let lines = body_lines(&InvoiceData {
            order_id,
            invoice_number: &number,
            created_at: Utc::now(),
            customer_email: "jane@example.com",
            address: &address,
            items: &items,
            total: &total,
        });

        let text = lines.join("\n");
        assert!(text.contains(&order_id.to_string()));
        assert!(text.contains(&number));
        assert!(text.contains("Book A"));
        assert!(text.contains("Book B"));
        assert!(text.contains("Total: $2500.00"));
        assert!(text.contains("Customer: jane@example.com"));
        assert!(text.contains("Shipping: Jane Reader, 1 Library Lane, Booktown"));
    }

    #[test]
    fn item_lines_follow_the_items_header() {
        let items = vec![cart_item("Book A", "12.50", 3)];
        let total = BigDecimal::from_str("37.50").unwrap();
        let address = sample_address();
        let lines = body_lines(&InvoiceData {
            order_id: Uuid::new_v4(),
            invoice_number: "INV-test",
            created_at: Utc::now(),
            customer_email: "jane@example.com",
            address: &address,
            items: &items,
            total: &total,
        });

        let header = lines.iter().position(|l| l == "Items:").unwrap();
        assert_eq!(lines[header + 1], "Book A - Qty: 3 - Price: $12.50");
        assert_eq!(lines[header + 2], "Total: $37.50");
    }

    #[test]
    fn render_pdf_produces_a_pdf_byte_stream() {
        let items = vec![cart_item("Book A", "1000", 2)];
        let total = BigDecimal::from_str("2000").unwrap();
        let address = sample_address();
        let bytes = render_pdf(&InvoiceData {
            order_id: Uuid::new_v4(),
            invoice_number: "INV-test",
            created_at: Utc::now(),
            customer_email: "jane@example.com",
            address: &address,
            items: &items,
            total: &total,
        })
        .unwrap();

        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn render_pdf_handles_more_lines_than_one_page() {
        let items: Vec<CartItem> = (0..80)
            .map(|i| cart_item(&format!("Book {}", i), "9.99", 1))
            .collect();
        let total = BigDecimal::from_str("799.20").unwrap();
        let address = sample_address();
        let bytes = render_pdf(&InvoiceData {
            order_id: Uuid::new_v4(),
            invoice_number: "INV-test",
            created_at: Utc::now(),
            customer_email: "jane@example.com",
            address: &address,
            items: &items,
            total: &total,
        })
        .unwrap();

        assert!(bytes.starts_with(b"%PDF"));
    }
}
