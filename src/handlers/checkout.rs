use actix_web::http::header;
use actix_web::{web, HttpResponse};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::application;
use crate::application::checkout::ShippingInput;
use crate::auth::AuthenticatedUser;
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::invoice::Invoice;
use crate::models::order::{Order, PaymentMethod};
use crate::models::shipping_address::ShippingAddress;
use crate::schema::{invoices, orders, shipping_addresses};

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddressRequest {
    #[validate(length(min = 1, message = "fullName is required"))]
    pub full_name: String,
    #[validate(length(min = 1, message = "addressLine1 is required"))]
    pub address_line1: String,
    #[serde(default)]
    pub address_line2: String,
    #[validate(length(min = 1, message = "city is required"))]
    pub city: String,
    #[validate(length(min = 1, message = "state is required"))]
    pub state: String,
    #[validate(length(min = 1, message = "postalCode is required"))]
    pub postal_code: String,
    #[validate(length(min = 1, message = "country is required"))]
    pub country: String,
    #[serde(default)]
    pub phone: String,
}

/// Declared validation order; the first failing field is the one reported.
const SHIPPING_FIELD_ORDER: [&str; 6] = [
    "full_name",
    "address_line1",
    "city",
    "state",
    "postal_code",
    "country",
];

impl ShippingAddressRequest {
    fn validated(&self) -> Result<(), AppError> {
        self.validate().map_err(|errors| {
            AppError::Validation(super::first_validation_message(
                &errors,
                &SHIPPING_FIELD_ORDER,
            ))
        })
    }

    fn into_input(self) -> ShippingInput {
        ShippingInput {
            full_name: self.full_name,
            address_line1: self.address_line1,
            address_line2: self.address_line2,
            city: self.city,
            state: self.state,
            postal_code: self.postal_code,
            country: self.country,
            phone: self.phone,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub shipping_address: ShippingAddressRequest,
    pub payment_method: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub message: String,
    pub order_id: Uuid,
    pub invoice_number: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShippingSummary {
    pub full_name: String,
    pub address_line1: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: Uuid,
    pub payment_method: String,
    /// Total as a decimal string with two fraction digits, e.g. "2500.00"
    pub total_amount: String,
    pub created_at: String,
    pub shipping_address: ShippingSummary,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /checkout
///
/// Snapshots the caller's cart into an order with its shipping address,
/// item snapshots and PDF invoice, then clears the cart. Preconditions are
/// checked in contract order: feature gate, then schema validation, then the
/// empty-cart check inside the transaction.
#[utoipa::path(
    post,
    path = "/checkout",
    request_body = CheckoutRequest,
    responses(
        (status = 201, description = "Order placed", body = CheckoutResponse),
        (status = 400, description = "Validation failure or empty cart"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Checkout disabled by admin"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "checkout"
)]
pub async fn create_checkout(
    pool: web::Data<DbPool>,
    user: AuthenticatedUser,
    body: web::Json<CheckoutRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();

    let receipt = web::block(move || {
        let mut conn = pool.get()?;

        if !application::settings::is_checkout_enabled(&mut conn)? {
            return Err(AppError::CheckoutDisabled);
        }
        body.shipping_address.validated()?;
        let payment_method = body.payment_method.parse::<PaymentMethod>()?;
        let shipping = body.shipping_address.into_input();

        application::checkout::place_order(
            &mut conn,
            user.user_id,
            &user.email,
            &shipping,
            payment_method,
        )
    })
    .await??;

    Ok(HttpResponse::Created().json(CheckoutResponse {
        message: "Order placed successfully.".to_string(),
        order_id: receipt.order_id,
        invoice_number: receipt.invoice_number,
    }))
}

/// GET /checkout/orders
///
/// All of the caller's orders joined with their shipping address summary,
/// newest first.
#[utoipa::path(
    get,
    path = "/checkout/orders",
    responses(
        (status = 200, description = "The caller's orders", body = [OrderResponse]),
        (status = 401, description = "Missing or invalid token"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "checkout"
)]
pub async fn list_orders(
    pool: web::Data<DbPool>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let responses = web::block(move || {
        let mut conn = pool.get()?;

        let rows: Vec<(Order, ShippingAddress)> = orders::table
            .inner_join(shipping_addresses::table)
            .filter(orders::user_id.eq(user.user_id))
            .order(orders::created_at.desc())
            .select((Order::as_select(), ShippingAddress::as_select()))
            .load(&mut conn)?;

        Ok::<_, AppError>(
            rows.into_iter()
                .map(|(order, address)| OrderResponse {
                    id: order.id,
                    payment_method: order.payment_method,
                    total_amount: order.total_amount.with_scale(2).to_string(),
                    created_at: order.created_at.to_rfc3339(),
                    shipping_address: ShippingSummary {
                        full_name: address.full_name,
                        address_line1: address.address_line1,
                        city: address.city,
                        state: address.state,
                        postal_code: address.postal_code,
                        country: address.country,
                    },
                })
                .collect::<Vec<_>>(),
        )
    })
    .await??;

    Ok(HttpResponse::Ok().json(responses))
}

/// GET /checkout/invoices/{order_id}
///
/// The stored PDF, only for the order's owner. Ownership is part of the
/// lookup itself: any other caller gets 404, never 403, so the order's
/// existence is not confirmed to non-owners.
#[utoipa::path(
    get,
    path = "/checkout/invoices/{order_id}",
    params(
        ("order_id" = Uuid, Path, description = "Order UUID"),
    ),
    responses(
        (status = 200, description = "Invoice PDF bytes"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "No such invoice for this caller"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "checkout"
)]
pub async fn get_invoice(
    pool: web::Data<DbPool>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();

    let invoice = web::block(move || {
        let mut conn = pool.get()?;

        let invoice = invoices::table
            .inner_join(orders::table)
            .filter(invoices::order_id.eq(order_id))
            .filter(orders::user_id.eq(user.user_id))
            .select(Invoice::as_select())
            .first::<Invoice>(&mut conn)
            .optional()?;

        invoice.ok_or(AppError::NotFound)
    })
    .await??;

    Ok(HttpResponse::Ok()
        .content_type("application/pdf")
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}.pdf\"", invoice.invoice_number),
        ))
        .body(invoice.pdf_data))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_address() -> ShippingAddressRequest {
        ShippingAddressRequest {
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
    fn valid_address_passes() {
        assert!(valid_address().validated().is_ok());
    }

    #[test]
    fn missing_full_name_is_reported() {
        let mut address = valid_address();
        address.full_name = String::new();
        let err = address.validated().unwrap_err();
        assert_eq!(err.to_string(), "fullName is required");
    }

    #[test]
    fn first_invalid_field_wins_in_declared_order() {
        let mut address = valid_address();
        address.full_name = String::new();
        address.city = String::new();
        address.country = String::new();
        let err = address.validated().unwrap_err();
        assert_eq!(err.to_string(), "fullName is required");
    }

    #[test]
    fn city_reported_when_earlier_fields_are_fine() {
        let mut address = valid_address();
        address.city = String::new();
        address.postal_code = String::new();
        let err = address.validated().unwrap_err();
        assert_eq!(err.to_string(), "city is required");
    }

    #[test]
    fn optional_fields_default_to_empty_strings() {
        let address: ShippingAddressRequest = serde_json::from_value(serde_json::json!({
            "fullName": "Jane Reader",
            "addressLine1": "1 Library Lane",
            "city": "Booktown",
            "state": "BT",
            "postalCode": "12345",
            "country": "Bookland"
        }))
        .unwrap();
        assert!(address.validated().is_ok());
        let input = address.into_input();
        assert_eq!(input.address_line2, "");
        assert_eq!(input.phone, "");
    }

    #[test]
    fn checkout_request_accepts_camel_case_payload() {
        let request: CheckoutRequest = serde_json::from_value(serde_json::json!({
            "shippingAddress": {
                "fullName": "Jane Reader",
                "addressLine1": "1 Library Lane",
                "city": "Booktown",
                "state": "BT",
                "postalCode": "12345",
                "country": "Bookland"
            },
            "paymentMethod": "PAYPAL"
        }))
        .unwrap();
        assert_eq!(request.payment_method, "PAYPAL");
        assert!(request.payment_method.parse::<PaymentMethod>().is_ok());
    }
}
