use std::str::FromStr;

use actix_web::{web, HttpResponse};
use bigdecimal::{BigDecimal, Zero};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::auth::AuthenticatedUser;
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::cart_item::{CartItem, NewCartItem};
use crate::schema::cart;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddCartItemRequest {
    #[validate(length(min = 1, message = "bookId is required"))]
    pub book_id: String,
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    #[serde(default)]
    pub authors: String,
    /// Decimal price as a string to avoid floating-point issues, e.g. "9.99"
    pub unit_price: String,
    #[validate(range(min = 1, message = "quantity must be at least 1"))]
    pub quantity: i32,
}

const ADD_ITEM_FIELD_ORDER: [&str; 3] = ["book_id", "title", "quantity"];

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCartItemRequest {
    #[validate(range(min = 1, message = "quantity must be at least 1"))]
    pub quantity: i32,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartItemResponse {
    pub id: Uuid,
    pub book_id: String,
    pub title: String,
    pub authors: String,
    pub unit_price: String,
    pub quantity: i32,
}

impl From<CartItem> for CartItemResponse {
    fn from(item: CartItem) -> Self {
        CartItemResponse {
            id: item.id,
            book_id: item.book_id,
            title: item.title,
            authors: item.authors,
            unit_price: item.unit_price.with_scale(2).to_string(),
            quantity: item.quantity,
        }
    }
}

fn parse_positive_price(raw: &str) -> Result<BigDecimal, AppError> {
    match BigDecimal::from_str(raw) {
        Ok(price) if price > BigDecimal::zero() => Ok(price),
        _ => Err(AppError::Validation(
            "unitPrice must be a positive decimal".to_string(),
        )),
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /cart
#[utoipa::path(
    get,
    path = "/cart",
    responses(
        (status = 200, description = "The caller's cart items", body = [CartItemResponse]),
        (status = 401, description = "Missing or invalid token"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "cart"
)]
pub async fn list_cart_items(
    pool: web::Data<DbPool>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let items = web::block(move || {
        let mut conn = pool.get()?;
        let items: Vec<CartItem> = cart::table
            .filter(cart::user_id.eq(user.user_id))
            .order(cart::created_at.asc())
            .select(CartItem::as_select())
            .load(&mut conn)?;
        Ok::<_, AppError>(
            items
                .into_iter()
                .map(CartItemResponse::from)
                .collect::<Vec<_>>(),
        )
    })
    .await??;

    Ok(HttpResponse::Ok().json(items))
}

/// POST /cart
#[utoipa::path(
    post,
    path = "/cart",
    request_body = AddCartItemRequest,
    responses(
        (status = 201, description = "Item added", body = CartItemResponse),
        (status = 400, description = "Validation failure"),
        (status = 401, description = "Missing or invalid token"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "cart"
)]
pub async fn add_cart_item(
    pool: web::Data<DbPool>,
    user: AuthenticatedUser,
    body: web::Json<AddCartItemRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    body.validate().map_err(|errors| {
        AppError::Validation(super::first_validation_message(
            &errors,
            &ADD_ITEM_FIELD_ORDER,
        ))
    })?;
    let unit_price = parse_positive_price(&body.unit_price)?;

    let response = web::block(move || {
        let mut conn = pool.get()?;
        let new_item = NewCartItem {
            id: Uuid::new_v4(),
            user_id: user.user_id,
            book_id: body.book_id,
            title: body.title,
            authors: body.authors,
            unit_price,
            quantity: body.quantity,
        };
        let item: CartItem = diesel::insert_into(cart::table)
            .values(&new_item)
            .returning(CartItem::as_returning())
            .get_result(&mut conn)?;
        Ok::<_, AppError>(CartItemResponse::from(item))
    })
    .await??;

    Ok(HttpResponse::Created().json(response))
}

/// PUT /cart/{id}
#[utoipa::path(
    put,
    path = "/cart/{id}",
    params(
        ("id" = Uuid, Path, description = "Cart item UUID"),
    ),
    request_body = UpdateCartItemRequest,
    responses(
        (status = 200, description = "Quantity updated"),
        (status = 400, description = "Validation failure"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "No such item for this caller"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "cart"
)]
pub async fn update_cart_item(
    pool: web::Data<DbPool>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    body: web::Json<UpdateCartItemRequest>,
) -> Result<HttpResponse, AppError> {
    let item_id = path.into_inner();
    let body = body.into_inner();
    body.validate().map_err(|errors| {
        AppError::Validation(super::first_validation_message(&errors, &["quantity"]))
    })?;

    web::block(move || {
        let mut conn = pool.get()?;
        let updated = diesel::update(
            cart::table
                .filter(cart::id.eq(item_id))
                .filter(cart::user_id.eq(user.user_id)),
        )
        .set(cart::quantity.eq(body.quantity))
        .execute(&mut conn)?;
        if updated == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    })
    .await??;

    Ok(HttpResponse::Ok().json(json!({ "message": "Quantity updated." })))
}

/// DELETE /cart/{id}
#[utoipa::path(
    delete,
    path = "/cart/{id}",
    params(
        ("id" = Uuid, Path, description = "Cart item UUID"),
    ),
    responses(
        (status = 200, description = "Item removed"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "No such item for this caller"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "cart"
)]
pub async fn remove_cart_item(
    pool: web::Data<DbPool>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let item_id = path.into_inner();

    web::block(move || {
        let mut conn = pool.get()?;
        let deleted = diesel::delete(
            cart::table
                .filter(cart::id.eq(item_id))
                .filter(cart::user_id.eq(user.user_id)),
        )
        .execute(&mut conn)?;
        if deleted == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    })
    .await??;

    Ok(HttpResponse::Ok().json(json!({ "message": "Item removed from cart." })))
}
