use utoipa::OpenApi;

use crate::handlers;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::cart::list_cart_items,
        handlers::cart::add_cart_item,
        handlers::cart::update_cart_item,
        handlers::cart::remove_cart_item,
        handlers::checkout::create_checkout,
        handlers::checkout::list_orders,
        handlers::checkout::get_invoice,
        handlers::settings::update_checkout_setting,
    ),
    components(schemas(
        handlers::cart::AddCartItemRequest,
        handlers::cart::UpdateCartItemRequest,
        handlers::cart::CartItemResponse,
        handlers::checkout::ShippingAddressRequest,
        handlers::checkout::CheckoutRequest,
        handlers::checkout::CheckoutResponse,
        handlers::checkout::ShippingSummary,
        handlers::checkout::OrderResponse,
        handlers::settings::UpdateCheckoutSettingRequest,
        crate::models::order::PaymentMethod,
    )),
    tags(
        (name = "cart", description = "Per-user cart line items"),
        (name = "checkout", description = "Order ledger and invoice retrieval"),
        (name = "settings", description = "Admin-controlled feature flags"),
    )
)]
pub struct ApiDoc;
