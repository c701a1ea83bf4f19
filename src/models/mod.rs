pub mod cart_item;
pub mod invoice;
pub mod order;
pub mod order_item;
pub mod setting;
pub mod shipping_address;
