//! Domain types shared across repositories, services, and routes.
//!
//! These map 1:1 onto query rows (`sqlx::FromRow`) and serialize directly
//! into response bodies; request types live beside their route handlers.

pub mod cart;
pub mod catalog;
pub mod order;
pub mod user;

pub use cart::{CartItemDetail, CartView};
pub use catalog::{
    Category, CategorySummary, Product, ProductColor, ProductDetail, ProductImage, ProductSize,
    ProductSummary, ProductVariant, Review,
};
pub use order::{Address, AdminOrderDetail, Order, OrderDetail, OrderItem, OrderSummary};
pub use user::User;
