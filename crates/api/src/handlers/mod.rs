//! HTTP handlers, one module per resource.
//!
//! Handlers extract the caller, path and body, call the matching service
//! and wrap the result in a [`DataResponse`](crate::response::DataResponse).

pub mod address;
pub mod auth;
pub mod client;
pub mod lead;
pub mod message;
pub mod package;
pub mod payment;
pub mod pickup_location;
pub mod product;
pub mod product_review;
pub mod promo;
pub mod purchase_order;
pub mod qa;
pub mod shipment;
pub mod todo;
pub mod user;
pub mod user_group;
pub mod user_log;
