//! Fabrima
//!
//! Fabrima is the storefront core for a textile shop: product catalog, shopping cart state,
//! cart persistence and transient user notifications.

pub mod cart;
pub mod catalog;
pub mod notifications;
pub mod persistence;
pub mod pricing;
pub mod products;
pub mod schedule;
pub mod storage;
pub mod totals;
pub mod views;
