//! Fabrima storefront application: configuration, logging, cart service, styling assistant and
//! the storefront controller.

pub mod config;
pub mod context;
pub mod domain;
pub mod notifications;
pub mod observability;
pub mod storefront;
