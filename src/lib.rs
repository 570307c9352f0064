//! # Push Token Agent Library
//!
//! Issues the short-lived ES256 provider tokens a push-notification service
//! expects in the `authorization` header, and caches them so that a token is
//! signed at most once per freshness window.
//!
//! Modules:
//! - `auth` — JWT header/claims, compact serialization, signing capability
//! - `cache` — cached token and the token manager
//! - `config` — YAML configuration and validation
//! - `helpers` — clock capability and epoch arithmetic
//! - `observability` — prometheus counters
//! - `utils` — logging setup and shared constants

pub mod auth;
pub mod cache;
pub mod config;
pub mod errors;
pub mod helpers;
pub mod observability;
pub mod utils;

#[cfg(test)]
mod tests;

pub use crate::cache::token_manager::TokenManager;
pub use crate::errors::TokenError;
