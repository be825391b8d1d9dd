//! Farmstand - terminal storefront for an agricultural marketplace
//!
//! This library holds the two layers of the client:
//! - a view layer: a ratatui app with local form/selection state, rendered
//!   conditionally on loading/error/data per widget
//! - an API client layer: one thin reqwest wrapper per backend endpoint,
//!   with bearer-token auth and normalized error messages
//!
//! All business logic (pricing, escrow, payouts, invoicing) lives in the
//! remote backend; nothing here persists beyond the session file.

pub mod api;
pub mod app;
pub mod clipboard;
pub mod config;
pub mod filter;
pub mod mock;
pub mod models;
pub mod net;
pub mod session;
pub mod theme;
pub mod types;
pub mod ui;
pub mod util_text;
