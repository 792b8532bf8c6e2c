//! Teahouse Core - Commerce state and pricing library.
//!
//! This crate provides the logic shared by every Teahouse component:
//! - `client` - Durable storage, geolocation and form submission adapters
//! - `server` - Form backend that validates and logs submissions
//! - `cli` - Command-line driver for the stores and price utilities
//!
//! # Architecture
//!
//! The core crate performs no I/O of its own. Storage and network access are
//! reached through the [`store::Storage`] and [`region::IpLookup`] traits,
//! which the client crate implements. Everything here is testable with
//! in-memory fakes.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, emails and product snapshots
//! - [`currency`] - Exchange-rate table, conversion and regional formatting
//! - [`store`] - Cart, wishlist, comparison, recently-viewed and preference stores
//! - [`region`] - Best-effort country/currency/language detection
//! - [`forms`] - Form payloads accepted by the backend and their validation

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod currency;
pub mod forms;
pub mod region;
pub mod store;
pub mod types;

pub use currency::{CurrencyCode, FormatOptions, PriceFormatter, RegionalFormatter, Savings};
pub use store::{ShopContext, Storage};
pub use types::*;
