//! Teahouse Client - I/O adapters for the commerce stores.
//!
//! The core crate reaches storage and the network only through traits; this
//! crate supplies the real implementations:
//!
//! - [`storage::FileStorage`] - one JSON file per store key
//! - [`geo::IpApiLookup`] - HTTP IP geolocation for the region detector
//! - [`forms::FormsClient`] - submits forms to the backend
//! - [`session::Session`] - wires all of the above into a [`teahouse_core::ShopContext`]

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod forms;
pub mod geo;
pub mod session;
pub mod storage;

pub use config::{ClientConfig, ConfigError};
pub use forms::{ClientError, FormsClient};
pub use geo::IpApiLookup;
pub use session::Session;
pub use storage::FileStorage;
