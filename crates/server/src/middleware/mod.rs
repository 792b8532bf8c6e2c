//! HTTP middleware stack for the form backend.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, transaction per route)
//! 2. `TraceLayer` (request span)
//! 3. Request ID (add unique ID to each request)
//! 4. CORS (the storefront is served from another origin)

pub mod request_id;

pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
