//! HTTP server
//!
//! Listener setup, data directory bootstrap, and the resource routes.

pub mod core;
pub mod routes;

pub use self::core::{Server, prepare_data_dirs};
pub use routes::router;
