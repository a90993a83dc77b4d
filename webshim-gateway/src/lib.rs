//! HTTP gateway serving the web-client assets.
//!
//! Composition root over `webshim-assets`: reads configuration from the
//! environment, resolves the asset handler for the selected mode, and
//! owns the dev-server cleanup at shutdown.

#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]

pub mod config;
pub mod routes;
