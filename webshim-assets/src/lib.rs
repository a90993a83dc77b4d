//! Web-client asset serving for the webshim gateway.
//!
//! Resolves an HTTP handler for the frontend assets based on the serving
//! mode: production serves the pre-built static tree, development spawns
//! the JavaScript dev server as a child process and reverse-proxies to it.

#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]

pub mod config;
pub mod dev_server;
pub mod error;
pub mod proxy;
pub mod resolver;
pub mod static_assets;

pub use config::DevServerConfig;
pub use dev_server::{DevServer, DevServerHandle};
pub use error::AssetsError;
pub use proxy::DevProxy;
pub use resolver::{resolve, AssetMode, ResolvedAssets};
pub use static_assets::StaticAssets;
