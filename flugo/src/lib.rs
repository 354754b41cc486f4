//! Client SDK for the Flugo airline reservations platform
//!
//! The platform authenticates every call with a short-lived session token.
//! A [`Client`] owns a [`SessionManager`][flugo_session::SessionManager]
//! for the token's lifecycle and an authenticated transport the domain
//! services ride on: establish or restore a session once, and every
//! service call attaches the current token on its own.
//!
//! ```no_run
//! use flugo::{Client, ClientConfig};
//! use flugo_session::gateway::Credentials;
//! use flugo_session::{Password, Username};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::new(
//!     ClientConfig::new("https://api.flugo.example/v2/")
//!         .with_cache_file(".flugo-session.json"),
//! )?;
//!
//! if !client.sessions().restore_latest() {
//!     client
//!         .sessions()
//!         .create(Credentials::Password {
//!             username: Username::new("ada".to_string()),
//!             password: Password::new("s3cret".to_string()),
//!         })
//!         .await?;
//! }
//!
//! let me = client.users().current().await?;
//! println!("signed in as {}", me.login);
//! # Ok(())
//! # }
//! ```
//!
//! The services cover a representative slice of the platform's REST
//! surface; [`flugo_session`] is usable on its own where only the session
//! lifecycle is needed.

#![warn(
    missing_docs,
    unused_import_braces,
    unused_imports,
    unused_qualifications
)]
#![deny(
    missing_debug_implementations,
    trivial_numeric_casts,
    unsafe_code,
    unused_must_use
)]

mod client;
mod config;
mod error;
mod http;
pub mod services;
mod validate;

pub use client::Client;
pub use config::ClientConfig;
pub use error::ApiError;
pub use validate::require_fields;
