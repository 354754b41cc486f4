//! Session token lifecycle management for the Flugo reservations platform
//!
//! Every call into the platform rides on a session token with a short,
//! server-controlled lifetime. This library keeps one current session per
//! [`SessionManager`]: it establishes sessions from credentials, keeps them
//! alive, upgrades them to stronger identities, moves them between
//! reservation servers, and retires them, while tracking how much validity
//! the token has left so callers can renew before the platform cuts them
//! off.
//!
//! Issued tokens are also written to a [`SessionStore`][store::SessionStore]
//! keyed by a digest of the token value, with a time-to-live matching the
//! token's remaining life. With a persistent store such as the bundled
//! [`FileStore`][store::FileStore], a fresh process can resume the previous
//! session instead of re-authenticating, and multiple processes on the same
//! filesystem can share one session.
//!
//! All remote work goes through an [`AuthorityGateway`][gateway::AuthorityGateway].
//! The bundled [`HttpGateway`][gateway::HttpGateway] speaks the platform's
//! HTTP session endpoints; tests and alternative transports provide their
//! own implementations without touching the lifecycle rules.
//!
//! # General Flow
//!
//! On start-up, wire a gateway and a store into a manager, then try to
//! resume a cached session before falling back to authenticating from
//! scratch.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use flugo_session::gateway::{Credentials, HttpGateway};
//! use flugo_session::store::FileStore;
//! use flugo_session::SessionManager;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let gateway = HttpGateway::new(
//!     reqwest::Client::new(),
//!     reqwest::Url::parse("https://api.flugo.example/v2/")?,
//! );
//!
//! let store = FileStore::new(".flugo-session.json".into());
//!
//! let sessions = SessionManager::new(Arc::new(gateway), Arc::new(store));
//!
//! if !sessions.restore_latest() {
//!     sessions.create(Credentials::Anonymous).await?;
//! }
//!
//! let bearer = sessions.current_token()?;
//! tracing::info!(remaining = sessions.token_expires_in().0, "session ready");
//! # let _ = bearer;
//! # Ok(())
//! # }
//! ```
//!
//! This crate includes an example of keeping a session alive with a file
//! cache in the examples folder. Refer to that example for more details on
//! usage.
//!
//! # Features
//!
//! The following features are supported by this crate, all of which are enabled by default:
//!
//! * `file`: Provides a session store backed by the local filesystem.
//! * `http`: Provides the gateway implementation speaking the platform's
//!   HTTP session endpoints.

#![cfg_attr(docsrs, feature(doc_cfg))]
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

mod braids;
mod config;
mod error;
mod events;
pub mod gateway;
mod manager;
pub mod store;
mod token;

pub use braids::*;
pub use config::SessionConfig;
pub use error::{GatewayError, NoActiveSession, SessionError, StoreError, ValidationError};
pub use events::SessionEvent;
pub use manager::SessionManager;
pub use token::{SessionContext, SessionStatus, SessionToken};
