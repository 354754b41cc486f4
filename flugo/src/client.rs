use std::sync::Arc;

use flugo_session::gateway::HttpGateway;
use flugo_session::store::{FileStore, MemoryStore, SessionStore};
use flugo_session::SessionManager;

use crate::{
    http::Transport,
    services::{
        BoardingPassService, CurrencyService, ManifestService, OrganizationService, PersonService,
        UserService, VoucherService,
    },
    ApiError, ClientConfig,
};

/// A client for the Flugo reservations platform
///
/// Owns the session lifecycle manager and the authenticated transport the
/// domain services ride on. Construction wires everything from a
/// [`ClientConfig`]; nothing talks to the platform until a session is
/// established through [`sessions`][Self::sessions].
#[derive(Debug)]
pub struct Client {
    sessions: Arc<SessionManager>,
    transport: Arc<Transport>,
}

impl Client {
    /// Builds a client from `config`
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout().into())
            .build()
            .map_err(ApiError::Request)?;

        let base_url = reqwest::Url::parse(config.base_url())?;

        let gateway = HttpGateway::new(http.clone(), base_url.clone());

        let store: Arc<dyn SessionStore> = match config.cache_file() {
            Some(path) if config.cache_enabled() => Arc::new(FileStore::new(path.to_owned())),
            _ => Arc::new(MemoryStore::new()),
        };

        let sessions = Arc::new(
            SessionManager::new(Arc::new(gateway), store).with_config(config.session_config()),
        );

        let transport = Arc::new(Transport::new(http, base_url, sessions.clone()));

        Ok(Self {
            sessions,
            transport,
        })
    }

    /// The session lifecycle manager backing this client
    ///
    /// Establishing, refreshing, restoring, and ending sessions all happen
    /// here; the domain services only consume the current token.
    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    /// The user account service
    pub fn users(&self) -> UserService {
        UserService::new(self.transport.clone())
    }

    /// The person registry service
    pub fn persons(&self) -> PersonService {
        PersonService::new(self.transport.clone())
    }

    /// The organization service
    pub fn organizations(&self) -> OrganizationService {
        OrganizationService::new(self.transport.clone())
    }

    /// The voucher service
    pub fn vouchers(&self) -> VoucherService {
        VoucherService::new(self.transport.clone())
    }

    /// The flight manifest service
    pub fn manifests(&self) -> ManifestService {
        ManifestService::new(self.transport.clone())
    }

    /// The boarding pass service
    pub fn boarding_passes(&self) -> BoardingPassService {
        BoardingPassService::new(self.transport.clone())
    }

    /// The currency conversion service
    pub fn currency(&self) -> CurrencyService {
        CurrencyService::new(self.transport.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_client_builds_from_the_minimal_config() {
        let client = Client::new(ClientConfig::new("https://api.flugo.test/v2/")).unwrap();

        assert_eq!(
            client.sessions().current_token(),
            Err(flugo_session::NoActiveSession)
        );
    }

    #[test]
    fn a_garbage_base_url_is_rejected() {
        let err = Client::new(ClientConfig::new("not a url")).unwrap_err();

        assert!(matches!(err, ApiError::BadUrl(_)));
    }
}
