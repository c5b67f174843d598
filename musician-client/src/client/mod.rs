//! Orchestra API client.

mod http;
mod mutate;
mod retrieve;

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::config::OrchestraConfig;
use crate::error::Result;
use crate::http_client::{HttpTransport, Transport};
use crate::utils::log_sanitizer::mask_secret;

/// Outcome of [`Orchestra::verify_credentials`].
#[derive(Debug, Clone, PartialEq)]
pub enum CredentialStatus {
    /// The token works; carries the `accounts/` payload.
    Valid(Value),
    /// The backend rejected the token.
    Invalid,
}

impl CredentialStatus {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }
}

/// An authenticated session against the backend.
///
/// Created by [`login`](Self::login) or restored with
/// [`from_token`](Self::from_token). Every call runs its round-trips one after
/// another.
pub struct Orchestra {
    pub(crate) config: OrchestraConfig,
    pub(crate) transport: Arc<dyn Transport>,
    username: Option<String>,
    auth_token: Option<String>,
}

impl Orchestra {
    /// Exchange credentials for a token.
    ///
    /// A rejected login is not an error: the client is returned without a
    /// token and callers must check [`auth_token`](Self::auth_token).
    pub async fn login(config: OrchestraConfig, username: &str, password: &str) -> Result<Self> {
        let transport = Arc::new(HttpTransport::new(&config)?);
        Self::login_with_transport(config, transport, username, password).await
    }

    /// [`login`](Self::login) over a caller-supplied transport.
    pub async fn login_with_transport(
        config: OrchestraConfig,
        transport: Arc<dyn Transport>,
        username: &str,
        password: &str,
    ) -> Result<Self> {
        let mut client = Self::with_transport(config, transport, Some(username.to_string()), None);
        client.auth_token = client.authenticate(username, password).await?;
        if client.auth_token.is_none() {
            log::warn!("Login for '{username}' returned no token");
        }
        Ok(client)
    }

    /// Restore a session from a previously issued token.
    pub fn from_token(config: OrchestraConfig, token: impl Into<String>) -> Result<Self> {
        let transport = Arc::new(HttpTransport::new(&config)?);
        Ok(Self::with_transport(config, transport, None, Some(token.into())))
    }

    pub fn with_transport(
        config: OrchestraConfig,
        transport: Arc<dyn Transport>,
        username: Option<String>,
        auth_token: Option<String>,
    ) -> Self {
        Self {
            config,
            transport,
            username,
            auth_token,
        }
    }

    pub fn auth_token(&self) -> Option<&str> {
        self.auth_token.as_deref()
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn config(&self) -> &OrchestraConfig {
        &self.config
    }

    /// End the session. The token is dropped locally; the backend keeps no
    /// session state to revoke.
    pub fn logout(self) {
        log::debug!(
            "Logging out {}",
            self.username.as_deref().unwrap_or("token session")
        );
    }
}

impl fmt::Debug for Orchestra {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Orchestra")
            .field("base_url", &self.config.base_url.as_str())
            .field("username", &self.username)
            .field("auth_token", &self.auth_token.as_deref().map(mask_secret))
            .finish_non_exhaustive()
    }
}
