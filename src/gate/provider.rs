use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::watch;

/// The identity as the provider reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderUser {
    pub uid: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
    pub email_verified: bool,
}

impl ProviderUser {
    pub fn email_domain(&self) -> Option<&str> {
        self.email.as_deref()?.rsplit_once('@').map(|(_, domain)| domain)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The provider has not yet reported the initial session.
    Pending,
    SignedIn(ProviderUser),
    SignedOut,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ProviderError {
    pub code: String,
    pub message: String,
}

impl ProviderError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        ProviderError {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// An external identity service (OAuth popup, password accounts, e-mail links).
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Session-change stream. The current value is the provider's view right now.
    fn session_events(&self) -> watch::Receiver<SessionEvent>;

    async fn sign_in_with_google(&self) -> Result<ProviderUser, ProviderError>;

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<ProviderUser, ProviderError>;

    async fn create_account(
        &self,
        email: &str,
        password: &str,
    ) -> Result<ProviderUser, ProviderError>;

    async fn send_email_verification(&self, user: &ProviderUser) -> Result<(), ProviderError>;

    async fn send_sign_in_link(&self, email: &str, continue_url: &str)
        -> Result<(), ProviderError>;

    fn is_sign_in_link(&self, link: &str) -> bool;

    async fn sign_in_with_link(&self, email: &str, link: &str)
        -> Result<ProviderUser, ProviderError>;

    async fn sign_out(&self) -> Result<(), ProviderError>;
}
