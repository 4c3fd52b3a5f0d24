use std::convert::Infallible;
use std::sync::Arc;

use log::{error, info, warn};
use thiserror::Error;

use super::pending_email::{PendingEmailStore, StoreError};
use super::provider::{IdentityProvider, ProviderError, ProviderUser};
use super::route_guard::Route;
use crate::notice::{Notice, NoticeVariant};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Please verify your email before signing in.")]
    EmailNotVerified,

    /// Registration succeeded and a verification mail went out; this is
    /// informational, the caller tells the user to check their inbox.
    #[error("Please check your email to verify your account before signing in.")]
    VerificationSent,

    #[error("Email not found. Please try signing in again.")]
    MissingPendingEmail,

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl AuthError {
    pub fn to_notice(&self) -> Notice {
        match self {
            AuthError::VerificationSent => Notice {
                title: "Check your email".into(),
                description: self.to_string(),
                variant: NoticeVariant::Default,
            },
            _ => Notice::error(self.to_string()),
        }
    }
}

/// Where the client should go next, and what to tell the user on arrival.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub to: Route,
    pub notice: Option<Notice>,
}

/// Sign-in, registration and sign-out flows over an [`IdentityProvider`].
pub struct AuthActions {
    provider: Arc<dyn IdentityProvider>,
    pending: Arc<dyn PendingEmailStore>,
    origin: String,
}

impl AuthActions {
    /// `origin` is the client's base URL; magic links return to
    /// `{origin}/magic-link-callback`.
    pub fn new(
        provider: Arc<dyn IdentityProvider>,
        pending: Arc<dyn PendingEmailStore>,
        origin: impl Into<String>,
    ) -> Self {
        AuthActions {
            provider,
            pending,
            origin: origin.into(),
        }
    }

    pub fn magic_link_continue_url(&self) -> String {
        format!(
            "{}{}",
            self.origin.trim_end_matches('/'),
            Route::MagicLinkCallback.path()
        )
    }

    pub async fn sign_in_with_google(&self) -> Result<ProviderUser, AuthError> {
        self.provider.sign_in_with_google().await.map_err(|e| {
            error!("Error signing in with Google: {}", e);
            e.into()
        })
    }

    /// Password sign-in. An unverified account is signed straight back out so
    /// no protected view renders for it.
    pub async fn sign_in_with_email(
        &self,
        email: &str,
        password: &str,
    ) -> Result<ProviderUser, AuthError> {
        let user = self
            .provider
            .sign_in_with_password(email, password)
            .await
            .map_err(|e| {
                error!("Error signing in with email: {}", e);
                AuthError::from(e)
            })?;

        if !user.email_verified {
            warn!("Rejected sign-in for unverified email {}", email);
            self.provider.sign_out().await?;
            return Err(AuthError::EmailNotVerified);
        }

        Ok(user)
    }

    /// Creates the account and mails a verification link. Never completes a
    /// sign-in: success is reported as [`AuthError::VerificationSent`].
    pub async fn register_with_email(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Infallible, AuthError> {
        let user = self
            .provider
            .create_account(email, password)
            .await
            .map_err(|e| {
                error!("Error registering with email: {}", e);
                AuthError::from(e)
            })?;
        self.provider.send_email_verification(&user).await?;

        info!("Sent verification email to {}", email);
        Err(AuthError::VerificationSent)
    }

    pub async fn resend_verification_email(&self, user: &ProviderUser) -> Result<(), AuthError> {
        self.provider
            .send_email_verification(user)
            .await
            .map_err(|e| {
                error!("Error sending verification email: {}", e);
                e.into()
            })
    }

    pub async fn send_magic_link(&self, email: &str) -> Result<(), AuthError> {
        let continue_url = self.magic_link_continue_url();
        self.provider
            .send_sign_in_link(email, &continue_url)
            .await
            .map_err(|e| {
                error!("Error sending magic link: {}", e);
                AuthError::from(e)
            })?;

        // The provider needs the same address again when the link is opened.
        self.pending.save(email)?;
        Ok(())
    }

    /// Finishes an e-mail link sign-in. `Ok(None)` when `link` is not a
    /// sign-in link at all.
    pub async fn complete_magic_link_sign_in(
        &self,
        link: &str,
    ) -> Result<Option<ProviderUser>, AuthError> {
        if !self.provider.is_sign_in_link(link) {
            return Ok(None);
        }

        let email = self.pending.load()?.ok_or(AuthError::MissingPendingEmail)?;

        let user = self
            .provider
            .sign_in_with_link(&email, link)
            .await
            .map_err(|e| {
                error!("Error completing sign in with magic link: {}", e);
                AuthError::from(e)
            })?;
        self.pending.clear()?;

        Ok(Some(user))
    }

    /// What the `/magic-link-callback` view does once mounted.
    pub async fn handle_magic_link_callback(&self, link: &str) -> Navigation {
        match self.complete_magic_link_sign_in(link).await {
            Ok(Some(_)) => Navigation {
                to: Route::Dashboard,
                notice: Some(Notice {
                    title: "Success!".into(),
                    description: "You have been successfully signed in.".into(),
                    variant: NoticeVariant::Default,
                }),
            },
            Ok(None) => Navigation {
                to: Route::Login,
                notice: None,
            },
            Err(e) => Navigation {
                to: Route::Login,
                notice: Some(e.to_notice()),
            },
        }
    }

    pub async fn sign_out(&self) -> Result<(), AuthError> {
        self.provider.sign_out().await.map_err(|e| {
            error!("Error signing out: {}", e);
            e.into()
        })
    }
}
