// In-process stand-in for the identity service, used by the gate's tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::watch;

use super::provider::{IdentityProvider, ProviderError, ProviderUser, SessionEvent};

struct Account {
    password: String,
    verified: bool,
}

pub(crate) struct FakeProvider {
    events: watch::Sender<SessionEvent>,
    accounts: Mutex<HashMap<String, Account>>,
    pub(crate) sent_links: Mutex<Vec<(String, String)>>,
    pub(crate) verification_mails: Mutex<Vec<String>>,
    pub(crate) sign_outs: AtomicUsize,
}

impl FakeProvider {
    pub(crate) fn new() -> Self {
        let (events, _) = watch::channel(SessionEvent::Pending);
        FakeProvider {
            events,
            accounts: Mutex::new(HashMap::new()),
            sent_links: Mutex::new(Vec::new()),
            verification_mails: Mutex::new(Vec::new()),
            sign_outs: AtomicUsize::new(0),
        }
    }

    pub(crate) fn with_account(self, email: &str, password: &str, verified: bool) -> Self {
        self.accounts.lock().unwrap().insert(
            email.to_string(),
            Account {
                password: password.to_string(),
                verified,
            },
        );
        self
    }

    pub(crate) fn emit(&self, event: SessionEvent) {
        self.events.send_replace(event);
    }

    pub(crate) fn current(&self) -> SessionEvent {
        self.events.borrow().clone()
    }

    pub(crate) fn link_for(email: &str) -> String {
        format!("https://tasks.example.com/magic-link-callback?oobCode=code-{email}")
    }

    fn user(email: &str, verified: bool) -> ProviderUser {
        ProviderUser {
            uid: format!("uid-{email}"),
            email: Some(email.to_string()),
            display_name: None,
            photo_url: None,
            email_verified: verified,
        }
    }

    fn signed_in(&self, user: ProviderUser) -> ProviderUser {
        self.emit(SessionEvent::SignedIn(user.clone()));
        user
    }
}

#[async_trait]
impl IdentityProvider for FakeProvider {
    fn session_events(&self) -> watch::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    async fn sign_in_with_google(&self) -> Result<ProviderUser, ProviderError> {
        Ok(self.signed_in(Self::user("google-user@gmail.com", true)))
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<ProviderUser, ProviderError> {
        let verified = match self.accounts.lock().unwrap().get(email) {
            Some(account) if account.password == password => account.verified,
            Some(_) => {
                return Err(ProviderError::new("auth/wrong-password", "Wrong password."))
            }
            None => return Err(ProviderError::new("auth/user-not-found", "No such user.")),
        };
        Ok(self.signed_in(Self::user(email, verified)))
    }

    async fn create_account(
        &self,
        email: &str,
        password: &str,
    ) -> Result<ProviderUser, ProviderError> {
        let mut accounts = self.accounts.lock().unwrap();
        if accounts.contains_key(email) {
            return Err(ProviderError::new(
                "auth/email-already-in-use",
                "Email already in use.",
            ));
        }
        accounts.insert(
            email.to_string(),
            Account {
                password: password.to_string(),
                verified: false,
            },
        );
        drop(accounts);
        Ok(self.signed_in(Self::user(email, false)))
    }

    async fn send_email_verification(&self, user: &ProviderUser) -> Result<(), ProviderError> {
        let email = user
            .email
            .clone()
            .ok_or_else(|| ProviderError::new("auth/missing-email", "User has no email."))?;
        self.verification_mails.lock().unwrap().push(email);
        Ok(())
    }

    async fn send_sign_in_link(&self, email: &str, continue_url: &str) -> Result<(), ProviderError> {
        if !email.contains('@') {
            return Err(ProviderError::new("auth/invalid-email", "Invalid email."));
        }
        self.sent_links
            .lock()
            .unwrap()
            .push((email.to_string(), continue_url.to_string()));
        Ok(())
    }

    fn is_sign_in_link(&self, link: &str) -> bool {
        link.contains("oobCode=")
    }

    async fn sign_in_with_link(&self, email: &str, link: &str) -> Result<ProviderUser, ProviderError> {
        if link != Self::link_for(email) {
            return Err(ProviderError::new(
                "auth/invalid-action-code",
                "The sign-in link is invalid or expired.",
            ));
        }
        Ok(self.signed_in(Self::user(email, true)))
    }

    async fn sign_out(&self) -> Result<(), ProviderError> {
        self.sign_outs.fetch_add(1, Ordering::SeqCst);
        self.emit(SessionEvent::SignedOut);
        Ok(())
    }
}
