use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, warn};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::provider::{IdentityProvider, ProviderUser, SessionEvent};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub user: Option<ProviderUser>,
    pub loading: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        SessionState {
            user: None,
            loading: true,
        }
    }
}

impl SessionState {
    fn from_event(event: &SessionEvent) -> Self {
        match event {
            SessionEvent::Pending => SessionState::default(),
            SessionEvent::SignedIn(user) => SessionState {
                user: Some(user.clone()),
                loading: false,
            },
            SessionEvent::SignedOut => SessionState {
                user: None,
                loading: false,
            },
        }
    }
}

/// Application-wide session context.
///
/// Cloning shares the same state. Only the listener returned by
/// [`AuthContext::attach`] writes to it.
#[derive(Clone)]
pub struct AuthContext {
    state: Arc<watch::Sender<SessionState>>,
    attached: Arc<AtomicBool>,
}

impl Default for AuthContext {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthContext {
    pub fn new() -> Self {
        let (state, _) = watch::channel(SessionState::default());
        AuthContext {
            state: Arc::new(state),
            attached: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Observe state changes, e.g. to re-run route protection.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Registers the single session listener. Returns `None` while another
    /// listener is still attached.
    pub fn attach<P>(&self, provider: &P) -> Option<SessionListener>
    where
        P: IdentityProvider + ?Sized,
    {
        if self.attached.swap(true, Ordering::SeqCst) {
            warn!("Session listener already attached");
            return None;
        }

        let mut events = provider.session_events();
        let state = Arc::clone(&self.state);
        let handle = tokio::spawn(async move {
            let initial = events.borrow_and_update().clone();
            state.send_replace(SessionState::from_event(&initial));

            while events.changed().await.is_ok() {
                let event = events.borrow_and_update().clone();
                debug!("Session changed: signed in = {}", matches!(event, SessionEvent::SignedIn(_)));
                state.send_replace(SessionState::from_event(&event));
            }
            debug!("Identity provider closed its session stream");
        });

        Some(SessionListener {
            handle,
            attached: Arc::clone(&self.attached),
        })
    }
}

/// Handle of the running session subscription; dropping it unsubscribes.
pub struct SessionListener {
    handle: JoinHandle<()>,
    attached: Arc<AtomicBool>,
}

impl SessionListener {
    pub fn shutdown(self) {
        // dropping `self` aborts the task
    }
}

impl Drop for SessionListener {
    fn drop(&mut self) {
        self.handle.abort();
        self.attached.store(false, Ordering::SeqCst);
    }
}
