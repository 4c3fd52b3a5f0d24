//! Client-side identity gate.
//!
//! Wraps an external [`IdentityProvider`], keeps the application's view of the
//! session in an [`AuthContext`], and decides what each client route shows.

pub mod actions;
pub mod context;
pub mod pending_email;
pub mod provider;
pub mod route_guard;

#[cfg(test)]
pub(crate) mod testing;

pub use actions::{AuthActions, AuthError, Navigation};
pub use context::{AuthContext, SessionListener, SessionState};
pub use pending_email::{FileEmailStore, MemoryEmailStore, PendingEmailStore, StoreError};
pub use provider::{IdentityProvider, ProviderError, ProviderUser, SessionEvent};
pub use route_guard::{resolve, Route, RouteView, VerificationPolicy};
