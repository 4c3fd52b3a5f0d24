use super::context::SessionState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    MagicLinkCallback,
    Dashboard,
    NotFound,
}

impl Route {
    pub fn from_path(path: &str) -> Route {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        match path.trim_end_matches('/') {
            "" | "/dashboard" => Route::Dashboard,
            "/login" => Route::Login,
            "/magic-link-callback" => Route::MagicLinkCallback,
            _ => Route::NotFound,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::MagicLinkCallback => "/magic-link-callback",
            Route::Dashboard => "/dashboard",
            Route::NotFound => "/404",
        }
    }

    pub fn is_protected(&self) -> bool {
        matches!(self, Route::Dashboard)
    }
}

/// Whether protected views also demand a verified e-mail.
#[derive(Debug, Clone, Default)]
pub struct VerificationPolicy {
    pub require_verified_email: bool,
    /// Domains whose addresses pass without verification, e.g. a company SSO domain.
    pub allowed_domains: Vec<String>,
}

impl VerificationPolicy {
    pub fn requiring_verification(allowed_domains: &[&str]) -> Self {
        VerificationPolicy {
            require_verified_email: true,
            allowed_domains: allowed_domains.iter().map(|d| d.to_ascii_lowercase()).collect(),
        }
    }

    fn admits(&self, state: &SessionState) -> bool {
        let Some(user) = &state.user else {
            return false;
        };
        if !self.require_verified_email || user.email_verified {
            return true;
        }
        user.email_domain()
            .map(|domain| {
                let domain = domain.to_ascii_lowercase();
                self.allowed_domains.iter().any(|allowed| *allowed == domain)
            })
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteView {
    Render(Route),
    Loading,
    Redirect(Route),
    /// Signed in but unverified: prompt to verify, offering a resend.
    VerifyEmail { email: Option<String> },
}

/// Decides what the client shows for `path` given the current session.
pub fn resolve(path: &str, state: &SessionState, policy: &VerificationPolicy) -> RouteView {
    let route = Route::from_path(path);

    if !route.is_protected() {
        if route == Route::Login && !state.loading && policy.admits(state) {
            return RouteView::Redirect(Route::Dashboard);
        }
        return RouteView::Render(route);
    }

    if state.loading {
        return RouteView::Loading;
    }

    match &state.user {
        None => RouteView::Redirect(Route::Login),
        Some(_) if policy.admits(state) => RouteView::Render(route),
        Some(user) => RouteView::VerifyEmail {
            email: user.email.clone(),
        },
    }
}
