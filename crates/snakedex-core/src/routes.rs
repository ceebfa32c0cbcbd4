//! Application routes and the session guard for protected ones.

use std::fmt;

use anyhow::{Context, Result};
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    ForgotPassword,
    /// `token` comes from the `?token=` query parameter.
    ResetPassword { token: Option<String> },
    /// The catalog list. Requires a session.
    Home,
}

impl Route {
    /// Parses a route such as `/`, `/login` or `/reset-password?token=abc`.
    ///
    /// A trailing slash is ignored and unknown paths are an error.
    pub fn parse(raw: &str) -> Result<Self> {
        let base = Url::parse("http://snakedex.local/").context("Invalid route base")?;
        let url = base
            .join(raw.trim())
            .with_context(|| format!("Invalid route: {raw}"))?;

        let path = url.path().trim_end_matches('/');
        match path {
            "" => Ok(Route::Home),
            "/login" => Ok(Route::Login),
            "/forgot-password" => Ok(Route::ForgotPassword),
            "/reset-password" => {
                let token = url
                    .query_pairs()
                    .find(|(k, _)| k == "token")
                    .map(|(_, v)| v.into_owned())
                    .filter(|v| !v.is_empty());
                Ok(Route::ResetPassword { token })
            }
            other => anyhow::bail!("Unknown route: {other}"),
        }
    }

    pub fn is_protected(&self) -> bool {
        matches!(self, Route::Home)
    }

    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::ForgotPassword => "/forgot-password",
            Route::ResetPassword { .. } => "/reset-password",
            Route::Home => "/",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::ResetPassword { token: Some(_) } => write!(f, "{}?token=…", self.path()),
            _ => write!(f, "{}", self.path()),
        }
    }
}

/// Redirects protected routes to `/login` when there is no session.
pub fn guard(route: Route, has_session: bool) -> Route {
    if route.is_protected() && !has_session {
        tracing::debug!(route = %route, "no session; redirecting to login");
        Route::Login
    } else {
        route
    }
}
