use std::sync::{Arc, Mutex, MutexGuard};

use log::info;

use super::auth::{FitbitAuth, Token};
use super::Result;

/// Supplies a currently valid bearer token for each request.
pub trait TokenSource: Send + Sync {
    fn token(&self) -> Result<Token>;
}

impl<T: TokenSource + ?Sized> TokenSource for Arc<T> {
    fn token(&self) -> Result<Token> {
        (**self).token()
    }
}

/// Hands out the same token forever.
pub struct StaticTokenSource(Token);

impl StaticTokenSource {
    pub fn new(token: Token) -> StaticTokenSource {
        StaticTokenSource(token)
    }
}

impl TokenSource for StaticTokenSource {
    fn token(&self) -> Result<Token> {
        Ok(self.0.clone())
    }
}

/// Refreshes the held token through the OAuth2 refresh grant once it has
/// expired. Concurrent callers wait on the same refresh.
pub struct RefreshingTokenSource {
    auth: FitbitAuth,
    current: Mutex<Token>,
}

impl RefreshingTokenSource {
    pub fn new(auth: FitbitAuth, token: Token) -> RefreshingTokenSource {
        RefreshingTokenSource {
            auth,
            current: Mutex::new(token),
        }
    }

    /// The token held right now, including any refresh that has happened
    /// since construction. Callers use this to persist refreshed tokens.
    pub fn current(&self) -> Token {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<Token> {
        // a panic mid-refresh leaves the previous token in place
        self.current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl TokenSource for RefreshingTokenSource {
    fn token(&self) -> Result<Token> {
        let mut current = self.lock();
        if !current.is_expired() {
            return Ok(current.clone());
        }

        info!("access token expired, refreshing");
        let fresh = self.auth.exchange_refresh_token(&current)?;
        *current = fresh.clone();
        Ok(fresh)
    }
}
