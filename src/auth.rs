use chrono::{DateTime, Duration, Utc};
use oauth2::basic::{BasicClient, BasicTokenResponse};
use oauth2::reqwest::http_client;
use oauth2::{
    AuthType, AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, RedirectUrl,
    RefreshToken, Scope, TokenResponse, TokenUrl,
};
use serde_derive::{Deserialize, Serialize};
use url::Url;

use super::token::RefreshingTokenSource;
use super::{Error, FitbitClient, Result};

pub const AUTH_URL: &str = "https://www.fitbit.com/oauth2/authorize";
pub const TOKEN_URL: &str = "https://api.fitbit.com/oauth2/token";
pub const REDIRECT_URL: &str = "http://localhost:8080";

/// Tokens are treated as expired this long before the server says they are.
const EXPIRY_LEEWAY_SECS: i64 = 10;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Token {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Token {
    pub fn new(access_token: &str) -> Token {
        Token {
            access_token: access_token.to_string(),
            refresh_token: None,
            expires_at: None,
        }
    }

    /// A token without an expiry never expires.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(at) => at - Duration::seconds(EXPIRY_LEEWAY_SECS) <= now,
            None => false,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    fn from_response(resp: &BasicTokenResponse) -> Token {
        let expires_at = resp
            .expires_in()
            .and_then(|d| Duration::from_std(d).ok())
            .map(|d| Utc::now() + d);

        Token {
            access_token: resp.access_token().secret().to_string(),
            refresh_token: resp.refresh_token().map(|t| t.secret().to_string()),
            expires_at,
        }
    }
}

/// OAuth2 application settings for the Fitbit API.
#[derive(Clone, Debug)]
pub struct FitbitAuth(BasicClient);

impl FitbitAuth {
    pub fn new(client_id: &str, client_secret: &str) -> Result<FitbitAuth> {
        FitbitAuth::with_endpoints(client_id, client_secret, AUTH_URL, TOKEN_URL, REDIRECT_URL)
    }

    pub fn with_endpoints(
        client_id: &str,
        client_secret: &str,
        auth_url: &str,
        token_url: &str,
        redirect_url: &str,
    ) -> Result<FitbitAuth> {
        let client = BasicClient::new(
            ClientId::new(client_id.to_string()),
            Some(ClientSecret::new(client_secret.to_string())),
            AuthUrl::new(auth_url.to_string())?,
            Some(TokenUrl::new(token_url.to_string())?),
        )
        .set_auth_type(AuthType::BasicAuth)
        .set_redirect_uri(RedirectUrl::new(redirect_url.to_string())?);

        Ok(FitbitAuth(client))
    }

    /// The URL the user has to visit to grant access, along with the state
    /// value the redirect must echo back.
    pub fn authorize_url(&self) -> (Url, CsrfToken) {
        self.0
            .authorize_url(CsrfToken::new_random)
            .add_scope(Scope::new("activity".to_string()))
            .add_scope(Scope::new("profile".to_string()))
            .url()
    }

    pub fn exchange_code(&self, code: &str) -> Result<Token> {
        self.0
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .request(http_client)
            .map(|resp| Token::from_response(&resp))
            .map_err(|e| Error::AuthToken(e.to_string()))
    }

    /// Trades the refresh token of `token` for a new token. The old refresh
    /// token is kept if the server does not hand out a new one.
    pub fn exchange_refresh_token(&self, token: &Token) -> Result<Token> {
        let refresh = match token.refresh_token {
            Some(ref t) => RefreshToken::new(t.clone()),
            None => return Err(Error::RefreshTokenMissing),
        };

        let mut fresh = self
            .0
            .exchange_refresh_token(&refresh)
            .request(http_client)
            .map(|resp| Token::from_response(&resp))
            .map_err(|e| Error::AuthToken(e.to_string()))?;

        if fresh.refresh_token.is_none() {
            fresh.refresh_token = token.refresh_token.clone();
        }
        Ok(fresh)
    }

    /// Builds a client that presents `token` on every request and refreshes
    /// it through this configuration once it expires.
    pub fn client(&self, token: Token) -> FitbitClient {
        FitbitClient::new(RefreshingTokenSource::new(self.clone(), token))
    }
}
