//! A small blocking client for the Fitbit Web API.
//!
//! ```no_run
//! use fitbit::{Activities, FitbitAuth, Token, UserService};
//!
//! # fn main() -> fitbit::Result<()> {
//! let auth = FitbitAuth::new("client-id", "client-secret")?;
//! let client = auth.client(Token::new("access-token"));
//!
//! let summary = client.activity_summary_for_day("2013-06-27")?;
//! let profile = client.user_profile()?;
//! println!("{} walked {} steps", profile.user.full_name, summary.summary.steps);
//! # Ok(())
//! # }
//! ```

pub mod activities;
pub mod auth;
mod errors;
pub mod token;
pub mod user;

use log::debug;
use reqwest::blocking::{Client, Request};
use reqwest::header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

pub use activities::{Activities, ActivitySummary, Distance, Goals, Summary};
pub use auth::{FitbitAuth, Token};
pub use errors::Error;
pub use reqwest::Method;
pub use token::{RefreshingTokenSource, StaticTokenSource, TokenSource};
pub use user::{User, UserProfile, UserService};

pub type Result<T> = std::result::Result<T, Error>;

pub const BASE_URL: &str = "https://api.fitbit.com/1/";
pub const USER_AGENT_VALUE: &str = concat!("fitbit-rs (", env!("CARGO_PKG_VERSION"), ")");

pub struct FitbitClient {
    client: Client,
    base: Url,
    tokens: Box<dyn TokenSource>,
}

impl FitbitClient {
    /// A client for the public Fitbit API. Nothing is sent until a request
    /// is executed.
    pub fn new<S: TokenSource + 'static>(tokens: S) -> FitbitClient {
        let base = Url::parse(BASE_URL).expect("BASE_URL is a valid url");
        FitbitClient::with_base_url(tokens, base)
    }

    /// A client rooted at `base` instead of the public API, e.g. another API
    /// version or a local stub server.
    pub fn with_base_url<S: TokenSource + 'static>(tokens: S, mut base: Url) -> FitbitClient {
        // join() drops the last path segment unless the base ends in a slash
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        FitbitClient {
            client: Client::new(),
            base,
            tokens: Box::new(tokens),
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Resolves `path` below the base URL. A leading slash is ignored, so
    /// `/user/-/profile.json` and `user/-/profile.json` are the same endpoint.
    /// Paths that would leave the base, through an absolute URL or `..`
    /// segments, are rejected so the bearer token never goes elsewhere.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        let url = self.base.join(path.trim_start_matches('/'))?;

        let same_origin = url.scheme() == self.base.scheme()
            && url.host_str() == self.base.host_str()
            && url.port_or_known_default() == self.base.port_or_known_default();
        if !same_origin || !url.path().starts_with(self.base.path()) {
            return Err(Error::Path(path.to_string()));
        }
        Ok(url)
    }

    /// Builds a request for `path` with the client's fixed headers. `body`,
    /// when given, is sent as JSON.
    pub fn new_request<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<Request>
    where
        B: Serialize + ?Sized,
    {
        let url = self.endpoint(path)?;
        let mut builder = self
            .client
            .request(method, url)
            .header(USER_AGENT, USER_AGENT_VALUE);

        if let Some(body) = body {
            let json = serde_json::to_vec(body).map_err(Error::Encode)?;
            builder = builder.header(CONTENT_TYPE, "application/json").body(json);
        }

        builder.build().map_err(Error::Build)
    }

    /// Sends `request` and decodes a successful response body into `T`.
    pub fn execute_json<T: DeserializeOwned>(&self, request: Request) -> Result<T> {
        let body = self.send(request)?;
        serde_json::from_slice(&body).map_err(Error::Decode)
    }

    /// Sends `request`, ignoring the body of a successful response.
    pub fn execute(&self, request: Request) -> Result<()> {
        self.send(request).map(|_| ())
    }

    /// Single attempt. The response is fully read and dropped before this
    /// returns, whatever the outcome.
    fn send(&self, mut request: Request) -> Result<Vec<u8>> {
        let token = self.tokens.token()?;
        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", token.access_token))
            .map_err(|_| Error::AuthToken("access token is not a valid header value".to_string()))?;
        bearer.set_sensitive(true);
        request.headers_mut().insert(AUTHORIZATION, bearer);

        debug!("{} {}", request.method(), request.url());
        let resp = self.client.execute(request).map_err(Error::Transport)?;
        let status = resp.status();
        let url = resp.url().to_string();
        debug!("{} -> {}", url, status);

        if !status.is_success() {
            // the body is only diagnostic here; a read failure leaves it empty
            let body = resp.text().unwrap_or_else(|e| {
                debug!("unable to read error body from {}: {}", url, e);
                String::new()
            });
            return Err(Error::RequestFailed {
                status: status.as_u16(),
                url,
                body,
            });
        }

        let body = resp.bytes().map_err(Error::Transport)?;
        Ok(body.to_vec())
    }
}
