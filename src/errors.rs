use failure::Fail;

#[derive(Fail, Debug)]
pub enum Error {
    #[fail(display = "url err: {}", _0)]
    Url(#[cause] url::ParseError),

    #[fail(display = "path {:?} does not resolve under the base url", _0)]
    Path(String),

    #[fail(display = "unable to encode request body: {}", _0)]
    Encode(#[cause] serde_json::Error),

    #[fail(display = "unable to build request: {}", _0)]
    Build(#[cause] reqwest::Error),

    #[fail(display = "http err: {}", _0)]
    Transport(#[cause] reqwest::Error),

    #[fail(display = "http request to {} failed with status {}: {}", url, status, body)]
    RequestFailed {
        status: u16,
        url: String,
        body: String,
    },

    #[fail(display = "unable to decode response: {}", _0)]
    Decode(#[cause] serde_json::Error),

    #[fail(display = "oauth token err: {}", _0)]
    AuthToken(String),

    #[fail(display = "refresh token missing")]
    RefreshTokenMissing,
}

impl Error {
    /// True when the request could not be put together: a bad address, an
    /// unencodable payload or a request reqwest refused to build.
    pub fn is_malformed_input(&self) -> bool {
        match *self {
            Error::Url(_) | Error::Path(_) | Error::Encode(_) | Error::Build(_) => true,
            _ => false,
        }
    }

    /// The HTTP status of a non-2xx response.
    pub fn status(&self) -> Option<u16> {
        match *self {
            Error::RequestFailed { status, .. } => Some(status),
            _ => None,
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(kind: url::ParseError) -> Error {
        Error::Url(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_input_kinds() {
        assert!(Error::Url(url::ParseError::EmptyHost).is_malformed_input());
        assert!(Error::Path("../x".to_string()).is_malformed_input());

        let err = serde_json::from_str::<u8>("x").unwrap_err();
        assert!(Error::Encode(err).is_malformed_input());

        let err = serde_json::from_str::<u8>("x").unwrap_err();
        assert!(!Error::Decode(err).is_malformed_input());
        assert!(!Error::RefreshTokenMissing.is_malformed_input());
    }

    #[test]
    fn request_failed_carries_status() {
        let err = Error::RequestFailed {
            status: 401,
            url: "https://api.fitbit.com/1/user/-/profile.json".to_string(),
            body: "{\"errors\":[]}".to_string(),
        };
        assert_eq!(err.status(), Some(401));
        assert_eq!(
            err.to_string(),
            "http request to https://api.fitbit.com/1/user/-/profile.json failed with status 401: {\"errors\":[]}"
        );
        assert_eq!(Error::RefreshTokenMissing.status(), None);
    }
}
