use std::fmt;

use reqwest::{Method, Url};
use serde::{de::DeserializeOwned, Serialize};

use crate::{execute, Envelope, FetchError, RequestOptions, Result, RetryPolicy};

#[derive(Clone)]
/// HTTP client for the DerivDesk dashboard backend.
///
/// Every call goes through [`execute`] and is then interpreted as a
/// `{code, msg, data}` [`Envelope`]. The client carries no hidden global
/// state: the login token and the retry policy are whatever the caller
/// configured on this value.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    token: Option<String>,
    policy: RetryPolicy,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("policy", &self.policy)
            .finish()
    }
}

impl ApiClient {
    /// Creates a client for the backend rooted at `base_url`.
    ///
    /// Endpoint paths are joined onto the base, so `https://host/api` and
    /// `https://host/api/` are equivalent.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        Self::with_http(reqwest::Client::new(), base_url)
    }

    /// Creates a client sharing an existing `reqwest::Client`.
    pub fn with_http(http: reqwest::Client, base_url: impl AsRef<str>) -> Result<Self> {
        let raw = base_url.as_ref().trim();
        let normalized = if raw.ends_with('/') {
            raw.to_owned()
        } else {
            format!("{raw}/")
        };
        let base_url = Url::parse(&normalized).map_err(|err| FetchError::InvalidUrl {
            url: raw.to_owned(),
            reason: err.to_string(),
        })?;

        Ok(Self {
            http,
            base_url,
            token: None,
            policy: RetryPolicy::default(),
        })
    }

    /// Creates a client from environment variables.
    ///
    /// Reads:
    /// - `DERIVDESK_API_URL` — backend base URL (required)
    /// - `DERIVDESK_TOKEN` — login token (optional, Bearer prefix optional)
    /// - `DERIVDESK_TIMEOUT_MS`, `DERIVDESK_MAX_RETRIES`, `DERIVDESK_BACKOFF_MS`
    ///   — retry policy overrides, see [`RetryPolicy::from_env`]
    ///
    /// # Example
    ///
    /// ```no_run
    /// use derivdesk_http::ApiClient;
    ///
    /// let api = ApiClient::from_env().expect("missing DERIVDESK_API_URL");
    /// ```
    pub fn from_env() -> std::result::Result<Self, String> {
        let url = std::env::var("DERIVDESK_API_URL")
            .map_err(|_| "missing DERIVDESK_API_URL environment variable".to_owned())?;
        if url.trim().is_empty() {
            return Err("DERIVDESK_API_URL is set but empty".to_owned());
        }

        let policy = RetryPolicy::from_env()?;
        let mut client = Self::new(&url)
            .map_err(|err| format!("DERIVDESK_API_URL is invalid: {err}"))?
            .with_policy(policy);

        if let Ok(token) = std::env::var("DERIVDESK_TOKEN") {
            if !token.trim().is_empty() {
                client = client.with_token(token);
            }
        }
        Ok(client)
    }

    /// Attaches the login token sent as `Authorization: Bearer <token>`.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Drops the login token, e.g. after logout.
    pub fn without_token(mut self) -> Self {
        self.token = None;
        self
    }

    /// Sets the retry policy applied to every call from this client.
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// `GET {base}/{path}` and returns the envelope's `data`.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.call(path, RequestOptions::new(Method::GET)).await?.into_data()
    }

    /// `POST {base}/{path}` with a JSON body and returns the envelope's `data`.
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let options = RequestOptions::new(Method::POST).json(body)?;
        self.call(path, options).await?.into_data()
    }

    /// `PUT {base}/{path}` with a JSON body and returns the envelope's `data`.
    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let options = RequestOptions::new(Method::PUT).json(body)?;
        self.call(path, options).await?.into_data()
    }

    /// `DELETE {base}/{path}`; succeeds when the envelope code is 200.
    pub async fn delete(&self, path: &str) -> Result<()> {
        self.call::<serde_json::Value>(path, RequestOptions::new(Method::DELETE))
            .await?
            .into_result()
            .map(|_| ())
    }

    /// Sends `options` to `{base}/{path}` with this client's token and policy.
    ///
    /// Only the transport fields of `options` are used: `options.policy` is
    /// replaced by the client's policy (see [`ApiClient::with_policy`]). Use
    /// [`execute`] directly for a one-off policy.
    ///
    /// Lower-level than the typed helpers: the raw envelope is returned so
    /// callers can inspect `msg` on success too.
    pub async fn call<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<Envelope<T>> {
        let url = self.endpoint(path)?;
        let mut options = options.with_policy(self.policy);
        if let Some(token) = &self.token {
            options = options.bearer(token)?;
        }

        let response = execute(&self.http, url.as_str(), &options).await?;
        response.envelope().await
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        let path = path.trim_start_matches('/');
        self.base_url
            .join(path)
            .map_err(|err| FetchError::InvalidUrl {
                url: format!("{}{path}", self.base_url),
                reason: err.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::ApiClient;

    #[test]
    fn base_url_gets_trailing_slash() {
        let client = ApiClient::new("https://api.example.com/v1").unwrap();
        assert_eq!(client.base_url().as_str(), "https://api.example.com/v1/");
    }

    #[test]
    fn endpoint_joins_under_base_path() {
        let client = ApiClient::new("https://api.example.com/v1/").unwrap();
        assert_eq!(
            client.endpoint("/user/list?page=1").unwrap().as_str(),
            "https://api.example.com/v1/user/list?page=1"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(ApiClient::new("::not-a-url").is_err());
    }

    #[test]
    fn debug_redacts_token() {
        let client = ApiClient::new("https://api.example.com")
            .unwrap()
            .with_token("secret-token");
        let debug = format!("{client:?}");
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("secret-token"));
    }
}
