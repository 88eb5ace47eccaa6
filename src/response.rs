use reqwest::{header::HeaderMap, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::{Envelope, FetchError, Result};

/// Response returned by the executor: always a status below 500.
///
/// Non-2xx statuses are not errors at this layer; inspect [`Response::ok`]
/// or [`Response::status`] before trusting the body.
#[derive(Debug)]
pub struct Response {
    inner: reqwest::Response,
}

impl Response {
    pub(crate) fn new(inner: reqwest::Response) -> Self {
        Self { inner }
    }

    pub fn status(&self) -> StatusCode {
        self.inner.status()
    }

    /// `true` for 2xx statuses.
    pub fn ok(&self) -> bool {
        self.inner.status().is_success()
    }

    pub fn headers(&self) -> &HeaderMap {
        self.inner.headers()
    }

    /// Final URL after redirects.
    pub fn url(&self) -> &Url {
        self.inner.url()
    }

    pub async fn text(self) -> Result<String> {
        self.inner.text().await.map_err(FetchError::Transport)
    }

    pub async fn bytes(self) -> Result<Vec<u8>> {
        self.inner
            .bytes()
            .await
            .map(|bytes| bytes.to_vec())
            .map_err(FetchError::Transport)
    }

    /// Parses the body as JSON.
    pub async fn json<T: DeserializeOwned>(self) -> Result<T> {
        let body = self.text().await?;
        serde_json::from_str(&body).map_err(|err| {
            FetchError::Decode(format!("invalid response JSON: {err}; body: {body}"))
        })
    }

    /// Parses the body as a backend `{code, msg, data}` envelope.
    ///
    /// A body that is not an envelope becomes [`FetchError::Http`] when the
    /// status is not 2xx, and [`FetchError::Decode`] otherwise.
    pub async fn envelope<T: DeserializeOwned>(self) -> Result<Envelope<T>> {
        let status = self.status();
        let body = self.text().await?;
        match serde_json::from_str::<Envelope<T>>(&body) {
            Ok(envelope) => Ok(envelope),
            Err(_) if !status.is_success() => Err(FetchError::Http {
                status: status.as_u16(),
                body,
            }),
            Err(err) => Err(FetchError::Decode(format!(
                "invalid envelope JSON: {err}; body: {body}"
            ))),
        }
    }

    /// Unwraps into the underlying `reqwest` response.
    pub fn into_inner(self) -> reqwest::Response {
        self.inner
    }
}
