use serde::{Deserialize, Serialize};

use crate::{ApiClient, RequestOptions, Result};

#[derive(Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Data returned by a successful login.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: String,
    #[serde(default)]
    pub username: Option<String>,
}

impl ApiClient {
    /// Logs in and returns the session token.
    ///
    /// The client is not modified; pass the token to
    /// [`ApiClient::with_token`] for authenticated calls.
    pub async fn login(&self, request: &LoginRequest) -> Result<Session> {
        self.post("user/login", request).await
    }

    /// Registers a new account. Validation failures come back as
    /// [`FetchError::Api`](crate::FetchError::Api) with the server message.
    pub async fn register(&self, request: &RegisterRequest) -> Result<()> {
        let options = RequestOptions::post().json(request)?;
        self.call::<serde_json::Value>("user/register", options)
            .await?
            .into_result()
            .map(|_| ())
    }
}
