//! `derivdesk-http` is the async HTTP layer of the DerivDesk dashboard.
//!
//! The core is [`execute`], a request executor that adds a per-attempt
//! timeout and exponential-backoff retry to outbound requests. On top of it
//! [`ApiClient`] speaks the backend's `{code, msg, data}` envelope:
//! - [`ApiClient::login`] / [`ApiClient::register`]
//! - [`ApiClient::list_users`] and the other user-management calls
//! - [`ApiClient::get`] / [`ApiClient::post`] for everything else

mod auth;
mod backoff;
mod client;
mod envelope;
mod error;
mod executor;
mod options;
mod response;
mod users;

pub use auth::{LoginRequest, RegisterRequest, Session};
pub use backoff::Backoff;
pub use client::ApiClient;
pub use envelope::{Envelope, SUCCESS_CODE};
pub use error::{FetchError, NETWORK_ERROR_MESSAGE};
pub use executor::execute;
pub use options::{RequestOptions, RetryPolicy};
pub use response::Response;
pub use users::{NewUser, User, UserPage, UserUpdate};

pub type Result<T> = std::result::Result<T, FetchError>;
