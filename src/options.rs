use std::time::Duration;

use reqwest::{
    header::{self, HeaderMap, HeaderName, HeaderValue},
    Method,
};
use serde::Serialize;

use crate::{backoff::Backoff, FetchError, Result};

/// Configures per-attempt timeout and retry behavior.
///
/// A policy is fixed for the lifetime of one logical call; only the
/// executor's private retry counter and backoff delay evolve between
/// attempts.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RetryPolicy {
    /// Wall-clock limit for a single attempt, in milliseconds.
    pub timeout_ms: u64,
    /// Number of additional attempts permitted after the first failure.
    pub max_retries: usize,
    /// Delay before the first retry; multiplied by 1.5 for each later retry.
    pub initial_backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            timeout_ms: 10_000,
            max_retries: 3,
            initial_backoff_ms: 1_000,
        }
    }
}

impl RetryPolicy {
    /// Policy that makes exactly one attempt.
    pub fn no_retry(timeout_ms: u64) -> Self {
        Self {
            timeout_ms,
            max_retries: 0,
            initial_backoff_ms: 0,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn initial_backoff(&self) -> Duration {
        Duration::from_millis(self.initial_backoff_ms)
    }

    /// Delays inserted before each retry, in order, if every attempt fails.
    pub fn backoff_schedule(&self) -> std::iter::Take<Backoff> {
        Backoff::new(self.initial_backoff()).take(self.max_retries)
    }

    /// Upper bound on the wall-clock time of one logical call.
    ///
    /// The executor has no overall deadline of its own; this is
    /// `timeout × (1 + max_retries) + Σ backoff`, saturating at
    /// [`Duration::MAX`].
    pub fn worst_case_duration(&self) -> Duration {
        let attempts = self.max_retries as u128 + 1;
        let mut total = millis_to_duration(u128::from(self.timeout_ms) * attempts);

        for delay in self.backoff_schedule() {
            // Delays never shrink: a zero delay stays zero and a saturated
            // total cannot grow.
            if delay.is_zero() || total == Duration::MAX {
                break;
            }
            total = total.saturating_add(delay);
        }
        total
    }

    /// Reads policy overrides from the environment.
    ///
    /// Reads (all optional, falling back to [`RetryPolicy::default`]):
    /// - `DERIVDESK_TIMEOUT_MS`
    /// - `DERIVDESK_MAX_RETRIES`
    /// - `DERIVDESK_BACKOFF_MS`
    ///
    /// Returns an error if a variable is set but not a non-negative integer.
    pub fn from_env() -> std::result::Result<Self, String> {
        let defaults = Self::default();
        Ok(Self {
            timeout_ms: env_number("DERIVDESK_TIMEOUT_MS")?.unwrap_or(defaults.timeout_ms),
            max_retries: env_number("DERIVDESK_MAX_RETRIES")?.unwrap_or(defaults.max_retries),
            initial_backoff_ms: env_number("DERIVDESK_BACKOFF_MS")?
                .unwrap_or(defaults.initial_backoff_ms),
        })
    }
}

fn millis_to_duration(millis: u128) -> Duration {
    match u64::try_from(millis / 1_000) {
        Ok(secs) => Duration::new(secs, (millis % 1_000) as u32 * 1_000_000),
        Err(_) => Duration::MAX,
    }
}

fn env_number<T: std::str::FromStr>(name: &str) -> std::result::Result<Option<T>, String> {
    match std::env::var(name) {
        Ok(raw) if raw.trim().is_empty() => Ok(None),
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| format!("{name} must be a non-negative integer, got '{raw}'")),
        Err(_) => Ok(None),
    }
}

/// Transport options for one logical call plus the retry policy applied to it.
///
/// Everything except `policy` is forwarded to each physical attempt.
#[derive(Clone, Debug)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
    pub policy: RetryPolicy,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self::new(Method::GET)
    }
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            headers: HeaderMap::new(),
            body: None,
            policy: RetryPolicy::default(),
        }
    }

    pub fn get() -> Self {
        Self::new(Method::GET)
    }

    pub fn post() -> Self {
        Self::new(Method::POST)
    }

    pub fn put() -> Self {
        Self::new(Method::PUT)
    }

    pub fn delete() -> Self {
        Self::new(Method::DELETE)
    }

    /// Adds a header, replacing any previous value for the same name.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Sets `Authorization: Bearer <token>`.
    ///
    /// A token that already carries the `Bearer ` prefix is used as-is.
    pub fn bearer(self, token: &str) -> Result<Self> {
        let authorization = normalize_bearer_authorization(token);
        let mut value = HeaderValue::from_str(&authorization).map_err(|_| {
            FetchError::InvalidRequest("authorization token is not a valid header value".to_owned())
        })?;
        value.set_sensitive(true);
        Ok(self.header(header::AUTHORIZATION, value))
    }

    /// Serializes `payload` as the JSON request body.
    pub fn json<T: Serialize + ?Sized>(mut self, payload: &T) -> Result<Self> {
        let body = serde_json::to_vec(payload).map_err(|err| {
            FetchError::InvalidRequest(format!("could not encode request body: {err}"))
        })?;
        self.body = Some(body);
        Ok(self.header(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        ))
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }
}

pub(crate) fn normalize_bearer_authorization(token: &str) -> String {
    let trimmed = token.trim();
    let prefix = trimmed.get(..7);
    if prefix.is_some_and(|value| value.eq_ignore_ascii_case("bearer ")) {
        trimmed.to_owned()
    } else {
        format!("Bearer {trimmed}")
    }
}
