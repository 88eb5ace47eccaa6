use reqwest::{RequestBuilder, Url};
use tokio::time::{sleep, timeout};

use crate::{backoff::Backoff, FetchError, RequestOptions, Response, Result};

/// Issues a request with a per-attempt deadline and exponential-backoff retry.
///
/// Each attempt runs under its own `options.policy.timeout_ms` deadline.
/// Transport errors, timeouts and statuses `>= 500` are retried after
/// `initial_backoff_ms`, then ×1.5 per further retry, until
/// `max_retries` is spent. Any other status, 4xx included, is returned as
/// an ordinary [`Response`].
///
/// On exhaustion the error from the last attempt is returned unchanged.
/// At most `1 + max_retries` attempts are made, strictly one after another.
///
/// # Example
///
/// ```no_run
/// use derivdesk_http::{execute, RequestOptions, RetryPolicy};
///
/// # async fn run() -> derivdesk_http::Result<()> {
/// let http = reqwest::Client::new();
/// let options = RequestOptions::get().with_policy(RetryPolicy {
///     timeout_ms: 2_000,
///     max_retries: 2,
///     initial_backoff_ms: 200,
/// });
/// let response = execute(&http, "https://api.example.com/market/quotes", &options).await?;
/// assert!(response.status().as_u16() < 500);
/// # Ok(())
/// # }
/// ```
pub async fn execute(
    http: &reqwest::Client,
    url: &str,
    options: &RequestOptions,
) -> Result<Response> {
    let target = Url::parse(url).map_err(|err| FetchError::InvalidUrl {
        url: url.to_owned(),
        reason: err.to_string(),
    })?;

    let policy = options.policy;
    let mut retries_left = policy.max_retries;
    let mut backoff = Backoff::new(policy.initial_backoff());

    loop {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            url = %target,
            method = %options.method,
            attempt = policy.max_retries - retries_left + 1,
            "sending request"
        );

        let err = match attempt(http, &target, options).await {
            Ok(response) => return Ok(response),
            Err(err) => err,
        };

        if !err.is_retryable() {
            return Err(err);
        }
        if retries_left == 0 {
            #[cfg(feature = "tracing")]
            tracing::warn!(url = %target, error = %err, "retries exhausted");
            return Err(err);
        }

        let delay = backoff.advance();
        retries_left -= 1;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            url = %target,
            error = %err,
            retries_left,
            "retrying request after {} ms",
            delay.as_millis()
        );

        sleep(delay).await;
    }
}

/// One physical attempt.
///
/// The deadline wraps the whole attempt; when it fires the in-flight future
/// is dropped, which aborts the underlying connection.
async fn attempt(http: &reqwest::Client, url: &Url, options: &RequestOptions) -> Result<Response> {
    let mut request = http
        .request(options.method.clone(), url.clone())
        .headers(options.headers.clone());
    if let Some(body) = &options.body {
        request = request.body(body.clone());
    }

    match timeout(options.policy.timeout(), settle(request)).await {
        Ok(outcome) => outcome,
        Err(_elapsed) => Err(FetchError::Timeout {
            timeout_ms: options.policy.timeout_ms,
        }),
    }
}

async fn settle(request: RequestBuilder) -> Result<Response> {
    let response = request.send().await.map_err(FetchError::Transport)?;
    let status = response.status();

    if status.as_u16() >= 500 {
        let body = match response.text().await {
            Ok(body) => body,
            Err(err) => format!("<failed to read body: {err}>"),
        };
        return Err(FetchError::Server {
            status: status.as_u16(),
            body,
        });
    }

    Ok(Response::new(response))
}
