use derivdesk_http::{execute, ApiClient, LoginRequest, RequestOptions, RetryPolicy};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let api = ApiClient::from_env().map_err(anyhow::Error::msg)?;

    let username = std::env::var("DERIVDESK_USERNAME")?;
    let password = std::env::var("DERIVDESK_PASSWORD")?;

    let session = match api.login(&LoginRequest { username, password }).await {
        Ok(session) => session,
        Err(err) => {
            eprintln!("login failed: {}", err.user_message());
            return Err(err.into());
        }
    };
    let api = api.with_token(session.token);

    let page = api.list_users(1, 10).await?;
    println!("{} users", page.total);
    for user in page.list {
        println!("{:>5} {}", user.id, user.username);
    }

    // Plain requests outside the envelope API use the executor directly.
    let http = reqwest::Client::new();
    let options = RequestOptions::get().with_policy(RetryPolicy {
        timeout_ms: 3_000,
        max_retries: 2,
        initial_backoff_ms: 500,
    });
    let response = execute(&http, api.base_url().as_str(), &options).await?;
    println!("health check: {}", response.status());

    Ok(())
}
