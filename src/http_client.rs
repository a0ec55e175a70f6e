use isahc::config::RedirectPolicy;
use isahc::prelude::*;
use isahc::HttpClient;
use once_cell::sync::OnceCell;
use std::time::Duration;

const DEFAULT_TIMEOUT_IN_SECONDS: u64 = 10;

static CLIENT: OnceCell<HttpClient> = OnceCell::new();

/// Builds the shared client with the given timeout. Only the first call has effect.
pub fn configure(timeout: Duration) -> Result<(), isahc::Error> {
    CLIENT.get_or_try_init(|| init_client(timeout))?;

    Ok(())
}

pub fn client() -> Result<&'static HttpClient, isahc::Error> {
    CLIENT.get_or_try_init(|| init_client(Duration::from_secs(DEFAULT_TIMEOUT_IN_SECONDS)))
}

fn init_client(timeout: Duration) -> Result<HttpClient, isahc::Error> {
    HttpClient::builder()
        .redirect_policy(RedirectPolicy::Limit(10))
        .timeout(timeout)
        .build()
}
