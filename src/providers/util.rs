use anyhow::{Error, anyhow};
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Retries an async HTTP request with configurable attempts and delays
///
/// Transport errors and 5xx responses are retried; any other non-success
/// status fails immediately since repeating the request will not help.
///
/// # Parameters
/// - `operation`: Closure returning a future
/// - `retries`: Number of retry attempts (total runs = 1 initial + retries)
/// - `delay_ms`: Milliseconds between retry attempts
///
/// # Returns
/// Either the successful response or the error after all attempts
pub async fn with_retry<F, Fut>(
    mut operation: F,
    retries: usize,
    delay_ms: u64,
) -> Result<reqwest::Response, Error>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<reqwest::Response, reqwest::Error>>,
{
    let mut attempt = 1;
    loop {
        let err = match operation().await {
            Ok(response) if response.status().is_success() => return Ok(response),
            Ok(response) => {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                let err = anyhow!("HTTP error: {status}: {body}");
                if !status.is_server_error() {
                    return Err(err);
                }
                err
            }
            Err(e) => anyhow::Error::from(e),
        };

        if attempt > retries {
            return Err(err);
        }
        debug!(
            "Attempt {}/{} failed: {}. Retrying...",
            attempt, retries, err
        );
        attempt += 1;
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_retries_server_errors() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/flaky"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/flaky"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&mock_server)
            .await;

        let url = format!("{}/flaky", mock_server.uri());
        let response = with_retry(|| reqwest::get(&url), 2, 1).await.unwrap();
        assert_eq!(response.text().await.unwrap(), "ok");
    }

    #[tokio::test]
    async fn test_client_errors_are_not_retried() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_string("nope"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let url = format!("{}/missing", mock_server.uri());
        let err = with_retry(|| reqwest::get(&url), 3, 1).await.unwrap_err();
        assert!(err.to_string().contains("404"));
    }

    #[tokio::test]
    async fn test_gives_up_after_retries() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/down"))
            .respond_with(ResponseTemplate::new(500))
            .expect(3)
            .mount(&mock_server)
            .await;

        let url = format!("{}/down", mock_server.uri());
        assert!(with_retry(|| reqwest::get(&url), 2, 1).await.is_err());
    }
}
