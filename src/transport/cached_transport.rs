use crate::cache::store::ResponseStore;
use crate::transport::error::{AttemptFailure, TransportError};
use crate::transport::retry::{is_retryable_error, is_retryable_status, RetryDecision, RetryPolicy};
use log::{debug, info, warn};
use reqwest::Client;
use std::sync::Arc;
use url::Url;

/// A fully formed GET request. Its URL, query string included, is the cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OutboundRequest {
    url: Url,
}

impl OutboundRequest {
    /// Builds a request for `base` with `params` appended in the given order.
    pub fn get<'a>(
        base: &str,
        params: impl IntoIterator<Item = (&'a str, String)>,
    ) -> Result<Self, TransportError> {
        let url = Url::parse_with_params(base, params).map_err(|e| {
            TransportError::InvalidRequest {
                base: base.to_string(),
                source: e,
            }
        })?;
        Ok(Self { url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn cache_key(&self) -> &str {
        self.url.as_str()
    }
}

enum AttemptError {
    Retryable(AttemptFailure),
    Fatal(TransportError),
}

/// HTTP access with an indefinite response cache and bounded retries.
///
/// A cached response is returned without touching the network, however old it is.
/// On a miss the request is sent, retried per the [`RetryPolicy`] on transient
/// failures, and the successful body is stored before it is returned.
pub struct CachedTransport {
    http: Client,
    store: Arc<dyn ResponseStore>,
    retry_policy: RetryPolicy,
}

impl CachedTransport {
    pub fn new(store: Arc<dyn ResponseStore>, retry_policy: RetryPolicy) -> Self {
        Self {
            http: Client::new(),
            store,
            retry_policy,
        }
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    /// Returns the body for `request`, from the cache if possible.
    ///
    /// Store failures never fail the fetch: a failed lookup is treated as a miss and
    /// a failed write only loses the cache entry.
    pub async fn fetch(&self, request: &OutboundRequest) -> Result<Vec<u8>, TransportError> {
        let key = request.cache_key();
        match self.store.get(key).await {
            Ok(Some(body)) => {
                info!("Cache hit for {}", key);
                return Ok(body);
            }
            Ok(None) => warn!("Cache miss for {}. Downloading.", key),
            Err(e) => warn!("Cache lookup failed for {}: {}. Downloading.", key, e),
        }

        let body = self.download(request).await?;

        match self.store.put(key, &body).await {
            Ok(()) => info!("Cached {} bytes for {}", body.len(), key),
            Err(e) => warn!("Failed to cache response for {}: {}", key, e),
        }
        Ok(body)
    }

    async fn download(&self, request: &OutboundRequest) -> Result<Vec<u8>, TransportError> {
        let max_attempts = self.retry_policy.attempts();
        let mut attempt = 1;
        loop {
            match self.try_once(request).await {
                Ok(body) => {
                    if attempt > 1 {
                        info!("Request succeeded after {} attempts", attempt);
                    }
                    return Ok(body);
                }
                Err(AttemptError::Fatal(e)) => return Err(e),
                Err(AttemptError::Retryable(failure)) => {
                    if attempt >= max_attempts {
                        warn!("All {} attempts for {} failed", attempt, request.url());
                        return Err(TransportError::Exhausted {
                            url: request.url().to_string(),
                            attempts: attempt,
                            source: failure,
                        });
                    }
                    let delay = self.retry_policy.delay_after(attempt);
                    warn!(
                        "Attempt {} of {} for {} failed: {}. Retrying in {:?}",
                        attempt,
                        max_attempts,
                        request.url(),
                        failure,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    async fn try_once(&self, request: &OutboundRequest) -> Result<Vec<u8>, AttemptError> {
        debug!("Downloading {}", request.url());
        let response = self
            .http
            .get(request.url().clone())
            .send()
            .await
            .map_err(|e| match is_retryable_error(&e) {
                RetryDecision::Retry => AttemptError::Retryable(AttemptFailure::Network(e)),
                RetryDecision::NoRetry => AttemptError::Fatal(TransportError::NetworkRequest(
                    request.url().to_string(),
                    e,
                )),
            })?;

        let status = response.status();
        if status.is_success() {
            let bytes = response
                .bytes()
                .await
                .map_err(|e| AttemptError::Retryable(AttemptFailure::Network(e)))?;
            return Ok(bytes.to_vec());
        }

        if is_retryable_status(status) == RetryDecision::Retry {
            return Err(AttemptError::Retryable(AttemptFailure::Status(status)));
        }

        let body = response.text().await.unwrap_or_default();
        warn!("HTTP error for {}: {}", request.url(), status);
        Err(AttemptError::Fatal(TransportError::Rejected {
            url: request.url().to_string(),
            status,
            body,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::memory_store::MemoryStore;
    use reqwest::StatusCode;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fast_policy() -> RetryPolicy {
        RetryPolicy::new(5, 0.001)
    }

    fn request(server: &MockServer, x: &str) -> OutboundRequest {
        OutboundRequest::get(
            &format!("{}/v1/archive", server.uri()),
            [("x", x.to_string())],
        )
        .unwrap()
    }

    #[test]
    fn test_cache_key_includes_params_in_order() {
        let request = OutboundRequest::get(
            "https://archive-api.open-meteo.com/v1/archive",
            [("latitude", "40.1".to_string()), ("daily", "temperature_2m_min".to_string())],
        )
        .unwrap();
        assert_eq!(
            request.cache_key(),
            "https://archive-api.open-meteo.com/v1/archive?latitude=40.1&daily=temperature_2m_min"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let result = OutboundRequest::get("not a url", [("x", "1".to_string())]);
        assert!(matches!(result, Err(TransportError::InvalidRequest { .. })));
    }

    #[tokio::test]
    async fn test_second_fetch_is_served_from_cache() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/archive"))
            .and(query_param("x", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("hello"))
            .expect(1)
            .mount(&server)
            .await;

        let store = Arc::new(MemoryStore::new());
        let transport = CachedTransport::new(store.clone(), fast_policy());

        let first = transport.fetch(&request(&server, "1")).await.unwrap();
        let second = transport.fetch(&request(&server, "1")).await.unwrap();

        assert_eq!(first, b"hello");
        assert_eq!(second, b"hello");
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_distinct_params_miss_the_cache() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/archive"))
            .respond_with(ResponseTemplate::new(200).set_body_string("body"))
            .expect(2)
            .mount(&server)
            .await;

        let transport = CachedTransport::new(Arc::new(MemoryStore::new()), fast_policy());
        transport.fetch(&request(&server, "1")).await.unwrap();
        transport.fetch(&request(&server, "2")).await.unwrap();
    }

    #[tokio::test]
    async fn test_succeeds_on_fifth_attempt() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(4)
            .expect(4)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("finally"))
            .expect(1)
            .mount(&server)
            .await;

        let transport = CachedTransport::new(Arc::new(MemoryStore::new()), fast_policy());
        let body = transport.fetch(&request(&server, "1")).await.unwrap();
        assert_eq!(body, b"finally");
    }

    #[tokio::test]
    async fn test_gives_up_after_five_attempts() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(5)
            .mount(&server)
            .await;

        let store = Arc::new(MemoryStore::new());
        let transport = CachedTransport::new(store.clone(), fast_policy());
        let err = transport.fetch(&request(&server, "1")).await.unwrap_err();

        match err {
            TransportError::Exhausted {
                attempts, source, ..
            } => {
                assert_eq!(attempts, 5);
                assert!(matches!(
                    source,
                    AttemptFailure::Status(StatusCode::INTERNAL_SERVER_ERROR)
                ));
            }
            other => panic!("expected Exhausted, got {other:?}"),
        }
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_rate_limit_is_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&server)
            .await;

        let transport = CachedTransport::new(Arc::new(MemoryStore::new()), fast_policy());
        assert_eq!(transport.fetch(&request(&server, "1")).await.unwrap(), b"ok");
    }

    #[tokio::test]
    async fn test_client_error_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(400).set_body_string("bad request"))
            .expect(1)
            .mount(&server)
            .await;

        let store = Arc::new(MemoryStore::new());
        let transport = CachedTransport::new(store.clone(), fast_policy());
        let err = transport.fetch(&request(&server, "1")).await.unwrap_err();

        assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
        match err {
            TransportError::Rejected { body, .. } => assert_eq!(body, "bad request"),
            other => panic!("expected Rejected, got {other:?}"),
        }
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_connection_refused_exhausts_retries() {
        // Bind and release a port so nothing is listening on it
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let transport =
            CachedTransport::new(Arc::new(MemoryStore::new()), RetryPolicy::new(2, 0.001));
        let request = OutboundRequest::get(
            &format!("http://127.0.0.1:{port}/v1/archive"),
            [("x", "1".to_string())],
        )
        .unwrap();

        let err = transport.fetch(&request).await.unwrap_err();
        assert!(matches!(
            err,
            TransportError::Exhausted {
                attempts: 2,
                source: AttemptFailure::Network(_),
                ..
            }
        ));
    }
}
