//! HTTP fetcher implementation

use std::future::Future;
use std::time::Duration;

use reqwest::{Client, Method};
use url::Url;

use crate::config::{HttpConfig, UserAgentConfig};
use crate::LodestoneError;

/// A fetched page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Page body; only read for successful responses
    pub body: String,
}

impl HttpResponse {
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// The GET-with-query-parameters capability the lookups need
pub trait HttpClient: Send + Sync {
    /// Issues a GET request for `url` with `query` appended as query parameters
    fn get(
        &self,
        url: &Url,
        query: &[(&str, &str)],
    ) -> impl Future<Output = Result<HttpResponse, LodestoneError>> + Send;
}

impl HttpClient for Client {
    fn get(
        &self,
        url: &Url,
        query: &[(&str, &str)],
    ) -> impl Future<Output = Result<HttpResponse, LodestoneError>> + Send {
        let request = self.request(Method::GET, url.clone()).query(query);
        let url = url.to_string();

        async move {
            let response = request.send().await.map_err(|source| LodestoneError::Http {
                url: url.clone(),
                source,
            })?;
            tracing::info!("GET => {}", response.url());

            let status = response.status();
            if !status.is_success() {
                tracing::debug!("GET {} returned {}", url, status);
                return Ok(HttpResponse {
                    status: status.as_u16(),
                    body: String::new(),
                });
            }

            let body = response
                .text()
                .await
                .map_err(|source| LodestoneError::Http { url, source })?;

            Ok(HttpResponse {
                status: status.as_u16(),
                body,
            })
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - The user agent configuration
/// * `http` - Request and connect timeouts
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use lodestone_scrape::client::build_http_client;
/// use lodestone_scrape::config::{HttpConfig, UserAgentConfig};
///
/// let client = build_http_client(&UserAgentConfig::default(), &HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    http: &HttpConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(Duration::from_secs(http.timeout_secs))
        .connect_timeout(Duration::from_secs(http.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}
