//! HTTP client for making requests to media providers

use crate::config::OutgoingSettings;
use crate::error::{ProviderError, ProviderErrorKind, SearchError};
use crate::providers::{ProviderId, ProviderRequest, ProviderResponse, RawResult};
use reqwest::{Client, Response};
use tracing::debug;

/// HTTP client wrapper shared by all adapters
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    user_agent: String,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self, SearchError> {
        Self::with_settings(&OutgoingSettings::default())
    }

    /// Create a new HTTP client with custom settings
    pub fn with_settings(settings: &OutgoingSettings) -> Result<Self, SearchError> {
        let mut builder = Client::builder()
            .timeout(settings.request_timeout()?)
            .pool_max_idle_per_host(settings.pool_maxsize)
            .gzip(true)
            .brotli(true);

        // SSL verification
        if !settings.verify_ssl {
            builder = builder.danger_accept_invalid_certs(true);
        }

        if let Some(ref proxy_url) = settings.proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
        }

        let user_agent = settings
            .user_agent
            .clone()
            .unwrap_or_else(default_user_agent);

        Ok(Self {
            client: builder.build()?,
            user_agent,
        })
    }

    /// Execute a provider request
    pub async fn execute(&self, request: ProviderRequest) -> reqwest::Result<ProviderResponse> {
        let mut req_builder = self
            .client
            .get(&request.url)
            .header("User-Agent", &self.user_agent)
            .header("Accept", accept_json());

        for (key, value) in &request.headers {
            req_builder = req_builder.header(key, value);
        }

        if !request.params.is_empty() {
            req_builder = req_builder.query(&request.params);
        }

        let response = req_builder.send().await?;

        Self::parse_response(response).await
    }

    /// Execute a request and decode the JSON body, classifying failures
    pub async fn fetch_json(
        &self,
        provider: ProviderId,
        request: ProviderRequest,
    ) -> Result<RawResult, ProviderError> {
        debug!("{} request to {}", provider, request.url);

        let response = self
            .execute(request)
            .await
            .map_err(|e| Self::classify_transport(provider, e))?;

        if !response.is_success() {
            return Err(ProviderError::from_status(
                provider,
                response.status,
                &response.text,
            ));
        }

        serde_json::from_str(&response.text)
            .map(RawResult)
            .map_err(|e| {
                ProviderError::new(
                    provider,
                    ProviderErrorKind::MalformedResponse,
                    format!("failed to parse JSON: {}", e),
                )
            })
    }

    fn classify_transport(provider: ProviderId, error: reqwest::Error) -> ProviderError {
        let kind = if error.is_timeout() {
            ProviderErrorKind::Timeout
        } else if error.is_decode() {
            ProviderErrorKind::MalformedResponse
        } else {
            ProviderErrorKind::Network
        };
        ProviderError::new(provider, kind, error.to_string())
    }

    /// Parse response into ProviderResponse
    async fn parse_response(response: Response) -> reqwest::Result<ProviderResponse> {
        let status = response.status().as_u16();
        let url = response.url().to_string();
        let text = response.text().await?;

        Ok(ProviderResponse { status, text, url })
    }

    /// Get current user agent
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

fn default_user_agent() -> String {
    format!("media-searcher/{}", crate::VERSION)
}

/// Standard accept header for JSON APIs
fn accept_json() -> &'static str {
    "application/json,text/javascript,*/*;q=0.01"
}
