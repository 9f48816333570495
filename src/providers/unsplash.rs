//! Unsplash adapter
//!
//! Uses the official Unsplash API. Only photo search is public, so video
//! queries are answered with an empty result set without a request.

use super::fields::FieldMapping;
use super::traits::*;
use crate::error::ProviderError;
use crate::network::HttpClient;
use crate::search::{MediaKind, Orientation, Query};
use async_trait::async_trait;

const BASE_URL: &str = "https://api.unsplash.com";

/// Unsplash photo search
pub struct Unsplash {
    access_key: String,
    base_url: String,
    client: HttpClient,
}

impl Unsplash {
    pub fn new(access_key: impl Into<String>, client: HttpClient) -> Self {
        Self::with_base_url(access_key, client, BASE_URL)
    }

    pub fn with_base_url(
        access_key: impl Into<String>,
        client: HttpClient,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            access_key: access_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Build the HTTP request for a query
    pub fn request(&self, query: &Query) -> ProviderRequest {
        let orientation = query.orientation.map(|o| match o {
            Orientation::Landscape => "landscape",
            Orientation::Portrait => "portrait",
            Orientation::Square => "squarish",
        });

        ProviderRequest::get(format!("{}/search/photos", self.base_url))
            .header("Authorization", format!("Client-ID {}", self.access_key))
            .header("Accept-Version", "v1")
            .param("query", query.term.as_str())
            .param_opt("page", query.page)
            .param_opt("per_page", query.per_page)
            .param_opt("orientation", orientation)
            .params(query.params_for(ProviderId::Unsplash))
    }
}

#[async_trait]
impl ProviderAdapter for Unsplash {
    fn id(&self) -> ProviderId {
        ProviderId::Unsplash
    }

    fn about(&self) -> ProviderAbout {
        ProviderAbout::new()
            .website("https://unsplash.com")
            .official_api(true)
            .api_key_required(true)
    }

    fn supports(&self, kind: MediaKind) -> bool {
        kind == MediaKind::Image
    }

    fn field_mapping(&self, kind: MediaKind) -> FieldMapping {
        FieldMapping::new(kind, "/results", "/id", "/urls/small", "/urls/full")
            .size("/width", "/height")
            .author("/user/name", Some("/user/links/html"))
            .page_url("/links/html")
            .description("/alt_description")
    }

    async fn fetch(&self, query: &Query, _kind: MediaKind) -> Result<RawResult, ProviderError> {
        self.client
            .fetch_json(ProviderId::Unsplash, self.request(query))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderErrorKind;
    use serde_json::json;
    use wiremock::matchers::{header, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_unsplash_request() {
        let adapter = Unsplash::new("us-key", HttpClient::new().unwrap());
        let query = Query::new("cat")
            .with_per_page(30)
            .with_orientation(Orientation::Square);
        let request = adapter.request(&query);

        assert_eq!(request.url, "https://api.unsplash.com/search/photos");
        assert_eq!(request.get_header("Authorization"), Some("Client-ID us-key"));
        assert_eq!(request.get_param("query"), Some("cat"));
        assert_eq!(request.get_param("per_page"), Some("30"));
        assert_eq!(request.get_param("orientation"), Some("squarish"));
    }

    #[test]
    fn test_video_unsupported() {
        let adapter = Unsplash::new("us-key", HttpClient::new().unwrap());
        assert!(adapter.supports(MediaKind::Image));
        assert!(!adapter.supports(MediaKind::Video));
    }

    #[tokio::test]
    async fn test_fetch_photos() {
        let server = MockServer::start().await;
        Mock::given(path("/search/photos"))
            .and(header("Authorization", "Client-ID us-key"))
            .and(query_param("query", "cat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "total": 1,
                "total_pages": 1,
                "results": [{
                    "id": "eOLpJytrbsQ",
                    "width": 5245,
                    "height": 3497,
                    "alt_description": "orange cat",
                    "urls": {
                        "raw": "https://images.unsplash.com/photo-1?ixid=raw",
                        "full": "https://images.unsplash.com/photo-1?q=85",
                        "small": "https://images.unsplash.com/photo-1?w=400"
                    },
                    "links": { "html": "https://unsplash.com/photos/eOLpJytrbsQ" },
                    "user": {
                        "name": "Jeff Sheldon",
                        "links": { "html": "https://unsplash.com/@ugmonk" }
                    }
                }]
            })))
            .mount(&server)
            .await;

        let adapter = Unsplash::with_base_url("us-key", HttpClient::new().unwrap(), server.uri());
        let raw = adapter.fetch(&Query::new("cat"), MediaKind::Image).await.unwrap();
        let (items, _) = adapter
            .field_mapping(MediaKind::Image)
            .normalize(ProviderId::Unsplash, &raw)
            .unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "eOLpJytrbsQ");
        assert_eq!(items[0].preview_url, "https://images.unsplash.com/photo-1?w=400");
        assert_eq!(items[0].attribution.author.as_deref(), Some("Jeff Sheldon"));
        assert_eq!(
            items[0].attribution.page_url.as_deref(),
            Some("https://unsplash.com/photos/eOLpJytrbsQ")
        );
    }

    #[tokio::test]
    async fn test_fetch_rate_limited() {
        let server = MockServer::start().await;
        Mock::given(path("/search/photos"))
            .respond_with(ResponseTemplate::new(429).set_body_string("Rate Limit Exceeded"))
            .mount(&server)
            .await;

        let adapter = Unsplash::with_base_url("us-key", HttpClient::new().unwrap(), server.uri());
        let err = adapter.fetch(&Query::new("cat"), MediaKind::Image).await.unwrap_err();
        assert_eq!(err.kind, ProviderErrorKind::RateLimit);
    }
}
