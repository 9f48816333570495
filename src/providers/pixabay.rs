//! Pixabay adapter
//!
//! Uses the official Pixabay API. Images and videos live on separate
//! endpoints and the API key travels as the `key` query parameter.

use super::fields::FieldMapping;
use super::traits::*;
use crate::error::ProviderError;
use crate::network::HttpClient;
use crate::search::{MediaKind, Orientation, Query};
use async_trait::async_trait;

const BASE_URL: &str = "https://pixabay.com/api";

/// Pixabay image and video search
pub struct Pixabay {
    api_key: String,
    base_url: String,
    client: HttpClient,
}

impl Pixabay {
    pub fn new(api_key: impl Into<String>, client: HttpClient) -> Self {
        Self::with_base_url(api_key, client, BASE_URL)
    }

    pub fn with_base_url(
        api_key: impl Into<String>,
        client: HttpClient,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    fn endpoint(&self, kind: MediaKind) -> String {
        match kind {
            MediaKind::Image => format!("{}/", self.base_url),
            MediaKind::Video => format!("{}/videos/", self.base_url),
        }
    }

    /// Build the HTTP request for a query
    pub fn request(&self, query: &Query, kind: MediaKind) -> ProviderRequest {
        let orientation = query.orientation.and_then(|o| match o {
            Orientation::Landscape => Some("horizontal"),
            Orientation::Portrait => Some("vertical"),
            // Pixabay has no square filter
            Orientation::Square => None,
        });

        ProviderRequest::get(self.endpoint(kind))
            .param("key", self.api_key.as_str())
            .param("q", query.term.as_str())
            .param_opt("page", query.page)
            .param_opt("per_page", query.per_page)
            .param_opt("orientation", orientation)
            .params(query.params_for(ProviderId::Pixabay))
    }
}

#[async_trait]
impl ProviderAdapter for Pixabay {
    fn id(&self) -> ProviderId {
        ProviderId::Pixabay
    }

    fn about(&self) -> ProviderAbout {
        ProviderAbout::new()
            .website("https://pixabay.com")
            .official_api(true)
            .api_key_required(true)
    }

    fn supports(&self, _kind: MediaKind) -> bool {
        true
    }

    fn field_mapping(&self, kind: MediaKind) -> FieldMapping {
        match kind {
            MediaKind::Image => {
                FieldMapping::new(kind, "/hits", "/id", "/previewURL", "/largeImageURL")
                    .size("/imageWidth", "/imageHeight")
                    .author("/user", None)
                    .page_url("/pageURL")
                    .description("/tags")
            }
            MediaKind::Video => FieldMapping::new(
                kind,
                "/hits",
                "/id",
                "/videos/tiny/thumbnail",
                "/videos/large/url",
            )
            .size("/videos/large/width", "/videos/large/height")
            .author("/user", None)
            .page_url("/pageURL")
            .description("/tags"),
        }
    }

    async fn fetch(&self, query: &Query, kind: MediaKind) -> Result<RawResult, ProviderError> {
        self.client
            .fetch_json(ProviderId::Pixabay, self.request(query, kind))
            .await
    }
}
