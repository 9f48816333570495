//! Pexels adapter
//!
//! Uses the official Pexels API. The key is sent verbatim in the
//! `Authorization` header.

use super::fields::FieldMapping;
use super::traits::*;
use crate::error::ProviderError;
use crate::network::HttpClient;
use crate::search::{MediaKind, Orientation, Query};
use async_trait::async_trait;

const BASE_URL: &str = "https://api.pexels.com";

/// Pexels photo and video search
pub struct Pexels {
    api_key: String,
    base_url: String,
    client: HttpClient,
}

impl Pexels {
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
            MediaKind::Image => format!("{}/v1/search", self.base_url),
            MediaKind::Video => format!("{}/videos/search", self.base_url),
        }
    }

    /// Build the HTTP request for a query
    pub fn request(&self, query: &Query, kind: MediaKind) -> ProviderRequest {
        let orientation = query.orientation.map(|o| match o {
            Orientation::Landscape => "landscape",
            Orientation::Portrait => "portrait",
            Orientation::Square => "square",
        });

        ProviderRequest::get(self.endpoint(kind))
            .header("Authorization", self.api_key.as_str())
            .param("query", query.term.as_str())
            .param_opt("page", query.page)
            .param_opt("per_page", query.per_page)
            .param_opt("orientation", orientation)
            .params(query.params_for(ProviderId::Pexels))
    }
}

#[async_trait]
impl ProviderAdapter for Pexels {
    fn id(&self) -> ProviderId {
        ProviderId::Pexels
    }

    fn about(&self) -> ProviderAbout {
        ProviderAbout::new()
            .website("https://www.pexels.com")
            .official_api(true)
            .api_key_required(true)
    }

    fn supports(&self, _kind: MediaKind) -> bool {
        true
    }

    fn field_mapping(&self, kind: MediaKind) -> FieldMapping {
        match kind {
            MediaKind::Image => {
                FieldMapping::new(kind, "/photos", "/id", "/src/medium", "/src/original")
                    .size("/width", "/height")
                    .author("/photographer", Some("/photographer_url"))
                    .page_url("/url")
                    .description("/alt")
            }
            MediaKind::Video => {
                FieldMapping::new(kind, "/videos", "/id", "/image", "/video_files/0/link")
                    .size("/width", "/height")
                    .author("/user/name", Some("/user/url"))
                    .page_url("/url")
            }
        }
    }

    async fn fetch(&self, query: &Query, kind: MediaKind) -> Result<RawResult, ProviderError> {
        self.client
            .fetch_json(ProviderId::Pexels, self.request(query, kind))
            .await
    }
}
