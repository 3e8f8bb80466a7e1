use std::collections::BTreeMap;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use crate::{
    error::{Provider, ProviderError},
    provider::http::{HttpError, get_json},
};

use super::EncyclopediaProvider;

pub const DEFAULT_BASE_URL: &str = "https://en.wikipedia.org";

const CONTEXT: &str = "get wiki extract";

/// Page id the MediaWiki API uses for titles that do not exist.
const MISSING_PAGE_ID: &str = "-1";

/// Wikipedia intro-extract client.
///
/// Titles are looked up verbatim; ambiguous titles may resolve to a
/// "may refer to" page.
#[derive(Debug, Clone)]
pub struct WikipediaProvider {
    base_url: String,
    http: Client,
}

impl WikipediaProvider {
    pub fn with_base_url(base_url: String, http: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        }
    }
}

#[derive(Debug, Deserialize)]
struct WikiPage {
    #[serde(default)]
    extract: String,
}

#[derive(Debug, Deserialize)]
struct WikiQuery {
    #[serde(default)]
    pages: BTreeMap<String, WikiPage>,
}

#[derive(Debug, Deserialize)]
struct ExtractResponse {
    query: WikiQuery,
}

#[async_trait]
impl EncyclopediaProvider for WikipediaProvider {
    async fn summarize(
        &self,
        cancel: &CancellationToken,
        topic: &str,
    ) -> Result<String, ProviderError> {
        let url = format!("{}/w/api.php", self.base_url);

        let parsed: ExtractResponse = get_json(
            &self.http,
            cancel,
            &url,
            &[
                ("exintro", "true"),
                ("explaintext", "true"),
                ("action", "query"),
                ("prop", "extracts"),
                ("titles", topic),
                ("format", "json"),
            ],
        )
        .await
        .map_err(classify)?;

        let mut pages = parsed.query.pages;
        if pages.contains_key(MISSING_PAGE_ID) {
            return Err(ProviderError::NotFound {
                provider: Provider::Encyclopedia,
            });
        }

        Ok(pages
            .pop_first()
            .map(|(_, page)| page.extract)
            .unwrap_or_default())
    }
}

fn classify(err: HttpError) -> ProviderError {
    match err {
        HttpError::Canceled => ProviderError::Canceled {
            provider: Provider::Encyclopedia,
        },
        other => ProviderError::other(Provider::Encyclopedia, CONTEXT, other),
    }
}
