use super::*;
use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, ClientBuilder};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Raw status and body of one search call.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

pub trait SearchTransport {
    async fn search(&self, query: &str) -> Result<TransportResponse>;
}

pub struct HttpTransport {
    client: Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(api_url: &str, token: Option<&str>, timeout: Duration) -> Result<Self> {
        Self::with_builder(Client::builder(), api_url, token, timeout)
    }

    fn with_builder(
        builder: ClientBuilder,
        api_url: &str,
        token: Option<&str>,
        timeout: Duration,
    ) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("impactboard/", env!("CARGO_PKG_VERSION"))),
        );

        if let Some(token) = token.filter(|t| !t.is_empty()) {
            let mut value = HeaderValue::from_str(&format!("token {}", token))
                .context("GitHub token contains characters not allowed in a header")?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
            info!("Using authenticated GitHub requests");
        } else {
            info!("No GitHub token configured, unauthenticated rate limits apply");
        }

        let client = builder
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            endpoint: format!("{}/search/issues", api_url.trim_end_matches('/')),
        })
    }
}

impl SearchTransport for HttpTransport {
    async fn search(&self, query: &str) -> Result<TransportResponse> {
        let per_page = PER_PAGE.to_string();
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("q", query), ("per_page", per_page.as_str())])
            .send()
            .await
            .with_context(|| format!("GitHub search request failed for `{}`", query))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .context("Failed to read GitHub search response body")?;

        Ok(TransportResponse { status, body })
    }
}

/// Items for one query plus the alert to show when the call went wrong.
#[derive(Debug, Clone, Default)]
pub struct FetchOutcome {
    pub items: Vec<SearchItem>,
    pub error: Option<String>,
    pub from_cache: bool,
}

pub struct Fetcher<T: SearchTransport> {
    transport: T,
    cache: ResponseCache,
}

impl<T: SearchTransport> Fetcher<T> {
    pub fn new(transport: T, cache_ttl: Duration) -> Self {
        Self {
            transport,
            cache: ResponseCache::new(cache_ttl),
        }
    }

    /// Never fails: any problem becomes an empty item list and an alert.
    /// Failed calls are cached with their alert, which is replayed on every
    /// hit until the entry expires.
    pub async fn fetch(&mut self, query: &SearchQuery) -> FetchOutcome {
        let key = query.cache_key();
        if let Some(cached) = self.cache.get(&key) {
            debug!(
                "Serving {} from cache ({} items)",
                query.kind.label(),
                cached.items.len()
            );
            return FetchOutcome {
                items: cached.items,
                error: cached.error,
                from_cache: true,
            };
        }

        let q = query.build();
        debug!("Searching: {}", q);

        let (items, error) = match self.transport.search(&q).await {
            Ok(response) if response.status == 200 => match parse_items(&response.body) {
                Ok(items) => (items, None),
                Err(e) => {
                    error!("Could not decode {} response: {:#}", query.kind.label(), e);
                    (Vec::new(), Some(format!("API Error: {:#}", e)))
                }
            },
            Ok(response) => {
                warn!(
                    "GitHub search for {} returned HTTP {}",
                    query.kind.label(),
                    response.status
                );
                (
                    Vec::new(),
                    Some(format!(
                        "API Error: {}. You may need a GitHub Token.",
                        response.status
                    )),
                )
            }
            Err(e) => {
                error!("GitHub search for {} failed: {:#}", query.kind.label(), e);
                (Vec::new(), Some(format!("API Error: {:#}", e)))
            }
        };

        if items.len() as u32 >= PER_PAGE {
            info!(
                "{} hit the {} item page limit, older results are not counted",
                query.kind.label(),
                PER_PAGE
            );
        }

        self.cache.insert(
            key,
            CachedSearch {
                items: items.clone(),
                error: error.clone(),
            },
        );
        debug!("{} queries cached", self.cache.len());
        FetchOutcome {
            items,
            error,
            from_cache: false,
        }
    }
}

fn parse_items(body: &str) -> Result<Vec<SearchItem>> {
    let response: SearchResponse =
        serde_json::from_str(body).context("search response is not valid JSON")?;
    Ok(response.items)
}
