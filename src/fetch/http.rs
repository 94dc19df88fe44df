// src/fetch/http.rs
// =============================================================================
// This module implements the Fetcher trait over real HTTP.
//
// How it works:
// 1. GET the page with reqwest (10 second timeout)
// 2. Parse the HTML with scraper
// 3. Extract all <a href="..."> links
// 4. Resolve relative links against the page URL
// 5. Keep only http(s) links on the same domain as the starting URL
//
// Same-domain restriction:
// - The crawler should map ONE site, not wander off across the web
// - So links to other domains are dropped here, before the engine sees them
//
// Rust concepts:
// - Builder pattern: Client::builder() to configure the HTTP client
// - Option chaining: and_then, ok_or_else for fallible lookups
// =============================================================================

use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Duration;
use url::Url;

use super::{FetchError, FetchResult, Fetcher};

// Fetches pages over HTTP, restricted to a single domain
pub struct HttpFetcher {
    client: Client,
    base_domain: String,
}

impl HttpFetcher {
    // Creates a fetcher locked to the domain of `root_url`
    //
    // Fails if the URL doesn't parse or has no domain (e.g. file:// URLs)
    pub fn new(root_url: &str) -> Result<Self, FetchError> {
        let root = Url::parse(root_url).map_err(|_| FetchError::InvalidUrl(root_url.to_string()))?;

        let base_domain = root
            .domain()
            .ok_or_else(|| FetchError::InvalidUrl(root_url.to_string()))?
            .to_string();

        // Reused for every request (connection pooling)
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| FetchError::Request {
                url: root_url.to_string(),
                source: e,
            })?;

        Ok(Self {
            client,
            base_domain,
        })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchResult, FetchError> {
        let response =
            self.client
                .get(url)
                .send()
                .await
                .map_err(|e| FetchError::Request {
                    url: url.to_string(),
                    source: e,
                })?;

        // Non-2xx means this branch of the crawl ends here
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let html = response.text().await.map_err(|e| FetchError::Request {
            url: url.to_string(),
            source: e,
        })?;

        let links = extract_same_domain_links(&html, url, &self.base_domain);

        Ok(FetchResult {
            content: html,
            links,
        })
    }
}

// Extracts links from HTML that are on the same domain
//
// Parameters:
//   html: The HTML content to parse
//   page_url: The URL of the current page (for resolving relative links)
//   base_domain: The domain we're restricting crawling to
//
// Returns: Vec of absolute URLs on the same domain, in document order
fn extract_same_domain_links(html: &str, page_url: &str, base_domain: &str) -> Vec<String> {
    let mut links = Vec::new();

    let document = Html::parse_document(html);

    // Select all <a> tags with href
    let selector = Selector::parse("a[href]").unwrap();

    // Parse the page URL for resolving relative links
    let base = match Url::parse(page_url) {
        Ok(url) => url,
        Err(_) => return links,
    };

    for element in document.select(&selector) {
        if let Some(href) = element.value().attr("href") {
            // Try to resolve to absolute URL
            let absolute_url = match resolve_link(&base, href) {
                Some(url) => url,
                None => continue,
            };

            // Check if it's on the same domain
            if let Ok(parsed) = Url::parse(&absolute_url) {
                // Only include if:
                // 1. It's HTTP/HTTPS
                // 2. It's on the same domain
                if (parsed.scheme() == "http" || parsed.scheme() == "https")
                    && parsed.domain() == Some(base_domain)
                {
                    links.push(absolute_url);
                }
            }
        }
    }

    links
}

// Resolves a link (possibly relative) to an absolute URL
//
// Fragments are stripped so that /page and /page#section count as the
// same URL for the visited set.
fn resolve_link(base: &Url, href: &str) -> Option<String> {
    // Skip anchors and special protocols
    if href.starts_with('#')
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("javascript:")
    {
        return None;
    }

    // Try to resolve the URL
    match base.join(href) {
        Ok(mut url) => {
            url.set_fragment(None);
            Some(url.to_string())
        }
        Err(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_absolute_link() {
        let base = Url::parse("https://example.com/page").unwrap();
        let result = resolve_link(&base, "https://other.com");
        assert_eq!(result, Some("https://other.com/".to_string()));
    }

    #[test]
    fn test_resolve_relative_link() {
        let base = Url::parse("https://example.com/page").unwrap();
        let result = resolve_link(&base, "/docs");
        assert_eq!(result, Some("https://example.com/docs".to_string()));
    }

    #[test]
    fn test_resolve_strips_fragment() {
        let base = Url::parse("https://example.com/page").unwrap();
        let result = resolve_link(&base, "/docs#install");
        assert_eq!(result, Some("https://example.com/docs".to_string()));
    }

    #[test]
    fn test_skip_anchor() {
        let base = Url::parse("https://example.com/page").unwrap();
        let result = resolve_link(&base, "#section");
        assert_eq!(result, None);
    }

    #[test]
    fn test_skip_mailto() {
        let base = Url::parse("https://example.com/page").unwrap();
        let result = resolve_link(&base, "mailto:test@example.com");
        assert_eq!(result, None);
    }

    #[test]
    fn test_extract_same_domain_only() {
        let html = r#"
            <html><body>
                <a href="/a">A</a>
                <a href="https://example.com/b">B</a>
                <a href="https://elsewhere.com/c">C</a>
                <a href="mailto:x@example.com">mail</a>
            </body></html>
        "#;
        let links = extract_same_domain_links(html, "https://example.com/", "example.com");
        assert_eq!(
            links,
            vec![
                "https://example.com/a".to_string(),
                "https://example.com/b".to_string(),
            ]
        );
    }

    #[test]
    fn test_new_rejects_domainless_url() {
        assert!(HttpFetcher::new("file:///tmp/x.html").is_err());
        assert!(HttpFetcher::new("not a url").is_err());
    }
}
