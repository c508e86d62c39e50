//! # Gist Listing Client
//!
//! This module talks to the GitHub REST API to enumerate the gists of a user.
//! The listing is exposed through the [`GistSource`] trait one page at a time;
//! the pagination loop itself lives in [`crate::pipeline::lister`] so that it
//! can be exercised against an in-memory source in tests.
//!
//! Pagination metadata comes from the `Link` response header, which GitHub
//! fills with `rel="next"` and `rel="last"` URLs carrying a `page` query
//! parameter. Both are absent on the final page.

use log::debug;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION, LINK, USER_AGENT};
use serde::Deserialize;
use url::Url;

use crate::error::{Error, Result};

/// Gists requested per page (the API maximum)
pub const PER_PAGE: u32 = 100;

/// A gist as returned by the listing endpoint.
///
/// Only the fields the pipeline needs are decoded; everything else in the
/// response is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Gist {
    pub id: String,
    /// Clone URL of the gist's backing repository
    pub git_pull_url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
}

/// One page of a gist listing.
///
/// `next_page` and `last_page` are `0` when the server did not announce them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GistPage {
    pub gists: Vec<Gist>,
    pub next_page: u32,
    pub last_page: u32,
}

/// Trait for gist listing - allows mocking in tests
pub trait GistSource: Send + Sync {
    /// Fetches page `page` (1-based) of the gists owned by `user`.
    fn list_page(&self, user: &str, page: u32) -> Result<GistPage>;
}

/// Pagination information extracted from GitHub's Link header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkPagination {
    /// The last page number (from rel="last" link).
    pub last_page: Option<u32>,
    /// The next page number (from rel="next" link).
    pub next_page: Option<u32>,
}

/// Parse the Link header to extract pagination info.
///
/// GitHub Link headers look like:
/// `<https://api.github.com/users/octocat/gists?per_page=100&page=2>; rel="next", <...&page=3>; rel="last"`
pub fn parse_link_header(link_header: &str) -> LinkPagination {
    let mut info = LinkPagination::default();

    for part in link_header.split(',') {
        let mut url = None;
        let mut rel = None;

        for segment in part.trim().split(';') {
            let segment = segment.trim();
            if let Some(inner) = segment
                .strip_prefix('<')
                .and_then(|s| s.strip_suffix('>'))
            {
                url = Some(inner);
            } else if let Some(rel_value) = segment.strip_prefix("rel=") {
                rel = Some(rel_value.trim_matches('"'));
            }
        }

        if let (Some(url), Some(rel_type)) = (url, rel) {
            if let Some(page_num) = extract_page_from_url(url) {
                match rel_type {
                    "last" => info.last_page = Some(page_num),
                    "next" => info.next_page = Some(page_num),
                    _ => {}
                }
            }
        }
    }

    info
}

/// Extract the page parameter from a URL.
fn extract_page_from_url(url: &str) -> Option<u32> {
    let parsed = Url::parse(url).ok()?;
    let page = parsed
        .query_pairs()
        .find(|(key, _)| key == "page")
        .and_then(|(_, value)| value.parse().ok());
    page
}

/// Blocking GitHub API client authenticated with a personal access token.
pub struct GitHubClient {
    http: Client,
    api_url: Url,
    token: String,
}

impl GitHubClient {
    /// Creates a client for the API rooted at `api_url`.
    pub fn new(api_url: &str, token: &str) -> Result<Self> {
        Self::with_client(Client::builder().build()?, api_url, token)
    }

    /// Same as [`GitHubClient::new`] with a preconfigured HTTP client.
    pub fn with_client(http: Client, api_url: &str, token: &str) -> Result<Self> {
        // A trailing slash keeps `Url::join` from dropping the last segment
        // of API roots such as `https://ghe.example.com/api/v3`.
        let api_url = if api_url.ends_with('/') {
            Url::parse(api_url)?
        } else {
            Url::parse(&format!("{}/", api_url))?
        };

        Ok(Self {
            http,
            api_url,
            token: token.to_string(),
        })
    }

    /// Builds the listing URL for one page of a user's gists.
    pub fn gists_url(&self, user: &str, page: u32) -> Result<Url> {
        let mut url = self.api_url.join(&format!("users/{}/gists", user))?;
        url.query_pairs_mut()
            .append_pair("per_page", &PER_PAGE.to_string())
            .append_pair("page", &page.to_string());
        Ok(url)
    }
}

impl GistSource for GitHubClient {
    fn list_page(&self, user: &str, page: u32) -> Result<GistPage> {
        let url = self.gists_url(user, page)?;
        debug!("GET {}", url);

        let response = self
            .http
            .get(url.clone())
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .header(ACCEPT, "application/vnd.github+json")
            .header(USER_AGENT, concat!("gist2repo/", env!("CARGO_PKG_VERSION")))
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().unwrap_or_default();
            return Err(Error::Api {
                url: url.to_string(),
                status: status.as_u16(),
                message,
            });
        }

        let links = response
            .headers()
            .get(LINK)
            .and_then(|v| v.to_str().ok())
            .map(parse_link_header)
            .unwrap_or_default();
        let gists: Vec<Gist> = response.json()?;

        Ok(GistPage {
            gists,
            next_page: links.next_page.unwrap_or(0),
            last_page: links.last_page.unwrap_or(0),
        })
    }
}
