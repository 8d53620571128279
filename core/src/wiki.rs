use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;

use crate::error::{RaceError, Result};

pub const WIKIPEDIA_API_URL: &str = "https://en.wikipedia.org/w/api.php";

/// Which way a search front walks the link graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Outbound links of a page (`prop=links`).
    Forward,
    /// Pages linking to a page (`prop=linkshere`).
    Backward,
}

impl Direction {
    pub(crate) fn cursor_param(self) -> &'static str {
        match self {
            Direction::Forward => "plcontinue",
            Direction::Backward => "lhcontinue",
        }
    }
}

/// Client for the MediaWiki query API.
pub struct WikiClient {
    http: Client,
    api_url: String,
}

impl WikiClient {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            api_url: api_url.into(),
        }
    }

    /// Issues GETs until the response is not a 429, sleeping 100ms between
    /// attempts. There is no retry cap; the race deadline is the only bound.
    /// Transport errors propagate immediately.
    pub async fn request_until_response(&self, params: &[(&str, &str)]) -> Result<Response> {
        loop {
            let response = self.http.get(&self.api_url).query(params).send().await?;
            if response.status() == StatusCode::TOO_MANY_REQUESTS {
                tokio::time::sleep(Duration::from_millis(100)).await;
                continue;
            }
            return Ok(response);
        }
    }

    /// Fetches one page of neighbors for `title` in the given direction.
    /// `continuation` carries the (`continue`, `plcontinue`/`lhcontinue`)
    /// cursors from the previous page.
    pub async fn fetch_neighbors(
        &self,
        direction: Direction,
        title: &str,
        descending: bool,
        only_articles: bool,
        continuation: Option<(&str, &str)>,
    ) -> Result<QueryResponse> {
        let mut params: Vec<(&str, &str)> = vec![
            ("action", "query"),
            ("format", "json"),
            ("formatversion", "2"),
            ("titles", title),
        ];
        match direction {
            Direction::Forward => {
                params.push(("prop", "links"));
                params.push(("pllimit", "500"));
                if descending {
                    params.push(("pldir", "descending"));
                }
                if only_articles {
                    params.push(("plnamespace", "0"));
                }
            }
            Direction::Backward => {
                params.push(("prop", "linkshere"));
                params.push(("lhprop", "title"));
                params.push(("lhlimit", "500"));
                if only_articles {
                    params.push(("lhnamespace", "0"));
                }
            }
        }
        if let Some((token, cursor)) = continuation {
            params.push(("continue", token));
            params.push((direction.cursor_param(), cursor));
        }

        let response = self.request_until_response(&params).await?;
        parse_query_response(response.text().await?)
    }
}

/// Deserializes a query response body. A body without the `query.pages`
/// array is as fatal as unparseable JSON: a link query always carries one,
/// so its absence means the response is something else entirely.
fn parse_query_response(body: String) -> Result<QueryResponse> {
    match serde_json::from_str::<QueryResponse>(&body) {
        Ok(response) if response.has_pages() => Ok(response),
        Ok(_) => Err(RaceError::MalformedResponse {
            source: <serde_json::Error as serde::de::Error>::custom(
                "the query.pages array is missing",
            ),
            body,
        }),
        Err(source) => Err(RaceError::MalformedResponse { source, body }),
    }
}

/// The slice of a MediaWiki query response this engine consumes. The inner
/// keys are optional because MediaWiki omits them rather than sending
/// nulls; the `query.pages` path itself is validated at parse time.
#[derive(Debug, Deserialize)]
pub struct QueryResponse {
    pub query: Option<QueryPages>,
    #[serde(rename = "continue")]
    pub continuation: Option<Continuation>,
}

impl QueryResponse {
    pub fn pages(&self) -> &[Page] {
        self.query
            .as_ref()
            .and_then(|query| query.pages.as_deref())
            .unwrap_or_default()
    }

    fn has_pages(&self) -> bool {
        self.query
            .as_ref()
            .is_some_and(|query| query.pages.is_some())
    }
}

#[derive(Debug, Deserialize)]
pub struct QueryPages {
    pub pages: Option<Vec<Page>>,
}

#[derive(Debug, Deserialize)]
pub struct Page {
    pub title: Option<String>,
    #[serde(default)]
    pub missing: bool,
    pub links: Option<Vec<Neighbor>>,
    pub linkshere: Option<Vec<Neighbor>>,
}

impl Page {
    pub fn neighbors(&self, direction: Direction) -> Option<&[Neighbor]> {
        match direction {
            Direction::Forward => self.links.as_deref(),
            Direction::Backward => self.linkshere.as_deref(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Neighbor {
    pub title: String,
}

/// Top-level `continue` object. The `continue` field nested inside it is a
/// different value from the object's own key, hence the rename.
#[derive(Debug, Deserialize)]
pub struct Continuation {
    #[serde(rename = "continue")]
    pub token: Option<String>,
    pub plcontinue: Option<String>,
    pub lhcontinue: Option<String>,
}
