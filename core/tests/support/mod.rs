use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use serde_json::{json, Value};

use wikiracer_core::RacerConfig;

/// In-process stand-in for the MediaWiki API. Responses are registered per
/// (prop, titles) key and served in order; the last one repeats. Unknown
/// titles get a page entry with no neighbor list, which the engine treats
/// as a dead end.
#[derive(Clone, Default)]
pub struct MockWiki {
    state: Arc<MockState>,
}

#[derive(Default)]
struct MockState {
    routes: Mutex<HashMap<(String, String), Vec<(u16, String)>>>,
    served: Mutex<HashMap<(String, String), usize>>,
    hits: AtomicUsize,
}

impl MockWiki {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, prop: &str, titles: &str, body: Value) {
        self.respond_with_status(prop, titles, 200, body.to_string());
    }

    pub fn respond_with_status(&self, prop: &str, titles: &str, status: u16, body: String) {
        self.state
            .routes
            .lock()
            .unwrap()
            .entry((prop.to_string(), titles.to_string()))
            .or_default()
            .push((status, body));
    }

    pub fn hits(&self) -> usize {
        self.state.hits.load(Ordering::SeqCst)
    }

    /// Binds to an ephemeral port and returns the API URL to race against.
    pub async fn serve(&self) -> String {
        let router = Router::new()
            .route("/w/api.php", get(api_handler))
            .with_state(Arc::clone(&self.state));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}/w/api.php")
    }
}

async fn api_handler(
    State(state): State<Arc<MockState>>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, String) {
    state.hits.fetch_add(1, Ordering::SeqCst);
    let prop = params.get("prop").cloned().unwrap_or_default();
    let titles = params.get("titles").cloned().unwrap_or_default();
    let key = (prop, titles);

    let routes = state.routes.lock().unwrap();
    let Some(sequence) = routes.get(&key) else {
        let body = json!({"query": {"pages": [{"title": key.1}]}});
        return (StatusCode::OK, body.to_string());
    };
    let mut served = state.served.lock().unwrap();
    let index = served.entry(key.clone()).or_insert(0);
    let (status, body) = &sequence[(*index).min(sequence.len() - 1)];
    *index += 1;
    (StatusCode::from_u16(*status).unwrap(), body.clone())
}

pub fn links_page(title: &str, links: &[&str]) -> Value {
    json!({"query": {"pages": [{
        "pageid": 1,
        "ns": 0,
        "title": title,
        "links": links.iter().map(|t| json!({"ns": 0, "title": t})).collect::<Vec<_>>(),
    }]}})
}

pub fn linkshere_page(title: &str, linkshere: &[&str]) -> Value {
    json!({"query": {"pages": [{
        "pageid": 1,
        "ns": 0,
        "title": title,
        "linkshere": linkshere.iter().map(|t| json!({"ns": 0, "title": t})).collect::<Vec<_>>(),
    }]}})
}

pub fn missing_page(title: &str) -> Value {
    json!({"query": {"pages": [{"title": title, "missing": true}]}})
}

/// A small deterministic config pointed at the mock server.
pub fn test_config(api_url: String) -> RacerConfig {
    RacerConfig {
        num_forward_workers: 2,
        num_backward_workers: 2,
        explore_all_links: false,
        explore_only_articles: true,
        api_url,
        rng_seed: Some(0),
    }
}

pub const TEST_TIME_LIMIT: Duration = Duration::from_secs(5);
