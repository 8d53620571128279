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
use wikiracer_web::config::ServerConfig;
use wikiracer_web::state::AppState;

/// In-process stand-in for the MediaWiki API, keyed on (prop, titles).
/// Unknown titles yield a dead-end page. Tracks how many requests the
/// engine made, so cache tests can assert it was not invoked.
#[derive(Clone, Default)]
pub struct MockWiki {
    state: Arc<MockState>,
}

#[derive(Default)]
struct MockState {
    routes: Mutex<HashMap<(String, String), (u16, String)>>,
    hits: AtomicUsize,
}

impl MockWiki {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, prop: &str, titles: &str, body: Value) {
        self.state
            .routes
            .lock()
            .unwrap()
            .insert((prop.to_string(), titles.to_string()), (200, body.to_string()));
    }

    pub fn hits(&self) -> usize {
        self.state.hits.load(Ordering::SeqCst)
    }

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
    let routes = state.routes.lock().unwrap();
    match routes.get(&(prop, titles.clone())) {
        Some((status, body)) => (StatusCode::from_u16(*status).unwrap(), body.clone()),
        None => {
            let body = json!({"query": {"pages": [{"title": titles}]}});
            (StatusCode::OK, body.to_string())
        }
    }
}

pub fn links_page(title: &str, links: &[&str]) -> Value {
    json!({"query": {"pages": [{
        "pageid": 1,
        "ns": 0,
        "title": title,
        "links": links.iter().map(|t| json!({"ns": 0, "title": t})).collect::<Vec<_>>(),
    }]}})
}

pub fn missing_page(title: &str) -> Value {
    json!({"query": {"pages": [{"title": title, "missing": true}]}})
}

/// A router backed by a mock wiki, with a deterministic small engine.
pub async fn create_test_app(time_limit: Duration) -> (Router, MockWiki) {
    let wiki = MockWiki::new();
    let api_url = wiki.serve().await;

    let config = ServerConfig {
        port: 0,
        time_limit,
        racer: RacerConfig {
            num_forward_workers: 2,
            num_backward_workers: 2,
            explore_all_links: false,
            explore_only_articles: true,
            api_url,
            rng_seed: Some(0),
        },
    };
    let state = Arc::new(AppState::new(config));

    (wikiracer_web::router(state), wiki)
}
