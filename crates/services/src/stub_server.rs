// In-process HTTP stub for collector tests

use axum::extract::State;
use axum::http::{StatusCode, Uri};
use axum::Router;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

struct Routes {
    responses: HashMap<String, (u16, String)>,
    hits: Mutex<Vec<String>>,
}

/// Serves canned `(status, body)` pairs keyed by request path; anything else
/// is a 404. Every request URI is recorded.
pub(crate) struct StubServer {
    pub base_url: String,
    routes: Arc<Routes>,
}

impl StubServer {
    pub(crate) async fn start(responses: Vec<(&str, u16, &str)>) -> Self {
        let routes = Arc::new(Routes {
            responses: responses
                .into_iter()
                .map(|(path, status, body)| (path.to_string(), (status, body.to_string())))
                .collect(),
            hits: Mutex::new(Vec::new()),
        });

        let app = Router::new().fallback(respond).with_state(Arc::clone(&routes));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url: format!("http://{addr}"), routes }
    }

    pub(crate) fn hits(&self) -> Vec<String> {
        self.routes.hits.lock().unwrap().clone()
    }
}

async fn respond(State(routes): State<Arc<Routes>>, uri: Uri) -> (StatusCode, String) {
    routes.hits.lock().unwrap().push(uri.to_string());
    match routes.responses.get(uri.path()) {
        Some((status, body)) => (
            StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            body.clone(),
        ),
        None => (StatusCode::NOT_FOUND, String::new()),
    }
}
