//! Mock of every service the gateway talks to, on one ephemeral port.

#![allow(dead_code)]

use actix_web::dev::ServerHandle;
use actix_web::http::{StatusCode, header};
use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: Value,
}

#[derive(Debug, Clone)]
struct CannedReply {
    status: u16,
    body: String,
}

#[derive(Clone, Default)]
struct MockState {
    replies: Arc<HashMap<String, CannedReply>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// Builder for [`MockUpstream`].
///
/// Paths without a canned reply answer 404, except `/chat/completions`, which
/// answers with a single choice whose content is `"<model> reply"`.
#[derive(Default)]
pub struct MockUpstreamBuilder {
    replies: HashMap<String, CannedReply>,
}

impl MockUpstreamBuilder {
    pub fn reply(mut self, path: &str, status: u16, body: impl Into<String>) -> Self {
        self.replies.insert(
            path.to_string(),
            CannedReply {
                status,
                body: body.into(),
            },
        );
        self
    }

    pub fn reply_json(self, path: &str, body: Value) -> Self {
        self.reply(path, 200, body.to_string())
    }

    /// Lookup reply carrying one chunk per text, in the given order.
    pub fn lookup_chunks(self, texts: &[&str]) -> Self {
        let chunks: Vec<Value> = texts
            .iter()
            .enumerate()
            .map(|(i, text)| json!({"text": text, "score": 1.0 - i as f64 * 0.1}))
            .collect();
        self.reply_json("/lookup", json!({ "chunks": chunks }))
    }

    pub async fn start(self) -> MockUpstream {
        let state = MockState {
            replies: Arc::new(self.replies),
            requests: Arc::new(Mutex::new(Vec::new())),
        };
        let data = web::Data::new(state.clone());

        let server = HttpServer::new(move || {
            App::new()
                .app_data(data.clone())
                .default_service(web::to(dispatch))
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .unwrap();
        let addr = server.addrs()[0];
        let server = server.run();
        let handle = server.handle();
        actix_web::rt::spawn(server);

        MockUpstream {
            addr,
            state,
            handle,
        }
    }
}

pub struct MockUpstream {
    addr: SocketAddr,
    state: MockState,
    handle: ServerHandle,
}

impl MockUpstream {
    pub fn builder() -> MockUpstreamBuilder {
        MockUpstreamBuilder::default()
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }
}

impl Drop for MockUpstream {
    fn drop(&mut self) {
        // The stop command is sent eagerly; the returned future only awaits completion.
        let _ = self.handle.stop(false);
    }
}

async fn dispatch(req: HttpRequest, body: web::Bytes, state: web::Data<MockState>) -> HttpResponse {
    let path = req.path().to_string();
    let header_str = |name: header::HeaderName| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let recorded = RecordedRequest {
        path: path.clone(),
        authorization: header_str(header::AUTHORIZATION),
        content_type: header_str(header::CONTENT_TYPE),
        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
    };
    let model = recorded.body["model"].as_str().unwrap_or("unknown").to_string();
    state.requests.lock().unwrap().push(recorded);

    if let Some(reply) = state.replies.get(&path) {
        return HttpResponse::build(StatusCode::from_u16(reply.status).unwrap())
            .content_type("application/json")
            .body(reply.body.clone());
    }

    if path == "/chat/completions" {
        return HttpResponse::Ok().json(json!({
            "id": "chatcmpl-123456789",
            "object": "chat.completion",
            "created": 1677652288,
            "model": model,
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": format!("{} reply", model)},
                "finish_reason": "stop"
            }]
        }));
    }

    HttpResponse::NotFound().finish()
}
