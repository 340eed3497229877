#![allow(dead_code)]

use axum::extract::{Multipart, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::Value;
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// What the fake backend answers to the next request.
#[derive(Clone, Debug)]
pub enum Reply {
    Json(Value),
    Status(u16),
    Raw(&'static str),
    Delayed(Duration, Box<Reply>),
}

#[derive(Clone, Debug)]
pub struct ReceivedPart {
    pub name: Option<String>,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub len: usize,
}

/// Stand-in for the inference backend: `POST /scan` and `GET /`.
#[derive(Clone, Default)]
pub struct FakeBackend {
    scan_replies: Arc<Mutex<VecDeque<Reply>>>,
    liveness_replies: Arc<Mutex<VecDeque<Reply>>>,
    liveness_default: Arc<Mutex<Option<Reply>>>,
    pub parts: Arc<Mutex<Vec<ReceivedPart>>>,
    pub scan_hits: Arc<AtomicUsize>,
    pub liveness_hits: Arc<AtomicUsize>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_scan(&self, reply: Reply) -> &Self {
        self.scan_replies.lock().unwrap().push_back(reply);
        self
    }

    pub fn push_liveness(&self, reply: Reply) -> &Self {
        self.liveness_replies.lock().unwrap().push_back(reply);
        self
    }

    /// Answer used once the liveness queue is empty.
    pub fn liveness_default(&self, reply: Reply) -> &Self {
        *self.liveness_default.lock().unwrap() = Some(reply);
        self
    }

    pub fn scan_hits(&self) -> usize {
        self.scan_hits.load(Ordering::SeqCst)
    }

    pub fn liveness_hits(&self) -> usize {
        self.liveness_hits.load(Ordering::SeqCst)
    }

    pub fn received_parts(&self) -> Vec<ReceivedPart> {
        self.parts.lock().unwrap().clone()
    }

    pub async fn serve(&self) -> String {
        let app = Router::new()
            .route("/", get(liveness))
            .route("/scan", post(scan))
            .with_state(self.clone());
        let addr = serve_router(app).await;
        format!("http://{}", addr)
    }
}

pub async fn serve_router(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve app") });
    addr
}

/// A base URL nothing listens on.
pub async fn unreachable_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{}", addr)
}

async fn liveness(State(backend): State<FakeBackend>) -> Response {
    backend.liveness_hits.fetch_add(1, Ordering::SeqCst);
    let queued = backend.liveness_replies.lock().unwrap().pop_front();
    let reply = queued
        .or_else(|| backend.liveness_default.lock().unwrap().clone())
        .unwrap_or_else(|| Reply::Json(serde_json::json!({"message": "ONLYTECH API running"})));
    render(reply).await
}

async fn scan(State(backend): State<FakeBackend>, mut multipart: Multipart) -> Response {
    backend.scan_hits.fetch_add(1, Ordering::SeqCst);
    while let Some(field) = multipart.next_field().await.expect("multipart field") {
        let name = field.name().map(str::to_string);
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let len = field.bytes().await.expect("field bytes").len();
        backend.parts.lock().unwrap().push(ReceivedPart {
            name,
            file_name,
            content_type,
            len,
        });
    }
    let reply = backend
        .scan_replies
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or_else(|| Reply::Json(serde_json::json!({})));
    render(reply).await
}

fn render(reply: Reply) -> std::pin::Pin<Box<dyn std::future::Future<Output = Response> + Send>> {
    Box::pin(async move {
        match reply {
            Reply::Json(v) => Json(v).into_response(),
            Reply::Status(code) => StatusCode::from_u16(code)
                .expect("status code")
                .into_response(),
            Reply::Raw(body) => ([(header::CONTENT_TYPE, "application/json")], body).into_response(),
            Reply::Delayed(delay, inner) => {
                tokio::time::sleep(delay).await;
                render(*inner).await
            }
        }
    })
}

pub fn jpeg_bytes() -> Vec<u8> {
    vec![0xff, 0xd8, 0xff, 0xe0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00, 0xff, 0xd9]
}
