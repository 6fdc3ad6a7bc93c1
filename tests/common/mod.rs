//! In-process stand-in for the analysis service.

#![allow(dead_code)]

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::routing::post;
use axum::Router;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use data_guardian::services::{ChannelNotifier, Notification, PipelineSession};
use data_guardian::Config;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CapturedUpload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub file_bytes: Vec<u8>,
    pub sample_size: Option<String>,
}

#[derive(Clone)]
pub struct MockReply {
    pub status: StatusCode,
    pub body: String,
    pub delay: Duration,
}

impl MockReply {
    pub fn json(status: StatusCode, body: Value) -> Self {
        Self {
            status,
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn raw(status: StatusCode, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[derive(Clone)]
struct MockState {
    reply: MockReply,
    calls: Arc<AtomicUsize>,
    uploads: Arc<Mutex<Vec<CapturedUpload>>>,
}

pub struct MockService {
    pub addr: SocketAddr,
    calls: Arc<AtomicUsize>,
    uploads: Arc<Mutex<Vec<CapturedUpload>>>,
}

impl MockService {
    pub async fn start(reply: MockReply) -> Self {
        let calls = Arc::new(AtomicUsize::new(0));
        let uploads = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            reply,
            calls: Arc::clone(&calls),
            uploads: Arc::clone(&uploads),
        };

        let app = Router::new()
            .route("/api/upload", post(upload))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, calls, uploads }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn uploads(&self) -> Vec<CapturedUpload> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn config(&self) -> Config {
        Config {
            service_url: self.base_url(),
            request_timeout: Duration::from_secs(10),
            progress_tick: Duration::from_millis(10),
        }
    }

    pub fn session(&self) -> (PipelineSession, tokio::sync::mpsc::UnboundedReceiver<Notification>) {
        self.session_with_config(self.config())
    }

    /// A session whose progress simulator ticks every `tick`.
    pub fn session_with_tick(
        &self,
        tick: Duration,
    ) -> (PipelineSession, tokio::sync::mpsc::UnboundedReceiver<Notification>) {
        let mut config = self.config();
        config.progress_tick = tick;
        self.session_with_config(config)
    }

    fn session_with_config(
        &self,
        config: Config,
    ) -> (PipelineSession, tokio::sync::mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        let session = PipelineSession::from_config(&config, Arc::new(ChannelNotifier::new(tx))).unwrap();
        (session, rx)
    }
}

async fn upload(State(state): State<MockState>, mut multipart: Multipart) -> (StatusCode, String) {
    state.calls.fetch_add(1, Ordering::SeqCst);

    let mut captured = CapturedUpload::default();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                captured.file_name = field.file_name().map(str::to_string);
                captured.content_type = field.content_type().map(str::to_string);
                captured.file_bytes = field.bytes().await.unwrap().to_vec();
            }
            Some("sample_size") => {
                captured.sample_size = Some(field.text().await.unwrap());
            }
            _ => {}
        }
    }
    state.uploads.lock().unwrap().push(captured);

    tokio::time::sleep(state.reply.delay).await;
    (state.reply.status, state.reply.body.clone())
}

pub fn drain(rx: &mut tokio::sync::mpsc::UnboundedReceiver<Notification>) -> Vec<Notification> {
    let mut out = Vec::new();
    while let Ok(n) = rx.try_recv() {
        out.push(n);
    }
    out
}

pub fn analysis_body(rows: u64, columns: u64) -> Value {
    json!({
        "message": "Pipeline executed successfully",
        "dataset_preview": [
            {"id": 1, "name": "Ana", "score": 9.5},
            {"id": 2, "name": null, "score": 7.0}
        ],
        "dataset_stats": {"rows": rows, "columns": columns, "column_names": ["id", "name", "score"]},
        "initial_analysis": {
            "domain": "Education",
            "column_meanings": {"id": "Student identifier", "name": "Student name", "score": "Final grade"}
        },
        "quality_report": {
            "missing_values": {"id": 0, "name": 1, "score": 0},
            "duplicates": 0,
            "suggestions": "Fill missing names."
        },
        "bias_results": {
            "distributions": {"name": {"Ana": 0.5, "Unknown": 0.5}},
            "analysis": "No strong skew."
        },
        "privacy_results": {"pii_columns": ["name"], "suggestions": "Pseudonymize names."},
        "lineage_info": {"source": "grades.csv", "transformations": ["sample", "profile"]},
        "compliance_report": {"missing_values_check": true, "pii_check": false},
        "recommendations": {"recommendations": [
            {"category": "Quality", "description": "Fill missing names"},
            {"category": "Privacy", "description": "Pseudonymize the name column"}
        ]},
        "full_report": {"summary": {"rows": rows}, "generated_by": "mock"}
    })
}
