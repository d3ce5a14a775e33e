#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};

/// One request as seen by the stub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seen {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

impl Seen {
    pub fn is(&self, method: Method, path: &str) -> bool {
        self.method == method && self.path == path
    }
}

#[derive(Debug, Clone)]
struct StoredTask {
    id: i64,
    title: String,
    description: String,
    completed: bool,
}

impl StoredTask {
    fn to_json(&self) -> Value {
        json!({
            "id": self.id,
            "title": self.title,
            "description": self.description,
            "completed": self.completed,
            "createdAt": format!("2024-05-01T09:{:02}:00", self.id % 60),
        })
    }
}

#[derive(Default)]
struct Inner {
    tasks: Vec<StoredTask>,
    next_id: i64,
    seen: Vec<Seen>,
    scripted_lists: VecDeque<Value>,
    scripted_responses: VecDeque<(Method, StatusCode, Value)>,
    create_delay: Option<Duration>,
}

impl Inner {
    fn take_scripted(&mut self, method: &Method) -> Option<Response> {
        let pos = self
            .scripted_responses
            .iter()
            .position(|(m, _, _)| m == method)?;
        let (_, status, body) = self.scripted_responses.remove(pos)?;
        Some((status, Json(body)).into_response())
    }
}

type Shared = Arc<Mutex<Inner>>;

/// In-process stand-in for the task backend.
///
/// By default it behaves like the real service: the recent endpoint returns the
/// five newest incomplete tasks. Scripted lists and responses take precedence
/// and are consumed in order.
pub struct StubBackend {
    pub base_url: String,
    inner: Shared,
}

impl StubBackend {
    pub async fn start() -> Self {
        let inner: Shared = Arc::new(Mutex::new(Inner {
            next_id: 1,
            ..Default::default()
        }));

        let app = Router::new()
            .route("/api/tasks/recent", get(recent))
            .route("/api/tasks", post(create))
            .route("/api/tasks/:id", put(complete))
            .with_state(inner.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}/api/tasks", addr),
            inner,
        }
    }

    pub fn seed(&self, title: &str, description: &str) -> i64 {
        let mut inner = self.inner.lock().unwrap();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.tasks.push(StoredTask {
            id,
            title: title.to_string(),
            description: description.to_string(),
            completed: false,
        });
        id
    }

    /// Next `GET /recent` answers with `body` verbatim.
    pub fn script_list(&self, body: Value) {
        self.inner.lock().unwrap().scripted_lists.push_back(body);
    }

    /// Next request with `method` answers with `status` and `body` instead of
    /// being handled.
    pub fn respond_next(&self, method: Method, status: StatusCode, body: Value) {
        self.inner
            .lock()
            .unwrap()
            .scripted_responses
            .push_back((method, status, body));
    }

    pub fn delay_create(&self, delay: Duration) {
        self.inner.lock().unwrap().create_delay = Some(delay);
    }

    pub fn seen(&self) -> Vec<Seen> {
        self.inner.lock().unwrap().seen.clone()
    }

    pub fn is_completed(&self, id: i64) -> bool {
        self.inner
            .lock()
            .unwrap()
            .tasks
            .iter()
            .any(|t| t.id == id && t.completed)
    }
}

async fn recent(State(inner): State<Shared>) -> Response {
    let mut inner = inner.lock().unwrap();
    inner.seen.push(Seen {
        method: Method::GET,
        path: "/api/tasks/recent".into(),
        body: None,
    });
    if let Some(scripted) = inner.take_scripted(&Method::GET) {
        return scripted;
    }
    if let Some(body) = inner.scripted_lists.pop_front() {
        return Json(body).into_response();
    }
    let recent: Vec<Value> = inner
        .tasks
        .iter()
        .rev()
        .filter(|t| !t.completed)
        .take(5)
        .map(StoredTask::to_json)
        .collect();
    Json(Value::Array(recent)).into_response()
}

async fn create(State(inner): State<Shared>, Json(body): Json<Value>) -> Response {
    let delay = {
        let mut inner = inner.lock().unwrap();
        inner.seen.push(Seen {
            method: Method::POST,
            path: "/api/tasks".into(),
            body: Some(body.clone()),
        });
        inner.create_delay
    };
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    let mut inner = inner.lock().unwrap();
    if let Some(scripted) = inner.take_scripted(&Method::POST) {
        return scripted;
    }
    let id = inner.next_id;
    inner.next_id += 1;
    let task = StoredTask {
        id,
        title: body["title"].as_str().unwrap_or_default().to_string(),
        description: body["description"].as_str().unwrap_or_default().to_string(),
        completed: false,
    };
    let json = task.to_json();
    inner.tasks.push(task);
    (StatusCode::CREATED, Json(json)).into_response()
}

async fn complete(State(inner): State<Shared>, Path(id): Path<i64>) -> Response {
    let mut inner = inner.lock().unwrap();
    inner.seen.push(Seen {
        method: Method::PUT,
        path: format!("/api/tasks/{}", id),
        body: None,
    });
    if let Some(scripted) = inner.take_scripted(&Method::PUT) {
        return scripted;
    }
    match inner.tasks.iter_mut().find(|t| t.id == id) {
        Some(task) => {
            task.completed = true;
            StatusCode::NO_CONTENT.into_response()
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": format!("Task not found with id: {}", id) })),
        )
            .into_response(),
    }
}

pub fn task_json(id: i64, title: &str) -> Value {
    json!({ "id": id, "title": title, "description": "", "completed": false })
}
