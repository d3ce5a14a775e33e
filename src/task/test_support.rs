use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::watch;

use crate::error::RequestError;
use crate::task::task_client::TaskApi;
use crate::task::task_controller::TaskState;
use crate::task::task_dto::CreateTaskDto;
use crate::task::task_models::{Task, TaskId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    List,
    Create(CreateTaskDto),
    Complete(TaskId),
}

/// Scripted in-memory [`TaskApi`] that records every call.
///
/// List responses are consumed in order; once exhausted it returns an empty
/// list. Create and complete keep returning whatever was last set.
#[derive(Default)]
pub struct FakeApi {
    calls: Mutex<Vec<ApiCall>>,
    lists: Mutex<VecDeque<Result<Vec<Task>, RequestError>>>,
    create: Mutex<Option<Result<Task, RequestError>>>,
    complete: Mutex<Option<Result<(), RequestError>>>,
    observer: Mutex<Option<watch::Receiver<TaskState>>>,
    loading_during_calls: Mutex<Vec<(ApiCall, bool)>>,
}

impl FakeApi {
    pub fn push_list(&self, response: Result<Vec<Task>, RequestError>) {
        self.lists.lock().unwrap().push_back(response);
    }

    pub fn set_create(&self, response: Result<Task, RequestError>) {
        *self.create.lock().unwrap() = Some(response);
    }

    pub fn set_complete(&self, response: Result<(), RequestError>) {
        *self.complete.lock().unwrap() = Some(response);
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn list_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, ApiCall::List))
            .count()
    }

    /// Watches controller state so each call can note whether `loading` was
    /// set while it ran.
    pub fn observe(&self, rx: watch::Receiver<TaskState>) {
        *self.observer.lock().unwrap() = Some(rx);
    }

    pub fn loading_during_calls(&self) -> Vec<(ApiCall, bool)> {
        self.loading_during_calls.lock().unwrap().clone()
    }

    fn record(&self, call: ApiCall) {
        if let Some(rx) = self.observer.lock().unwrap().as_ref() {
            let loading = rx.borrow().loading;
            self.loading_during_calls
                .lock()
                .unwrap()
                .push((call.clone(), loading));
        }
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl TaskApi for FakeApi {
    async fn list_recent_incomplete(&self) -> Result<Vec<Task>, RequestError> {
        self.record(ApiCall::List);
        self.lists
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn create_task(&self, dto: &CreateTaskDto) -> Result<Task, RequestError> {
        self.record(ApiCall::Create(dto.clone()));
        self.create
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Ok(task(1, &dto.title)))
    }

    async fn complete_task(&self, id: TaskId) -> Result<(), RequestError> {
        self.record(ApiCall::Complete(id));
        self.complete.lock().unwrap().clone().unwrap_or(Ok(()))
    }
}

pub fn task(id: TaskId, title: &str) -> Task {
    Task {
        id,
        title: title.to_string(),
        description: String::new(),
        completed: false,
        created_at: None,
    }
}
