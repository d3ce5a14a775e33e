use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::error::RequestError;
use crate::task::task_client::TaskApi;
use crate::task::task_dto::CreateTaskDto;
use crate::task::task_models::{Task, TaskId};

/// What the UI currently shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskState {
    /// In the order the server returned them.
    pub tasks: Vec<Task>,
    pub loading: bool,
    pub error: Option<String>,
}

/// Single owner of [`TaskState`]. Views read snapshots or subscribe to
/// changes; only the operations below mutate state.
///
/// Operations take `&self` and may overlap; whichever response lands last
/// decides the final state.
pub struct TaskController<A> {
    api: A,
    state: watch::Sender<TaskState>,
    activated: AtomicBool,
}

impl<A: TaskApi> TaskController<A> {
    pub fn new(api: A) -> Self {
        let (state, _) = watch::channel(TaskState::default());
        Self {
            api,
            state,
            activated: AtomicBool::new(false),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn snapshot(&self) -> TaskState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<TaskState> {
        self.state.subscribe()
    }

    /// Initial load. Only the first call fetches.
    pub async fn activate(&self) {
        if self.activated.swap(true, Ordering::SeqCst) {
            return;
        }
        self.fetch_all().await;
    }

    /// Replaces `tasks` with the server's recent list. On failure the stale
    /// list is kept and the message lands in `error`.
    pub async fn fetch_all(&self) {
        self.state.send_modify(|s| {
            s.loading = true;
            s.error = None;
        });

        match self.api.list_recent_incomplete().await {
            Ok(tasks) => {
                debug!(count = tasks.len(), "Fetched recent tasks");
                self.state.send_modify(|s| {
                    s.tasks = tasks;
                    s.loading = false;
                });
            }
            Err(e) => {
                warn!("Fetching tasks failed: {}", e);
                self.state.send_modify(|s| {
                    s.error = Some(e.message);
                    s.loading = false;
                });
            }
        }
    }

    /// Creates a task, then re-fetches since only the server knows the new
    /// recent window.
    pub async fn add_task(&self, dto: CreateTaskDto) -> Result<(), RequestError> {
        self.state.send_modify(|s| {
            s.loading = true;
            s.error = None;
        });

        let result = match self.api.create_task(&dto).await {
            Ok(created) => {
                debug!(id = created.id, "Created task");
                self.fetch_all().await;
                Ok(())
            }
            Err(e) => {
                warn!("Creating task failed: {}", e);
                self.state.send_modify(|s| s.error = Some(e.message.clone()));
                Err(e)
            }
        };

        self.state.send_modify(|s| s.loading = false);
        result
    }

    /// Completes a task and drops it locally. If the server refuses, the
    /// list is re-synced from the server instead.
    pub async fn mark_complete(&self, id: TaskId) -> Result<(), RequestError> {
        self.state.send_modify(|s| s.error = None);

        match self.api.complete_task(id).await {
            Ok(()) => {
                debug!(id, "Completed task");
                self.state.send_modify(|s| s.tasks.retain(|t| t.id != id));
                Ok(())
            }
            Err(e) => {
                warn!(id, "Completing task failed: {}", e);
                self.state.send_modify(|s| s.error = Some(e.message.clone()));
                self.fetch_all().await;
                // the resync clears `error`; the completion failure is what the user needs to see
                self.state.send_modify(|s| {
                    if s.error.is_none() {
                        s.error = Some(e.message.clone());
                    }
                });
                Err(e)
            }
        }
    }
}
